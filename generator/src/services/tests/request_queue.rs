//! Tests for RequestQueue admission and ordering

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_test::{assert_pending, assert_ready};

use shared::{
    ApiFailure, ContentType, Customization, GeneratedContent, GenerationRequest, GenerationResponse, Priority, ProviderId,
    ResponseMetadata,
};
use crate::error::{GeneratorError, GeneratorResult};
use crate::services::request_queue::RequestQueue;
use crate::traits::{MockRequestHandler, RequestHandler};

/// Sleeps for a fixed time and records concurrency and start order
struct TimedHandler {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    started: Mutex<Vec<String>>,
}

impl TimedHandler {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
        }
    }

    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestHandler for TimedHandler {
    async fn handle(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResponse> {
        self.started.lock().unwrap().push(request.prompt.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(echo(request))
    }
}

fn echo(request: &GenerationRequest) -> GenerationResponse {
    GenerationResponse::success(
        request.id,
        GeneratedContent::Single(request.prompt.clone()),
        ResponseMetadata::default(),
    )
}

fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(ContentType::LinkedinPost, prompt, ProviderId::OpenAI, Customization::default())
}

#[tokio::test(start_paused = true)]
async fn test_five_requests_with_bound_three() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(100)), 3);
    let start = Instant::now();

    let handles: Vec<_> = (0..5).map(|i| queue.submit(request(&format!("req-{i}")))).collect();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.handler().in_flight(), 3);
    let status = queue.status();
    assert_eq!(status.active_requests, 3);
    assert_eq!(status.queue_length, 2);
    assert_eq!(status.max_concurrent, 3);

    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "finished too early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "finished too late: {elapsed:?}");
    assert_eq!(queue.handler().peak(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_never_exceeds_bound() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(10)), 3);

    let handles: Vec<_> = (0..12).map(|i| queue.submit(request(&format!("req-{i}")))).collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(queue.handler().peak(), 3);
    assert_eq!(queue.handler().started().len(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_bound_of_one_starts_in_submission_order() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(5)), 1);
    let prompts = ["first", "second", "third", "fourth"];

    let handles: Vec<_> = prompts.iter().map(|prompt| queue.submit(request(prompt))).collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(queue.handler().started(), prompts);
    assert_eq!(queue.handler().peak(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_higher_priority_jumps_ahead_of_waiting_requests() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(5)), 1);

    let handles = vec![
        queue.submit(request("blocker")),
        queue.submit(request("low").with_priority(Priority::Low)),
        queue.submit(request("normal-a")),
        queue.submit(request("high").with_priority(Priority::High)),
        queue.submit(request("normal-b")),
    ];
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(
        queue.handler().started(),
        vec!["blocker", "high", "normal-a", "normal-b", "low"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_clear_rejects_only_pending_requests() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(100)), 1);

    let running = queue.submit(request("running"));
    let waiting_a = queue.submit(request("waiting-a"));
    let waiting_b = queue.submit(request("waiting-b"));

    assert_eq!(queue.clear(), 2);
    assert_eq!(queue.status().queue_length, 0);

    assert_eq!(waiting_a.await.unwrap_err(), GeneratorError::QueueCleared);
    assert_eq!(waiting_b.await.unwrap_err(), GeneratorError::QueueCleared);

    let response = running.await.unwrap();
    assert_eq!(response.content(), &GeneratedContent::Single("running".to_string()));
    assert_eq!(queue.handler().started(), vec!["running"]);
}

#[tokio::test]
async fn test_clear_on_empty_queue_returns_zero() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::ZERO), 3);
    assert_eq!(queue.clear(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_active_count_returns_to_zero() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_millis(20)), 3);

    let handles: Vec<_> = (0..4).map(|i| queue.submit(request(&format!("req-{i}")))).collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let status = queue.status();
    assert_eq!(status.active_requests, 0);
    assert_eq!(status.queue_length, 0);
}

#[tokio::test(start_paused = true)]
async fn test_handle_is_pending_while_request_runs() {
    let queue = RequestQueue::new(TimedHandler::new(Duration::from_secs(1)), 1);
    let handle = queue.submit(request("slow"));
    let request_id = handle.request_id();

    let mut task = tokio_test::task::spawn(handle);
    assert_pending!(task.poll());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let response = assert_ready!(task.poll()).unwrap();
    assert_eq!(response.request_id(), request_id);
}

struct PanickingHandler;

#[async_trait]
impl RequestHandler for PanickingHandler {
    async fn handle(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResponse> {
        if request.prompt == "explode" {
            panic!("handler blew up");
        }
        Ok(echo(request))
    }
}

#[tokio::test]
async fn test_panicking_handler_releases_its_slot() {
    let queue = RequestQueue::new(PanickingHandler, 1);
    let exploding = queue.submit(request("explode"));
    let healthy = queue.submit(request("healthy"));

    assert_eq!(exploding.await.unwrap_err(), GeneratorError::Dropped);
    assert!(healthy.await.unwrap().is_success());
    assert_eq!(queue.status().active_requests, 0);
}

#[tokio::test]
async fn test_handler_errors_reach_the_caller() {
    let mut handler = MockRequestHandler::new();
    handler.expect_handle().times(1).returning(|_| {
        Err(GeneratorError::AllProvidersFailed {
            primary: ApiFailure::RateLimitExceeded,
            fallback: ApiFailure::ServiceUnavailable,
        })
    });

    let queue = RequestQueue::new(handler, 3);
    let result = queue.submit(request("doomed")).await;

    assert!(matches!(result, Err(GeneratorError::AllProvidersFailed { .. })));
    assert_eq!(queue.status().active_requests, 0);
}
