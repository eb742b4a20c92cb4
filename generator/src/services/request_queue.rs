//! Bounded-concurrency request queue
//!
//! Admission state (the pending queue and the active counter) lives behind a
//! single synchronous mutex. Every check-and-increment happens inside one
//! critical section that never spans an `.await`, so concurrent submissions
//! and completions cannot over-admit. Each admitted request runs on its own
//! tokio task and releases its slot through a drop guard, which also covers
//! a panicking handler.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use shared::{GenerationRequest, GenerationResponse, RequestId};
use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::RequestHandler;
use crate::types::QueueStatus;

/// Default number of simultaneously in-flight requests
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

struct QueueItem {
    request: GenerationRequest,
    completion: oneshot::Sender<GeneratorResult<GenerationResponse>>,
}

#[derive(Default)]
struct AdmissionState {
    pending: VecDeque<QueueItem>,
    active: usize,
}

struct QueueInner<H> {
    handler: H,
    max_concurrent: usize,
    state: Mutex<AdmissionState>,
}

/// FIFO (per priority) queue admitting at most `max_concurrent` requests
pub struct RequestQueue<H>
where
    H: RequestHandler + 'static,
{
    inner: Arc<QueueInner<H>>,
}

impl<H> Clone for RequestQueue<H>
where
    H: RequestHandler + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> RequestQueue<H>
where
    H: RequestHandler + 'static,
{
    /// Create a queue; a bound of zero is treated as one
    pub fn new(handler: H, max_concurrent: usize) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                handler,
                max_concurrent: max_concurrent.max(1),
                state: Mutex::new(AdmissionState::default()),
            }),
        }
    }

    pub fn handler(&self) -> &H {
        &self.inner.handler
    }

    /// Enqueue a request and return immediately.
    ///
    /// Must be called from within a tokio runtime. The request sits behind
    /// every queued request of equal or higher priority.
    pub fn submit(&self, request: GenerationRequest) -> ResponseHandle {
        let (completion, receiver) = oneshot::channel();
        let request_id = request.id;
        let priority = request.priority;

        let queue_length = {
            let mut state = self.inner.lock_state();
            let position = state
                .pending
                .iter()
                .position(|item| item.request.priority < priority)
                .unwrap_or(state.pending.len());
            state.pending.insert(position, QueueItem { request, completion });
            state.pending.len()
        };

        debug!("Queued request {} ({:?}), {} pending", request_id, priority, queue_length);

        QueueInner::drain(&self.inner);

        ResponseHandle {
            request_id,
            receiver,
        }
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.inner.lock_state();
        QueueStatus {
            queue_length: state.pending.len(),
            active_requests: state.active,
            max_concurrent: self.inner.max_concurrent,
        }
    }

    /// Reject every request not yet started; in-flight work continues
    pub fn clear(&self) -> usize {
        let cleared: Vec<QueueItem> = {
            let mut state = self.inner.lock_state();
            state.pending.drain(..).collect()
        };

        let count = cleared.len();
        for item in cleared {
            let _ = item.completion.send(Err(GeneratorError::QueueCleared));
        }

        if count > 0 {
            warn!("Cleared {} pending requests from the queue", count);
        }
        count
    }
}

impl<H> QueueInner<H>
where
    H: RequestHandler + 'static,
{
    fn lock_state(&self) -> MutexGuard<'_, AdmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit queued items while capacity remains
    fn drain(inner: &Arc<Self>) {
        let admitted: Vec<QueueItem> = {
            let mut state = inner.lock_state();
            let mut admitted = Vec::new();
            while state.active < inner.max_concurrent {
                let Some(item) = state.pending.pop_front() else {
                    break;
                };
                state.active += 1;
                admitted.push(item);
            }
            admitted
        };

        for item in admitted {
            tokio::spawn(execute(Arc::clone(inner), item));
        }
    }

    fn release(inner: &Arc<Self>) {
        {
            let mut state = inner.lock_state();
            state.active = state.active.saturating_sub(1);
        }
        // Nothing to re-admit into once the runtime is gone
        if tokio::runtime::Handle::try_current().is_ok() {
            Self::drain(inner);
        }
    }
}

/// Holds one unit of admission capacity
struct ActiveSlot<H>
where
    H: RequestHandler + 'static,
{
    inner: Arc<QueueInner<H>>,
}

impl<H> Drop for ActiveSlot<H>
where
    H: RequestHandler + 'static,
{
    fn drop(&mut self) {
        QueueInner::release(&self.inner);
    }
}

async fn execute<H>(inner: Arc<QueueInner<H>>, item: QueueItem)
where
    H: RequestHandler + 'static,
{
    let slot = ActiveSlot {
        inner: Arc::clone(&inner),
    };
    let QueueItem { request, completion } = item;

    info!("Dispatching request {} ({})", request.id, request.content_type);

    let result = inner.handler.handle(&request).await;

    match &result {
        Ok(response) => debug!("Request {} finished with status {:?}", request.id, response.status()),
        Err(e) => warn!("Request {} failed: {}", request.id, e),
    }

    // Capacity is returned before the caller observes the result
    drop(slot);

    if completion.send(result).is_err() {
        debug!("Caller for request {} is no longer waiting", request.id);
    }
}

/// Pending result of a submitted request
#[must_use = "a response handle does nothing unless awaited"]
pub struct ResponseHandle {
    request_id: RequestId,
    receiver: oneshot::Receiver<GeneratorResult<GenerationResponse>>,
}

impl ResponseHandle {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}

impl Future for ResponseHandle {
    type Output = GeneratorResult<GenerationResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(GeneratorError::Dropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}
