//! Core generation logic

pub mod cost;
pub mod parser;
pub mod prompt;

pub use cost::*;
pub use parser::*;
pub use prompt::*;
