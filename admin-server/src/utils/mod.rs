//! Utility module - shared error and logging plumbing
//!
//! - [`AppError`] - application error type
//! - [`AppResult`] - handler result alias
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
