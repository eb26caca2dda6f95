//! Request handlers.
//!
//! Handlers delegate to the visit store and the notification router and
//! map errors via [`AppError`](crate::error::AppError).

pub mod security;
pub mod visitor;
