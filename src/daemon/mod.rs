pub mod app;
pub mod outbound;
pub mod repository;
pub mod runtime;

pub use app::{Server, ServerError};
