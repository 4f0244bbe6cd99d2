pub mod client;
pub mod command;
pub mod connector;

pub use client::{render_status, Client, ClientError};
pub use command::Command;
