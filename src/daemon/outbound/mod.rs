mod message;
mod notify;

pub use message::{build_prompt, clean, GenerateMessageError, MessageService};
pub use notify::NotifyService;
