mod core;
mod service;
mod store;

pub use core::{ApplicationCore, SetupApplicationCoreError};
