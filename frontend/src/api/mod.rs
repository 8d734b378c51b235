mod client;
mod types;

pub use client::{clear_session, ApiClient};
pub use types::*;
