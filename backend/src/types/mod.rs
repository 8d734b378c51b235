mod id;

pub use id::{ContactId, SessionId, ShareId, UserId};
