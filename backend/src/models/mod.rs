//! Data models shared across database access and API handlers.

pub mod contact;
pub mod live_session;
pub mod location_share;
pub mod notification;
pub mod user;
