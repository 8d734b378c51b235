pub mod auth;
pub mod contact;
pub mod live_session;
pub mod location_share;
