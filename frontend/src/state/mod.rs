pub mod auth;
pub mod sharing;
pub mod sos;
