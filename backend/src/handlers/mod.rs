pub mod auth;
pub mod contacts;
pub mod notifications;
pub mod sharing;
pub mod track;
