pub mod contacts;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod reset_password;
pub mod track;
