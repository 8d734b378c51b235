pub mod alert_modal;
pub mod guard;
pub mod layout;
pub mod sharing_dialog;
pub mod sos_button;
