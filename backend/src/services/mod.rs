pub mod events;
pub mod notifier;
