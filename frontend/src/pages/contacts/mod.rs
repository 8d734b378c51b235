use leptos::*;

pub mod repository;
pub mod utils;
pub mod view_model;

mod panel;

pub use panel::ContactsPanel;

#[component]
pub fn ContactsPage() -> impl IntoView {
    view! { <ContactsPanel /> }
}
