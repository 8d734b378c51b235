use leptos::{ev::SubmitEvent, *};

use crate::{
    api::ContactResponse,
    components::layout::{ErrorBanner, LoadingSpinner, Navbar},
    pages::contacts::{
        utils,
        view_model::{use_contacts_view_model, SaveRequest},
    },
};

#[component]
pub fn ContactsPanel() -> impl IntoView {
    let vm = use_contacts_view_model();
    let form = vm.form;
    let save_action = vm.save_action;
    let delete_action = vm.delete_action;
    let verify_action = vm.verify_action;
    let contacts = vm.contacts;
    let error = vm.error;
    let loading = vm.loading;
    let pending = save_action.pending();

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        if let Err(message) = utils::validate_contact_form(
            &form.name.get_untracked(),
            &form.phone.get_untracked(),
            &form.email.get_untracked(),
        ) {
            error.set(Some(message));
            return;
        }
        match form.editing_id.get_untracked() {
            Some(id) => save_action.dispatch(SaveRequest::Update(id, form.to_update_request())),
            None => save_action.dispatch(SaveRequest::Create(form.to_create_request())),
        }
    };

    let editing = move || form.editing_id.get().is_some();

    view! {
        <div class="min-h-screen bg-page">
            <Navbar />
            <main class="max-w-2xl mx-auto p-4 space-y-6">
                <h1 class="text-xl font-bold text-fg">"Emergency contacts"</h1>
                {move || error.get().map(|message| view! { <ErrorBanner message=message /> })}
                <form class="bg-surface rounded-lg p-4 space-y-3" on:submit=handle_submit>
                    <h2 class="font-semibold text-fg">
                        {move || if editing() { "Edit contact" } else { "Add a contact" }}
                    </h2>
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="text"
                        placeholder="Name"
                        prop:value=form.name
                        on:input=move |ev| form.name.set(event_target_value(&ev))
                    />
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="tel"
                        placeholder="Phone (WhatsApp)"
                        prop:value=form.phone
                        on:input=move |ev| form.phone.set(event_target_value(&ev))
                    />
                    <input
                        class="w-full rounded-md border border-form-control-border px-3 py-2"
                        type="email"
                        placeholder="Email"
                        prop:value=form.email
                        on:input=move |ev| form.email.set(event_target_value(&ev))
                    />
                    <label class="flex items-center gap-2 text-fg">
                        <input
                            type="checkbox"
                            prop:checked=form.is_emergency
                            on:change=move |_| form.is_emergency.update(|flag| *flag = !*flag)
                        />
                        "Emergency contact (alerted by SOS)"
                    </label>
                    <div class="flex gap-3">
                        <button
                            class="rounded-md bg-action-primary-bg text-action-primary-text px-4 py-2 disabled:opacity-50"
                            type="submit"
                            disabled=move || pending.get()
                        >
                            {move || if editing() { "Save changes" } else { "Add contact" }}
                        </button>
                        <Show when=editing fallback=|| ()>
                            <button
                                class="text-fg-muted px-4 py-2"
                                type="button"
                                on:click=move |_| form.reset()
                            >
                                "Cancel"
                            </button>
                        </Show>
                    </div>
                </form>
                <Show when=move || !loading.get() fallback=|| view! { <LoadingSpinner /> }>
                    <ul class="space-y-2">
                        <For
                            each=move || contacts.get()
                            key=|contact| (contact.id.clone(), contact.is_verified)
                            children=move |contact: ContactResponse| {
                                let edit_target = contact.clone();
                                let delete_id = contact.id.clone();
                                let verify_id = contact.id.clone();
                                let is_verified = contact.is_verified;
                                view! {
                                    <li class="bg-surface rounded-lg p-4 flex items-center justify-between">
                                        <div>
                                            <p class="font-semibold text-fg">
                                                {contact.name.clone()}
                                                {contact.is_emergency.then(|| view! {
                                                    <span class="ml-2 text-xs rounded bg-status-error-bg text-status-error-text px-1.5 py-0.5">
                                                        "emergency"
                                                    </span>
                                                })}
                                            </p>
                                            <p class="text-sm text-fg-muted">
                                                {contact_reach_summary(&contact)}
                                            </p>
                                        </div>
                                        <div class="flex items-center gap-2 text-sm">
                                            <Show
                                                when=move || is_verified
                                                fallback=move || {
                                                    let id = verify_id.clone();
                                                    view! {
                                                        <button
                                                            class="text-action-link"
                                                            on:click=move |_| verify_action.dispatch(id.clone())
                                                        >
                                                            "Mark verified"
                                                        </button>
                                                    }
                                                }
                                            >
                                                <span class="text-status-ok-text">"verified"</span>
                                            </Show>
                                            <button
                                                class="text-action-link"
                                                on:click=move |_| form.load(&edit_target)
                                            >
                                                "Edit"
                                            </button>
                                            <button
                                                class="text-status-error-text"
                                                on:click=move |_| delete_action.dispatch(delete_id.clone())
                                            >
                                                "Delete"
                                            </button>
                                        </div>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </main>
        </div>
    }
}

fn contact_reach_summary(contact: &ContactResponse) -> String {
    match (&contact.phone, &contact.email) {
        (Some(phone), Some(email)) => format!("{} / {}", phone, email),
        (Some(phone), None) => phone.clone(),
        (None, Some(email)) => email.clone(),
        (None, None) => "no contact details".to_string(),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers;

    #[test]
    fn reach_summary_prefers_both_channels() {
        let contact = helpers::sample_contact("Alice", true);
        assert_eq!(
            contact_reach_summary(&contact),
            "+4915112345678 / alice@example.com"
        );
    }

    #[test]
    fn reach_summary_handles_missing_channels() {
        let mut contact = helpers::sample_contact("Bob", false);
        contact.phone = None;
        assert_eq!(contact_reach_summary(&contact), "bob@example.com");
        contact.email = None;
        assert_eq!(contact_reach_summary(&contact), "no contact details");
    }
}
