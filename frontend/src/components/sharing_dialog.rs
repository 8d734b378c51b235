use leptos::*;

use crate::api::{ApiClient, ContactResponse};

/// Dialog walk-through: pick recipients, then confirm a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogStep {
    #[default]
    Hidden,
    Selecting,
    Confirming,
}

pub fn toggle_selection(selected: &mut Vec<String>, id: &str) {
    if let Some(index) = selected.iter().position(|s| s == id) {
        selected.remove(index);
    } else {
        selected.push(id.to_string());
    }
}

pub fn can_confirm(selected: &[String]) -> bool {
    !selected.is_empty()
}

/// Duration choices offered in the confirm step, in minutes. `None` keeps the
/// session open until stopped.
pub const DURATION_CHOICES: &[(Option<i64>, &str)] = &[
    (Some(15), "15 minutes"),
    (Some(60), "1 hour"),
    (Some(480), "8 hours"),
    (None, "Until I stop"),
];

#[component]
pub fn SharingDialog(
    step: RwSignal<DialogStep>,
    #[prop(into)] on_start: Callback<(Vec<String>, Option<i64>)>,
) -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let contacts = create_rw_signal(Vec::<ContactResponse>::new());
    let selected = create_rw_signal(Vec::<String>::new());
    let duration = create_rw_signal(Some(60i64));

    // Refresh the contact list each time the dialog opens.
    create_effect(move |previous: Option<DialogStep>| {
        let current = step.get();
        if current == DialogStep::Selecting && previous != Some(DialogStep::Selecting) {
            selected.set(Vec::new());
            let api = api.clone();
            spawn_local(async move {
                if let Ok(list) = api.list_contacts().await {
                    contacts.set(list);
                }
            });
        }
        current
    });

    let close = move |_| step.set(DialogStep::Hidden);

    view! {
        <Show when=move || step.get() != DialogStep::Hidden fallback=|| ()>
            <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50">
                <div class="bg-surface rounded-lg p-6 max-w-md w-full space-y-4">
                    {move || match step.get() {
                        DialogStep::Selecting => view! {
                            <h2 class="text-lg font-bold text-fg">"Share your live location"</h2>
                            <ul class="divide-y divide-form-control-border max-h-64 overflow-y-auto">
                                <For
                                    each=move || contacts.get()
                                    key=|contact| contact.id.clone()
                                    children=move |contact: ContactResponse| {
                                        let id = contact.id.clone();
                                        let check_id = id.clone();
                                        view! {
                                            <li class="py-2 flex items-center gap-3">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || {
                                                        selected.get().iter().any(|s| *s == check_id)
                                                    }
                                                    on:change=move |_| {
                                                        selected.update(|list| toggle_selection(list, &id));
                                                    }
                                                />
                                                <span class="text-fg">{contact.name.clone()}</span>
                                                {contact.is_emergency.then(|| view! {
                                                    <span class="text-xs rounded bg-status-error-bg text-status-error-text px-1.5 py-0.5">
                                                        "emergency"
                                                    </span>
                                                })}
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                            <div class="flex gap-3 justify-end">
                                <button class="px-4 py-2 text-fg-muted" on:click=close>"Cancel"</button>
                                <button
                                    class="px-4 py-2 rounded-md bg-action-primary-bg text-action-primary-text disabled:opacity-50"
                                    disabled=move || !can_confirm(&selected.get())
                                    on:click=move |_| step.set(DialogStep::Confirming)
                                >
                                    "Next"
                                </button>
                            </div>
                        }
                            .into_view(),
                        DialogStep::Confirming => view! {
                            <h2 class="text-lg font-bold text-fg">"For how long?"</h2>
                            <div class="space-y-2">
                                {DURATION_CHOICES
                                    .iter()
                                    .map(|(minutes, label)| {
                                        let minutes = *minutes;
                                        view! {
                                            <label class="flex items-center gap-2 text-fg">
                                                <input
                                                    type="radio"
                                                    name="share-duration"
                                                    prop:checked=move || duration.get() == minutes
                                                    on:change=move |_| duration.set(minutes)
                                                />
                                                {*label}
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                            <div class="flex gap-3 justify-end">
                                <button
                                    class="px-4 py-2 text-fg-muted"
                                    on:click=move |_| step.set(DialogStep::Selecting)
                                >
                                    "Back"
                                </button>
                                <button
                                    class="px-4 py-2 rounded-md bg-action-primary-bg text-action-primary-text"
                                    on:click=move |_| {
                                        let recipients = selected.get_untracked();
                                        step.set(DialogStep::Hidden);
                                        on_start.call((recipients, duration.get_untracked()));
                                    }
                                >
                                    "Start sharing"
                                </button>
                            </div>
                        }
                            .into_view(),
                        DialogStep::Hidden => ().into_view(),
                    }}
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_round_trips() {
        let mut selected = Vec::new();
        toggle_selection(&mut selected, "c1");
        assert_eq!(selected, vec!["c1"]);
        toggle_selection(&mut selected, "c2");
        assert_eq!(selected, vec!["c1", "c2"]);
        toggle_selection(&mut selected, "c1");
        assert_eq!(selected, vec!["c2"]);
    }

    #[test]
    fn confirm_requires_at_least_one_recipient() {
        assert!(!can_confirm(&[]));
        assert!(can_confirm(&["c1".to_string()]));
    }

    #[test]
    fn duration_choices_include_an_open_ended_option() {
        assert!(DURATION_CHOICES.iter().any(|(minutes, _)| minutes.is_none()));
    }
}
