use leptos::*;

use crate::api::{ApiClient, ApiError, ContactResponse};
use crate::pages::contacts::{repository, utils::ContactFormState};

pub enum SaveRequest {
    Create(crate::api::CreateContactRequest),
    Update(String, crate::api::UpdateContactRequest),
}

#[derive(Clone)]
pub struct ContactsViewModel {
    pub contacts: RwSignal<Vec<ContactResponse>>,
    pub form: ContactFormState,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub save_action: Action<SaveRequest, Result<ContactResponse, ApiError>>,
    pub delete_action: Action<String, Result<(), ApiError>>,
    pub verify_action: Action<String, Result<ContactResponse, ApiError>>,
}

pub fn use_contacts_view_model() -> ContactsViewModel {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let contacts = create_rw_signal(Vec::<ContactResponse>::new());
    let form = ContactFormState::default();
    let error = create_rw_signal(None::<String>);
    let loading = create_rw_signal(true);

    let reload = {
        let api = api.clone();
        move || {
            let api = api.clone();
            spawn_local(async move {
                match repository::fetch_contacts(&api).await {
                    Ok(list) => {
                        contacts.set(list);
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
                loading.set(false);
            });
        }
    };

    // Initial load runs client-side only.
    {
        let reload = reload.clone();
        create_effect(move |loaded: Option<()>| {
            if loaded.is_none() {
                reload();
            }
        });
    }

    let save_api = api.clone();
    let save_action = create_action(move |request: &SaveRequest| {
        let api = save_api.clone();
        let request = match request {
            SaveRequest::Create(create) => SaveRequest::Create(create.clone()),
            SaveRequest::Update(id, update) => SaveRequest::Update(id.clone(), update.clone()),
        };
        async move {
            match request {
                SaveRequest::Create(create) => repository::create_contact(&api, create).await,
                SaveRequest::Update(id, update) => {
                    repository::update_contact(&api, &id, update).await
                }
            }
        }
    });

    {
        let reload = reload.clone();
        create_effect(move |_| {
            if let Some(result) = save_action.value().get() {
                match result {
                    Ok(_) => {
                        form.reset();
                        error.set(None);
                        reload();
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            }
        });
    }

    let delete_api = api.clone();
    let delete_action = create_action(move |id: &String| {
        let api = delete_api.clone();
        let id = id.clone();
        async move { repository::delete_contact(&api, &id).await }
    });

    {
        let reload = reload.clone();
        create_effect(move |_| {
            if let Some(result) = delete_action.value().get() {
                match result {
                    Ok(()) => reload(),
                    Err(err) => error.set(Some(err.to_string())),
                }
            }
        });
    }

    let verify_api = api;
    let verify_action = create_action(move |id: &String| {
        let api = verify_api.clone();
        let id = id.clone();
        async move { repository::verify_contact(&api, &id).await }
    });

    create_effect(move |_| {
        if let Some(result) = verify_action.value().get() {
            match result {
                Ok(updated) => contacts.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|c| c.id == updated.id) {
                        *slot = updated;
                    }
                }),
                Err(err) => error.set(Some(err.to_string())),
            }
        }
    });

    ContactsViewModel {
        contacts,
        form,
        error,
        loading,
        save_action,
        delete_action,
        verify_action,
    }
}
