use chrono::Utc;
use leptos::*;

use crate::api::{
    ActiveSessionResponse, ApiClient, ContactResponse, NotifyContact, SosNotificationRequest,
    StartSharingRequest, TriggerSource, UserResponse,
};
use crate::components::sharing_dialog::DialogStep;
use crate::pages::contacts::repository as contacts_repository;
use crate::state::{
    auth::{self, AuthState},
    sharing::{self, use_sharing_controller, SharingController},
    sos::SosPhase,
};
use crate::utils::geo;

pub fn emergency_contact_ids(contacts: &[ContactResponse]) -> Vec<String> {
    contacts
        .iter()
        .filter(|contact| contact.is_emergency)
        .map(|contact| contact.id.clone())
        .collect()
}

pub fn sharer_display_name(user: Option<&UserResponse>) -> String {
    match user {
        Some(user) if !user.full_name.trim().is_empty() => user.full_name.clone(),
        Some(user) => user.username.clone(),
        None => "Someone".to_string(),
    }
}

/// Alert payload for the recipients of the active session. `None` when none
/// of the session's contacts are known locally.
pub fn notify_payload(
    contacts: &[ContactResponse],
    session: &ActiveSessionResponse,
    sharer_name: &str,
) -> Option<SosNotificationRequest> {
    let recipients: Vec<NotifyContact> = contacts
        .iter()
        .filter(|contact| session.contact_ids.contains(&contact.id))
        .map(|contact| NotifyContact {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        })
        .collect();
    if recipients.is_empty() {
        return None;
    }
    Some(SosNotificationRequest {
        contacts: recipients,
        share_tokens: session.share_tokens.clone(),
        sharer_name: sharer_name.to_string(),
        triggered_by: session.triggered_by,
    })
}

#[derive(Clone)]
pub struct HomeViewModel {
    pub sharing: SharingController,
    pub contacts: RwSignal<Vec<ContactResponse>>,
    pub phase: RwSignal<SosPhase>,
    pub dialog_step: RwSignal<DialogStep>,
    pub notice: RwSignal<Option<String>>,
    api: ApiClient,
    auth: ReadSignal<AuthState>,
    manual_notify: RwSignal<bool>,
}

pub fn use_home_view_model() -> HomeViewModel {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let (auth_state, _set_auth) = auth::use_auth();
    let sharing = use_sharing_controller();
    let contacts = create_rw_signal(Vec::<ContactResponse>::new());
    let phase = create_rw_signal(SosPhase::Idle);
    let dialog_step = create_rw_signal(DialogStep::Hidden);
    let notice = create_rw_signal(None::<String>);
    let manual_notify = create_rw_signal(false);

    // Contact list load runs client-side only.
    {
        let api = api.clone();
        create_effect(move |loaded: Option<()>| {
            if loaded.is_none() {
                let api = api.clone();
                spawn_local(async move {
                    if let Ok(list) = contacts_repository::fetch_contacts(&api).await {
                        contacts.set(list);
                    }
                });
            }
        });
    }

    let vm = HomeViewModel {
        sharing: sharing.clone(),
        contacts,
        phase,
        dialog_step,
        notice,
        api,
        auth: auth_state,
        manual_notify,
    };

    // Manual starts alert their recipients as soon as the session exists.
    {
        let vm = vm.clone();
        create_effect(move |_| {
            let session_up = vm.sharing.active.get().is_some();
            if session_up && vm.manual_notify.get_untracked() {
                vm.manual_notify.set(false);
                vm.dispatch_alerts();
            }
        });
    }

    // Aborting the countdown tears the session down again.
    {
        let sharing = sharing.clone();
        create_effect(move |previous: Option<SosPhase>| {
            let current = phase.get();
            if current == SosPhase::Idle && matches!(previous, Some(SosPhase::Countdown(_))) {
                sharing.stop_action.dispatch(());
            }
            current
        });
    }

    // Distinct feedback when the timer, not the user, ended the session.
    create_effect(move |previous: Option<Option<ActiveSessionResponse>>| {
        let current = sharing.active.get();
        if current.is_none() {
            if let Some(Some(ended)) = previous {
                if sharing::is_past_deadline(ended.expires_at, Utc::now()) {
                    notice.set(Some("Location sharing ended: the timer expired".to_string()));
                    vibrate(200);
                }
            }
        }
        current
    });

    vm
}

impl HomeViewModel {
    /// One geolocation fix, then a session start. Failure to get a fix is
    /// surfaced instead of starting a session with no position.
    fn begin_share(
        &self,
        contact_ids: Vec<String>,
        triggered_by: TriggerSource,
        duration_minutes: Option<i64>,
    ) {
        let start_action = self.sharing.start_action;
        let error = self.sharing.error;
        let phase = self.phase;
        let result = geo::get_current_position(
            move |fix| {
                start_action.dispatch(StartSharingRequest {
                    contact_ids: contact_ids.clone(),
                    triggered_by,
                    duration_minutes,
                    latitude: fix.latitude,
                    longitude: fix.longitude,
                    accuracy: fix.accuracy,
                });
            },
            move |message| {
                error.set(Some(format!("Location unavailable: {}", message)));
                phase.set(phase.get_untracked().cancel());
            },
        );
        if let Err(message) = result {
            error.set(Some(message));
            phase.set(phase.get_untracked().cancel());
        }
    }

    pub fn trigger_sos(&self) {
        let ids = emergency_contact_ids(&self.contacts.get_untracked());
        if ids.is_empty() {
            self.sharing
                .error
                .set(Some("Add at least one emergency contact first".to_string()));
            return;
        }
        self.notice.set(None);
        self.phase.set(SosPhase::begin_countdown());
        self.begin_share(ids, TriggerSource::Sos, None);
    }

    pub fn start_manual(&self, contact_ids: Vec<String>, duration_minutes: Option<i64>) {
        self.notice.set(None);
        self.manual_notify.set(true);
        self.begin_share(contact_ids, TriggerSource::Manual, duration_minutes);
    }

    /// Best-effort notification dispatch for the active session. A failure
    /// never tears the session down.
    pub fn dispatch_alerts(&self) {
        let Some(session) = self.sharing.active.get_untracked() else {
            self.sharing
                .error
                .set(Some("No active sharing session to alert contacts about".to_string()));
            self.phase.set(SosPhase::Idle);
            return;
        };
        let sharer_name =
            sharer_display_name(self.auth.get_untracked().user.as_ref());
        let Some(request) =
            notify_payload(&self.contacts.get_untracked(), &session, &sharer_name)
        else {
            self.notice
                .set(Some("Sharing started, but no reachable contacts were found".to_string()));
            self.phase.set(SosPhase::Idle);
            return;
        };

        let from_countdown = self.phase.get_untracked() == SosPhase::Dispatching;
        let api = self.api.clone();
        let phase = self.phase;
        let notice = self.notice;
        spawn_local(async move {
            match api.send_sos(request).await {
                Ok(response) => {
                    if from_countdown {
                        phase.set(SosPhase::Sent);
                    }
                    if !response.success {
                        notice.set(Some(
                            "Some contacts could not be reached; sharing stays active".to_string(),
                        ));
                    }
                }
                Err(err) => {
                    log::warn!("alert dispatch failed: {}", err);
                    notice.set(Some(
                        "Sharing is active, but alerting your contacts failed".to_string(),
                    ));
                    if from_countdown {
                        phase.set(SosPhase::Sent);
                    }
                }
            }
        });
    }
}

fn vibrate(duration_ms: u32) {
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().vibrate_with_duration(duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contact(id: &str, is_emergency: bool) -> ContactResponse {
        ContactResponse {
            id: id.to_string(),
            name: format!("Contact {}", id),
            phone: Some("+4915112345678".to_string()),
            email: Some(format!("{}@example.com", id)),
            is_emergency,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    fn session(contact_ids: &[&str]) -> ActiveSessionResponse {
        ActiveSessionResponse {
            session_id: "s-1".to_string(),
            contact_ids: contact_ids.iter().map(|id| id.to_string()).collect(),
            share_tokens: vec!["tok-a".to_string(), "tok-b".to_string()],
            triggered_by: TriggerSource::Sos,
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_emergency_contacts_are_selected_for_sos() {
        let contacts = vec![contact("a", true), contact("b", false), contact("c", true)];
        assert_eq!(emergency_contact_ids(&contacts), vec!["a", "c"]);
    }

    #[test]
    fn payload_covers_only_the_sessions_recipients() {
        let contacts = vec![contact("a", true), contact("b", false)];
        let request = notify_payload(&contacts, &session(&["a"]), "Ada")
            .expect("payload for a known recipient");
        assert_eq!(request.contacts.len(), 1);
        assert_eq!(request.contacts[0].name, "Contact a");
        assert_eq!(request.share_tokens, vec!["tok-a", "tok-b"]);
        assert_eq!(request.sharer_name, "Ada");
        assert_eq!(request.triggered_by, TriggerSource::Sos);
    }

    #[test]
    fn payload_is_none_when_no_recipient_is_known() {
        let contacts = vec![contact("a", true)];
        assert!(notify_payload(&contacts, &session(&["z"]), "Ada").is_none());
    }

    #[test]
    fn sharer_name_falls_back_to_username_then_someone() {
        let mut user = UserResponse {
            id: "u".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            full_name: "Ada Lovelace".into(),
            phone: None,
        };
        assert_eq!(sharer_display_name(Some(&user)), "Ada Lovelace");
        user.full_name = "  ".into();
        assert_eq!(sharer_display_name(Some(&user)), "ada");
        assert_eq!(sharer_display_name(None), "Someone");
    }
}
