//! Client side of a live sharing session.
//!
//! Two independent clocks run while sharing: the browser's position watch
//! feeds the latest fix into a slot, and a flush timer posts that slot to the
//! backend every ten seconds. A third, faster timer polls the expiry deadline
//! so the UI ends the session on time even when no fix arrives.
//!
//! Whichever path ends the session (stop, expiry, a gone response) halts the
//! sensors in the same breath: the position watch is cleared immediately and
//! the loops see a stale generation on their next wakeup.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use leptos::*;

use crate::api::{
    ActiveSessionResponse, ApiClient, ApiError, LocationUpdateRequest, StartSharingRequest,
    StartSharingResponse,
};
use crate::utils::geo::{self, GeoFix};

pub const FLUSH_INTERVAL_MS: u32 = 10_000;
pub const EXPIRY_POLL_MS: u32 = 1_000;

pub fn is_past_deadline(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(deadline) => now > deadline,
        None => false,
    }
}

/// "mm:ss" (or "h:mm:ss") until the deadline; `None` for open-ended sessions.
pub fn remaining_label(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<String> {
    let deadline = expires_at?;
    let seconds = (deadline - now).num_seconds().max(0);
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    Some(if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    })
}

/// Browser-facing resources of one sharing run. The watch id lives here so
/// the path that ends a session can clear it in the same call, and the
/// generation counter marks every loop spawned before a halt as stale.
#[derive(Default)]
pub struct Sensors {
    watch_id: Cell<Option<i32>>,
    generation: Cell<u32>,
}

impl Sensors {
    /// Invalidates the running loops and surrenders the watch id for the
    /// caller to clear.
    pub fn halt(&self) -> Option<i32> {
        self.generation.set(self.generation.get() + 1);
        self.watch_id.take()
    }

    fn arm(&self, watch_id: i32) {
        self.watch_id.set(Some(watch_id));
    }

    fn current(&self) -> u32 {
        self.generation.get()
    }

    fn is_current(&self, generation: u32) -> bool {
        self.generation.get() == generation
    }
}

fn halt_sensors(sensors: &Sensors) {
    if let Some(id) = sensors.halt() {
        geo::clear_watch(id);
    }
}

#[derive(Clone)]
pub struct SharingController {
    pub active: RwSignal<Option<ActiveSessionResponse>>,
    pub error: RwSignal<Option<String>>,
    pub start_action: Action<StartSharingRequest, Result<StartSharingResponse, ApiError>>,
    pub stop_action: Action<(), Result<(), ApiError>>,
    pub sensors: Rc<Sensors>,
}

pub fn use_sharing_controller() -> SharingController {
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let active = create_rw_signal(None::<ActiveSessionResponse>);
    let error = create_rw_signal(None::<String>);

    // Pick up a session that survived a page reload. Runs client-side only.
    {
        let api = api.clone();
        create_effect(move |checked: Option<()>| {
            if checked.is_none() {
                let api = api.clone();
                spawn_local(async move {
                    if let Ok(Some(session)) = api.active_session().await {
                        active.set(Some(session));
                    }
                });
            }
        });
    }

    let start_api = api.clone();
    let start_action = create_action(move |request: &StartSharingRequest| {
        let api = start_api.clone();
        let request = request.clone();
        async move { api.start_sharing(request).await }
    });

    {
        let api = api.clone();
        create_effect(move |_| {
            if let Some(result) = start_action.value().get() {
                match result {
                    Ok(_) => {
                        error.set(None);
                        let api = api.clone();
                        spawn_local(async move {
                            if let Ok(session) = api.active_session().await {
                                active.set(session);
                            }
                        });
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            }
        });
    }

    let stop_api = api.clone();
    let stop_action = create_action(move |_: &()| {
        let api = stop_api.clone();
        async move { api.stop_sharing().await }
    });

    let sensors: Rc<Sensors> = Rc::default();

    {
        let sensors = Rc::clone(&sensors);
        create_effect(move |_| {
            if let Some(result) = stop_action.value().get() {
                match result {
                    Ok(()) => {
                        halt_sensors(&sensors);
                        active.set(None);
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            }
        });
    }

    // Position watch and flush loops follow the active session.
    {
        let sensors = Rc::clone(&sensors);
        create_effect(move |previous: Option<bool>| {
            let is_sharing = active.get().is_some();
            if is_sharing && previous != Some(true) {
                run_sharing_loops(api.clone(), active, error, Rc::clone(&sensors));
            }
            is_sharing
        });
    }

    SharingController {
        active,
        error,
        start_action,
        stop_action,
        sensors,
    }
}

fn run_sharing_loops(
    api: ApiClient,
    active: RwSignal<Option<ActiveSessionResponse>>,
    error: RwSignal<Option<String>>,
    sensors: Rc<Sensors>,
) {
    let latest_fix: Rc<Cell<Option<GeoFix>>> = Rc::new(Cell::new(None));
    let generation = sensors.current();

    {
        let latest_fix = Rc::clone(&latest_fix);
        let error_sink = error;
        match geo::watch_position(
            move |fix| latest_fix.set(Some(fix)),
            move |message| error_sink.set(Some(message)),
        ) {
            Ok(id) => sensors.arm(id),
            Err(message) => error.set(Some(message)),
        }
    }

    // Flush loop: every tick, push the freshest fix if one arrived.
    {
        let api = api.clone();
        let latest_fix = Rc::clone(&latest_fix);
        let sensors = Rc::clone(&sensors);
        spawn_local(async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(FLUSH_INTERVAL_MS).await;
                if !sensors.is_current(generation) {
                    return;
                }
                if active.try_get_untracked().flatten().is_none() {
                    break;
                }
                let Some(fix) = latest_fix.take() else { continue };
                let result = api
                    .update_location(LocationUpdateRequest {
                        latitude: fix.latitude,
                        longitude: fix.longitude,
                        accuracy: fix.accuracy,
                    })
                    .await;
                if let Err(err) = result {
                    if err.is_gone() {
                        halt_sensors(&sensors);
                        active.set(None);
                        return;
                    }
                    // Transient failure; the next tick retries with a newer fix.
                    log::warn!("location flush failed: {}", err);
                }
            }
            // The session vanished without a halt; release the watch here.
            if sensors.is_current(generation) {
                halt_sensors(&sensors);
            }
        });
    }

    // Expiry poll: ends the session in the UI the second the deadline passes.
    {
        let sensors = Rc::clone(&sensors);
        spawn_local(async move {
            loop {
                gloo_timers::future::TimeoutFuture::new(EXPIRY_POLL_MS).await;
                if !sensors.is_current(generation) {
                    return;
                }
                let Some(session) = active.try_get_untracked().flatten() else {
                    return;
                };
                if is_past_deadline(session.expires_at, Utc::now()) {
                    halt_sensors(&sensors);
                    active.set(None);
                    return;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn halting_surrenders_the_watch_and_invalidates_running_loops() {
        let sensors = Sensors::default();
        sensors.arm(7);
        let generation = sensors.current();
        assert!(sensors.is_current(generation));

        assert_eq!(sensors.halt(), Some(7));
        assert!(!sensors.is_current(generation));
        assert_eq!(sensors.halt(), None);
    }

    #[test]
    fn open_ended_sessions_never_pass_the_deadline() {
        assert!(!is_past_deadline(None, Utc::now()));
    }

    #[test]
    fn deadline_is_inclusive() {
        let now = Utc::now();
        assert!(!is_past_deadline(Some(now), now));
        assert!(is_past_deadline(Some(now - Duration::seconds(1)), now));
        assert!(!is_past_deadline(Some(now + Duration::seconds(1)), now));
    }

    #[test]
    fn remaining_label_formats_minutes_and_hours() {
        let now = Utc::now();
        assert_eq!(
            remaining_label(Some(now + Duration::seconds(754)), now),
            Some("12:34".to_string())
        );
        assert_eq!(
            remaining_label(Some(now + Duration::seconds(3_661)), now),
            Some("1:01:01".to_string())
        );
        assert_eq!(remaining_label(None, now), None);
    }

    #[test]
    fn remaining_label_clamps_at_zero_after_expiry() {
        let now = Utc::now();
        assert_eq!(
            remaining_label(Some(now - Duration::seconds(5)), now),
            Some("0:00".to_string())
        );
    }
}
