use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Geolocation, Position, PositionError, PositionOptions};

/// A fix older than this is worse than an error; the browser gives up.
pub const GEO_TIMEOUT_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
}

fn geolocation() -> Result<Geolocation, String> {
    web_sys::window()
        .ok_or_else(|| "No window object".to_string())?
        .navigator()
        .geolocation()
        .map_err(|_| "Geolocation is not available".to_string())
}

fn options() -> PositionOptions {
    let options = PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_timeout(GEO_TIMEOUT_MS);
    options
}

fn fix_from_position(position: &Position) -> GeoFix {
    let coords = position.coords();
    GeoFix {
        latitude: coords.latitude(),
        longitude: coords.longitude(),
        accuracy: Some(coords.accuracy()),
    }
}

pub fn get_current_position(
    on_fix: impl Fn(GeoFix) + 'static,
    on_error: impl Fn(String) + 'static,
) -> Result<(), String> {
    let success = Closure::<dyn Fn(Position)>::new(move |position: Position| {
        on_fix(fix_from_position(&position));
    });
    let error = Closure::<dyn Fn(PositionError)>::new(move |err: PositionError| {
        on_error(err.message());
    });

    geolocation()?
        .get_current_position_with_error_callback_and_options(
            success.as_ref().unchecked_ref(),
            Some(error.as_ref().unchecked_ref()),
            &options(),
        )
        .map_err(|_| "Failed to request position".to_string())?;

    // The browser owns the callbacks from here on.
    success.forget();
    error.forget();
    Ok(())
}

/// Starts a continuous watch; returns the watch id for [`clear_watch`].
pub fn watch_position(
    on_fix: impl Fn(GeoFix) + 'static,
    on_error: impl Fn(String) + 'static,
) -> Result<i32, String> {
    let success = Closure::<dyn Fn(Position)>::new(move |position: Position| {
        on_fix(fix_from_position(&position));
    });
    let error = Closure::<dyn Fn(PositionError)>::new(move |err: PositionError| {
        on_error(err.message());
    });

    let id = geolocation()?
        .watch_position_with_error_callback_and_options(
            success.as_ref().unchecked_ref(),
            Some(error.as_ref().unchecked_ref()),
            &options(),
        )
        .map_err(|_| "Failed to start position watch".to_string())?;

    success.forget();
    error.forget();
    Ok(id)
}

pub fn clear_watch(id: i32) {
    if let Ok(geo) = geolocation() {
        geo.clear_watch(id);
    }
}
