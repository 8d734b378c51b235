//! localStorage access for the persisted session tokens.

use web_sys::Storage;

/// The browser storage area, or a message for hosts without one (private
/// browsing, non-browser contexts).
pub fn local_storage() -> Result<Storage, String> {
    web_sys::window()
        .ok_or_else(|| "no window object".to_string())?
        .local_storage()
        .map_err(|_| "localStorage unavailable".to_string())?
        .ok_or_else(|| "localStorage unavailable".to_string())
}
