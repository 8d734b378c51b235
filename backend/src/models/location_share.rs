use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{ContactId, SessionId, ShareId, UserId};

/// The grant of one session's location to one recipient contact.
///
/// `share_token` is the sole capability granting read access to the session's
/// location stream; it is issued once and never rotated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationShare {
    pub id: ShareId,
    pub live_location_id: SessionId,
    pub sharer_user_id: UserId,
    pub recipient_contact_id: ContactId,
    pub share_token: String,
    pub created_at: DateTime<Utc>,
}
