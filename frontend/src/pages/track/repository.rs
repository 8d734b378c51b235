use crate::api::{ApiClient, ApiError, TrackerView};

pub async fn fetch_snapshot(api: &ApiClient, token: &str) -> Result<TrackerView, ApiError> {
    api.tracker_snapshot(token).await
}
