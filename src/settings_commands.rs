//! Settings commands.

use crate::{settings::TrackerSettings, AppState};

pub fn get_settings(state: &AppState) -> Result<TrackerSettings, String> {
    state.settings.get().map_err(|e| e.to_string())
}

/// Persist new settings. A storage backend change applies on next start.
pub fn update_settings(
    state: &AppState,
    settings: TrackerSettings,
) -> Result<TrackerSettings, String> {
    state
        .settings
        .update(settings.clone())
        .map_err(|e| e.to_string())?;
    Ok(settings)
}
