//! Reminder settings repository.
//!
//! Persists only the `enabled` flag; permission always comes from the
//! platform.

use crate::repo::RepoResult;
use crate::store::{KeyValueStore, NOTIFICATIONS_ENABLED_KEY};
use log::warn;

#[derive(Debug, Clone)]
pub struct ReminderSettingsRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ReminderSettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the enabled flag. Only the literal `"true"` enables reminders.
    pub fn load_enabled(&self) -> bool {
        match self.store.get(NOTIFICATIONS_ENABLED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!(
                    "event=reminder_settings_load module=repo status=error fallback=disabled error={}",
                    err
                );
                false
            }
        }
    }

    pub fn save_enabled(&mut self, enabled: bool) -> RepoResult<()> {
        let value = if enabled { "true" } else { "false" };
        self.store.set(NOTIFICATIONS_ENABLED_KEY, value)?;
        Ok(())
    }
}
