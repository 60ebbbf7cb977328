use std::sync::Arc;

use venuehub_auth::SessionManager;
use venuehub_events::EventBus;
use venuehub_store::Store;

use crate::settings::Settings;

/// Shared handles every module (and every request handler) works with.
///
/// The context is built once at bootstrap and cloned freely; it doubles as
/// the axum router state. Nothing in here is ambient: sign-out invalidates
/// the session in `sessions`, not some global current-user slot.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub store: Arc<Store>,
    pub sessions: Arc<SessionManager>,
    pub events: EventBus,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        let sessions = SessionManager::new(settings.auth.session_ttl_minutes);
        Self {
            settings: Arc::new(settings),
            store: Arc::new(Store::new()),
            sessions: Arc::new(sessions),
            events: EventBus::default(),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
