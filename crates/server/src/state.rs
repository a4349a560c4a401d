use service::session::SessionService;
use service::storage::{FlatFileStore, RawDocStore};

/// Shared handler state. Everything inside is a cheap handle; no document
/// is cached between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: FlatFileStore,
    pub raw: RawDocStore,
    pub sessions: SessionService,
    pub require_session: bool,
}

impl AppState {
    pub fn new(store: FlatFileStore, require_session: bool) -> Self {
        let raw = store.raw();
        let sessions = SessionService::from_store(&store);
        Self { store, raw, sessions, require_session }
    }
}
