use crate::config::Config;
use self::record_store::RecordStore;
use self::session_store::SessionStore;

pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
    pub sessions: std::sync::Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = RecordStore::new(config.data_dir.clone());
        store.ensure_data_dir()?;
        tracing::info!("Record store ready at {}", config.data_dir.display());

        let sessions = std::sync::Arc::new(SessionStore::new(config.session_ttl_hours));

        Ok(Self {
            config,
            store,
            sessions,
        })
    }
}

pub mod catalog_service;
pub mod chat_service;
pub mod course_service;
pub mod document_service;
pub mod exam_timer;
pub mod grading_service;
pub mod progress_service;
pub mod record_store;
pub mod result_service;
pub mod session_store;
pub mod submission_service;
pub mod user_service;
