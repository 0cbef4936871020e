use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::notify::MailTransport;
use crate::search::JobSearch;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub search: Arc<dyn JobSearch>,
    pub llm: Arc<dyn LanguageModel>,
    pub mailer: Arc<dyn MailTransport>,
    pub sessions: SessionStore,
}
