//! In-process fakes for the collaborator traits, shared by unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::Message;

use crate::config::Config;
use crate::llm_client::{LanguageModel, LlmError};
use crate::notify::{MailError, MailTransport};
use crate::search::models::{DetectedExtensions, RawJob, RelatedLink};
use crate::search::{JobSearch, SearchError};
use crate::session::SessionStore;
use crate::state::AppState;

pub fn raw_job(company: &str, via: &str, posted: &str) -> RawJob {
    RawJob {
        title: Some("Data Scientist".into()),
        company_name: Some(company.into()),
        location: Some("New York, NY".into()),
        description: Some("Build models and ship them.".into()),
        via: Some(via.into()),
        related_links: Some(vec![RelatedLink {
            link: Some(format!("https://jobs.example/{company}")),
        }]),
        detected_extensions: Some(DetectedExtensions {
            posted_at: Some(posted.into()),
        }),
        ..Default::default()
    }
}

/// Returns the same canned result for every query.
pub struct FakeSearch {
    jobs: Vec<RawJob>,
    failure: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn with_jobs(jobs: Vec<RawJob>) -> Self {
        Self {
            jobs,
            failure: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            jobs: Vec::new(),
            failure: Some(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<RawJob>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.failure {
            Some(message) => Err(SearchError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(self.jobs.clone()),
        }
    }
}

/// Records every (prompt, system) pair and answers with a fixed reply.
pub struct FakeLlm {
    reply: Mutex<Option<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Mutex::new(Some(Ok(text.to_string()))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Mutex::new(Some(Err(error))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLlm {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.to_string()));
        let mut reply = self.reply.lock().unwrap();
        if let Some(Ok(text)) = reply.as_ref() {
            return Ok(text.clone());
        }
        // Errors are not Clone; the original is handed out once.
        reply.take().unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Counts deliveries; optionally fails every one of them.
#[derive(Default)]
pub struct RecordingTransport {
    sent: AtomicUsize,
    fail: bool,
    messages: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .last()
            .map(|m| String::from_utf8_lossy(m).into_owned())
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(message.formatted());
        if self.fail {
            return Err(MailError::Smtp("connection refused".into()));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        serp_api_key: "serp-key".into(),
        serp_api_base_url: "http://127.0.0.1:9".into(),
        anthropic_api_key: "llm-key".into(),
        email_address: "dashboard@example.com".into(),
        email_password: "secret".into(),
        smtp_host: "localhost".into(),
        smtp_port: 2525,
        port: 0,
        rust_log: "debug".into(),
    }
}

pub fn test_state(
    search: Arc<FakeSearch>,
    llm: Arc<FakeLlm>,
    mailer: Arc<RecordingTransport>,
) -> AppState {
    AppState {
        config: test_config(),
        search,
        llm,
        mailer,
        sessions: SessionStore::default(),
    }
}
