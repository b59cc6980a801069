use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

use super::{LoadedDocument, ModelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loaded,
    ConfiguredAwaitingRun,
    Running,
    Complete,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Loaded => "loaded",
            SessionState::ConfiguredAwaitingRun => "configured",
            SessionState::Running => "running",
            SessionState::Complete => "complete",
            SessionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// What the user is looking for and which fields to pull out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuerySpec {
    pub topic: String,
    /// Comma separated field names, passed through verbatim.
    pub fields: String,
}

impl QuerySpec {
    pub const DEFAULT_TOPIC: &'static str = "Risk Factors";
    pub const DEFAULT_FIELDS: &'static str = "category, summary, impact";

    pub fn new(topic: impl Into<String>, fields: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            fields: fields.into(),
        }
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOPIC, Self::DEFAULT_FIELDS)
    }
}

/// One user's walk through upload, configuration and audit.
///
/// State only moves through the transition methods below, each of which
/// rejects calls that are not legal from the current state.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub model: ModelId,
    pub document: Option<LoadedDocument>,
    pub query: QuerySpec,
    pub state: SessionState,
    pub status_log: Vec<String>,
    pub error: Option<String>,
    pub item_count: Option<usize>,
    pub report_html: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(model: ModelId) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            model,
            document: None,
            query: QuerySpec::default(),
            state: SessionState::Idle,
            status_log: Vec::new(),
            error: None,
            item_count: None,
            report_html: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches a freshly loaded document, discarding any previous one.
    pub fn load(&mut self, document: LoadedDocument) -> Result<()> {
        self.ensure_not(SessionState::Running, "load a document")?;
        self.document = Some(document);
        self.clear_run();
        self.state = SessionState::Loaded;
        Ok(())
    }

    pub fn configure(&mut self, query: QuerySpec) -> Result<()> {
        match self.state {
            SessionState::Loaded
            | SessionState::ConfiguredAwaitingRun
            | SessionState::Complete
            | SessionState::Failed => {
                self.query = query;
                self.clear_run();
                self.state = SessionState::ConfiguredAwaitingRun;
                Ok(())
            }
            from => Err(StorageError::InvalidTransition {
                from,
                action: "configure the audit",
            }),
        }
    }

    pub fn start_run(&mut self) -> Result<()> {
        if self.state != SessionState::ConfiguredAwaitingRun || self.document.is_none() {
            return Err(StorageError::InvalidTransition {
                from: self.state,
                action: "start an audit",
            });
        }
        self.clear_run();
        self.state = SessionState::Running;
        Ok(())
    }

    pub fn complete(
        &mut self,
        item_count: usize,
        report_html: String,
        status_log: Vec<String>,
    ) -> Result<()> {
        self.ensure_running("complete the audit")?;
        self.item_count = Some(item_count);
        self.report_html = Some(report_html);
        self.status_log = status_log;
        self.state = SessionState::Complete;
        Ok(())
    }

    pub fn fail(&mut self, message: String, status_log: Vec<String>) -> Result<()> {
        self.ensure_running("fail the audit")?;
        self.error = Some(message);
        self.status_log = status_log;
        self.state = SessionState::Failed;
        Ok(())
    }

    fn clear_run(&mut self) {
        self.status_log.clear();
        self.error = None;
        self.item_count = None;
        self.report_html = None;
    }

    fn ensure_running(&self, action: &'static str) -> Result<()> {
        if self.state == SessionState::Running {
            Ok(())
        } else {
            Err(StorageError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn ensure_not(&self, state: SessionState, action: &'static str) -> Result<()> {
        if self.state == state {
            Err(StorageError::InvalidTransition {
                from: self.state,
                action,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> LoadedDocument {
        LoadedDocument {
            file_name: "annual-report.pdf".to_string(),
            total_pages: 12,
            analyzed_pages: 5,
            text: "The company faces regulatory risks.\n".to_string(),
            loaded_at: Utc::now(),
        }
    }

    fn running_session() -> Session {
        let mut session = Session::new(ModelId::default());
        session.load(document()).unwrap();
        session.configure(QuerySpec::default()).unwrap();
        session.start_run().unwrap();
        session
    }

    #[test]
    fn walks_the_happy_path() {
        let mut session = Session::new(ModelId::Gemini15Flash);
        assert_eq!(session.state, SessionState::Idle);

        session.load(document()).unwrap();
        assert_eq!(session.state, SessionState::Loaded);

        session
            .configure(QuerySpec::new("Liabilities", "amount"))
            .unwrap();
        assert_eq!(session.state, SessionState::ConfiguredAwaitingRun);

        session.start_run().unwrap();
        assert_eq!(session.state, SessionState::Running);

        session
            .complete(3, "<html></html>".to_string(), vec!["Found 3 items.".into()])
            .unwrap();
        assert_eq!(session.state, SessionState::Complete);
        assert_eq!(session.item_count, Some(3));
    }

    #[test]
    fn failed_run_can_be_retried() {
        let mut session = running_session();
        session
            .fail("Extraction Failed: quota".to_string(), vec![])
            .unwrap();
        assert_eq!(session.state, SessionState::Failed);
        assert!(session.report_html.is_none());

        session.configure(QuerySpec::default()).unwrap();
        assert_eq!(session.state, SessionState::ConfiguredAwaitingRun);
        assert!(session.error.is_none());
        session.start_run().unwrap();
    }

    #[test]
    fn cannot_run_without_a_document() {
        let mut session = Session::new(ModelId::default());
        let err = session.configure(QuerySpec::default()).unwrap_err();
        assert!(err.is_conflict());

        let err = session.start_run().unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidTransition {
                from: SessionState::Idle,
                ..
            }
        ));
    }

    #[test]
    fn rejects_second_run_while_running() {
        let mut session = running_session();
        assert!(session.start_run().is_err());
        assert!(session.configure(QuerySpec::default()).is_err());
        assert!(session.load(document()).is_err());
    }

    #[test]
    fn complete_requires_running() {
        let mut session = Session::new(ModelId::default());
        session.load(document()).unwrap();
        let err = session
            .complete(1, String::new(), vec![])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot complete the audit while session is loaded"
        );
    }
}
