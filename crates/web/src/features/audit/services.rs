use std::sync::Arc;

use extractor::{ExtractionEngine, ExtractionRequest, ExtractorError, PromptBuilder};
use storage::{
    ReportRepository,
    error::StorageError,
    models::{AnnotatedDocument, ModelId, QuerySpec},
};
use uuid::Uuid;

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

pub const STATUS_ANALYZING: &str = "AI is analyzing text...";
pub const STATUS_VISUALIZING: &str = "Generating Visualization...";

/// Builds extraction requests from the session's query and hands them to the
/// engine. Refuses to call the engine when no credential was configured.
pub struct ExtractionInvoker {
    engine: Arc<dyn ExtractionEngine>,
    api_key: Option<String>,
}

impl ExtractionInvoker {
    pub fn new(engine: Arc<dyn ExtractionEngine>, api_key: Option<String>) -> Self {
        Self { engine, api_key }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn invoke(
        &self,
        text: &str,
        query: &QuerySpec,
        model: ModelId,
    ) -> extractor::Result<AnnotatedDocument> {
        if !self.has_credential() {
            return Err(ExtractorError::MissingApiKey);
        }

        let request = ExtractionRequest {
            text: text.to_string(),
            instruction: PromptBuilder::instruction(&query.topic, &query.fields),
            examples: PromptBuilder::demonstration_examples(),
            model,
        };
        self.engine.extract(&request).await
    }
}

/// Persists the annotated document as the JSON-lines report and renders it
/// back to HTML.
pub struct ReportRenderer {
    reports: ReportRepository,
}

impl ReportRenderer {
    pub fn new(reports: ReportRepository) -> Self {
        Self { reports }
    }

    pub async fn render(&self, document: &AnnotatedDocument) -> extractor::Result<String> {
        let path = self.reports.save(std::slice::from_ref(document)).await?;
        tracing::info!("Saved annotated document to {}", path.display());
        extractor::visualize_file(&path).await
    }
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub item_count: usize,
    pub message: String,
    pub report_html: String,
}

pub fn found_message(item_count: usize) -> String {
    format!("Found {} items.", item_count)
}

/// Runs one audit for a session.
///
/// The session lock is only held for the state transitions; the engine call
/// and report rendering happen outside it. Engine and rendering failures move
/// the session to `Failed` and are returned to the caller.
///
/// The run itself is a spawned task, so a dropped request still leaves the
/// session `Complete` or `Failed`.
pub async fn run_audit(
    state: &AppState,
    session_id: Uuid,
    query: QuerySpec,
) -> ApiResult<AuditOutcome> {
    let (text, model) = state
        .sessions
        .update(session_id, |session| {
            session.configure(query.clone())?;
            session.start_run()?;
            let text = session
                .document
                .as_ref()
                .map(|document| document.text.clone())
                .ok_or(StorageError::NotFound)?;
            Ok((text, session.model))
        })
        .await?;

    tracing::info!(
        "Running audit for session {} (topic: '{}', model: {})",
        session_id,
        query.topic,
        model
    );

    let task_state = state.clone();
    let run = tokio::spawn(async move {
        finish_run(&task_state, session_id, &text, &query, model).await
    });

    match run.await {
        Ok(result) => result,
        Err(e) => {
            let error = WebError::InternalServerError(format!("Audit task failed: {}", e));
            let message = error.user_message();
            state
                .sessions
                .update(session_id, |session| session.fail(message, Vec::new()))
                .await?;
            Err(error)
        }
    }
}

async fn finish_run(
    state: &AppState,
    session_id: Uuid,
    text: &str,
    query: &QuerySpec,
    model: ModelId,
) -> ApiResult<AuditOutcome> {
    let mut status_log = Vec::new();
    let result = execute(state, text, query, model, &mut status_log).await;
    match result {
        Ok((item_count, report_html)) => {
            let message = found_message(item_count);
            state
                .sessions
                .update(session_id, |session| {
                    session.complete(item_count, report_html.clone(), status_log)
                })
                .await?;
            tracing::info!("Audit for session {} complete: {}", session_id, message);

            Ok(AuditOutcome {
                item_count,
                message,
                report_html,
            })
        }
        Err(error) => {
            tracing::error!("Audit for session {} failed: {}", session_id, error);
            let message = error.user_message();
            state
                .sessions
                .update(session_id, |session| session.fail(message, status_log))
                .await?;
            Err(error)
        }
    }
}

async fn execute(
    state: &AppState,
    text: &str,
    query: &QuerySpec,
    model: ModelId,
    status_log: &mut Vec<String>,
) -> ApiResult<(usize, String)> {
    if !state.invoker.has_credential() {
        return Err(WebError::MissingApiKey);
    }
    status_log.push(STATUS_ANALYZING.to_string());

    let document = state
        .invoker
        .invoke(text, query, model)
        .await
        .map_err(WebError::from)?;

    let item_count = document.len();
    status_log.push(found_message(item_count));
    status_log.push(STATUS_VISUALIZING.to_string());

    let report_html = state
        .renderer
        .render(&document)
        .await
        .map_err(WebError::ExtractionFailed)?;

    Ok((item_count, report_html))
}
