//! Server-rendered pages for the browser UI.

use axum::http::StatusCode;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use extractor::visualization::escape_html;
use storage::models::{ModelId, Session, SessionState};

pub const APP_TITLE: &str = "DocuTrace: The Verifiable AI Auditor";
pub const UPLOAD_PROMPT: &str = "Upload a PDF to begin.";
pub const EVIDENCE_HEIGHT_PX: u32 = 800;

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #262730; display: flex; min-height: 100vh; }
aside { width: 300px; background: #f0f2f6; padding: 24px; box-sizing: border-box; }
main { flex: 1; padding: 32px 48px; max-width: 1200px; }
label { display: block; font-size: 14px; margin: 12px 0 4px; }
input[type=text], select { width: 100%; padding: 8px; box-sizing: border-box; border: 1px solid #d0d3da; border-radius: 6px; }
button { margin-top: 12px; padding: 8px 16px; border-radius: 6px; border: 1px solid #d0d3da; background: #fff; cursor: pointer; }
button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
.columns { display: flex; gap: 16px; }
.columns > div { flex: 1; }
.alert { padding: 12px 16px; border-radius: 6px; margin: 12px 0; }
.alert.info { background: #e8f0fe; color: #1c4f9c; }
.alert.success { background: #e6f4ea; color: #1e6b34; }
.alert.error { background: #fde8e8; color: #9b1c1c; }
.status { border: 1px solid #d0d3da; border-radius: 6px; padding: 12px 16px; margin: 16px 0; }
.status ul { margin: 8px 0 0; padding-left: 20px; }
.caption { color: #6b6f7b; font-size: 13px; }
hr { border: none; border-top: 1px solid #d0d3da; margin: 20px 0; }
"#;

fn layout(title: &str, selected_model: ModelId, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{sidebar}
<main>
<h1>📜 {APP_TITLE}</h1>
<p>Extract structured data from documents with <strong>Source Grounding</strong> (Evidence).</p>
{content}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        sidebar = sidebar(selected_model),
    )
}

fn sidebar(selected_model: ModelId) -> String {
    let options: String = ModelId::ALL
        .iter()
        .map(|model| {
            let selected = if *model == selected_model { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, model, selected)
        })
        .collect();

    format!(
        r#"<aside>
<h2>Configuration</h2>
<form action="/sessions" method="post" enctype="multipart/form-data">
<label for="model">Model</label>
<select id="model" name="model">{options}</select>
<label for="file">Upload Document (PDF)</label>
<input id="file" type="file" name="file" accept=".pdf,application/pdf" required>
<button type="submit">Upload</button>
</form>
<hr>
<div class="alert info">Powered by <strong>Gemini</strong> with source-grounded extraction</div>
</aside>"#
    )
}

fn alert(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="alert {}">{}</div>"#,
        kind,
        escape_html(message)
    )
}

pub fn index_page() -> String {
    layout(
        "DocuTrace",
        ModelId::default(),
        &alert("info", &format!("👈 {}", UPLOAD_PROMPT)),
    )
}

pub fn session_page(session: &Session) -> String {
    let Some(document) = &session.document else {
        return layout(
            "DocuTrace",
            session.model,
            &alert("info", &format!("👈 {}", UPLOAD_PROMPT)),
        );
    };

    let mut content = alert("success", &document.summary());
    content.push_str(&query_form(session));

    match session.state {
        SessionState::Complete | SessionState::Failed | SessionState::Running => {
            content.push_str(&status_panel(session));
        }
        _ => {}
    }

    if let Some(error) = &session.error {
        content.push_str(&alert("error", error));
    }

    if let Some(report_html) = &session.report_html {
        content.push_str("<h3>🔍 Verified Evidence</h3>\n");
        content.push_str(r#"<p class="caption">Click highlights to see source text.</p>"#);
        content.push_str(&evidence_frame(report_html));
    }

    layout(&document.file_name, session.model, &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        "{}<p><a href=\"/\">Start over</a></p>",
        alert("error", message)
    );
    layout(
        status.canonical_reason().unwrap_or("Error"),
        ModelId::default(),
        &content,
    )
}

/// Embeds a rendered report in a sandboxed, scrollable iframe.
///
/// The report is passed through as a base64 data URL; it is not sanitized.
pub fn evidence_frame(report_html: &str) -> String {
    format!(
        r#"<iframe class="evidence" title="Verified evidence" sandbox="allow-scripts" scrolling="yes" style="width:100%;height:{}px;border:1px solid #d0d3da;border-radius:6px;overflow:auto" src="data:text/html;charset=utf-8;base64,{}"></iframe>"#,
        EVIDENCE_HEIGHT_PX,
        STANDARD.encode(report_html.as_bytes())
    )
}

fn query_form(session: &Session) -> String {
    format!(
        r#"<form action="/sessions/{id}/audit" method="post">
<div class="columns">
<div><label for="topic">What are you looking for?</label>
<input id="topic" type="text" name="topic" value="{topic}"></div>
<div><label for="fields">Fields to extract (comma separated)</label>
<input id="fields" type="text" name="fields" value="{fields}"></div>
</div>
<button class="primary" type="submit">🚀 Run Audit</button>
</form>"#,
        id = session.session_id,
        topic = escape_html(&session.query.topic),
        fields = escape_html(&session.query.fields),
    )
}

fn status_panel(session: &Session) -> String {
    let label = match session.state {
        SessionState::Complete => "Audit Complete",
        SessionState::Failed => "Audit Failed",
        _ => "🕵️‍♂️ Auditing Document...",
    };
    let steps: String = session
        .status_log
        .iter()
        .map(|line| format!("<li>{}</li>", escape_html(line)))
        .collect();

    format!(
        r#"<div class="status"><strong>{}</strong><ul>{}</ul></div>"#,
        label, steps
    )
}

#[cfg(test)]
mod tests {
    use storage::models::QuerySpec;

    use super::*;
    use crate::test_support::loaded_session;

    #[test]
    fn index_prompts_for_upload() {
        let page = index_page();
        assert!(page.contains(UPLOAD_PROMPT));
        assert!(page.contains(r#"<option value="gemini-2.5-flash" selected>"#));
        assert!(page.contains(r#"<option value="gemini-1.5-flash">"#));
    }

    #[test]
    fn loaded_session_shows_summary_and_defaults() {
        let page = session_page(&loaded_session());
        assert!(page.contains("Loaded 12 pages. (Analyzing first 5)"));
        assert!(page.contains(r#"value="Risk Factors""#));
        assert!(page.contains(r#"value="category, summary, impact""#));
        assert!(!page.contains("<iframe"));
    }

    #[test]
    fn completed_session_embeds_report() {
        let mut session = loaded_session();
        session.configure(QuerySpec::default()).unwrap();
        session.start_run().unwrap();
        session
            .complete(1, "<p>report</p>".to_string(), vec!["Found 1 items.".into()])
            .unwrap();

        let page = session_page(&session);
        assert!(page.contains("Audit Complete"));
        assert!(page.contains("<li>Found 1 items.</li>"));
        assert!(page.contains(&STANDARD.encode("<p>report</p>")));
    }

    #[test]
    fn failed_session_shows_error_without_frame() {
        let mut session = loaded_session();
        session.configure(QuerySpec::default()).unwrap();
        session.start_run().unwrap();
        session
            .fail("Extraction Failed: boom".to_string(), vec![])
            .unwrap();

        let page = session_page(&session);
        assert!(page.contains("Extraction Failed: boom"));
        assert!(!page.contains("<iframe"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut session = loaded_session();
        session
            .configure(QuerySpec::new("<script>x</script>", "a\"b"))
            .unwrap();

        let page = session_page(&session);
        assert!(!page.contains("<script>x</script>"));
        assert!(page.contains("a&quot;b"));
    }

    #[test]
    fn evidence_frame_is_sandboxed() {
        let frame = evidence_frame("<html></html>");
        assert!(frame.contains(r#"sandbox="allow-scripts""#));
        assert!(frame.contains("height:800px"));
        assert!(frame.contains("data:text/html;charset=utf-8;base64,"));
    }
}
