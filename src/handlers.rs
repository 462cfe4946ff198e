//! HTTP route handlers for the web application.
//!
//! Pages are rendered server-side with `format!` into the shared base
//! template. Page handlers redirect anonymous users to `/login`; the JSON
//! endpoints answer 401 instead.

use crate::ai::{DEFAULT_MAX_TAGS, DEFAULT_SUMMARY_LENGTH};
use crate::auth::{
    clear_session_cookie, create_session, current_user, hash_password, session_cookie,
    validate_registration, verify_password, verify_unknown_user,
};
use crate::error::AppError;
use crate::models::{Note, NoteDraft, User};
use crate::notes::{
    format_datetime, html_escape, html_escape_multiline, render_markdown, tag_chips, tag_color_class,
    tag_href, tag_size_class,
};
use crate::templates::{
    base_html, error_message, login_form, note_form, register_form, render_thinkable,
    NoteFormValues,
};
use crate::thinkable::{parse_open_list, ThinkableView};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn require_user(state: &AppState, jar: &CookieJar) -> Result<User, Response> {
    current_user(state, jar).ok_or_else(|| Redirect::to("/login").into_response())
}

fn error_page(err: &AppError, user: Option<&User>) -> Response {
    let html = format!(
        r#"{}<p><a href="/dashboard">&larr; Back to notes</a></p>"#,
        error_message(&err.user_message())
    );
    (err.status(), Html(base_html("Error", &html, None, user))).into_response()
}

fn note_list_html(notes: &[Note]) -> String {
    let mut html = String::from("<ul class=\"note-list\">");

    for note in notes {
        html.push_str(&format!(
            r#"<li class="note-item">
                <a href="/notes/{id}" class="title">{title}</a>
                <div class="excerpt">{excerpt}</div>
                <span class="meta">{updated}</span> {tags}
            </li>"#,
            id = note.id,
            title = html_escape(&note.title),
            excerpt = html_escape(&note.excerpt(120)),
            updated = format_datetime(&note.updated_at),
            tags = tag_chips(&note.tags),
        ));
    }

    html.push_str("</ul>");
    html
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}

// ============================================================================
// Landing Page
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if current_user(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let html = r#"<div class="hero">
            <h1>thinknotes</h1>
            <p>Write Markdown notes, organize them with tags, and let an AI assistant summarize them.</p>
            <a href="/register" class="btn">Get started</a>
            <a href="/login" class="btn secondary">Login</a>
        </div>"#;

    Html(base_html("thinknotes", html, None, None)).into_response()
}

// ============================================================================
// Authentication Handlers
// ============================================================================

pub async fn register_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if current_user(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Html(base_html("Register", &register_form("", "", None), None, None)).into_response()
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    pub confirm: String,
}

pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let rerender = |err: &AppError| {
        let html = register_form(&form.email, &form.name, Some(&err.user_message()));
        (err.status(), Html(base_html("Register", &html, None, None))).into_response()
    };

    if let Err(e) = validate_registration(&form.email, &form.password, &form.confirm) {
        return rerender(&e);
    }

    let password = form.password.clone();
    let hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(h)) => h,
        Ok(Err(e)) => return rerender(&e),
        Err(e) => return rerender(&AppError::Internal(e.to_string())),
    };

    let name = Some(form.name.as_str());
    let user = match state.store.create_user(&form.email, name, &hash) {
        Ok(u) => u,
        Err(e) => return rerender(&e),
    };

    start_session(&state, &user)
}

pub async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if current_user(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Html(base_html("Login", &login_form("", None), None, None)).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let rejected = |status: StatusCode, msg: &str| {
        let html = login_form(&form.email, Some(msg));
        (status, Html(base_html("Login", &html, None, None))).into_response()
    };

    let locked = state
        .login_rate_limit
        .lock()
        .map(|l| l.is_locked())
        .unwrap_or(false);
    if locked {
        return rejected(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many failed attempts. Please wait a moment and try again.",
        );
    }

    let user = match state.store.find_user_by_email(&form.email) {
        Ok(u) => u,
        Err(e) => return rejected(e.status(), &e.user_message()),
    };

    let hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = form.password.clone();
    let verified = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_unknown_user(&password),
    })
    .await
    .unwrap_or(false);

    let user = match user {
        Some(u) if verified => u,
        _ => {
            if let Ok(mut limit) = state.login_rate_limit.lock() {
                limit.record_failure();
            }
            tracing::warn!("failed login attempt");
            return rejected(StatusCode::UNAUTHORIZED, "Invalid email or password.");
        }
    };

    if let Ok(mut limit) = state.login_rate_limit.lock() {
        limit.reset();
    }
    start_session(&state, &user)
}

fn start_session(state: &AppState, user: &User) -> Response {
    let Some(token) = create_session(&user.id, &state.session_secret) else {
        return error_page(&AppError::Internal("failed to create session".into()), None);
    };
    tracing::info!(user_id = %user.id, "session started");
    ([(SET_COOKIE, session_cookie(&token))], Redirect::to("/dashboard")).into_response()
}

pub async fn logout() -> Response {
    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/")).into_response()
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn dashboard(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let notes = match state.store.list_notes(&user.id) {
        Ok(n) => n,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let mut html = format!(
        r#"<div class="note-header">
            <h1>My notes</h1>
            <div class="note-actions">
                <a href="/tags" class="btn secondary">Browse tags</a>
                <a href="/notes/new" class="btn">New note</a>
            </div>
        </div>
        <p class="meta">{} notes</p>"#,
        notes.len()
    );

    if notes.is_empty() {
        html.push_str(r#"<p>No notes yet. <a href="/notes/new">Create your first note</a>.</p>"#);
    } else {
        html.push_str(&note_list_html(&notes));
    }

    Html(base_html("My notes", &html, None, Some(&user))).into_response()
}

pub async fn notes_index() -> Redirect {
    Redirect::to("/dashboard")
}

// ============================================================================
// Create / Edit Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: String,
}

impl NoteForm {
    fn values(&self) -> NoteFormValues<'_> {
        NoteFormValues {
            title: &self.title,
            content: &self.content,
            tags: &self.tags,
        }
    }
}

pub async fn new_note_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let values = NoteFormValues {
        title: "",
        content: "",
        tags: "",
    };
    let html = note_form("New note", "/notes/new", &values, None, state.ai.is_enabled());
    Html(base_html("New note", &html, None, Some(&user))).into_response()
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<NoteForm>,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let result = NoteDraft::new(&form.title, &form.content, &form.tags)
        .and_then(|draft| state.store.create_note(&user.id, draft));

    match result {
        Ok(note) => Redirect::to(&format!("/notes/{}", note.id)).into_response(),
        Err(e) => {
            let html = note_form(
                "New note",
                "/notes/new",
                &form.values(),
                Some(&e.user_message()),
                state.ai.is_enabled(),
            );
            (e.status(), Html(base_html("New note", &html, None, Some(&user)))).into_response()
        }
    }
}

pub async fn edit_note_page(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let note = match state.store.get_note(&user.id, &id) {
        Ok(n) => n,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let tags = note.tags.join(", ");
    let values = NoteFormValues {
        title: &note.title,
        content: &note.content,
        tags: &tags,
    };
    let html = note_form(
        "Edit note",
        &format!("/notes/{}/edit", note.id),
        &values,
        None,
        state.ai.is_enabled(),
    );
    Html(base_html(&format!("Edit: {}", note.title), &html, None, Some(&user))).into_response()
}

pub async fn update_note(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<NoteForm>,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let result = NoteDraft::new(&form.title, &form.content, &form.tags)
        .and_then(|draft| state.store.update_note(&user.id, &id, draft));

    match result {
        Ok(note) => Redirect::to(&format!("/notes/{}", note.id)).into_response(),
        Err(e @ AppError::NotFound(_)) => error_page(&e, Some(&user)),
        Err(e) => {
            let html = note_form(
                "Edit note",
                &format!("/notes/{}/edit", id),
                &form.values(),
                Some(&e.user_message()),
                state.ai.is_enabled(),
            );
            (e.status(), Html(base_html("Edit note", &html, None, Some(&user)))).into_response()
        }
    }
}

pub async fn delete_note(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    match state.store.delete_note(&user.id, &id) {
        Ok(()) => Redirect::to("/dashboard").into_response(),
        Err(e) => error_page(&e, Some(&user)),
    }
}

// ============================================================================
// Note View Handler
// ============================================================================

#[derive(Deserialize, Default)]
pub struct NoteViewQuery {
    /// Fingerprint of the summary the `open` list refers to
    pub rev: Option<String>,
    /// Comma-separated positions of expanded reasoning sections
    pub open: Option<String>,
}

pub async fn view_note(
    Path(id): Path<String>,
    Query(query): Query<NoteViewQuery>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    match state.store.get_note(&user.id, &id) {
        Ok(note) => {
            let html = render_note(&note, &query, state.ai.is_enabled(), None);
            Html(base_html(&note.title, &html, None, Some(&user))).into_response()
        }
        Err(e) => error_page(&e, Some(&user)),
    }
}

fn render_note(note: &Note, query: &NoteViewQuery, ai_enabled: bool, summary_error: Option<&str>) -> String {
    fn meta_row(label: &str, value: &str) -> String {
        format!(
            r#"<div class="meta-row"><span class="meta-label">{}</span><span class="meta-value">{}</span></div>"#,
            label, value
        )
    }

    let mut meta_html = String::from("<div class=\"meta-block\">");
    meta_html.push_str(&meta_row("Created", &format_datetime(&note.created_at)));
    meta_html.push_str(&meta_row("Updated", &format_datetime(&note.updated_at)));
    if !note.tags.is_empty() {
        meta_html.push_str(&meta_row("Tags", &tag_chips(&note.tags)));
    }
    meta_html.push_str("</div>");

    let base_href = format!("/notes/{}", note.id);
    let summary_body = match note.summary {
        Some(ref summary) => {
            let open = query.open.as_deref().map(parse_open_list).unwrap_or_default();
            let view = ThinkableView::restore(summary, query.rev.as_deref(), &open);
            render_thinkable(&view, &base_href, html_escape_multiline)
        }
        None => "<p class=\"meta\">No summary yet.</p>".to_string(),
    };

    let summary_button = if ai_enabled {
        format!(
            r#"<form method="POST" action="/notes/{}/summary">
                <button type="submit" class="btn secondary">{}</button>
            </form>"#,
            note.id,
            if note.summary.is_some() { "Regenerate summary" } else { "Generate summary" }
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="note-header">
            <h1>{title}</h1>
            <div class="note-actions">
                <a href="/notes/{id}/edit" class="btn secondary">Edit</a>
                <form method="POST" action="/notes/{id}/delete"
                      onsubmit="return confirm('Delete this note? This cannot be undone.')">
                    <button type="submit" class="btn danger">Delete</button>
                </form>
            </div>
        </div>
        {meta}
        <div class="summary-panel" id="summary">
            <h2>AI summary</h2>
            {error}
            {summary}
            {button}
        </div>
        <div class="note-content">{content}</div>"#,
        title = html_escape(&note.title),
        id = note.id,
        meta = meta_html,
        error = summary_error.map(error_message).unwrap_or_default(),
        summary = summary_body,
        button = summary_button,
        content = render_markdown(&note.content),
    )
}

// ============================================================================
// AI Handlers
// ============================================================================

pub async fn generate_summary(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let note = match state.store.get_note(&user.id, &id) {
        Ok(n) => n,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let result = match state.ai.summarize(&note.content, DEFAULT_SUMMARY_LENGTH).await {
        Ok(summary) => state
            .store
            .set_summary(&user.id, &note.id, &note.content, &summary),
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(_) => Redirect::to(&format!("/notes/{}#summary", note.id)).into_response(),
        Err(e) => {
            tracing::warn!(note_id = %note.id, "summary generation failed: {}", e);
            // Show the note as it is now, which may differ from what was sent
            let current = match state.store.get_note(&user.id, &id) {
                Ok(n) => n,
                Err(e) => return error_page(&e, Some(&user)),
            };
            let html = render_note(
                &current,
                &NoteViewQuery::default(),
                state.ai.is_enabled(),
                Some(&e.user_message()),
            );
            (e.status(), Html(base_html(&current.title, &html, None, Some(&user)))).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct SuggestTagsRequest {
    pub title: String,
    pub content: String,
    pub max_tags: Option<usize>,
}

#[derive(Serialize)]
pub struct SuggestTagsResponse {
    pub tags: Vec<String>,
}

pub async fn suggest_tags(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SuggestTagsRequest>,
) -> Result<Json<SuggestTagsResponse>, AppError> {
    if current_user(&state, &jar).is_none() {
        return Err(AppError::Unauthorized);
    }

    let max_tags = body.max_tags.unwrap_or(DEFAULT_MAX_TAGS).clamp(1, 20);
    let tags = state
        .ai
        .suggest_tags(&body.content, &body.title, max_tags)
        .await?;
    Ok(Json(SuggestTagsResponse { tags }))
}

#[derive(Serialize)]
pub struct AiStatus {
    pub enabled: bool,
    pub available: bool,
}

pub async fn ai_status(State(state): State<Arc<AppState>>) -> Json<AiStatus> {
    Json(AiStatus {
        enabled: state.ai.is_enabled(),
        available: state.ai.is_available().await,
    })
}

// ============================================================================
// Search Handler
// ============================================================================

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };
    let q = query.q.unwrap_or_default();

    if q.trim().is_empty() {
        return Html(base_html(
            "Search",
            "<p>Enter a search term.</p>",
            Some(q.as_str()),
            Some(&user),
        ))
        .into_response();
    }

    let results = match state.store.search_notes(&user.id, &q) {
        Ok(r) => r,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let mut html = format!(
        "<h1>Search: \"{}\"</h1><p>{} results</p><div class=\"search-results\">",
        html_escape(&q),
        results.len()
    );

    for result in &results {
        html.push_str(&format!(
            r#"<div class="result-group">
                <a href="/notes/{}">{}</a> {}"#,
            result.note.id,
            html_escape(&result.note.title),
            tag_chips(&result.note.tags)
        ));

        for m in result.matches.iter().take(5) {
            html.push_str(&format!(
                r#"<div class="match"><span class="line-num">{}:</span>{}</div>"#,
                m.line_number,
                html_escape(&truncate_chars(&m.line_content, 100))
            ));
        }

        if result.matches.len() > 5 {
            html.push_str(&format!(
                "<div class=\"match\">... and {} more matches</div>",
                result.matches.len() - 5
            ));
        }

        html.push_str("</div>");
    }

    html.push_str("</div>");

    Html(base_html(
        &format!("Search: {}", q),
        &html,
        Some(q.as_str()),
        Some(&user),
    ))
    .into_response()
}

// ============================================================================
// Tag Handlers
// ============================================================================

pub async fn tags(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let counts = match state.store.tag_counts(&user.id) {
        Ok(c) => c,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let mut html = String::from("<h1>Tags</h1>");

    if counts.is_empty() {
        html.push_str(r#"<p>No tags yet. Add tags when you <a href="/notes/new">create a note</a>.</p>"#);
        return Html(base_html("Tags", &html, None, Some(&user))).into_response();
    }

    let max = counts.iter().map(|t| t.count).max().unwrap_or(0);

    html.push_str("<div class=\"tag-cloud\">");
    for tc in &counts {
        html.push_str(&format!(
            r#"<a class="{} {}" href="{}">{}</a>"#,
            tag_size_class(tc.count, max),
            tag_color_class(&tc.tag),
            tag_href(&tc.tag),
            html_escape(&tc.tag)
        ));
    }
    html.push_str("</div>");

    html.push_str("<table class=\"tag-table\"><tr><th>Tag</th><th>Notes</th></tr>");
    for tc in &counts {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td></tr>",
            tag_href(&tc.tag),
            html_escape(&tc.tag),
            tc.count
        ));
    }
    html.push_str("</table>");

    Html(base_html("Tags", &html, None, Some(&user))).into_response()
}

pub async fn tag_notes(
    Path(tag): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let user = match require_user(&state, &jar) {
        Ok(u) => u,
        Err(r) => return r,
    };

    let notes = match state.store.notes_with_tag(&user.id, &tag) {
        Ok(n) => n,
        Err(e) => return error_page(&e, Some(&user)),
    };

    let mut html = format!(
        r#"<a href="/tags">&larr; All tags</a>
        <h1>Tag: {}</h1>
        <p class="meta">{} notes</p>"#,
        html_escape(&tag),
        notes.len()
    );

    if notes.is_empty() {
        html.push_str("<p>No notes carry this tag.</p>");
    } else {
        html.push_str(&note_list_html(&notes));
    }

    Html(base_html(&format!("Tag: {}", tag), &html, None, Some(&user))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(summary: Option<&str>) -> Note {
        Note {
            id: "abc".to_string(),
            owner_id: "u".to_string(),
            title: "My <note>".to_string(),
            content: "# Heading\n\nbody".to_string(),
            tags: vec!["rust".to_string()],
            summary: summary.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    #[test]
    fn test_render_note_without_summary() {
        let html = render_note(&note(None), &NoteViewQuery::default(), true, None);
        assert!(html.contains("No summary yet."));
        assert!(html.contains("Generate summary"));
        assert!(html.contains("My &lt;note&gt;"));
        assert!(html.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn test_render_note_summary_collapsed_by_default() {
        let html = render_note(
            &note(Some("<think>private reasoning</think>Short summary.")),
            &NoteViewQuery::default(),
            false,
            None,
        );
        assert!(html.contains("Short summary."));
        assert!(!html.contains("private reasoning"));
        assert!(!html.contains("Generate summary"));
    }

    #[test]
    fn test_render_note_summary_expanded_by_query() {
        let summary = "<think>private reasoning</think>Short summary.";
        let query = NoteViewQuery {
            rev: Some(crate::thinkable::fingerprint(summary)),
            open: Some("0".to_string()),
        };
        let html = render_note(&note(Some(summary)), &query, true, None);
        assert!(html.contains("private reasoning"));
        assert!(html.contains("Regenerate summary"));
    }
}
