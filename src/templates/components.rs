//! Shared HTML components: navigation bar, message boxes and the base page
//! template.

use crate::models::User;
use crate::notes::html_escape;

use super::styles::STYLE;

// ============================================================================
// Navigation Bar
// ============================================================================

pub fn nav_bar(search_query: Option<&str>, user: Option<&User>) -> String {
    let query_val = search_query.unwrap_or("");

    let Some(user) = user else {
        return r#"<nav class="nav-bar">
            <a href="/">thinknotes</a>
            <span class="spacer"></span>
            <a href="/login">Login</a>
            <a href="/register">Register</a>
        </nav>"#
            .to_string();
    };

    format!(
        r#"<nav class="nav-bar">
            <a href="/dashboard">Notes</a>
            <a href="/notes/new">New</a>
            <a href="/tags">Tags</a>
            <span class="spacer"></span>
            <form class="search-box" action="/search" method="get">
                <input type="text" name="q" placeholder="Search notes..." value="{}">
                <button type="submit">Go</button>
            </form>
            <span class="user">{}</span>
            <a href="/logout">Logout</a>
        </nav>"#,
        html_escape(query_val),
        html_escape(user.display_name())
    )
}

// ============================================================================
// Messages
// ============================================================================

pub fn error_message(msg: &str) -> String {
    format!(r#"<div class="message error">{}</div>"#, html_escape(msg))
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str, search_query: Option<&str>, user: Option<&User>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {nav}
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav_bar(search_query, user),
    )
}
