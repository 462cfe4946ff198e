//! Note editor form (shared by create and edit) and the account forms.

use crate::notes::html_escape;

use super::components::error_message;

pub struct NoteFormValues<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub tags: &'a str,
}

/// Create/edit form. The "Suggest tags" button calls `/api/suggest-tags` and
/// lets the user add suggestions to the tag field one by one.
pub fn note_form(
    heading: &str,
    action: &str,
    values: &NoteFormValues<'_>,
    error: Option<&str>,
    ai_enabled: bool,
) -> String {
    let suggest_html = if ai_enabled {
        r#"<button type="button" class="btn secondary" id="suggest-btn" onclick="suggestTags()">Suggest tags</button>
           <div class="suggested-tags" id="suggested-tags"></div>"#
    } else {
        ""
    };

    format!(
        r##"<h1>{heading}</h1>
        {error}
        <form method="POST" action="{action}" class="note-form">
            <div class="form-group">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" required autofocus value="{title}">
            </div>
            <div class="form-group">
                <label for="content">Content (Markdown)</label>
                <textarea id="content" name="content" required>{content}</textarea>
            </div>
            <div class="form-group">
                <label for="tags">Tags</label>
                <input type="text" id="tags" name="tags" value="{tags}" placeholder="rust, ideas, reading">
                <small>Comma-separated</small>
                {suggest}
            </div>
            <div class="form-actions">
                <button type="submit" class="btn">Save</button>
                <a href="/dashboard" class="btn secondary">Cancel</a>
            </div>
        </form>

        <script>
        function addTag(tag) {{
            const input = document.getElementById('tags');
            const current = input.value.split(',').map(t => t.trim()).filter(t => t);
            if (!current.includes(tag)) {{
                current.push(tag);
                input.value = current.join(', ');
            }}
        }}

        async function suggestTags() {{
            const btn = document.getElementById('suggest-btn');
            const box = document.getElementById('suggested-tags');
            const title = document.getElementById('title').value;
            const content = document.getElementById('content').value;
            btn.disabled = true;
            btn.textContent = 'Thinking...';
            box.textContent = '';
            try {{
                const response = await fetch('/api/suggest-tags', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify({{ title, content }})
                }});
                const data = await response.json();
                if (!response.ok) {{
                    box.textContent = data.message || 'Tag suggestion failed';
                    return;
                }}
                for (const tag of data.tags) {{
                    const b = document.createElement('button');
                    b.type = 'button';
                    b.textContent = '+ ' + tag;
                    b.onclick = () => addTag(tag);
                    box.appendChild(b);
                }}
            }} catch (e) {{
                box.textContent = 'Tag suggestion failed: ' + e.message;
            }} finally {{
                btn.disabled = false;
                btn.textContent = 'Suggest tags';
            }}
        }}
        </script>
        "##,
        heading = html_escape(heading),
        error = error.map(error_message).unwrap_or_default(),
        action = action,
        title = html_escape(values.title),
        content = html_escape(values.content),
        tags = html_escape(values.tags),
        suggest = suggest_html,
    )
}

pub fn login_form(email: &str, error: Option<&str>) -> String {
    format!(
        r#"<div class="login-form">
            {error}
            <h1>Login</h1>
            <form method="POST" action="/login">
                <input type="email" name="email" placeholder="Email" value="{email}" autofocus required>
                <input type="password" name="password" placeholder="Password" required>
                <button type="submit">Login</button>
            </form>
            <p>No account? <a href="/register">Register</a></p>
        </div>"#,
        error = error.map(error_message).unwrap_or_default(),
        email = html_escape(email),
    )
}

pub fn register_form(email: &str, name: &str, error: Option<&str>) -> String {
    format!(
        r#"<div class="login-form">
            {error}
            <h1>Register</h1>
            <form method="POST" action="/register">
                <input type="text" name="name" placeholder="Name (optional)" value="{name}">
                <input type="email" name="email" placeholder="Email" value="{email}" required>
                <input type="password" name="password" placeholder="Password" required>
                <input type="password" name="confirm" placeholder="Confirm password" required>
                <button type="submit">Create account</button>
            </form>
            <p>Already registered? <a href="/login">Login</a></p>
        </div>"#,
        error = error.map(error_message).unwrap_or_default(),
        email = html_escape(email),
        name = html_escape(name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_form_escapes_values() {
        let values = NoteFormValues {
            title: "<script>",
            content: "a </textarea> b",
            tags: "x",
        };
        let html = note_form("Edit", "/notes/1/edit", &values, None, true);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &lt;/textarea&gt; b"));
        assert!(html.contains("suggest-btn"));
    }

    #[test]
    fn test_note_form_without_ai() {
        let values = NoteFormValues {
            title: "",
            content: "",
            tags: "",
        };
        let html = note_form("New", "/notes/new", &values, Some("Title and content are required"), false);
        assert!(!html.contains("suggest-btn"));
        assert!(html.contains("message error"));
    }
}
