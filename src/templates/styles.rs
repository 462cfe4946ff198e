//! CSS styles for the notes application.
//!
//! Solarized Light theme plus the note, tag and reasoning-block classes.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base03: #002b36;
    --base02: #073642;
    --base01: #586e75;
    --base00: #657b83;
    --base0: #839496;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --orange: #cb4b16;
    --red: #dc322f;
    --magenta: #d33682;
    --violet: #6c71c4;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --summary-bg: #f5ecd5;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1.5em; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }

.nav-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 1rem;
    align-items: center;
    flex-wrap: wrap;
    z-index: 100;
}

.nav-bar a { font-size: 0.9rem; }
.nav-bar .spacer { flex: 1; }
.nav-bar .user { font-size: 0.8rem; color: var(--muted); }

.search-box {
    display: flex;
    gap: 0.5rem;
}

.search-box input {
    padding: 0.4rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 0.9rem;
    width: 180px;
}

.search-box button {
    padding: 0.4rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--accent);
    color: var(--fg);
    cursor: pointer;
    font-size: 0.9rem;
}

.note-list { list-style: none; }

.note-item {
    padding: 0.75rem 0;
    border-bottom: 1px solid var(--border);
}

.note-item:last-child { border-bottom: none; }
.note-item .title { font-size: 1rem; }
.note-item .meta { font-size: 0.8rem; color: var(--muted); white-space: nowrap; }
.note-item .excerpt { font-size: 0.85rem; color: var(--base01); margin: 0.25rem 0; }

.tag-chip {
    font-size: 0.7rem;
    padding: 0.1rem 0.45rem;
    border-radius: 3px;
    background: var(--accent);
}
.tag-blue { color: var(--blue); }
.tag-green { color: var(--green); }
.tag-yellow { color: var(--yellow); }
.tag-violet { color: var(--violet); }
.tag-magenta { color: var(--magenta); }
.tag-orange { color: var(--orange); }
.tag-red { color: var(--red); }
.tag-cyan { color: var(--cyan); }

.tag-cloud { display: flex; flex-wrap: wrap; gap: 0.75rem; align-items: baseline; margin: 1rem 0 2rem; }
.tag-size-sm { font-size: 0.8rem; }
.tag-size-base { font-size: 1rem; }
.tag-size-md { font-size: 1.15rem; }
.tag-size-lg { font-size: 1.3rem; font-weight: 600; }
.tag-size-xl { font-size: 1.6rem; font-weight: 700; }

.tag-table { width: 100%; border-collapse: collapse; font-size: 0.85rem; }
.tag-table th, .tag-table td { padding: 0.5rem; text-align: left; border-bottom: 1px solid var(--border); }

.note-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 1rem;
    flex-wrap: wrap;
    gap: 0.5rem;
}

.note-header h1 { margin: 0; flex: 1; }
.note-actions { display: flex; gap: 0.5rem; }
.note-actions form { display: inline; }

.note-content { margin-top: 1rem; }
.note-content pre {
    background: var(--accent);
    padding: 1rem;
    overflow-x: auto;
    border-radius: 4px;
    margin: 1rem 0;
}
.note-content code {
    font-family: "SF Mono", "Consolas", "Liberation Mono", monospace;
    font-size: 0.9em;
}
.note-content p code {
    background: var(--accent);
    padding: 0.1rem 0.3rem;
    border-radius: 3px;
}
.note-content blockquote {
    border-left: 3px solid var(--border);
    margin: 1rem 0;
    padding-left: 1rem;
    color: var(--muted);
}
.note-content ul, .note-content ol {
    margin: 1rem 0;
    padding-left: 1.5rem;
}
.note-content p { margin: 1rem 0; }

.meta-block {
    background: var(--accent);
    padding: 0.5rem 0.75rem;
    margin-bottom: 1rem;
    border-radius: 4px;
    font-size: 0.8rem;
    line-height: 1.4;
}
.meta-block .meta-row {
    display: flex;
    gap: 0.5rem;
}
.meta-block .meta-label {
    font-weight: 600;
    color: var(--base01);
    min-width: 60px;
}

.summary-panel {
    background: var(--summary-bg);
    border-radius: 4px;
    padding: 0.75rem 1rem;
    margin: 1rem 0;
}
.summary-panel h2 { margin-top: 0; font-size: 1rem; }
.summary-panel form { margin-top: 0.5rem; }

.thinkable-content { white-space: pre-wrap; }
.think-block { margin: 0.5rem 0; white-space: normal; }
.think-toggle { font-size: 0.85rem; }
.think-toggle .chevron { display: inline-block; transition: transform 0.15s; }
.think-toggle.expanded .chevron { transform: rotate(90deg); }
.think-content {
    margin-top: 0.25rem;
    padding: 0.75rem;
    background: var(--accent);
    border-left: 4px solid var(--blue);
    border-radius: 3px;
    font-size: 0.85rem;
    white-space: pre-wrap;
}

.search-results .match {
    font-family: "SF Mono", "Consolas", "Liberation Mono", monospace;
    font-size: 0.85rem;
    background: var(--accent);
    padding: 0.25rem 0.5rem;
    margin: 0.25rem 0;
    border-radius: 3px;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
}
.search-results .match .line-num {
    color: var(--muted);
    margin-right: 0.5rem;
}
.search-results .result-group {
    margin-bottom: 1.5rem;
}

.btn {
    padding: 0.5rem 1rem;
    border: 1px solid var(--base1);
    border-radius: 4px;
    background: var(--blue);
    color: var(--base3);
    cursor: pointer;
    font-size: 0.9rem;
    font-family: inherit;
    text-decoration: none;
    display: inline-block;
}

.btn:hover { background: var(--cyan); border-color: var(--cyan); text-decoration: none; }
.btn.secondary { background: var(--base2); color: var(--base00); border-color: var(--base1); }
.btn.secondary:hover { background: var(--base3); }
.btn.danger { background: var(--red); border-color: var(--red); }
.btn:disabled { opacity: 0.5; cursor: default; }

.note-form { max-width: 700px; }
.form-group { margin-bottom: 1rem; }
.form-group label { display: block; margin-bottom: 0.25rem; font-weight: 600; font-size: 0.9rem; }
.form-group input, .form-group textarea {
    width: 100%;
    padding: 0.5rem 0.75rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 1rem;
    font-family: inherit;
}
.form-group textarea { min-height: 320px; font-family: "SF Mono", "Consolas", "Liberation Mono", monospace; font-size: 0.9rem; }
.form-group small { font-size: 0.8rem; color: var(--muted); }
.form-actions { display: flex; gap: 1rem; margin-top: 1.5rem; }
.suggested-tags { display: flex; flex-wrap: wrap; gap: 0.5rem; margin-top: 0.5rem; }
.suggested-tags button { font-size: 0.8rem; padding: 0.2rem 0.5rem; border: 1px dashed var(--base1); background: none; color: var(--link); border-radius: 3px; cursor: pointer; }

.login-form {
    max-width: 320px;
    margin: 4rem auto;
    padding: 2rem;
    background: var(--accent);
    border-radius: 8px;
}

.login-form h1 {
    margin-top: 0;
    margin-bottom: 1.5rem;
    text-align: center;
}

.login-form input {
    width: 100%;
    padding: 0.75rem;
    margin-bottom: 1rem;
    border: 1px solid var(--border);
    border-radius: 4px;
    background: var(--bg);
    color: var(--fg);
    font-size: 1rem;
}

.login-form button {
    width: 100%;
    padding: 0.75rem;
    background: var(--link);
    color: white;
    border: none;
    border-radius: 4px;
    font-size: 1rem;
    cursor: pointer;
}

.login-form button:hover { background: var(--link-hover); }
.login-form p { margin-top: 1rem; font-size: 0.85rem; text-align: center; }

.message {
    padding: 0.75rem 1rem;
    border-radius: 4px;
    margin-bottom: 1rem;
}
.message.error { background: #fdf2f2; color: var(--red); border: 1px solid var(--red); }

.hero { text-align: center; margin: 4rem 0; }
.hero h1 { font-size: 2rem; }
.hero p { margin: 1rem 0 2rem; }
.hero .btn { margin: 0 0.5rem; }
"#;
