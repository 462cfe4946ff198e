//! HTML templates and styling for the notes application.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constant and theme
//! - `components` - Nav bar, messages, base template
//! - `forms` - Note editor and account forms
//! - `thinkable` - Collapsible rendering of `<think>` sections

mod components;
mod forms;
mod styles;
mod thinkable;

pub use components::{base_html, error_message, nav_bar};
pub use forms::{login_form, note_form, register_form, NoteFormValues};
pub use styles::STYLE;
pub use thinkable::{render_thinkable, HIDE_LABEL, SHOW_LABEL};
