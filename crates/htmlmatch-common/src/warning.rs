//! Diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! The tokenizer reports recoverable parse errors here; the command-line tool
//! reports unusual but non-fatal input.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;
use strum_macros::{Display, EnumString};

/// The part of the pipeline a warning originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Component {
    /// The HTML tokenizer.
    #[strum(serialize = "HTML Tokenizer")]
    Tokenizer,
    /// The verbatim tree builder.
    #[strum(serialize = "Verbatim Builder")]
    Builder,
    /// The `htmlmatch` command-line tool.
    #[strum(serialize = "CLI")]
    Cli,
}

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: Component, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once(Component::Tokenizer, "unexpected-null-character parse error in Data state");
/// ```
pub fn warn_once(component: Component, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print {
        eprintln!("{}", format!("[htmlmatch {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if this exact warning has been printed since the last
/// [`clear_warnings`].
#[must_use]
pub fn was_warned(component: Component, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
