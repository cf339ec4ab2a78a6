//! HTTP clients for the external services the app talks to.
//!
//! Each client owns its error enum; the variants carry the fixed
//! user-facing message and the raw cause is only ever logged. Callers
//! dispatch recovery affordances on the variant, not on message text.

pub mod alerts;
pub mod directory;
pub mod open_meteo;

/// Shorten a response body for log lines.
pub(crate) fn body_excerpt(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = body.char_indices().take_while(|(i, _)| *i < MAX).count();
        let prefix: String = body.chars().take(cut).collect();
        format!("{prefix}...")
    } else {
        body.to_string()
    }
}
