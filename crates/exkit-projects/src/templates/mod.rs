//! Text rendering for scaffolded exercises.
//!
//! Two flavours of templating are used:
//! - `{var}` placeholders in short one-line strings from the config
//!   (generator arguments, manifest command lines), see [`substitute`]
//! - a Tera template for the exercise README, see [`ReadmeRenderer`]

pub mod readme;

pub use readme::{ReadmeContext, ReadmeRenderer, README_FILE};

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"));

/// Replace `{key}` placeholders with their values
///
/// Placeholders are resolved in a single pass over `template`, so braces
/// inside a substituted value are never expanded again. Unknown placeholders
/// are left untouched.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

/// Human readable title for a topic slug
///
/// Hyphens become spaces and the first character is upper-cased; the rest is
/// kept exactly as typed.
pub fn humanize_topic(topic: &str) -> String {
    let spaced = topic.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
