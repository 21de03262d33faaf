//! Server-side HTML rendering.

pub mod card;
pub mod page;

use std::borrow::Cow;

/// Escape for element content.
fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape for a double-quoted attribute value.
fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
