//! Text helpers

use std::borrow::Cow;

/// Suffix appended by [`truncate`]
pub const DEFAULT_ELLIPSIS: &str = "...";

/// Truncate `text` to `total_chars` characters, appending `...` when cut.
pub fn truncate(text: &str, total_chars: usize) -> Cow<'_, str> {
    truncate_with(text, total_chars, DEFAULT_ELLIPSIS)
}

/// Truncate `text` to `total_chars` characters, appending `suffix` when cut.
///
/// Counts `char`s, so multi-byte characters are never split. The suffix is
/// not included in the budget.
pub fn truncate_with<'a>(text: &'a str, total_chars: usize, suffix: &str) -> Cow<'a, str> {
    match text.char_indices().nth(total_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + suffix.len());
            out.push_str(&text[..cut]);
            out.push_str(suffix);
            Cow::Owned(out)
        }
    }
}
