//! Markup fragment helpers
//!
//! Template strings are handed over as raw HTML. [`first_node`] extracts the
//! first top-level node so callers can mount a single element built from a
//! template. It is a scanner, not an HTML parser: it balances tags by name
//! and knows the void elements, nothing more.

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A top-level node borrowed from the source fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    /// An element, including its start tag, children and end tag
    Element { tag: &'a str, outer: &'a str },
    /// A run of text up to the next tag
    Text(&'a str),
    /// Comment contents without the `<!--` / `-->` delimiters
    Comment(&'a str),
}

impl<'a> Node<'a> {
    /// Tag name for elements
    pub fn tag(&self) -> Option<&'a str> {
        match *self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }
}

/// Return the first top-level node of `markup` after trimming whitespace.
///
/// An element whose end tag is missing runs to the end of the input.
pub fn first_node(markup: &str) -> Option<Node<'_>> {
    let src = markup.trim();
    if src.is_empty() {
        return None;
    }

    if let Some(rest) = src.strip_prefix("<!--") {
        let inner = rest.find("-->").map_or(rest, |end| &rest[..end]);
        return Some(Node::Comment(inner));
    }

    if let Some(tag) = start_tag_name(src, 0) {
        return Some(element(src, tag));
    }

    let end = text_end(src, 0);
    Some(Node::Text(&src[..end]))
}

fn element<'a>(src: &'a str, tag: &'a str) -> Node<'a> {
    let Some(open_end) = tag_end(src, 0) else {
        return Node::Element { tag, outer: src };
    };

    let self_closing = src[..open_end].ends_with("/>");
    if self_closing || is_void(tag) {
        return Node::Element {
            tag,
            outer: &src[..open_end],
        };
    }

    let mut depth = 1usize;
    let mut pos = open_end;
    while let Some(offset) = src[pos..].find('<') {
        let lt = pos + offset;
        let rest = &src[lt..];

        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => {
                    pos = lt + end + 3;
                    continue;
                }
                None => break,
            }
        }

        if let Some(name) = end_tag_name(src, lt) {
            let close_end = tag_end(src, lt).unwrap_or(src.len());
            if name.eq_ignore_ascii_case(tag) {
                depth -= 1;
                if depth == 0 {
                    return Node::Element {
                        tag,
                        outer: &src[..close_end],
                    };
                }
            }
            pos = close_end;
            continue;
        }

        if let Some(name) = start_tag_name(src, lt) {
            let Some(inner_end) = tag_end(src, lt) else {
                break;
            };
            if name.eq_ignore_ascii_case(tag) && !src[..inner_end].ends_with("/>") {
                depth += 1;
            }
            pos = inner_end;
            continue;
        }

        pos = lt + 1;
    }

    Node::Element { tag, outer: src }
}

/// Name of a start tag beginning at `at`, e.g. `div` for `<div class="x">`
fn start_tag_name(src: &str, at: usize) -> Option<&str> {
    let rest = src[at..].strip_prefix('<')?;
    tag_name(rest)
}

/// Name of an end tag beginning at `at`, e.g. `div` for `</div>`
fn end_tag_name(src: &str, at: usize) -> Option<&str> {
    let rest = src[at..].strip_prefix("</")?;
    tag_name(rest)
}

fn tag_name(rest: &str) -> Option<&str> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(rest.len());
    let after = rest[len..].chars().next();
    match after {
        None | Some('>') | Some('/') => Some(&rest[..len]),
        Some(c) if c.is_whitespace() => Some(&rest[..len]),
        _ => None,
    }
}

/// Byte index just past the `>` closing the tag that starts at `at`.
/// Quoted attribute values may contain `>`.
fn tag_end(src: &str, at: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in src[at..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(at + i + 1),
            _ => {}
        }
    }
    None
}

/// End of a text run: the next `<` that opens a tag, end tag or comment
fn text_end(src: &str, from: usize) -> usize {
    let mut pos = from;
    while let Some(offset) = src[pos..].find('<') {
        let lt = pos + offset;
        if src[lt..].starts_with("<!--")
            || start_tag_name(src, lt).is_some()
            || end_tag_name(src, lt).is_some()
        {
            return lt;
        }
        pos = lt + 1;
    }
    src.len()
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}
