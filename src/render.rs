//! Text rendering of OTUs and key/value listings.

use crate::config::DISPLAY_SEPARATOR;
use crate::model::ClusterGroup;
use std::fmt::Display;
use std::io::{self, Write};

/// Something to print as one wrapped paragraph.
#[derive(Debug, Clone, Copy)]
pub enum Listing<'a, K, V> {
    /// Plain identifiers, e.g. the members of one OTU
    Flat(&'a [K]),
    /// Pairs printed as `key: value`
    Mapping(&'a [(K, V)]),
}

impl<'a, K: Display, V: Display> Listing<'a, K, V> {
    /// The unwrapped single-line text of the listing.
    pub fn to_line(&self) -> String {
        match self {
            Listing::Flat(items) => join_display(items.iter(), DISPLAY_SEPARATOR),
            Listing::Mapping(pairs) => join_display(
                pairs.iter().map(|(key, value)| format!("{}: {}", key, value)),
                DISPLAY_SEPARATOR,
            ),
        }
    }
}

fn join_display<I>(items: I, separator: &str) -> String
where
    I: Iterator,
    I::Item: Display,
{
    let mut out = String::new();
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&item.to_string());
    }
    out
}

/// Greedy word wrap at `width` columns.
///
/// Runs of whitespace collapse to one space. A word longer than `width` is
/// moved to its own line and split into `width`-sized pieces. Lines only
/// break on whitespace, never after a hyphen, so hyphenated identifiers such
/// as `a-b-c` stay whole.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed <= width {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len <= width {
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(width).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                lines.push(piece);
            } else {
                current_len = piece.chars().count();
                current = piece;
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Wrapped paragraph text, one trailing newline. Empty input yields `"\n"`.
///
/// Flat and mapping listings both end with the newline; the mothur tooling
/// this reader mirrors dropped it for flat listings.
pub fn fill(text: &str, width: usize) -> String {
    let mut out = wrap_words(text, width).join("\n");
    out.push('\n');
    out
}

/// Write a listing as a wrapped paragraph to `stream`.
pub fn write_listing<W, K, V>(
    listing: Listing<'_, K, V>,
    stream: &mut W,
    width: usize,
) -> io::Result<()>
where
    W: Write + ?Sized,
    K: Display,
    V: Display,
{
    stream.write_all(fill(&listing.to_line(), width).as_bytes())
}

/// A header line followed by one line per OTU, members joined by `", "`.
pub fn render_groups(header: &str, groups: &[ClusterGroup]) -> String {
    let mut out = String::with_capacity(header.len() + 1 + groups.len() * 16);
    out.push_str(header);
    out.push('\n');
    for group in groups {
        out.push_str(&group.join(DISPLAY_SEPARATOR));
        out.push('\n');
    }
    out
}
