//! Manifest header extraction.
//!
//! Manifests are `key: value` lines with RFC 822 style folding: a line that
//! starts with a single space continues the previous header.
//!
//! ```text
//! Manifest-Version: 1.0
//! Export-Package: util.io;version="1.0.0",util.net;ver
//!  sion="1.2.0"
//! Import-Package: log.api;version="[1.0,2.0)"
//! ```

/// Header listing the packages a bundle provides.
pub const EXPORT_PACKAGE: &str = "Export-Package";

/// Header listing the packages a bundle requires.
pub const IMPORT_PACKAGE: &str = "Import-Package";

/// Extract the comma-separated entries of one header.
///
/// The header must start a line, so `Import-Package` never matches inside
/// `DynamicImport-Package`. Folded continuation lines are joined with their
/// leading space removed; the first line without a leading space ends the
/// header. Entries are split on commas outside double quotes (interval
/// versions carry a comma) and have every space removed.
///
/// Returns an empty list when the header is missing, or when it appears on
/// more than one line and is therefore ambiguous.
pub fn header_entries(manifest: &str, header: &str) -> Vec<String> {
    let prefix = format!("{header}:");
    let lines: Vec<&str> = manifest.lines().collect();

    let mut starts = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(&prefix))
        .map(|(idx, _)| idx);

    let start = match (starts.next(), starts.next()) {
        (Some(start), None) => start,
        (None, _) => return Vec::new(),
        (Some(_), Some(_)) => {
            tracing::warn!(header, "header declared more than once, ignoring it");
            return Vec::new();
        }
    };

    let mut value = lines[start][prefix.len()..].to_string();
    for line in &lines[start + 1..] {
        match line.strip_prefix(' ') {
            Some(continuation) => value.push_str(continuation),
            None => break,
        }
    }

    split_unquoted(&value, ',')
        .into_iter()
        .map(|entry| entry.replace(' ', "").trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Split on `separator` wherever it is not inside a double-quoted span.
pub(crate) fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == separator && !in_quotes {
            parts.push(&text[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}
