//! Interpretation of the catalog header block.
//!
//! Block 0 of a PO file carries no message id; its translation is a list of
//! `Key: Value` mime headers that configure the catalog (charset, plural
//! count, language) before any ordinary block is parsed.

use crate::error::Error;
use crate::types::Catalog;

use super::blocks::Block;
use super::machine::{self, BlockKind};

/// Header field names accepted in the header entry's translation lines.
pub const VALID_HEADER_KEYS: &[&str] = &[
    "Project-Id-Version",
    "Report-Msgid-Bugs-To",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Last-Translator",
    "Language-Team",
    "Language",
    "Plural-Forms",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Generated-By",
];

/// Separator between a header field name and its value.
pub const HEADER_SEPARATOR: char = ':';

/// Marker whose presence anywhere in the raw header block flags the whole
/// catalog as fuzzy.
const FUZZY_MARKER: &str = ", fuzzy";

/// Parses `block` as the catalog header and configures `catalog` with the
/// extracted metadata. The catalog is untouched when the block fails to
/// parse.
pub fn apply_header(block: &Block, catalog: &mut Catalog) -> Result<(), Error> {
    let message = machine::process_block(block, BlockKind::Header, catalog.num_plurals())?;

    let header_text = message.value.as_singular().unwrap_or_default().to_string();
    let pairs = parse_header_msgstr(&header_text);

    let charset = pairs
        .iter()
        .find(|(key, _)| key == "Content-Type")
        .and_then(|(_, value)| value.split_once("charset="))
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_else(|| "utf-8".to_string());

    catalog.set_mime_headers(pairs);
    catalog.metadata.charset = charset;
    catalog.fuzzy = block.text.contains(FUZZY_MARKER);
    Ok(())
}

/// Splits an accumulated header translation into `(key, value)` pairs, one
/// per line, on the first separator. Lines without a separator are skipped.
pub fn parse_header_msgstr(header: &str) -> Vec<(String, String)> {
    header
        .lines()
        .filter_map(|line| {
            line.trim()
                .split_once(HEADER_SEPARATOR)
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
