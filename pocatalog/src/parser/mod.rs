//! PO file parsing.
//!
//! Raw content is segmented into blank-line-delimited blocks; block 0 is
//! interpreted as the catalog header, fixing the charset and the expected
//! plural count; the remaining blocks run through the entry state machine,
//! sequentially or across parallel workers. The populated [`Catalog`] plus
//! any collected diagnostics come back to the caller.

pub mod blocks;
pub mod header;
pub mod machine;
mod schedule;
pub mod token;

use std::io::{BufRead, Read};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;
use lazy_static::lazy_static;
use regex::bytes;
use tracing::debug;

use crate::error::{Diagnostic, Error};
use crate::options::ParseOptions;
use crate::traits::Parser;
use crate::types::Catalog;

pub use blocks::{Block, split_into_blocks};

lazy_static! {
    static ref CONTENT_TYPE_CHARSET_PATTERN: bytes::Regex =
        bytes::Regex::new(r"Content-Type: [^;]+; charset=([^\r\n]+)").unwrap();
}

/// Parses decoded PO content into the given default catalog.
///
/// The header block is parsed and applied first; the entry blocks that
/// follow are validated against the plural count it established. Returns
/// the populated catalog together with the diagnostics collected under the
/// keep-going policy (always empty under abort-on-invalid). Content with no
/// blocks yields the default catalog unchanged.
pub fn parse_str_into(
    content: &str,
    options: &ParseOptions,
    mut catalog: Catalog,
) -> Result<(Catalog, Vec<Diagnostic>), Error> {
    let blocks = split_into_blocks(content);
    if blocks.is_empty() {
        return Ok((catalog, Vec::new()));
    }

    let mut diagnostics = Vec::new();

    // The header fixes the expected plural count, so it is applied strictly
    // before any entry block is parsed.
    if let Err(error) = header::apply_header(&blocks[0], &mut catalog) {
        if options.abort_on_invalid {
            return Err(error);
        }
        diagnostics.push(Diagnostic::from_error(&error));
    }

    let num_plurals = catalog.num_plurals();
    debug!(
        blocks = blocks.len() - 1,
        num_plurals, "parsing entry blocks"
    );

    let (messages, mut entry_diagnostics) =
        schedule::run(&blocks[1..], options, num_plurals)?;
    diagnostics.append(&mut entry_diagnostics);

    for message in messages {
        if message.obsolete {
            if !options.ignore_obsolete {
                catalog.add_obsolete(message);
            }
        } else {
            catalog.add_message(message);
        }
    }

    Ok((catalog, diagnostics))
}

/// Parses decoded PO content into a default catalog, reporting collected
/// diagnostics on stderr (unless suppressed by the options).
pub fn parse_str(content: &str, options: &ParseOptions) -> Result<Catalog, Error> {
    let (catalog, diagnostics) = parse_str_into(content, options, Catalog::new())?;
    if options.print_diagnostics {
        report_diagnostics(&diagnostics);
    }
    Ok(catalog)
}

/// Parses raw file bytes: sniffs the declared charset, decodes (with lossy
/// replacement of invalid sequences), and parses the text.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Result<Catalog, Error> {
    let content = decode(bytes)?;
    parse_str(&content, options)
}

/// Loads and parses a PO file from disk.
pub fn load<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Catalog, Error> {
    let (catalog, diagnostics) = load_into(path, options, Catalog::new())?;
    if options.print_diagnostics {
        report_diagnostics(&diagnostics);
    }
    Ok(catalog)
}

/// Loads and parses a PO file from disk into the given default catalog,
/// returning the collected diagnostics to the caller.
pub fn load_into<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
    catalog: Catalog,
) -> Result<(Catalog, Vec<Diagnostic>), Error> {
    let raw = std::fs::read(path).map_err(Error::Io)?;
    let content = decode(&raw)?;
    parse_str_into(&content, options, catalog)
}

/// Extracts the charset a PO file declares in its raw bytes, defaulting to
/// `utf-8`. The scan works on undecoded bytes so it can run before the
/// decode it informs.
pub fn detect_charset(content: &[u8]) -> String {
    CONTENT_TYPE_CHARSET_PATTERN
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|charset| {
            // The raw match carries the escaped `\n"` tail of the header line.
            String::from_utf8_lossy(charset.as_bytes())
                .trim_matches(|c| matches!(c, '\\' | 'n' | '"'))
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "utf-8".to_string())
}

fn decode(raw: &[u8]) -> Result<String, Error> {
    let label = detect_charset(raw);
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8);
    debug!(charset = %encoding.name(), "decoding catalog content");

    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(raw);
    let mut content = String::new();
    decoder.read_to_string(&mut content).map_err(Error::Io)?;
    Ok(content)
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("Errors encountered:");
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

impl Parser for Catalog {
    /// Parse from any reader, with default options.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(Error::Io)?;
        parse_str(&content, &ParseOptions::default())
    }

    /// Parse from raw bytes, honoring the declared charset.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        parse_bytes(bytes, &ParseOptions::default())
    }

    /// Parse from a file path, honoring the declared charset.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load(path, &ParseOptions::default())
    }
}
