//! The per-block entry state machine.
//!
//! One [`process_block`] run consumes the classified lines of a single
//! block in order, accumulating field values into a [`MessageBuilder`] and
//! rejecting tokens that are illegal in the current state. Comments are
//! legal everywhere and dispatch before the transition step. At block end
//! the final state must be terminal for the block kind, and plural messages
//! must provide exactly the expected number of forms.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::types::{Location, Message, Plural, Translation};

use super::blocks::Block;
use super::header::{HEADER_SEPARATOR, VALID_HEADER_KEYS};
use super::token::{CommentKind, State, Token};

lazy_static! {
    static ref MSGSTR_INDEX_PATTERN: Regex =
        Regex::new(r#"^msgstr\[(\d+)\]\s+"(.*)""#).unwrap();
    static ref UNESCAPE_PATTERN: Regex = Regex::new(r#"\\([\\trn"])"#).unwrap();
}

const LEN_MSGCTXT: usize = "msgctxt".len();
const LEN_MSGID: usize = "msgid".len();
const LEN_MSGID_PLURAL: usize = "msgid_plural".len();
const LEN_MSGSTR: usize = "msgstr".len();

const OBSOLETE_MARKER: &str = "#~";

/// Flags recognized in `#,` comment lines.
pub const RECOGNIZED_FLAGS: &[&str] = &[
    "fuzzy",
    "awk-format",
    "no-awk-format",
    "boost-format",
    "no-boost-format",
    "c-format",
    "no-c-format",
    "c++-format",
    "no-c++-format",
    "csharp-format",
    "no-csharp-format",
    "elisp-format",
    "no-elisp-format",
    "gcc-internal-format",
    "no-gcc-internal-format",
    "gfc-internal-format",
    "no-gfc-internal-format",
    "java-format",
    "no-java-format",
    "no-java-printf-format",
    "javascript-format",
    "no-javascript-format",
    "kde-format",
    "no-kde-format",
    "librep-format",
    "no-librep-format",
    "lisp-format",
    "no-lisp-format",
    "lua-format",
    "no-lua-format",
    "objc-format",
    "no-objc-format",
    "object-pascal-format",
    "no-object-pascal-format",
    "perl-format",
    "no-perl-format",
    "perl-brace-format",
    "no-perl-brace-format",
    "php-format",
    "no-php-format",
    "python-format",
    "no-python-format",
    "no-python-brace-format",
    "qt-format",
    "no-qt-format",
    "qt-plural-format",
    "ruby-format",
    "no-ruby-format",
    "rust-format",
    "no-rust-format",
    "scheme-format",
    "no-scheme-format",
    "sh-format",
    "no-sh-format",
    "smalltalk-format",
    "no-smalltalk-format",
    "tcl-format",
    "no-tcl-format",
    "ycp-format",
    "no-ycp-format",
];

/// Which kind of block a machine run is processing. The header block
/// accepts different terminal states and validates its translation lines
/// as `Key: Value` header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Entry,
}

/// Reverses PO string escaping (`\\`, `\"`, `\t`, `\r`, `\n`).
pub fn unescape(string: &str) -> String {
    if !string.contains('\\') {
        return string.to_string();
    }
    UNESCAPE_PATTERN
        .replace_all(string, |captures: &regex::Captures| {
            match &captures[1] {
                "n" => "\n",
                "t" => "\t",
                "r" => "\r",
                other => other, // `\\` and `\"`
            }
            .to_string()
        })
        .into_owned()
}

/// Extracts and unescapes the quoted value following a field keyword.
/// A value that is not fully quoted contributes the empty string.
fn extract_quoted_value(line: &str, prefix_len: usize) -> String {
    let value = line[prefix_len..].trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        unescape(&value[1..value.len() - 1])
    } else {
        String::new()
    }
}

/// The entry-in-progress accumulator for one block. Never shared between
/// machine runs.
#[derive(Debug, Default)]
struct MessageBuilder {
    context: Option<String>,
    id: Option<String>,
    plural_id: Option<String>,
    translation: String,
    plural_translations: BTreeMap<usize, String>,
    locations: Vec<Location>,
    flags: Vec<String>,
    auto_comments: Vec<String>,
    user_comments: Vec<String>,
    previous: Vec<(String, String)>,
    lineno: Option<usize>,
    obsolete: bool,
    /// Index the last `msgstr[N]` line named; continuations append there.
    active_plural_index: Option<usize>,
}

impl MessageBuilder {
    fn set_context(&mut self, line: &str) {
        self.context = Some(extract_quoted_value(line, LEN_MSGCTXT));
    }

    fn set_id(&mut self, line: &str, lineno: usize) {
        if self.id.is_none() {
            self.lineno = Some(lineno);
        }
        self.id = Some(extract_quoted_value(line, LEN_MSGID));
    }

    fn set_plural_id(&mut self, line: &str) {
        self.plural_id = Some(extract_quoted_value(line, LEN_MSGID_PLURAL));
    }

    fn set_translation(&mut self, line: &str) {
        self.translation = extract_quoted_value(line, LEN_MSGSTR);
    }

    /// Records an indexed plural translation from a `msgstr[N] "value"`
    /// line. A line failing the pattern records nothing.
    fn set_indexed_translation(&mut self, line: &str) {
        if let Some(captures) = MSGSTR_INDEX_PATTERN.captures(line) {
            if let Ok(index) = captures[1].parse::<usize>() {
                self.plural_translations
                    .insert(index, unescape(&captures[2]));
                self.active_plural_index = Some(index);
            }
        }
    }

    fn finish(self, num_plurals: usize) -> Result<Message, Error> {
        let MessageBuilder {
            context,
            id,
            plural_id,
            translation,
            plural_translations,
            locations,
            flags,
            auto_comments,
            user_comments,
            previous,
            lineno,
            obsolete,
            ..
        } = self;

        let value = match plural_id {
            Some(plural_id) if !plural_id.is_empty() => {
                let found: Vec<usize> = plural_translations.keys().copied().collect();
                let expected: Vec<usize> = (0..num_plurals).collect();
                if found != expected {
                    return Err(Error::PluralForms {
                        line: lineno.unwrap_or(0),
                        expected: num_plurals,
                        found,
                        text: id.unwrap_or_default(),
                    });
                }
                match Plural::new(&plural_id, plural_translations) {
                    Some(plural) => Translation::Plural(plural),
                    None => Translation::Singular(translation),
                }
            }
            _ => Translation::Singular(translation),
        };

        Ok(Message {
            id: id.unwrap_or_default(),
            context,
            value,
            locations,
            flags,
            auto_comments,
            user_comments,
            previous,
            lineno,
            obsolete,
        })
    }
}

/// Runs the state machine over one block and produces the finished message.
///
/// `num_plurals` is the plural count the catalog header declared; it drives
/// the plural-completeness check and must therefore be fixed before any
/// ordinary block is processed.
pub fn process_block(
    block: &Block,
    kind: BlockKind,
    num_plurals: usize,
) -> Result<Message, Error> {
    let mut state = State::Initial;
    let mut builder = MessageBuilder::default();
    let mut last_line = block.start_line;
    let mut last_text = "";

    for (offset, raw_line) in block.text.lines().enumerate() {
        let lineno = block.start_line + offset;
        let line = raw_line.trim();
        assert!(
            !line.is_empty(),
            "blank line inside a block at line {lineno}; the splitter must not produce these"
        );
        last_line = lineno;
        last_text = line;

        let token = Token::classify(line).ok_or_else(|| Error::UnrecognizedLine {
            line: lineno,
            text: line.to_string(),
        })?;

        // Comments are legal in every state and never change it.
        if let Token::Comment(comment_kind) = token {
            handle_comment(comment_kind, line, lineno, &mut builder)?;
            continue;
        }

        state = step(state, token, kind, line, lineno, &mut builder)?;
    }

    check_terminal(state, kind, &builder, last_line, last_text)?;
    builder.finish(num_plurals)
}

/// The transition table: every (state, token) pair not listed here is a
/// grammar error.
fn step(
    state: State,
    token: Token,
    kind: BlockKind,
    line: &str,
    lineno: usize,
    builder: &mut MessageBuilder,
) -> Result<State, Error> {
    match (state, token) {
        (State::Initial, Token::Msgctxt) => {
            builder.set_context(line);
            Ok(State::Msgctxt)
        }
        (State::Initial, Token::Msgid) | (State::Msgctxt, Token::Msgid) => {
            builder.set_id(line, lineno);
            Ok(State::Msgid)
        }
        (State::Msgid, Token::MsgidPlural) => {
            builder.set_plural_id(line);
            Ok(State::MsgidPlural)
        }
        (State::Msgid, Token::Msgstr) => {
            builder.set_translation(line);
            Ok(State::Msgstr)
        }
        (State::Msgid, Token::MsgstrIndex)
        | (State::MsgidPlural, Token::MsgstrIndex)
        | (State::MsgstrIndex, Token::MsgstrIndex) => {
            builder.set_indexed_translation(line);
            Ok(State::MsgstrIndex)
        }
        (State::Msgid, Token::Continuation)
        | (State::MsgidPlural, Token::Continuation)
        | (State::Msgstr, Token::Continuation)
        | (State::MsgstrIndex, Token::Continuation) => {
            continuation(state, kind, line, lineno, builder)?;
            Ok(state)
        }

        (State::Initial, Token::ObsoleteMsgctxt) => {
            builder.set_context(obsolete_rest(line));
            builder.obsolete = true;
            Ok(State::ObsoleteMsgctxt)
        }
        (State::Initial, Token::ObsoleteMsgid)
        | (State::ObsoleteMsgctxt, Token::ObsoleteMsgid) => {
            builder.set_id(obsolete_rest(line), lineno);
            builder.obsolete = true;
            Ok(State::ObsoleteMsgid)
        }
        (State::Initial, Token::ObsoleteMsgidPlural)
        | (State::ObsoleteMsgid, Token::ObsoleteMsgidPlural) => {
            builder.set_plural_id(obsolete_rest(line));
            builder.obsolete = true;
            Ok(State::ObsoleteMsgidPlural)
        }
        (State::ObsoleteMsgid, Token::ObsoleteMsgstr)
        | (State::ObsoleteMsgidPlural, Token::ObsoleteMsgstr) => {
            builder.set_translation(obsolete_rest(line));
            builder.obsolete = true;
            Ok(State::ObsoleteMsgstr)
        }
        (State::Initial, Token::ObsoleteMsgstrIndex)
        | (State::ObsoleteMsgid, Token::ObsoleteMsgstrIndex)
        | (State::ObsoleteMsgidPlural, Token::ObsoleteMsgstrIndex)
        | (State::ObsoleteMsgstrIndex, Token::ObsoleteMsgstrIndex) => {
            builder.set_indexed_translation(obsolete_rest(line));
            builder.obsolete = true;
            Ok(State::ObsoleteMsgstrIndex)
        }
        (State::ObsoleteMsgctxt, Token::Continuation)
        | (State::ObsoleteMsgid, Token::Continuation)
        | (State::ObsoleteMsgidPlural, Token::Continuation)
        | (State::ObsoleteMsgstr, Token::Continuation)
        | (State::ObsoleteMsgstrIndex, Token::Continuation) => {
            continuation(state, kind, line, lineno, builder)?;
            Ok(state)
        }

        (_, Token::Continuation) => Err(Error::ContinuationWithoutField {
            line: lineno,
            text: line.to_string(),
        }),
        (state, token) => Err(Error::UnexpectedToken {
            token: token.name(),
            state: state.name(),
            line: lineno,
            text: line.to_string(),
        }),
    }
}

/// Strips the `#~` marker from an obsolete field line.
fn obsolete_rest(line: &str) -> &str {
    line.strip_prefix(OBSOLETE_MARKER).unwrap_or(line).trim_start()
}

/// Appends a continuation line's value to the field the current state
/// names. Continuations must be fully quoted; inside the header block,
/// translation continuations must form valid `Key: Value` header fields.
fn continuation(
    state: State,
    kind: BlockKind,
    line: &str,
    lineno: usize,
    builder: &mut MessageBuilder,
) -> Result<(), Error> {
    let stripped = obsolete_rest(line);
    if !(stripped.len() >= 2 && stripped.starts_with('"') && stripped.ends_with('"')) {
        return Err(Error::MalformedContinuation {
            line: lineno,
            text: line.to_string(),
        });
    }
    let value = unescape(&stripped[1..stripped.len() - 1]);

    match state {
        State::Msgctxt | State::ObsoleteMsgctxt => {
            builder.context.get_or_insert_with(String::new).push_str(&value);
        }
        State::Msgid | State::ObsoleteMsgid => {
            builder.id.get_or_insert_with(String::new).push_str(&value);
        }
        State::MsgidPlural | State::ObsoleteMsgidPlural => {
            builder
                .plural_id
                .get_or_insert_with(String::new)
                .push_str(&value);
        }
        State::Msgstr | State::ObsoleteMsgstr => {
            if kind == BlockKind::Header {
                validate_header_field(&value, lineno, line)?;
            }
            builder.translation.push_str(&value);
        }
        State::MsgstrIndex | State::ObsoleteMsgstrIndex => {
            match builder.active_plural_index {
                Some(index) => {
                    builder
                        .plural_translations
                        .entry(index)
                        .or_default()
                        .push_str(&value);
                }
                None => {
                    return Err(Error::ContinuationWithoutField {
                        line: lineno,
                        text: line.to_string(),
                    });
                }
            }
        }
        State::Initial => {
            return Err(Error::ContinuationWithoutField {
                line: lineno,
                text: line.to_string(),
            });
        }
    }
    Ok(())
}

/// Checks that a header-block translation line is a `Key: Value` pair with
/// a recognized key.
fn validate_header_field(value: &str, lineno: usize, line: &str) -> Result<(), Error> {
    match value.split_once(HEADER_SEPARATOR) {
        Some((key, _)) if VALID_HEADER_KEYS.contains(&key) => Ok(()),
        Some((key, _)) => Err(Error::HeaderField {
            detail: format!("{key:?} is not a valid header field name"),
            line: lineno,
            text: line.to_string(),
        }),
        None => Err(Error::HeaderField {
            detail: format!("missing {HEADER_SEPARATOR:?} separator"),
            line: lineno,
            text: line.to_string(),
        }),
    }
}

/// Verifies the block ended in a state that is terminal for its kind.
fn check_terminal(
    state: State,
    kind: BlockKind,
    builder: &MessageBuilder,
    last_line: usize,
    last_text: &str,
) -> Result<(), Error> {
    let terminal = match kind {
        BlockKind::Header => matches!(state, State::Msgid | State::Msgstr),
        BlockKind::Entry => {
            matches!(state, State::Msgstr | State::MsgstrIndex) || state.is_obsolete()
        }
    };
    if terminal {
        return Ok(());
    }
    if builder.id.is_some() && matches!(state, State::Msgid | State::MsgidPlural) {
        return Err(Error::MissingTranslation {
            line: last_line,
            text: last_text.to_string(),
        });
    }
    Err(Error::IncompleteEntry {
        state: state.name(),
        line: last_line,
        text: last_text.to_string(),
    })
}

/// Dispatches a comment line to the handler for its subkind. Comments never
/// change the machine state.
fn handle_comment(
    kind: CommentKind,
    line: &str,
    lineno: usize,
    builder: &mut MessageBuilder,
) -> Result<(), Error> {
    match kind {
        CommentKind::Location => {
            for reference in line[2..].trim().split_whitespace() {
                match reference.rsplit_once(':') {
                    // A malformed line number is kept as a location with no
                    // line number, not reported as an error.
                    Some((file, lineno_text)) => builder
                        .locations
                        .push((file.to_string(), lineno_text.parse().ok())),
                    None => builder.locations.push((reference.to_string(), None)),
                }
            }
        }
        CommentKind::Flags => {
            for flag in line[2..].split(',') {
                let flag = flag.trim();
                if flag.is_empty() {
                    continue;
                }
                if !RECOGNIZED_FLAGS.contains(&flag) {
                    return Err(Error::UnrecognizedFlag {
                        flag: flag.to_string(),
                        line: lineno,
                        text: line.to_string(),
                    });
                }
                builder.flags.push(flag.to_string());
            }
        }
        CommentKind::Auto => {
            builder.auto_comments.push(line[2..].trim().to_string());
        }
        CommentKind::Previous => {
            let rest = line[2..].trim();
            let marker = ["msgid_plural", "msgstr_plural", "msgctxt", "msgid", "msgstr"]
                .iter()
                .find(|marker| rest.starts_with(**marker));
            match marker {
                Some(marker) => builder
                    .previous
                    .push((marker.to_string(), rest[marker.len()..].trim().to_string())),
                None => builder
                    .previous
                    .push(("unknown".to_string(), rest.to_string())),
            }
        }
        CommentKind::User => {
            builder.user_comments.push(line[1..].trim().to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> Block {
        Block {
            start_line: 1,
            text: text.to_string(),
        }
    }

    fn entry(text: &str) -> Result<Message, Error> {
        process_block(&block(text), BlockKind::Entry, 2)
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"a\tb\rc"), "a\tb\rc");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_extract_quoted_value() {
        assert_eq!(extract_quoted_value("msgid \"hello\"", LEN_MSGID), "hello");
        assert_eq!(extract_quoted_value("msgid \"\"", LEN_MSGID), "");
        // not fully quoted -> empty
        assert_eq!(extract_quoted_value("msgid hello", LEN_MSGID), "");
        assert_eq!(
            extract_quoted_value("msgid \"a\\nb\"", LEN_MSGID),
            "a\nb"
        );
    }

    #[test]
    fn test_minimal_entry() {
        let message = entry("msgid \"x\"\nmsgstr \"y\"").unwrap();
        assert_eq!(message.id, "x");
        assert_eq!(message.value, Translation::Singular("y".to_string()));
        assert!(message.locations.is_empty());
        assert!(message.flags.is_empty());
        assert!(message.user_comments.is_empty());
        assert_eq!(message.lineno, Some(1));
        assert!(!message.obsolete);
    }

    #[test]
    fn test_continuation_accumulates() {
        let message = entry("msgid \"\"\n\"ab\"\n\"cd\"\nmsgstr \"x\"").unwrap();
        assert_eq!(message.id, "abcd");
    }

    #[test]
    fn test_context_entry() {
        let message = entry("msgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Öffnen\"").unwrap();
        assert_eq!(message.context.as_deref(), Some("menu"));
        assert_eq!(message.id, "Open");
    }

    #[test]
    fn test_plural_entry_complete() {
        let message = entry(
            "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"Datei\"\nmsgstr[1] \"Dateien\"",
        )
        .unwrap();
        match message.value {
            Translation::Plural(plural) => {
                assert_eq!(plural.id, "files");
                assert_eq!(plural.forms, vec!["Datei", "Dateien"]);
            }
            Translation::Singular(_) => panic!("expected plural translation"),
        }
    }

    #[test]
    fn test_plural_entry_incomplete() {
        let err = entry("msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"Datei\"")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PluralForms {
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_plural_entry_gap_in_indexes() {
        let err = entry(
            "msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"a\"\nmsgstr[2] \"b\"",
        )
        .unwrap_err();
        assert!(matches!(err, Error::PluralForms { .. }));
    }

    #[test]
    fn test_plural_continuation_appends_to_active_index() {
        let message = entry(
            "msgid \"f\"\nmsgid_plural \"fs\"\nmsgstr[0] \"a\"\n\"b\"\nmsgstr[1] \"c\"",
        )
        .unwrap();
        match message.value {
            Translation::Plural(plural) => assert_eq!(plural.forms, vec!["ab", "c"]),
            Translation::Singular(_) => panic!("expected plural translation"),
        }
    }

    #[test]
    fn test_obsolete_entry() {
        let message = entry("#~ msgid \"old\"\n#~ msgstr \"alt\"").unwrap();
        assert!(message.obsolete);
        assert_eq!(message.id, "old");
        assert_eq!(message.value, Translation::Singular("alt".to_string()));
    }

    #[test]
    fn test_obsolete_plural_entry() {
        let message = entry(
            "#~ msgid \"f\"\n#~ msgid_plural \"fs\"\n#~ msgstr[0] \"a\"\n#~ msgstr[1] \"b\"",
        )
        .unwrap();
        assert!(message.obsolete);
        match message.value {
            Translation::Plural(plural) => assert_eq!(plural.forms, vec!["a", "b"]),
            Translation::Singular(_) => panic!("expected plural translation"),
        }
    }

    #[test]
    fn test_obsolete_continuation() {
        let message = entry("#~ msgid \"o\"\n#~ \"ld\"\n#~ msgstr \"x\"").unwrap();
        assert_eq!(message.id, "old");
    }

    #[test]
    fn test_normal_entry_is_not_obsolete() {
        let message = entry("msgid \"a\"\nmsgstr \"b\"").unwrap();
        assert!(!message.obsolete);
    }

    #[test]
    fn test_locations_comment() {
        let message = entry("#: a.py:10 b.py\nmsgid \"x\"\nmsgstr \"y\"").unwrap();
        assert_eq!(
            message.locations,
            vec![("a.py".to_string(), Some(10)), ("b.py".to_string(), None)]
        );
    }

    #[test]
    fn test_malformed_location_lineno_is_lenient() {
        let message = entry("#: a.py:xx\nmsgid \"x\"\nmsgstr \"y\"").unwrap();
        assert_eq!(message.locations, vec![("a.py".to_string(), None)]);
    }

    #[test]
    fn test_flags_comment() {
        let message = entry("#, fuzzy, c-format\nmsgid \"x\"\nmsgstr \"y\"").unwrap();
        assert_eq!(message.flags, vec!["fuzzy", "c-format"]);
        assert!(message.is_fuzzy());
    }

    #[test]
    fn test_unrecognized_flag_is_fatal() {
        let err = entry("#, not-a-flag\nmsgid \"x\"\nmsgstr \"y\"").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFlag { .. }));
    }

    #[test]
    fn test_auto_and_user_comments() {
        let message =
            entry("#. extracted note\n# translator note\nmsgid \"x\"\nmsgstr \"y\"").unwrap();
        assert_eq!(message.auto_comments, vec!["extracted note"]);
        assert_eq!(message.user_comments, vec!["translator note"]);
    }

    #[test]
    fn test_previous_field_comments() {
        let message = entry(
            "#| msgctxt \"old ctx\"\n#| msgid \"old id\"\n#| something else\nmsgid \"x\"\nmsgstr \"y\"",
        )
        .unwrap();
        assert_eq!(
            message.previous,
            vec![
                ("msgctxt".to_string(), "\"old ctx\"".to_string()),
                ("msgid".to_string(), "\"old id\"".to_string()),
                ("unknown".to_string(), "something else".to_string()),
            ]
        );
    }

    #[test]
    fn test_unrecognized_line_error() {
        let err = entry("garbage\nmsgid \"x\"\nmsgstr \"y\"").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedLine { line: 1, .. }));
    }

    #[test]
    fn test_grammar_error_msgstr_first() {
        let err = entry("msgstr \"y\"").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_grammar_error_double_msgctxt() {
        let err = entry("msgctxt \"a\"\nmsgctxt \"b\"").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_continuation_after_msgctxt_is_grammar_error() {
        // the active msgctxt state accepts no continuation lines
        let err = entry("msgctxt \"a\"\n\"b\"").unwrap_err();
        assert!(matches!(err, Error::ContinuationWithoutField { .. }));
    }

    #[test]
    fn test_malformed_continuation() {
        let err = entry("msgid \"x\"\nmsgstr \"\"\n\"unterminated").unwrap_err();
        assert!(matches!(err, Error::MalformedContinuation { line: 3, .. }));
    }

    #[test]
    fn test_missing_translation_error() {
        let err = entry("msgid \"x\"").unwrap_err();
        assert!(matches!(err, Error::MissingTranslation { .. }));
    }

    #[test]
    fn test_incomplete_entry_error() {
        let err = entry("# only a comment").unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteEntry {
                state: "INITIAL",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_plural_id_falls_back_to_singular() {
        let message = entry("msgid \"x\"\nmsgid_plural \"\"\nmsgstr[0] \"a\"\nmsgstr[1] \"b\"")
            .unwrap();
        assert!(matches!(message.value, Translation::Singular(_)));
    }

    #[test]
    fn test_msgstr_index_pattern_miss_is_silent() {
        // missing space between `]` and the quote fails the pattern; the
        // line records nothing but the block still ends in a terminal state
        let message = entry(
            "msgid \"f\"\nmsgid_plural \"fs\"\nmsgstr[0] \"a\"\nmsgstr[1] \"b\"\nmsgstr[2]\"c\"",
        );
        assert!(message.is_ok());
    }

    #[test]
    fn test_lineno_points_at_msgid() {
        let message = process_block(
            &Block {
                start_line: 10,
                text: "# comment\nmsgid \"x\"\nmsgstr \"y\"".to_string(),
            },
            BlockKind::Entry,
            2,
        )
        .unwrap();
        assert_eq!(message.lineno, Some(11));
    }

    #[test]
    fn test_header_kind_accepts_msgstr_terminal() {
        let message = process_block(
            &block("msgid \"\"\nmsgstr \"\"\n\"Language: de\\n\""),
            BlockKind::Header,
            2,
        )
        .unwrap();
        assert_eq!(message.id, "");
        assert_eq!(
            message.value,
            Translation::Singular("Language: de\n".to_string())
        );
    }

    #[test]
    fn test_header_kind_rejects_unknown_field() {
        let err = process_block(
            &block("msgid \"\"\nmsgstr \"\"\n\"Not-A-Header: x\\n\""),
            BlockKind::Header,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::HeaderField { .. }));
    }

    #[test]
    fn test_header_kind_rejects_missing_separator() {
        let err = process_block(
            &block("msgid \"\"\nmsgstr \"\"\n\"no separator here\""),
            BlockKind::Header,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::HeaderField { .. }));
    }

    #[test]
    fn test_header_kind_rejects_obsolete_terminal() {
        let err = process_block(
            &block("#~ msgid \"a\"\n#~ msgstr \"b\""),
            BlockKind::Header,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncompleteEntry { .. }));
    }
}
