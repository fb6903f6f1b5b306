//! Line classification for the PO grammar.
//!
//! A [`Token`] names the grammatical role of a single trimmed line; a
//! [`State`] names the field the entry state machine is currently
//! accumulating. Both are closed sum types; comment subkinds get their own
//! dispatch step via [`CommentKind`].

/// The subkind of a `#` comment line, decided by its second character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `#:` source references.
    Location,
    /// `#,` flags.
    Flags,
    /// `#.` extracted comments.
    Auto,
    /// `#|` previous field values.
    Previous,
    /// Bare `#` translator comments.
    User,
}

/// The grammatical role of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrIndex,
    Comment(CommentKind),
    Continuation,
    ObsoleteMsgctxt,
    ObsoleteMsgid,
    ObsoleteMsgidPlural,
    ObsoleteMsgstr,
    ObsoleteMsgstrIndex,
}

impl Token {
    /// Classifies a trimmed, non-empty line by its leading characters.
    ///
    /// Prefixes are checked longest-first where one is a prefix of another
    /// (`msgid_plural` before `msgid`, `msgstr[` before `msgstr`). Returns
    /// `None` for a line matching no known token.
    ///
    /// # Panics
    ///
    /// Panics when handed an empty line; the block splitter never produces
    /// one, so that is a caller bug.
    pub fn classify(line: &str) -> Option<Token> {
        assert!(
            !line.is_empty(),
            "the line classifier must not see empty lines"
        );
        match line.as_bytes()[0] {
            b'"' => Some(Token::Continuation),
            b'#' => {
                if let Some(rest) = line.strip_prefix("#~") {
                    let rest = rest.trim_start();
                    if rest.starts_with("msgctxt") {
                        Some(Token::ObsoleteMsgctxt)
                    } else if rest.starts_with("msgid_plural") {
                        Some(Token::ObsoleteMsgidPlural)
                    } else if rest.starts_with("msgstr[") {
                        Some(Token::ObsoleteMsgstrIndex)
                    } else if rest.starts_with("msgid") {
                        Some(Token::ObsoleteMsgid)
                    } else if rest.starts_with("msgstr") {
                        Some(Token::ObsoleteMsgstr)
                    } else if rest.starts_with('"') {
                        Some(Token::Continuation)
                    } else {
                        None
                    }
                } else {
                    let kind = match line.as_bytes().get(1) {
                        Some(b':') => CommentKind::Location,
                        Some(b',') => CommentKind::Flags,
                        Some(b'.') => CommentKind::Auto,
                        Some(b'|') => CommentKind::Previous,
                        _ => CommentKind::User,
                    };
                    Some(Token::Comment(kind))
                }
            }
            b'm' => {
                if line.starts_with("msgctxt") {
                    Some(Token::Msgctxt)
                } else if line.starts_with("msgid_plural") {
                    Some(Token::MsgidPlural)
                } else if line.starts_with("msgid") {
                    Some(Token::Msgid)
                } else if line.starts_with("msgstr[") {
                    Some(Token::MsgstrIndex)
                } else if line.starts_with("msgstr") {
                    Some(Token::Msgstr)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Token::Msgctxt => "MSGCTXT",
            Token::Msgid => "MSGID",
            Token::MsgidPlural => "MSGID_PLURAL",
            Token::Msgstr => "MSGSTR",
            Token::MsgstrIndex => "MSGSTR_INDEX",
            Token::Comment(_) => "COMMENT",
            Token::Continuation => "CONTINUATION",
            Token::ObsoleteMsgctxt => "OBSOLETE_MSGCTXT",
            Token::ObsoleteMsgid => "OBSOLETE_MSGID",
            Token::ObsoleteMsgidPlural => "OBSOLETE_MSGID_PLURAL",
            Token::ObsoleteMsgstr => "OBSOLETE_MSGSTR",
            Token::ObsoleteMsgstrIndex => "OBSOLETE_MSGSTR_INDEX",
        }
    }
}

/// The field the state machine is currently accumulating. Exactly one state
/// is active per block at any time; every block starts in `Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Initial,
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrIndex,
    ObsoleteMsgctxt,
    ObsoleteMsgid,
    ObsoleteMsgidPlural,
    ObsoleteMsgstr,
    ObsoleteMsgstrIndex,
}

impl State {
    pub fn is_obsolete(&self) -> bool {
        matches!(
            self,
            State::ObsoleteMsgctxt
                | State::ObsoleteMsgid
                | State::ObsoleteMsgidPlural
                | State::ObsoleteMsgstr
                | State::ObsoleteMsgstrIndex
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            State::Initial => "INITIAL",
            State::Msgctxt => "MSGCTXT",
            State::Msgid => "MSGID",
            State::MsgidPlural => "MSGID_PLURAL",
            State::Msgstr => "MSGSTR",
            State::MsgstrIndex => "MSGSTR_INDEX",
            State::ObsoleteMsgctxt => "OBSOLETE_MSGCTXT",
            State::ObsoleteMsgid => "OBSOLETE_MSGID",
            State::ObsoleteMsgidPlural => "OBSOLETE_MSGID_PLURAL",
            State::ObsoleteMsgstr => "OBSOLETE_MSGSTR",
            State::ObsoleteMsgstrIndex => "OBSOLETE_MSGSTR_INDEX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fields() {
        assert_eq!(Token::classify("msgctxt \"c\""), Some(Token::Msgctxt));
        assert_eq!(Token::classify("msgid \"a\""), Some(Token::Msgid));
        assert_eq!(
            Token::classify("msgid_plural \"as\""),
            Some(Token::MsgidPlural)
        );
        assert_eq!(Token::classify("msgstr \"b\""), Some(Token::Msgstr));
        assert_eq!(
            Token::classify("msgstr[0] \"b\""),
            Some(Token::MsgstrIndex)
        );
    }

    #[test]
    fn test_classify_longest_prefix_first() {
        // msgid_plural must not classify as msgid, msgstr[ not as msgstr
        assert_eq!(
            Token::classify("msgid_plural \"\""),
            Some(Token::MsgidPlural)
        );
        assert_eq!(Token::classify("msgstr[1] \"\""), Some(Token::MsgstrIndex));
    }

    #[test]
    fn test_classify_continuation() {
        assert_eq!(Token::classify("\"abc\""), Some(Token::Continuation));
    }

    #[test]
    fn test_classify_comments() {
        assert_eq!(
            Token::classify("#: src/main.rs:4"),
            Some(Token::Comment(CommentKind::Location))
        );
        assert_eq!(
            Token::classify("#, fuzzy"),
            Some(Token::Comment(CommentKind::Flags))
        );
        assert_eq!(
            Token::classify("#. extracted"),
            Some(Token::Comment(CommentKind::Auto))
        );
        assert_eq!(
            Token::classify("#| msgid \"old\""),
            Some(Token::Comment(CommentKind::Previous))
        );
        assert_eq!(
            Token::classify("# translator note"),
            Some(Token::Comment(CommentKind::User))
        );
        assert_eq!(
            Token::classify("#"),
            Some(Token::Comment(CommentKind::User))
        );
    }

    #[test]
    fn test_classify_obsolete() {
        assert_eq!(
            Token::classify("#~ msgctxt \"c\""),
            Some(Token::ObsoleteMsgctxt)
        );
        assert_eq!(Token::classify("#~ msgid \"a\""), Some(Token::ObsoleteMsgid));
        assert_eq!(
            Token::classify("#~ msgid_plural \"as\""),
            Some(Token::ObsoleteMsgidPlural)
        );
        assert_eq!(
            Token::classify("#~ msgstr \"b\""),
            Some(Token::ObsoleteMsgstr)
        );
        assert_eq!(
            Token::classify("#~ msgstr[1] \"b\""),
            Some(Token::ObsoleteMsgstrIndex)
        );
        assert_eq!(Token::classify("#~ \"cont\""), Some(Token::Continuation));
        assert_eq!(Token::classify("#~ garbage"), None);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(Token::classify("garbage line"), None);
        assert_eq!(Token::classify("msgfoo \"x\""), None);
    }

    #[test]
    #[should_panic]
    fn test_classify_empty_line_panics() {
        Token::classify("");
    }

    #[test]
    fn test_state_is_obsolete() {
        assert!(State::ObsoleteMsgid.is_obsolete());
        assert!(State::ObsoleteMsgstrIndex.is_obsolete());
        assert!(!State::Msgid.is_obsolete());
        assert!(!State::Initial.is_obsolete());
    }

    #[test]
    fn test_names() {
        assert_eq!(State::MsgidPlural.name(), "MSGID_PLURAL");
        assert_eq!(Token::ObsoleteMsgstr.name(), "OBSOLETE_MSGSTR");
    }
}
