//! Core types for pocatalog: the catalog and the messages it stores.
//! The parser decodes PO file content into these.

use std::{collections::BTreeMap, fmt::Display};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

lazy_static! {
    static ref NPLURALS_PATTERN: Regex = Regex::new(r"nplurals\s*=\s*(\d+)").unwrap();
}

/// Plural count assumed when no `Plural-Forms` header names one.
pub const DEFAULT_NUM_PLURALS: usize = 2;

/// A source reference attached to a message via a `#:` comment.
/// The line number is `None` when the reference carries none (or a
/// malformed one).
pub type Location = (String, Option<u32>);

/// A complete translation catalog (corresponds to one `.po` file).
/// Contains header metadata plus all active and obsolete messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    /// Header-level metadata (language, domain, charset, mime headers).
    pub metadata: Metadata,

    /// Whether the header entry itself is marked fuzzy.
    #[serde(default)]
    pub fuzzy: bool,

    /// Active messages, ordered by source line number.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Obsolete (`#~`) messages, stored apart from the active ones.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub obsolete: Vec<Message>,
}

impl Catalog {
    /// Creates a new, empty catalog with default metadata.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Inserts `message` among the active messages. A message with the same
    /// (context, id) key replaces the previous one.
    pub fn add_message(&mut self, message: Message) {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == message.id && m.context == message.context)
        {
            Some(existing) => *existing = message,
            None => self.messages.push(message),
        }
    }

    /// Inserts `message` among the obsolete messages, with the same
    /// replace-on-key semantics as [`Catalog::add_message`].
    pub fn add_obsolete(&mut self, message: Message) {
        match self
            .obsolete
            .iter_mut()
            .find(|m| m.id == message.id && m.context == message.context)
        {
            Some(existing) => *existing = message,
            None => self.obsolete.push(message),
        }
    }

    pub fn find_message(&self, context: Option<&str>, id: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.id == id && m.context.as_deref() == context)
    }

    pub fn find_message_mut(&mut self, context: Option<&str>, id: &str) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id && m.context.as_deref() == context)
    }

    /// Looks up a mime header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.metadata
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The number of plural forms a plural message must provide, derived
    /// from the `Plural-Forms` header (`nplurals=N`).
    pub fn num_plurals(&self) -> usize {
        self.header("Plural-Forms")
            .and_then(|value| NPLURALS_PATTERN.captures(value))
            .and_then(|captures| captures[1].parse().ok())
            .unwrap_or(DEFAULT_NUM_PLURALS)
    }

    /// Bulk-sets mime headers, replacing any existing value for the same
    /// key. The `Language` header also updates `metadata.language`.
    pub fn set_mime_headers<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            if key.eq_ignore_ascii_case("Language") && !value.is_empty() {
                self.metadata.language = value.clone();
            }
            match self
                .metadata
                .headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
            {
                Some((_, existing_value)) => *existing_value = value,
                None => self.metadata.headers.push((key, value)),
            }
        }
    }

    pub fn parse_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.metadata.language.parse().ok()
    }
}

/// Catalog-wide metadata.
///
/// `language`, `domain`, and `charset` are standard; the full set of mime
/// headers from the header entry is kept in `headers`, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    /// The language code (e.g. "en", "fr", "es", etc.).
    pub language: String,

    /// The domain or project name (e.g. "messages").
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub domain: String,

    /// Charset the source file declared (defaults to "utf-8").
    pub charset: String,

    /// All mime headers from the catalog header entry, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            language: String::new(),
            domain: "messages".to_string(),
            charset: "utf-8".to_string(),
            headers: Vec::new(),
        }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Metadata {{ language: {}, domain: {}, charset: {} }}",
            self.language, self.domain, self.charset
        )
    }
}

/// A single translatable message parsed from one PO entry block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Message {
    /// The message identifier (`msgid`).
    pub id: String,

    /// Disambiguating context (`msgctxt`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub context: Option<String>,

    /// The translation, singular or plural.
    pub value: Translation,

    /// `#:` source references, in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<Location>,

    /// `#,` flags, in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub flags: Vec<String>,

    /// `#.` extracted comments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub auto_comments: Vec<String>,

    /// `#` translator comments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub user_comments: Vec<String>,

    /// `#|` previous-field values as (field marker, value) pairs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub previous: Vec<(String, String)>,

    /// 1-based line number of the `msgid` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub lineno: Option<usize>,

    /// Whether every field line of the entry carried the `#~` marker.
    #[serde(default)]
    pub obsolete: bool,
}

impl Message {
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// True when the message carries a non-empty translation.
    pub fn is_translated(&self) -> bool {
        !self.value.is_empty()
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Message {{ id: {}, value: {}, obsolete: {} }}",
            self.id, self.value, self.obsolete
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Translation {
    /// A single translation without plural forms.
    Singular(String),

    /// A translation with indexed plural forms.
    Plural(Plural),
}

impl Translation {
    /// True when no translated text is present at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Translation::Singular(value) => value.is_empty(),
            Translation::Plural(plural) => plural.forms.iter().all(String::is_empty),
        }
    }

    /// The singular translation text, if this is a singular translation.
    pub fn as_singular(&self) -> Option<&str> {
        match self {
            Translation::Singular(value) => Some(value),
            Translation::Plural(_) => None,
        }
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Translation::Singular(value) => write!(f, "{}", value),
            Translation::Plural(plural) => write!(f, "{}", plural.id),
        }
    }
}

/// All plural forms for a single message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Plural {
    /// The plural message identifier (`msgid_plural`).
    pub id: String,

    /// Translations ordered by plural index 0..nplurals-1.
    pub forms: Vec<String>,
}

impl Plural {
    /// Builds a plural translation from index-keyed forms. Returns `None`
    /// when no forms were provided.
    pub(crate) fn new(id: &str, forms: BTreeMap<usize, String>) -> Option<Self> {
        if forms.is_empty() {
            None
        } else {
            Some(Plural {
                id: id.to_string(),
                forms: forms.into_values().collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, context: Option<&str>, value: &str) -> Message {
        Message {
            id: id.to_string(),
            context: context.map(str::to_string),
            value: Translation::Singular(value.to_string()),
            locations: Vec::new(),
            flags: Vec::new(),
            auto_comments: Vec::new(),
            user_comments: Vec::new(),
            previous: Vec::new(),
            lineno: None,
            obsolete: false,
        }
    }

    #[test]
    fn test_catalog_add_message() {
        let mut catalog = Catalog::new();
        catalog.add_message(message("hello", None, "Hallo"));
        assert_eq!(catalog.messages.len(), 1);
        assert_eq!(catalog.messages[0].id, "hello");
    }

    #[test]
    fn test_catalog_add_message_replaces_same_key() {
        let mut catalog = Catalog::new();
        catalog.add_message(message("hello", None, "first"));
        catalog.add_message(message("hello", None, "second"));
        assert_eq!(catalog.messages.len(), 1);
        assert_eq!(
            catalog.messages[0].value,
            Translation::Singular("second".to_string())
        );
    }

    #[test]
    fn test_catalog_context_distinguishes_keys() {
        let mut catalog = Catalog::new();
        catalog.add_message(message("open", None, "öffnen"));
        catalog.add_message(message("open", Some("menu"), "Öffnen"));
        assert_eq!(catalog.messages.len(), 2);
        assert!(catalog.find_message(None, "open").is_some());
        assert!(catalog.find_message(Some("menu"), "open").is_some());
        assert!(catalog.find_message(Some("toolbar"), "open").is_none());
    }

    #[test]
    fn test_catalog_obsolete_is_separate() {
        let mut catalog = Catalog::new();
        catalog.add_message(message("keep", None, "ok"));
        let mut old = message("keep", None, "old");
        old.obsolete = true;
        catalog.add_obsolete(old);
        assert_eq!(catalog.messages.len(), 1);
        assert_eq!(catalog.obsolete.len(), 1);
    }

    #[test]
    fn test_num_plurals_default() {
        let catalog = Catalog::new();
        assert_eq!(catalog.num_plurals(), DEFAULT_NUM_PLURALS);
    }

    #[test]
    fn test_num_plurals_from_header() {
        let mut catalog = Catalog::new();
        catalog.set_mime_headers(vec![(
            "Plural-Forms".to_string(),
            "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : 2);".to_string(),
        )]);
        assert_eq!(catalog.num_plurals(), 3);
    }

    #[test]
    fn test_set_mime_headers_replaces_and_orders() {
        let mut catalog = Catalog::new();
        catalog.set_mime_headers(vec![
            ("MIME-Version".to_string(), "1.0".to_string()),
            ("Language".to_string(), "de".to_string()),
        ]);
        catalog.set_mime_headers(vec![("MIME-Version".to_string(), "2.0".to_string())]);
        assert_eq!(catalog.header("mime-version"), Some("2.0"));
        assert_eq!(catalog.metadata.language, "de");
        assert_eq!(catalog.metadata.headers.len(), 2);
    }

    #[test]
    fn test_parse_language_identifier() {
        let mut catalog = Catalog::new();
        catalog.metadata.language = "de-AT".to_string();
        let lang_id = catalog.parse_language_identifier().unwrap();
        assert_eq!(lang_id.language.as_str(), "de");
        assert_eq!(lang_id.region.unwrap().as_str(), "AT");
    }

    #[test]
    fn test_parse_invalid_language_identifier() {
        let mut catalog = Catalog::new();
        catalog.metadata.language = "not-a-language".to_string();
        assert!(catalog.parse_language_identifier().is_none());
    }

    #[test]
    fn test_message_is_fuzzy() {
        let mut m = message("a", None, "b");
        assert!(!m.is_fuzzy());
        m.flags.push("fuzzy".to_string());
        assert!(m.is_fuzzy());
    }

    #[test]
    fn test_translation_is_empty() {
        assert!(Translation::Singular(String::new()).is_empty());
        assert!(!Translation::Singular("x".to_string()).is_empty());
        let plural = Translation::Plural(Plural {
            id: "files".to_string(),
            forms: vec![String::new(), String::new()],
        });
        assert!(plural.is_empty());
    }

    #[test]
    fn test_plural_new() {
        let mut forms = BTreeMap::new();
        forms.insert(1, "%d Dateien".to_string());
        forms.insert(0, "%d Datei".to_string());
        let plural = Plural::new("files", forms).unwrap();
        assert_eq!(plural.id, "files");
        assert_eq!(plural.forms, vec!["%d Datei", "%d Dateien"]);
    }

    #[test]
    fn test_plural_new_empty() {
        assert!(Plural::new("files", BTreeMap::new()).is_none());
    }

    #[test]
    fn test_catalog_serde_round_trip() {
        let mut catalog = Catalog::new();
        catalog.metadata.language = "fr".to_string();
        catalog.add_message(message("hello", None, "bonjour"));
        let encoded = serde_json::to_string(&catalog).unwrap();
        let decoded: Catalog = serde_json::from_str(&encoded).unwrap();
        assert_eq!(catalog, decoded);
    }
}
