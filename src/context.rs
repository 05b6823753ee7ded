//! Caller-supplied classification context.
//!
//! A [`Context`] is an open key/value bag. The engine never reads it; each
//! predicate interprets the keys it declares in `Rule::context_keys` and
//! ignores the rest. A missing key reads as [`ContextValue::Unknown`].
//!
//! Keys understood by the built-in rule families are listed in [`keys`].

use std::collections::BTreeMap;
use std::fmt;

use crate::script::{self, Token};

/// Context keys read by the built-in rules.
pub mod keys {
    /// Grammatical number of the form: `singular` | `dual` | `plural`.
    pub const NUMBER: &str = "number";
    /// Case (vibhakti) of the form, English or Sanskrit name.
    pub const CASE: &str = "case";
    /// Flag: the form is an indeclinable particle (nipāta).
    pub const PARTICLE: &str = "particle";
    /// The following word in the utterance, raw text in either script.
    pub const NEXT_WORD: &str = "next_word";
    /// `vedic` (chandas) or `classical` (bhāṣā).
    pub const DOMAIN: &str = "domain";
    /// Underlying stem the form was derived from, raw text.
    pub const STEM: &str = "stem";
    /// Substitute that produced the ending (e.g. `śe`).
    pub const SUBSTITUTE: &str = "substitute";
    /// Flag: the particle carries the marker ṅ (āṅ, the preposition ā).
    pub const ANG: &str = "ang";
    /// Indicatory letter (anubandha) of the particle, e.g. `ñ` for uÑ.
    pub const MARKER: &str = "marker";
    /// Flag: the word is a conventional name (saṃjñā) of a place or thing.
    pub const CONVENTIONAL_NAME: &str = "conventional_name";
    /// Flag: speakers perceive the etymological connection of the name.
    pub const CONNECTION_PERCEIVED: &str = "connection_perceived";
    /// Flag: the name was derived by an elided (lup) affix.
    pub const DERIVED_NAME: &str = "derived_name";
    /// Which meaning is being taught: `principal`, `affix`, `number`, ...
    pub const MEANING: &str = "meaning";
    /// Flag: the expression denotes a time span or is subordinated to one.
    pub const TIME_WORD: &str = "time_word";
    /// Flag: an affix has been elided from the form.
    pub const AFFIX_ELIDED: &str = "affix_elided";
    /// Name of the elision operation: `lopa`, `luk`, `ślu`, `lup`.
    pub const ELISION: &str = "elision";
    /// Flag: the noun names a class (jāti).
    pub const CLASS_NOUN: &str = "class_noun";
    /// Flag: the word is used as the name of a lunar mansion.
    pub const NAKSHATRA: &str = "nakshatra";
    /// List: members of a copulative (dvandva) compound.
    pub const DVANDVA_MEMBERS: &str = "dvandva_members";
}

/// A single context value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextValue {
    /// Absent or not understood. Predicates must treat it as neutral.
    #[default]
    Unknown,
    Text(String),
    Flag(bool),
    Number(i64),
    List(Vec<String>),
}

static UNKNOWN: ContextValue = ContextValue::Unknown;

impl ContextValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ContextValue::Unknown)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ContextValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ContextValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ContextValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Parse a CLI-style literal: `true`/`false`, an integer, a
    /// comma-separated list, or plain text.
    pub fn parse(raw: &str) -> ContextValue {
        let raw = raw.trim();
        match raw {
            "" => ContextValue::Unknown,
            "true" | "yes" => ContextValue::Flag(true),
            "false" | "no" => ContextValue::Flag(false),
            _ if raw.contains(',') => ContextValue::List(
                raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect(),
            ),
            _ => match raw.parse::<i64>() {
                Ok(n) => ContextValue::Number(n),
                Err(_) => ContextValue::Text(raw.to_string()),
            },
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Unknown => f.write_str("?"),
            ContextValue::Text(s) => f.write_str(s),
            ContextValue::Flag(b) => write!(f, "{b}"),
            ContextValue::Number(n) => write!(f, "{n}"),
            ContextValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Flag(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Number(value)
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(value: Vec<String>) -> Self {
        ContextValue::List(value)
    }
}

impl<const N: usize> From<[&str; N]> for ContextValue {
    fn from(value: [&str; N]) -> Self {
        ContextValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Grammatical number (vacana).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalNumber {
    Singular,
    Dual,
    Plural,
}

impl GrammaticalNumber {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "singular" | "sg" | "ekavacana" | "eka" => Some(GrammaticalNumber::Singular),
            "dual" | "du" | "dvivacana" | "dvi" => Some(GrammaticalNumber::Dual),
            "plural" | "pl" | "bahuvacana" | "bahu" => Some(GrammaticalNumber::Plural),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GrammaticalNumber::Singular => "singular",
            GrammaticalNumber::Dual => "dual",
            GrammaticalNumber::Plural => "plural",
        }
    }
}

/// Case (vibhakti); the vocative is listed separately as sambodhana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalCase {
    Nominative,
    Accusative,
    Instrumental,
    Dative,
    Ablative,
    Genitive,
    Locative,
    Vocative,
}

impl GrammaticalCase {
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        let case = match lower.as_str() {
            "nominative" | "nom" | "prathamā" | "prathama" => GrammaticalCase::Nominative,
            "accusative" | "acc" | "dvitīyā" | "dvitiya" => GrammaticalCase::Accusative,
            "instrumental" | "ins" | "tṛtīyā" | "trtiya" => GrammaticalCase::Instrumental,
            "dative" | "dat" | "caturthī" | "caturthi" => GrammaticalCase::Dative,
            "ablative" | "abl" | "pañcamī" | "pancami" => GrammaticalCase::Ablative,
            "genitive" | "gen" | "ṣaṣṭhī" | "sasthi" => GrammaticalCase::Genitive,
            "locative" | "loc" | "saptamī" | "saptami" => GrammaticalCase::Locative,
            "vocative" | "voc" | "sambodhana" | "sambuddhi" => GrammaticalCase::Vocative,
            _ => return None,
        };
        Some(case)
    }
}

/// Immutable per-call context bag.
///
/// ```
/// use vyakarana::Context;
///
/// let ctx = Context::new().with("number", "dual").with("particle", false);
/// assert_eq!(ctx.text("number"), Some("dual"));
/// assert!(ctx.get("missing").is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    entries: BTreeMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Return a copy of the context with `key` set. `Unknown` values are not stored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        let value = value.into();
        let key = key.into();
        if value.is_unknown() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
        self
    }

    /// Parse `key=value` (as accepted on the command line).
    pub fn parse_assignment(raw: &str) -> Option<(String, ContextValue)> {
        let (key, value) = raw.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), ContextValue::parse(value)))
    }

    pub fn get(&self, key: &str) -> &ContextValue {
        self.entries.get(key).unwrap_or(&UNKNOWN)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).as_text()
    }

    /// Flags default to `false` when missing or not boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).as_flag().unwrap_or(false)
    }

    /// Case-insensitive text comparison; false when missing.
    pub fn is(&self, key: &str, expected: &str) -> bool {
        self.text(key).is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
    }

    /// Read a raw word from the context and run it through the normalizer.
    pub fn word(&self, key: &str) -> Option<Token> {
        let token = script::normalize(self.text(key)?);
        token.is_valid().then_some(token)
    }

    /// Normalized list members (e.g. dvandva constituents).
    pub fn words(&self, key: &str) -> Vec<Token> {
        match self.get(key) {
            ContextValue::List(items) => {
                items.iter().map(|s| script::normalize(s)).filter(Token::is_valid).collect()
            }
            ContextValue::Text(s) => {
                let token = script::normalize(s);
                if token.is_valid() { vec![token] } else { Vec::new() }
            }
            _ => Vec::new(),
        }
    }

    pub fn number(&self) -> Option<GrammaticalNumber> {
        self.text(keys::NUMBER).and_then(GrammaticalNumber::parse)
    }

    pub fn case(&self) -> Option<GrammaticalCase> {
        self.text(keys::CASE).and_then(GrammaticalCase::parse)
    }

    pub fn is_vedic(&self) -> bool {
        self.is(keys::DOMAIN, "vedic") || self.is(keys::DOMAIN, "chandas")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
