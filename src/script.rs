//! Script detection and normalization (input pre-classification).
//!
//! Every public entry point runs raw caller text through [`normalize`] before
//! any rule sees it. The result is a [`Token`] whose canonical form is
//! lowercase NFC IAST, whatever the input script was:
//!
//! ```text
//! "हरी"   ──┐
//! "Harī"  ──┼──▶ normalize ──▶ Token { canonical: "harī", script: .. }
//! "harī"  ──┘
//! ```
//!
//! ## Detection
//!
//! Characters are classified one at a time by Unicode range/script. Devanagari
//! letters count toward [`Script::Native`], Latin letters toward
//! [`Script::Romanized`]; the majority wins and the token is flagged as mixed
//! when both occur. Mixed input is never rejected.
//!
//! ## Canonical form
//!
//! - Devanagari is transliterated to IAST (inherent vowel, virama, matras).
//! - Latin letters are lowercased; ISO 15919 spellings (`r̥`, `l̥`, `ṁ`) are
//!   folded to their IAST equivalents.
//! - Vedic pitch accents are dropped in both scripts (U+0951/U+0952 in
//!   Devanagari, acute/grave/vertical line in IAST);
//!   phonemic marks such as the macron and the dot below are kept.
//! - Whitespace runs and dandas collapse to one space; other punctuation,
//!   digits of other systems and unrelated scripts are dropped, except the
//!   apostrophe (avagraha).
//!
//! Normalization is idempotent: `normalize(normalize(x)) == normalize(x)`.
//! Input with no letter of either script yields the invalid token.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Peekable;
use std::str::Chars;

use unicode_normalization::UnicodeNormalization;
use unicode_script::{Script as UnicodeScriptName, UnicodeScript};

/// Writing system detected for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// IAST (or ISO 15919) romanization.
    Romanized,
    /// Devanagari.
    Native,
}

impl Script {
    pub fn name(self) -> &'static str {
        match self {
            Script::Romanized => "romanized",
            Script::Native => "native",
        }
    }
}

/// A normalized word-form. Immutable once built.
///
/// Equality and hashing look only at the canonical form, so the same word
/// typed in different scripts compares equal.
#[derive(Debug, Clone)]
pub struct Token {
    canonical: String,
    script: Option<Script>,
    mixed: bool,
}

/// IAST vowels, longest spellings first so that `ai`/`au` win over `a`.
const VOWELS: &[&str] = &["ai", "au", "ā", "ī", "ū", "ṝ", "ḹ", "a", "i", "u", "ṛ", "ḷ", "e", "o"];

impl Token {
    /// The sentinel for empty or unparseable input. Never matches any rule.
    pub fn invalid() -> Self {
        Token { canonical: String::new(), script: None, mixed: false }
    }

    pub fn is_valid(&self) -> bool {
        self.script.is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// `None` for the invalid token.
    pub fn script(&self) -> Option<Script> {
        self.script
    }

    /// True when letters of both scripts were present in the input.
    pub fn is_mixed(&self) -> bool {
        self.mixed
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.is_valid() && self.canonical.ends_with(suffix)
    }

    pub fn ends_with_any(&self, suffixes: &[&str]) -> bool {
        suffixes.iter().any(|s| self.ends_with(s))
    }

    /// The vowel the form ends in, if it ends in one.
    pub fn final_vowel(&self) -> Option<&'static str> {
        VOWELS.iter().copied().find(|v| self.canonical.ends_with(v))
    }

    /// True when the whole form is a single vowel (e.g. the particle `u`).
    pub fn is_single_vowel(&self) -> bool {
        VOWELS.contains(&self.canonical.as_str())
    }

    /// Whitespace-separated words of the canonical form.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.canonical.split(' ').filter(|w| !w.is_empty())
    }

    /// True when the canonical form equals any of `forms`.
    pub fn is_any(&self, forms: &[&str]) -> bool {
        self.is_valid() && forms.contains(&self.canonical.as_str())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() == other.is_valid() && self.canonical == other.canonical
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_valid().hash(state);
        self.canonical.hash(state);
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() { f.write_str(&self.canonical) } else { f.write_str("<invalid>") }
    }
}

/// Normalize raw text (or an already normalized [`Token`]) into a `Token`.
pub fn normalize(raw: impl AsRef<str>) -> Token {
    let decomposed: String = raw.as_ref().nfd().collect();
    let mut out = String::with_capacity(decomposed.len() + decomposed.len() / 2);
    let mut native = 0usize;
    let mut roman = 0usize;
    let mut chars = decomposed.chars().peekable();

    while let Some(c) = chars.next() {
        if is_devanagari(c) {
            if c == DANDA || c == DOUBLE_DANDA {
                push_separator(&mut out);
            } else if push_devanagari(c, &mut chars, &mut out) {
                native += 1;
            }
        } else if c.is_whitespace() {
            push_separator(&mut out);
        } else if c.script() == UnicodeScriptName::Latin {
            roman += 1;
            out.extend(c.to_lowercase());
        } else if c.is_ascii_digit() {
            out.push(c);
        } else if c == '\'' || c == '\u{2019}' {
            out.push('\'');
        } else if is_latin_mark(c) && !is_accent_mark(c) && out.chars().last().is_some_and(|p| p != ' ') {
            out.push(c);
        }
    }

    if native == 0 && roman == 0 {
        return Token::invalid();
    }

    let composed: String = out.trim_end().nfc().collect();
    let canonical: String = fold_variants(&composed).nfc().collect();
    if canonical.is_empty() {
        return Token::invalid();
    }

    let script = if native > roman { Script::Native } else { Script::Romanized };
    Token { canonical, script: Some(script), mixed: native > 0 && roman > 0 }
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

fn fold_variants(s: &str) -> String {
    s.replace('\u{1E41}', "\u{1E43}")
        .replace("r\u{325}\u{304}", "\u{1E5D}")
        .replace("r\u{325}", "\u{1E5B}")
        .replace("l\u{325}\u{304}", "\u{1E39}")
        .replace("l\u{325}", "\u{1E37}")
}

fn is_latin_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}' | '\u{1DC0}'..='\u{1DFF}')
}

/// Pitch accents (udātta, anudātta, svarita). Dropped in both scripts; the
/// Devanagari svara marks fall through `push_devanagari` unwritten.
fn is_accent_mark(c: char) -> bool {
    matches!(c, '\u{0300}' | '\u{0301}' | '\u{030D}' | '\u{030E}' | '\u{0340}' | '\u{0341}')
}

fn is_devanagari(c: char) -> bool {
    matches!(c, '\u{0900}'..='\u{097F}' | '\u{A8E0}'..='\u{A8FF}')
}

// --- Devanagari → IAST -------------------------------------------------------

const VIRAMA: char = '\u{094D}';
const NUKTA: char = '\u{093C}';
const DANDA: char = '\u{0964}';
const DOUBLE_DANDA: char = '\u{0965}';

/// Transliterate one Devanagari character (consuming a following virama or
/// vowel sign when `c` is a consonant). Returns true when a letter was written.
fn push_devanagari(c: char, rest: &mut Peekable<Chars<'_>>, out: &mut String) -> bool {
    if let Some(consonant) = consonant(c) {
        out.push_str(consonant);
        while rest.peek() == Some(&NUKTA) {
            rest.next();
        }
        match rest.peek().copied() {
            Some(VIRAMA) => {
                rest.next();
            }
            Some(next) => match vowel_sign(next) {
                Some(vowel) => {
                    rest.next();
                    out.push_str(vowel);
                }
                None => out.push('a'),
            },
            None => out.push('a'),
        }
        return true;
    }

    if let Some(vowel) = independent_vowel(c).or_else(|| vowel_sign(c)) {
        out.push_str(vowel);
        return true;
    }

    match c {
        '\u{0902}' => out.push('ṃ'),
        '\u{0903}' => out.push('ḥ'),
        '\u{0901}' => out.push_str("m\u{0310}"),
        '\u{0950}' => out.push_str("oṃ"),
        '\u{093D}' => {
            out.push('\'');
            return false;
        }
        '\u{0966}'..='\u{096F}' => {
            let digit = c as u32 - 0x0966;
            out.push(char::from(b'0' + digit as u8));
            return false;
        }
        _ => return false,
    }
    true
}

fn consonant(c: char) -> Option<&'static str> {
    let s = match c {
        'क' => "k",
        'ख' => "kh",
        'ग' => "g",
        'घ' => "gh",
        'ङ' => "ṅ",
        'च' => "c",
        'छ' => "ch",
        'ज' => "j",
        'झ' => "jh",
        'ञ' => "ñ",
        'ट' => "ṭ",
        'ठ' => "ṭh",
        'ड' => "ḍ",
        'ढ' => "ḍh",
        'ण' => "ṇ",
        'त' => "t",
        'थ' => "th",
        'द' => "d",
        'ध' => "dh",
        'न' | 'ऩ' => "n",
        'प' => "p",
        'फ' => "ph",
        'ब' => "b",
        'भ' => "bh",
        'म' => "m",
        'य' => "y",
        'र' | 'ऱ' => "r",
        'ल' => "l",
        'ळ' | 'ऴ' => "ḻ",
        'व' => "v",
        'श' => "ś",
        'ष' => "ṣ",
        'स' => "s",
        'ह' => "h",
        _ => return None,
    };
    Some(s)
}

fn independent_vowel(c: char) -> Option<&'static str> {
    let s = match c {
        'अ' => "a",
        'आ' => "ā",
        'इ' => "i",
        'ई' => "ī",
        'उ' => "u",
        'ऊ' => "ū",
        'ऋ' => "ṛ",
        'ॠ' => "ṝ",
        'ऌ' => "ḷ",
        'ॡ' => "ḹ",
        'ए' => "e",
        'ऐ' => "ai",
        'ओ' => "o",
        'औ' => "au",
        _ => return None,
    };
    Some(s)
}

fn vowel_sign(c: char) -> Option<&'static str> {
    let s = match c {
        'ा' => "ā",
        'ि' => "i",
        'ी' => "ī",
        'ु' => "u",
        'ू' => "ū",
        'ृ' => "ṛ",
        'ॄ' => "ṝ",
        'ॢ' => "ḷ",
        'ॣ' => "ḹ",
        'े' => "e",
        'ै' => "ai",
        'ो' => "o",
        'ौ' => "au",
        _ => return None,
    };
    Some(s)
}
