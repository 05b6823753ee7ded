use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::context::keys;
use crate::{Context, Token};

/// The lunar mansions, by stem.
pub const NAKSHATRAS: &[&str] = &[
    "aśvinī",
    "bharaṇī",
    "kṛttikā",
    "rohiṇī",
    "mṛgaśiras",
    "ārdrā",
    "punarvasu",
    "tiṣya",
    "puṣya",
    "āśleṣā",
    "maghā",
    "pūrvaphalgunī",
    "uttaraphalgunī",
    "hasta",
    "citrā",
    "svāti",
    "viśākhā",
    "anurādhā",
    "jyeṣṭhā",
    "mūla",
    "pūrvāṣāḍhā",
    "uttarāṣāḍhā",
    "śravaṇa",
    "dhaniṣṭhā",
    "śatabhiṣaj",
    "pūrvaproṣṭhapadā",
    "uttaraproṣṭhapadā",
    "revatī",
];

/// Map of inflected forms to their nakshatra stem.
static FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("phalgunī", "phalgunī"),
        ("phalgunyau", "phalgunī"),
        ("phalgunyaḥ", "phalgunī"),
        ("pūrvaphalgunyau", "pūrvaphalgunī"),
        ("uttaraphalgunyau", "uttaraphalgunī"),
        ("proṣṭhapadā", "proṣṭhapadā"),
        ("proṣṭhapade", "proṣṭhapadā"),
        ("proṣṭhapadāḥ", "proṣṭhapadā"),
        ("pūrvaproṣṭhapade", "pūrvaproṣṭhapadā"),
        ("uttaraproṣṭhapade", "uttaraproṣṭhapadā"),
        ("punarvasuḥ", "punarvasu"),
        ("punarvasū", "punarvasu"),
        ("punarvasavaḥ", "punarvasu"),
        ("viśākhā", "viśākhā"),
        ("viśākhe", "viśākhā"),
        ("viśākhāḥ", "viśākhā"),
        ("tiṣyaḥ", "tiṣya"),
        ("tiṣyau", "tiṣya"),
        ("puṣyaḥ", "puṣya"),
    ])
});

/// Stems that may appear as a plural in place of their dual (1.2.60).
pub const PHALGUNI_PROSTHAPADA: &[&str] =
    &["phalgunī", "pūrvaphalgunī", "uttaraphalgunī", "proṣṭhapadā", "pūrvaproṣṭhapadā", "uttaraproṣṭhapadā"];

/// Singular and dual forms of the first-person pronoun *asmad*.
pub const ASMAD_FORMS: &[&str] = &[
    "aham", "mām", "mā", "mayā", "mahyam", "me", "mat", "mama", "mayi", "āvām", "nau", "āvābhyām", "āvayoḥ",
];

fn lookup(word: &str) -> Option<&'static str> {
    FORMS.get(word).copied().or_else(|| NAKSHATRAS.iter().copied().find(|n| *n == word))
}

/// The nakshatra stem named by the form, preferring an explicit `stem` in the context.
pub fn nakshatra_stem(token: &Token, ctx: &Context) -> Option<&'static str> {
    match ctx.word(keys::STEM) {
        Some(stem) => lookup(stem.as_str()).or_else(|| lookup(token.as_str())),
        None => lookup(token.as_str()),
    }
}

/// The caller's `nakshatra` flag wins; otherwise a lexicon hit implies the sense.
pub fn in_nakshatra_sense(ctx: &Context, stem: Option<&str>) -> bool {
    ctx.get(keys::NAKSHATRA).as_flag().unwrap_or(stem.is_some())
}

pub fn is_asmad(token: &Token, ctx: &Context) -> bool {
    ctx.word(keys::STEM).is_some_and(|stem| stem.is_any(&["asmad"])) || token.is_any(ASMAD_FORMS)
}

/// A copulative compound of tiṣya and punarvasu, given as members or as one word.
pub fn is_tisya_punarvasu_dvandva(token: &Token, ctx: &Context) -> bool {
    let members = ctx.words(keys::DVANDVA_MEMBERS);
    if !members.is_empty() {
        let has = |stem: &str| members.iter().any(|m| lookup(m.as_str()) == Some(stem));
        return has("tiṣya") && has("punarvasu");
    }
    regex!(r"^(?:tiṣya|puṣya) ?punarvas(?:ū|u|avaḥ|uḥ)$").is_match(token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    #[test]
    fn forms_resolve_to_stems_in_either_script() {
        let ctx = Context::new();
        assert_eq!(nakshatra_stem(&normalize("phalgunyau"), &ctx), Some("phalgunī"));
        assert_eq!(nakshatra_stem(&normalize("विशाखे"), &ctx), Some("viśākhā"));
        assert_eq!(nakshatra_stem(&normalize("revatī"), &ctx), Some("revatī"));
        assert_eq!(nakshatra_stem(&normalize("rāma"), &ctx), None);
        assert_eq!(nakshatra_stem(&normalize("x"), &Context::new().with(keys::STEM, "punarvasu")), Some("punarvasu"));
    }

    #[test]
    fn explicit_flag_overrides_lexicon() {
        assert!(in_nakshatra_sense(&Context::new(), Some("viśākhā")));
        assert!(!in_nakshatra_sense(&Context::new().with(keys::NAKSHATRA, false), Some("viśākhā")));
        assert!(in_nakshatra_sense(&Context::new().with(keys::NAKSHATRA, true), None));
    }

    #[test]
    fn dvandva_detection() {
        let ctx = Context::new();
        assert!(is_tisya_punarvasu_dvandva(&normalize("tiṣyapunarvasū"), &ctx));
        assert!(is_tisya_punarvasu_dvandva(&normalize("तिष्यपुनर्वसू"), &ctx));
        assert!(!is_tisya_punarvasu_dvandva(&normalize("punarvasū"), &ctx));

        let members = Context::new().with(keys::DVANDVA_MEMBERS, ["tiṣyaḥ", "punarvasū"]);
        assert!(is_tisya_punarvasu_dvandva(&normalize("anything"), &members));
        let members = Context::new().with(keys::DVANDVA_MEMBERS, ["tiṣya", "viśākhā"]);
        assert!(!is_tisya_punarvasu_dvandva(&normalize("tiṣyapunarvasū"), &members));
    }
}
