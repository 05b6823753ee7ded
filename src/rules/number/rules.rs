use crate::context::{GrammaticalNumber, keys};
use crate::family::OPTIONAL_NUMBER;
use crate::{Context, EffectFlags, Effects, Outcome, Rule, Token};

use crate::rules::number::lexicon::{
    PHALGUNI_PROSTHAPADA, in_nakshatra_sense, is_asmad, is_tisya_punarvasu_dvandva, nakshatra_stem,
};

/// 1.2.58: a noun naming a class may take the plural for one.
fn rule_class_noun() -> Rule {
    rule! {
        id: "1.2.58",
        family: OPTIONAL_NUMBER,
        summary: "jātyākhyāyām ekasmin bahuvacanam anyatarasyām",
        context: [keys::CLASS_NOUN, keys::NUMBER],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            (ctx.flag(keys::CLASS_NOUN) && ctx.number() == Some(GrammaticalNumber::Singular))
                .then(|| Outcome::grant("class noun: singular may be replaced by plural", 0.9))
        },
    }
}

/// 1.2.59: so may asmad in the singular and the dual.
fn rule_asmad() -> Rule {
    rule! {
        id: "1.2.59",
        family: OPTIONAL_NUMBER,
        summary: "asmado dvayoś ca",
        context: [keys::STEM, keys::NUMBER],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if !is_asmad(token, ctx) {
                return None;
            }
            match ctx.number()? {
                GrammaticalNumber::Singular | GrammaticalNumber::Dual => {
                    Some(Outcome::grant("asmad: singular/dual may be replaced by plural", 0.9))
                }
                GrammaticalNumber::Plural => None,
            }
        },
    }
}

/// 1.2.60: the duals phalgunī and proṣṭhapadā, as lunar mansions, may be plural.
fn rule_phalguni_prosthapada() -> Rule {
    rule! {
        id: "1.2.60",
        family: OPTIONAL_NUMBER,
        summary: "phalgunīproṣṭhapadānāṃ ca nakṣatre",
        context: [keys::STEM, keys::NUMBER, keys::NAKSHATRA],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            let stem = nakshatra_stem(token, ctx).filter(|s| PHALGUNI_PROSTHAPADA.contains(s))?;
            if ctx.number() != Some(GrammaticalNumber::Dual) {
                return None;
            }
            if in_nakshatra_sense(ctx, Some(stem)) {
                Some(Outcome::grant("phalgunī/proṣṭhapadā dual may be plural", 0.9))
            } else {
                Some(Outcome::deny("not used as the name of a nakṣatra", 0.8))
            }
        },
    }
}

/// 1.2.61: in the Veda the dual punarvasu may be singular.
fn rule_vedic_punarvasu() -> Rule {
    rule! {
        id: "1.2.61",
        family: OPTIONAL_NUMBER,
        summary: "chandasi punarvasvor ekavacanam",
        context: [keys::STEM, keys::NUMBER, keys::DOMAIN],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if nakshatra_stem(token, ctx) != Some("punarvasu") || ctx.number() != Some(GrammaticalNumber::Dual) {
                return None;
            }
            if ctx.is_vedic() {
                Some(Outcome::grant("Vedic punarvasu: dual may be singular", 0.9))
            } else {
                Some(Outcome::deny("singular for punarvasu is Vedic only", 0.8))
            }
        },
    }
}

/// 1.2.62: likewise viśākhā.
fn rule_vedic_visakha() -> Rule {
    rule! {
        id: "1.2.62",
        family: OPTIONAL_NUMBER,
        summary: "viśākhayoś ca",
        context: [keys::STEM, keys::NUMBER, keys::DOMAIN],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if nakshatra_stem(token, ctx) != Some("viśākhā") || ctx.number() != Some(GrammaticalNumber::Dual) {
                return None;
            }
            if ctx.is_vedic() {
                Some(Outcome::grant("Vedic viśākhā: dual may be singular", 0.9))
            } else {
                Some(Outcome::deny("singular for viśākhā is Vedic only", 0.8))
            }
        },
    }
}

/// 1.2.63: a dvandva of tiṣya and punarvasu takes the dual for the plural.
fn rule_tisya_punarvasu() -> Rule {
    rule! {
        id: "1.2.63",
        family: OPTIONAL_NUMBER,
        summary: "tiṣyapunarvasvor nakṣatradvandve bahuvacanasya dvivacanaṃ nityam",
        context: [keys::DVANDVA_MEMBERS, keys::NUMBER, keys::NAKSHATRA],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            applies_to_tisya_punarvasu(token, ctx)
                .then(|| Outcome::grant("tiṣya-punarvasu dvandva: plural replaced by dual", 1.0))
        },
    }
}

/// 1.2.63, second half: the replacement is obligatory (nitya).
fn rule_tisya_punarvasu_mandatory() -> Rule {
    rule! {
        id: "1.2.63.nitya",
        family: OPTIONAL_NUMBER,
        summary: "... dvivacanaṃ nityam",
        context: [keys::DVANDVA_MEMBERS, keys::NUMBER, keys::NAKSHATRA],
        eval: |token, ctx, _progress| -> Option<Effects> {
            applies_to_tisya_punarvasu(token, ctx).then(|| Effects::none().enable(EffectFlags::MANDATORY))
        },
    }
}

fn applies_to_tisya_punarvasu(token: &Token, ctx: &Context) -> bool {
    is_tisya_punarvasu_dvandva(token, ctx)
        && ctx.number() != Some(GrammaticalNumber::Singular)
        && ctx.get(keys::NAKSHATRA).as_flag().unwrap_or(true)
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_class_noun(),
        rule_asmad(),
        rule_phalguni_prosthapada(),
        rule_vedic_punarvasu(),
        rule_vedic_visakha(),
        rule_tisya_punarvasu(),
        rule_tisya_punarvasu_mandatory(),
    ]
}
