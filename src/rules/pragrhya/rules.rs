use crate::context::keys;
use crate::family::PRAGRHYA;
use crate::{Outcome, Rule};

use crate::rules::pragrhya::predicates::{
    IUE_ENDINGS, before_iti, in_locative_sense, is_adas_form, is_dual, is_known_non_dual, is_particle,
    is_um, is_un, is_vocative, substitute_is,
};

/// 1.1.11: dual forms ending in ī, ū or e.
fn rule_dual_iue() -> Rule {
    rule! {
        id: "1.1.11",
        family: PRAGRHYA,
        summary: "īdūded dvivacanaṃ pragṛhyam",
        context: [keys::NUMBER],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if !token.ends_with_any(IUE_ENDINGS) {
                return None;
            }
            if is_dual(ctx) {
                Some(Outcome::grant("dual form ending in ī/ū/e", 1.0))
            } else if is_known_non_dual(ctx) {
                Some(Outcome::deny("ends in ī/ū/e but is not a dual", 1.0))
            } else {
                None
            }
        },
    }
}

/// 1.1.12: ī/ū after the m of *adas*.
fn rule_adas() -> Rule {
    rule! {
        id: "1.1.12",
        family: PRAGRHYA,
        summary: "adaso māt",
        context: [keys::STEM],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            is_adas_form(token, ctx).then(|| Outcome::grant("ī/ū after m in a form of adas", 1.0))
        },
    }
}

/// 1.1.13: the Vedic substitute śe.
fn rule_vedic_se() -> Rule {
    rule! {
        id: "1.1.13",
        family: PRAGRHYA,
        summary: "śe",
        context: [keys::SUBSTITUTE],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            (substitute_is(ctx, "śe") && token.ends_with("e"))
                .then(|| Outcome::grant("ending is the substitute śe", 1.0))
        },
    }
}

/// 1.1.14: a single-vowel particle, except āṅ. uÑ is left to 1.1.17.
fn rule_single_vowel_particle() -> Rule {
    rule! {
        id: "1.1.14",
        family: PRAGRHYA,
        summary: "nipāta ekāj anāṅ",
        context: [keys::PARTICLE, keys::ANG, keys::MARKER],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if !is_particle(ctx) || !token.is_single_vowel() || is_un(token, ctx) {
                return None;
            }
            if ctx.flag(keys::ANG) {
                Some(Outcome::deny("the preposition āṅ is excluded", 1.0))
            } else {
                Some(Outcome::grant("single-vowel particle", 1.0))
            }
        },
    }
}

/// 1.1.15: a particle ending in o.
fn rule_particle_in_o() -> Rule {
    rule! {
        id: "1.1.15",
        family: PRAGRHYA,
        summary: "ot",
        context: [keys::PARTICLE],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            (is_particle(ctx) && token.ends_with("o")).then(|| Outcome::grant("particle ending in o", 1.0))
        },
    }
}

/// 1.1.16: a vocative in o before non-Vedic iti, in Śākalya's opinion.
fn rule_vocative_before_iti() -> Rule {
    rule! {
        id: "1.1.16",
        family: PRAGRHYA,
        summary: "sambuddhau śākalyasyetāv anārṣe",
        context: [keys::CASE, keys::NEXT_WORD, keys::DOMAIN],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if !is_vocative(ctx) || !token.ends_with("o") || !before_iti(ctx) {
                return None;
            }
            if ctx.is_vedic() {
                Some(Outcome::deny("iti is Vedic (ārṣa)", 1.0))
            } else {
                Some(Outcome::grant("vocative in o before iti (optional, Śākalya)", 0.5))
            }
        },
    }
}

/// 1.1.17: the particle uÑ before iti, optionally.
fn rule_u_before_iti() -> Rule {
    rule! {
        id: "1.1.17",
        family: PRAGRHYA,
        summary: "uñaḥ",
        context: [keys::MARKER, keys::NEXT_WORD],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            (is_un(token, ctx) && before_iti(ctx)).then(|| Outcome::grant("particle uñ before iti (optional)", 0.5))
        },
    }
}

/// 1.1.18: ūṃ substituted for u before iti.
fn rule_um_before_iti() -> Rule {
    rule! {
        id: "1.1.18",
        family: PRAGRHYA,
        summary: "ūṃ",
        context: [keys::NEXT_WORD],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            (is_um(token) && before_iti(ctx)).then(|| Outcome::grant("substitute ūṃ before iti", 1.0))
        },
    }
}

/// 1.1.19: Vedic ī/ū endings used in a locative sense.
fn rule_locative_iu() -> Rule {
    rule! {
        id: "1.1.19",
        family: PRAGRHYA,
        summary: "īdūtau ca saptamyarthe",
        context: [keys::CASE, keys::MEANING, keys::DOMAIN],
        eval: |token, ctx, _progress| -> Option<Outcome> {
            if !token.ends_with_any(&["ī", "ū"]) || !in_locative_sense(ctx) {
                return None;
            }
            if ctx.is_vedic() {
                Some(Outcome::grant("ī/ū in locative sense (Vedic)", 0.9))
            } else {
                Some(Outcome::deny("locative ī/ū outside the Veda", 0.7))
            }
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_dual_iue(),
        rule_adas(),
        rule_vedic_se(),
        rule_single_vowel_particle(),
        rule_particle_in_o(),
        rule_vocative_before_iti(),
        rule_u_before_iti(),
        rule_um_before_iti(),
        rule_locative_iu(),
    ]
}
