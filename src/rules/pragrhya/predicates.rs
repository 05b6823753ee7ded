use crate::context::{GrammaticalCase, GrammaticalNumber, keys};
use crate::{Context, Token};

/// Long ī, long ū and e: the endings 1.1.11 and 1.1.19 care about.
pub const IUE_ENDINGS: &[&str] = &["ī", "ū", "e"];

/// Nominative plural and dual forms of *adas* with ī/ū after m.
pub const ADAS_FORMS: &[&str] = &["amī", "amū"];

/// Returns true when the following word is the quotative particle *iti*.
pub fn before_iti(ctx: &Context) -> bool {
    ctx.word(keys::NEXT_WORD).is_some_and(|w| w.is_any(&["iti"]))
}

/// Returns true when the caller marked the form as an indeclinable particle.
pub fn is_particle(ctx: &Context) -> bool {
    ctx.flag(keys::PARTICLE)
}

pub fn is_dual(ctx: &Context) -> bool {
    ctx.number() == Some(GrammaticalNumber::Dual)
}

/// Returns true when the number is known and is not the dual.
pub fn is_known_non_dual(ctx: &Context) -> bool {
    matches!(ctx.number(), Some(n) if n != GrammaticalNumber::Dual)
}

pub fn is_vocative(ctx: &Context) -> bool {
    ctx.case() == Some(GrammaticalCase::Vocative)
}

/// Locative sense, either from the case itself or from the stated meaning.
pub fn in_locative_sense(ctx: &Context) -> bool {
    ctx.case() == Some(GrammaticalCase::Locative) || ctx.is(keys::MEANING, "locative")
}

/// Returns true when the form (or its stated stem) belongs to the pronoun *adas*.
pub fn is_adas_form(token: &Token, ctx: &Context) -> bool {
    if token.is_any(ADAS_FORMS) {
        return true;
    }
    ctx.word(keys::STEM).is_some_and(|stem| stem.is_any(&["adas"])) && token.ends_with_any(&["mī", "mū"])
}

/// The particle uÑ: `u` carrying the marker ñ, given as `ñ` or `uñ`.
pub fn is_un(token: &Token, ctx: &Context) -> bool {
    token.is_any(&["u"]) && ctx.word(keys::MARKER).is_some_and(|m| m.is_any(&["ñ", "uñ"]))
}

/// Returns true when the caller says the ending came from `substitute`.
pub fn substitute_is(ctx: &Context, substitute: &str) -> bool {
    ctx.word(keys::SUBSTITUTE).is_some_and(|w| w.as_str() == substitute)
}

/// The nasalized *ūṃ* written either with anusvāra or with candrabindu.
pub fn is_um(token: &Token) -> bool {
    token.is_any(&["ūṃ", "ūm\u{0310}"])
}
