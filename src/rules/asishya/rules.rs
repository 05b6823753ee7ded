use crate::context::keys;
use crate::family::ASISHYA;
use crate::{Context, EffectFlags, Effects, Outcome, Rule};

/// Elisions whose name contains *lu*: these withdraw stem operations (1.1.63).
const LU_ELISIONS: &[&str] = &["luk", "ślu", "lup"];

/// `Some(false)` only when the caller explicitly says the connection is not perceived.
fn connection_perceived(ctx: &Context) -> Option<bool> {
    ctx.get(keys::CONNECTION_PERCEIVED).as_flag()
}

fn meaning_is_any(ctx: &Context, meanings: &[&str]) -> bool {
    meanings.iter().any(|m| ctx.is(keys::MEANING, m))
}

/// 1.1.62: after affix elision the affix still conditions operations, but
/// has no sound of its own.
fn rule_affix_retained() -> Rule {
    rule! {
        id: "1.1.62",
        family: ASISHYA,
        summary: "pratyayalope pratyayalakṣaṇam",
        context: [keys::AFFIX_ELIDED],
        eval: |_token, ctx, _progress| -> Option<Effects> {
            ctx.flag(keys::AFFIX_ELIDED).then(|| {
                Effects::none()
                    .enable(EffectFlags::RETAINED_FOR_OPERATIONS)
                    .enable(EffectFlags::SUPPRESS_PHONETIC)
            })
        },
    }
}

/// 1.1.63: not for the stem when the elision is luk, ślu or lup.
fn rule_lu_elision_withdraws() -> Rule {
    rule! {
        id: "1.1.63",
        family: ASISHYA,
        summary: "na lumatāṅgasya",
        context: [keys::AFFIX_ELIDED, keys::ELISION],
        eval: |_token, ctx, _progress| -> Option<Effects> {
            let elision = ctx.word(keys::ELISION)?;
            (ctx.flag(keys::AFFIX_ELIDED) && elision.is_any(LU_ELISIONS))
                .then(|| Effects::none().disable(EffectFlags::RETAINED_FOR_OPERATIONS))
        },
    }
}

/// 1.2.53: gender and number of such names need not be taught.
fn rule_names_are_authoritative() -> Rule {
    rule! {
        id: "1.2.53",
        family: ASISHYA,
        summary: "tad aśiṣyaṃ saṃjñāpramāṇatvāt",
        context: [keys::CONVENTIONAL_NAME],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            ctx.flag(keys::CONVENTIONAL_NAME).then(|| Outcome::grant("conventional names are authoritative", 0.9))
        },
    }
}

/// 1.2.54: nor the lup elision, since the connection is not perceived.
fn rule_lup_unperceived() -> Rule {
    rule! {
        id: "1.2.54",
        family: ASISHYA,
        summary: "lub yogāprakhyānāt",
        context: [keys::DERIVED_NAME, keys::CONNECTION_PERCEIVED],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            if !ctx.flag(keys::DERIVED_NAME) {
                return None;
            }
            match connection_perceived(ctx)? {
                false => Some(Outcome::grant("lup derivation is not perceived by speakers", 0.8)),
                true => Some(Outcome::deny("speakers still perceive the derivation", 0.6)),
            }
        },
    }
}

/// 1.2.55: were the connection authoritative, the name would vanish with it.
fn rule_name_outlives_connection() -> Rule {
    rule! {
        id: "1.2.55",
        family: ASISHYA,
        summary: "yogapramāṇe ca tadabhāve 'darśanaṃ syāt",
        context: [keys::CONVENTIONAL_NAME, keys::CONNECTION_PERCEIVED],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            (ctx.flag(keys::CONVENTIONAL_NAME) && connection_perceived(ctx) == Some(false))
                .then(|| Outcome::grant("name stays in use without its connection", 0.7))
        },
    }
}

/// 1.2.56: teaching that the principal or the affix meaning prevails is unnecessary.
fn rule_principal_or_affix_meaning() -> Rule {
    rule! {
        id: "1.2.56",
        family: ASISHYA,
        summary: "pradhānapratyayārthavacanam arthasyānyapramāṇatvāt",
        context: [keys::MEANING],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            meaning_is_any(ctx, &["principal", "pradhāna", "affix", "pratyaya"])
                .then(|| Outcome::grant("meaning is settled by usage", 0.8))
        },
    }
}

/// 1.2.57: likewise for time and for subordinate members.
fn rule_time_and_subordinate() -> Rule {
    rule! {
        id: "1.2.57",
        family: ASISHYA,
        summary: "kālopasarjane ca tulyam",
        context: [keys::TIME_WORD, keys::MEANING],
        eval: |_token, ctx, _progress| -> Option<Outcome> {
            if ctx.flag(keys::TIME_WORD) || meaning_is_any(ctx, &["time", "kāla"]) {
                Some(Outcome::grant("time reference is settled by usage", 0.8))
            } else if meaning_is_any(ctx, &["subordinate", "upasarjana"]) {
                Some(Outcome::grant("subordinate member is settled by usage", 0.8))
            } else {
                None
            }
        },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_affix_retained(),
        rule_lu_elision_withdraws(),
        rule_names_are_authoritative(),
        rule_lup_unperceived(),
        rule_name_outlives_connection(),
        rule_principal_or_affix_meaning(),
        rule_time_and_subordinate(),
    ]
}
