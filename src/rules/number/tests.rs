use crate::context::keys;
use crate::family::OPTIONAL_NUMBER;
use crate::rules::number;
use crate::{Context, ContextValue, EffectFlags, classify};

fn ctx(pairs: &[(&str, &str)]) -> Context {
    pairs.iter().fold(Context::new(), |ctx, (k, v)| ctx.with(*k, ContextValue::parse(v)))
}

#[test]
fn number_examples_matching() {
    // Array of (expected fired rules, input, context)
    let cases: Vec<(Vec<&str>, &str, Vec<(&str, &str)>)> = vec![
        (vec!["1.2.58"], "vrīhiḥ", vec![(keys::CLASS_NOUN, "true"), (keys::NUMBER, "singular")]),
        (vec!["1.2.58"], "brāhmaṇaḥ", vec![(keys::CLASS_NOUN, "yes"), (keys::NUMBER, "ekavacana")]),
        (vec!["1.2.59"], "aham", vec![(keys::NUMBER, "singular")]),
        (vec!["1.2.59"], "अहम्", vec![(keys::NUMBER, "singular")]),
        (vec!["1.2.59"], "āvām", vec![(keys::NUMBER, "dual")]),
        (vec!["1.2.59"], "bravīmi", vec![(keys::STEM, "asmad"), (keys::NUMBER, "singular")]),
        (vec!["1.2.60"], "phalgunyau", vec![(keys::NUMBER, "dual")]),
        (vec!["1.2.60"], "proṣṭhapade", vec![(keys::NUMBER, "dual"), (keys::NAKSHATRA, "true")]),
        (vec!["1.2.60"], "pūrve", vec![(keys::STEM, "pūrvaproṣṭhapadā"), (keys::NUMBER, "dual")]),
        (vec!["1.2.61"], "punarvasū", vec![(keys::NUMBER, "dual"), (keys::DOMAIN, "vedic")]),
        (vec!["1.2.62"], "viśākhe", vec![(keys::NUMBER, "dual"), (keys::DOMAIN, "chandas")]),
        (vec!["1.2.62"], "विशाखे", vec![(keys::NUMBER, "dual"), (keys::DOMAIN, "vedic")]),
        (vec!["1.2.63"], "tiṣyapunarvasū", vec![]),
        (vec!["1.2.63"], "tiṣyapunarvasavaḥ", vec![(keys::NUMBER, "plural")]),
        (vec!["1.2.63"], "nakṣatre", vec![(keys::DVANDVA_MEMBERS, "tiṣya,punarvasu")]),
    ];

    for (expected, input, pairs) in cases {
        let res = classify(OPTIONAL_NUMBER, input, &ctx(&pairs));
        assert!(res.applies, "'{input}' with {pairs:?}; reasons: {:?}", res.reasons);
        assert_eq!(res.fired_rule_ids, expected, "'{input}' with {pairs:?}");
    }
}

#[test]
fn number_examples_not_matching() {
    let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("vrīhiḥ", vec![(keys::NUMBER, "singular")]),
        ("vrīhayaḥ", vec![(keys::CLASS_NOUN, "true"), (keys::NUMBER, "plural")]),
        ("aham", vec![]),
        ("vayam", vec![(keys::NUMBER, "plural")]),
        ("phalgunyau", vec![(keys::NUMBER, "dual"), (keys::NAKSHATRA, "false")]),
        ("phalgunī", vec![(keys::NUMBER, "singular")]),
        ("punarvasū", vec![(keys::NUMBER, "dual")]),
        ("viśākhe", vec![(keys::NUMBER, "dual"), (keys::DOMAIN, "classical")]),
        ("tiṣyapunarvasū", vec![(keys::NAKSHATRA, "false")]),
        ("tiṣyaḥ", vec![(keys::NUMBER, "singular")]),
        ("nakṣatre", vec![(keys::DVANDVA_MEMBERS, "tiṣya,viśākhā")]),
        ("?!", vec![(keys::CLASS_NOUN, "true"), (keys::NUMBER, "singular")]),
    ];

    for (input, pairs) in cases {
        let res = classify(OPTIONAL_NUMBER, input, &ctx(&pairs));
        assert!(!res.applies, "'{input}' with {pairs:?}; fired {:?}", res.fired_rule_ids);
        assert!(res.fired_rule_ids.is_empty());
        assert_eq!(res.confidence, 0.0);
    }
}

#[test]
fn tisya_punarvasu_dvandva_is_mandatory() {
    let res = classify(OPTIONAL_NUMBER, "तिष्यपुनर्वसू", &Context::new());
    assert!(res.applies);
    assert_eq!(res.confidence, 1.0);
    assert_eq!(res.modified_by, vec!["1.2.63.nitya"]);
    assert!(res.effects.is_set(EffectFlags::MANDATORY));

    let optional = classify(OPTIONAL_NUMBER, "phalgunyau", &ctx(&[(keys::NUMBER, "dual")]));
    assert_eq!(optional.effects.get(EffectFlags::MANDATORY), None);
}

#[test]
fn several_rules_can_contribute() {
    let res = classify(
        OPTIONAL_NUMBER,
        "aham",
        &ctx(&[(keys::CLASS_NOUN, "true"), (keys::NUMBER, "singular")]),
    );
    assert_eq!(res.fired_rule_ids, vec!["1.2.58", "1.2.59"]);
    assert!((res.confidence - 0.8).abs() < 1e-9);
}

#[test]
fn chain_is_in_sutra_order() {
    let ids: Vec<&str> = number::rules::get().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["1.2.58", "1.2.59", "1.2.60", "1.2.61", "1.2.62", "1.2.63", "1.2.63.nitya"]);
}
