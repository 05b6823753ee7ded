//! Chain evaluation.
//!
//! This module is the operational core of the engine: it walks one family's
//! chain against a normalized token and records what every rule said.
//!
//! ## Strategies
//!
//! ```text
//! short-circuit-OR                      accumulate-all
//! ────────────────                      ──────────────
//! r0: no opinion   → record, go on      r0: no opinion   → record
//! r1: false        → record, go on      r1: true  (0.9)  → record grant
//! r2: true         → record, STOP       r2: modifier     → merge effects
//! r3: (never run)                       r3: true  (0.6)  → record grant
//! ```
//!
//! Under short-circuit-OR a `false` never ends the walk: a later, more
//! specific rule may still grant. Only the first grant does.
//!
//! ## Failure isolation
//!
//! A predicate that returns `Err(PredicateFailure)` or panics is demoted to
//! a failed step (treated as no opinion) and the walk continues. Panics are
//! caught with `catch_unwind`, so this relies on the default `panic = unwind`
//! profile setting.
//!
//! ## Preconditions
//!
//! The registry must be sealed before any evaluation; `Composer` only ever
//! borrows it immutably, so concurrent composers on the same registry are
//! fine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use super::metrics::{RunMetrics, RunResult};
use super::registry::{Registry, Strategy};
use super::report::{ClassificationResult, report};
use super::trace::{Progress, Step, StepOutcome, Trace};
use crate::script::{self, Token};
use crate::{Context, Options, Rule};

/// Evaluates one family of a sealed [`Registry`].
///
/// ```text
/// Composer::new(registry, family)
///     └─ run(token, context, options)
///          ├─ evaluate()  -> Trace
///          └─ report()    -> ClassificationResult
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    registry: &'a Registry,
    family: &'a str,
}

impl<'a> Composer<'a> {
    pub fn new(registry: &'a Registry, family: &'a str) -> Self {
        Composer { registry, family }
    }

    pub fn strategy(&self) -> Strategy {
        self.registry.strategy(self.family)
    }

    /// Walk the chain and record every evaluated step.
    ///
    /// Invalid tokens and empty chains produce an empty trace without
    /// invoking any predicate.
    pub fn evaluate(&self, token: &Token, context: &Context) -> Trace {
        let chain = self.registry.chain(self.family);
        let strategy = self.strategy();
        let mut trace = Trace::new(self.family, strategy, token.clone(), chain.len());

        if !token.is_valid() || chain.is_empty() {
            return trace;
        }

        let mut progress = Progress::default();
        for (idx, rule) in chain.iter().enumerate() {
            let outcome = invoke(rule, token, context, &progress);
            tracing::trace!(family = self.family, rule = rule.id, outcome = outcome.label(), "evaluated rule");

            progress.record(rule.id, &outcome);
            let granted = outcome.is_grant();
            trace.steps.push(Step { rule_id: rule.id, outcome });

            if granted && strategy == Strategy::ShortCircuitOr {
                trace.decided_at = Some(idx);
                break;
            }
        }

        trace
    }

    /// Evaluate and report.
    pub fn run(&self, token: &Token, context: &Context, options: &Options) -> ClassificationResult {
        let trace = self.evaluate(token, context);
        let result = report(&trace, options);
        tracing::debug!(
            family = self.family,
            token = %token,
            applies = result.applies,
            fired = ?result.fired_rule_ids,
            confidence = result.confidence,
            "classified"
        );
        result
    }

    /// Normalize `raw`, evaluate and report, timing each stage.
    pub fn run_with_metrics(&self, raw: &str, context: &Context, options: &Options) -> RunResult {
        let total_start = Instant::now();

        let normalize_start = Instant::now();
        let token = script::normalize(raw);
        let normalize = normalize_start.elapsed();

        let evaluate_start = Instant::now();
        let trace = self.evaluate(&token, context);
        let evaluate = evaluate_start.elapsed();

        let report_start = Instant::now();
        let result = report(&trace, options);
        let report = report_start.elapsed();

        let metrics = RunMetrics {
            total: total_start.elapsed(),
            normalize,
            evaluate,
            report,
            predicates_evaluated: trace.steps.len(),
            predicates_failed: trace.failures(),
            predicates_skipped: if token.is_valid() { trace.skipped() } else { trace.chain_len },
        };

        RunResult { result, trace, metrics }
    }
}

/// Call one predicate, converting errors and panics into a failed step.
fn invoke(rule: &Rule, token: &Token, context: &Context, progress: &Progress) -> StepOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| (rule.evaluate)(token, context, progress))) {
        Ok(Ok(outcome)) => outcome.into(),
        Ok(Err(failure)) => {
            tracing::warn!(family = rule.family, rule = rule.id, error = %failure, "predicate failed");
            StepOutcome::Failed(failure.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(family = rule.family, rule = rule.id, panic = %message, "predicate panicked");
            StepOutcome::Failed(format!("panicked: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::context::{GrammaticalNumber, keys};
    use crate::engine::RegistryBuilder;
    use crate::{EffectFlags, Effects, Outcome, PredicateFailure, normalize};

    const FAMILY: &str = "test";

    fn registry(strategy: Strategy, rules: Vec<Rule>) -> Registry {
        let mut builder = RegistryBuilder::new();
        builder.configure(FAMILY, strategy).unwrap();
        builder.register_all(rules).unwrap();
        builder.seal()
    }

    fn fixed(id: &'static str, outcome: Outcome) -> Rule {
        Rule::new(id, FAMILY, move |_, _, _| outcome.clone())
    }

    fn failing(id: &'static str) -> Rule {
        Rule::new(id, FAMILY, |_, _, _| -> Result<Outcome, PredicateFailure> {
            Err(PredicateFailure::new("lexicon unavailable"))
        })
    }

    fn panicking(id: &'static str) -> Rule {
        Rule::new(id, FAMILY, |_, _, _| -> Outcome { panic!("index out of range in sūtra table") })
    }

    fn classify(registry: &Registry, raw: &str, context: &Context) -> ClassificationResult {
        Composer::new(registry, FAMILY).run(&normalize(raw), context, &Options::default())
    }

    #[test]
    fn evaluation_is_deterministic() {
        let reg = registry(
            Strategy::AccumulateAll,
            vec![
                fixed("a", Outcome::grant("first", 0.9)),
                fixed("b", Outcome::modify(Effects::none().enable(EffectFlags::SUPPRESS_PHONETIC))),
                fixed("c", Outcome::deny("third", 0.4)),
            ],
        );
        let ctx = Context::new().with(keys::NUMBER, "dual");
        assert_eq!(classify(&reg, "harī", &ctx), classify(&reg, "harī", &ctx));
    }

    #[test]
    fn only_decisive_true_order_matters() {
        let p1 = || fixed("p1", Outcome::deny("narrow rule does not cover this", 1.0));
        let p2 = || fixed("p2", Outcome::grant("extension covers this", 0.9));

        let forward = classify(&registry(Strategy::ShortCircuitOr, vec![p1(), p2()]), "harī", &Context::new());
        assert!(forward.applies);
        assert_eq!(forward.fired_rule_ids, vec!["p2"]);

        let reversed = classify(&registry(Strategy::ShortCircuitOr, vec![p2(), p1()]), "harī", &Context::new());
        assert!(reversed.applies);
        assert_eq!(reversed.fired_rule_ids, vec!["p2"]);
    }

    #[test]
    fn short_circuit_stops_at_first_grant() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reg = registry(
            Strategy::ShortCircuitOr,
            vec![
                fixed("a", Outcome::NoOpinion),
                fixed("b", Outcome::grant("granted", 0.7)),
                Rule::new("c", FAMILY, move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Outcome::grant("never reached", 1.0)
                }),
            ],
        );

        let run = Composer::new(&reg, FAMILY).run_with_metrics("harī", &Context::new(), &Options::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(run.result.fired_rule_ids, vec!["b"]);
        assert!((run.result.confidence - 0.7).abs() < 1e-9);
        assert_eq!(run.trace.decided_at, Some(1));
        assert_eq!(run.metrics.predicates_evaluated, 2);
        assert_eq!(run.metrics.predicates_skipped, 1);
    }

    #[test]
    fn short_circuit_without_grant_lists_every_reason() {
        let reg = registry(
            Strategy::ShortCircuitOr,
            vec![fixed("a", Outcome::NoOpinion), fixed("b", Outcome::deny("not dual", 1.0))],
        );
        let result = classify(&reg, "harī", &Context::new());
        assert!(!result.applies);
        assert_eq!(result.confidence, 0.0);
        assert!(result.fired_rule_ids.is_empty());
        assert_eq!(result.reasons, vec!["a: no opinion".to_string(), "b: rejected: not dual".to_string()]);
    }

    #[test]
    fn failing_predicates_are_isolated_in_any_order() {
        fn good() -> Rule {
            fixed("good", Outcome::grant("still applies", 0.8))
        }
        let orders: [fn() -> Vec<Rule>; 4] = [
            || vec![panicking("bad"), good()],
            || vec![good(), panicking("bad")],
            || vec![failing("bad"), good()],
            || vec![good(), failing("bad")],
        ];

        for strategy in [Strategy::ShortCircuitOr, Strategy::AccumulateAll] {
            for (n, chain) in orders.iter().enumerate() {
                let result = classify(&registry(strategy, chain()), "harī", &Context::new());
                assert!(result.applies, "{strategy}, order #{n}");
                assert_eq!(result.fired_rule_ids, vec!["good"]);
            }
        }

        let result = classify(&registry(Strategy::AccumulateAll, vec![failing("bad"), good()]), "harī", &Context::new());
        assert_eq!(result.reasons[0], "bad: predicate failed: lexicon unavailable");

        let result =
            classify(&registry(Strategy::AccumulateAll, vec![panicking("bad"), good()]), "harī", &Context::new());
        assert_eq!(result.reasons[0], "bad: predicate failed: panicked: index out of range in sūtra table");
    }

    #[test]
    fn empty_chain_yields_canonical_empty_result() {
        let reg = Registry::empty();
        for raw in ["", "harī", "हरी", "harī हरी"] {
            let result = Composer::new(&reg, "unknown").run(&normalize(raw), &Context::new(), &Options::default());
            assert!(!result.applies);
            assert_eq!(result.confidence, 0.0);
            assert!(result.fired_rule_ids.is_empty());
            assert!(!result.reasons.is_empty());
        }
    }

    #[test]
    fn invalid_token_never_reaches_predicates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reg = registry(
            Strategy::AccumulateAll,
            vec![Rule::new("count", FAMILY, move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Outcome::grant("anything", 1.0)
            })],
        );

        for raw in ["", "   ", "123", "।"] {
            let result = classify(&reg, raw, &Context::new());
            assert!(!result.applies, "'{raw}' must not match");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pragrhya_style_chain() {
        let ends_in_long_iu_or_e_when_dual = Rule::new("endsInLongIUorE_whenDual", FAMILY, |token, ctx, _| {
            if ctx.number() == Some(GrammaticalNumber::Dual) && token.ends_with_any(&["ī", "ū", "e"]) {
                Outcome::grant("dual ending in ī/ū/e", 1.0)
            } else {
                Outcome::NoOpinion
            }
        });
        let is_known_pronoun_form = Rule::new("isKnownPronounForm", FAMILY, |token, _, _| {
            if token.is_any(&["amī", "amū"]) { Outcome::grant("form of adas", 1.0) } else { Outcome::NoOpinion }
        });
        let reg = registry(Strategy::ShortCircuitOr, vec![ends_in_long_iu_or_e_when_dual, is_known_pronoun_form]);

        let dual = classify(&reg, "harī", &Context::new().with(keys::NUMBER, "dual"));
        assert!(dual.applies);
        assert_eq!(dual.fired_rule_ids, vec!["endsInLongIUorE_whenDual"]);

        let native = classify(&reg, "हरी", &Context::new().with(keys::NUMBER, "dual"));
        assert_eq!(native, dual);

        let singular = classify(&reg, "harī", &Context::new().with(keys::NUMBER, "singular"));
        assert!(!singular.applies);
    }

    #[test]
    fn aggregation_style_chain() {
        let reg = registry(
            Strategy::AccumulateAll,
            vec![
                fixed("hasExplicitTechnicalFlag", Outcome::grant("technical marker", 0.9)),
                fixed("hasAuthoritySource", Outcome::grant("usage is the authority", 0.6)),
            ],
        );
        let result = classify(&reg, "pañcālāḥ", &Context::new());
        assert!(result.applies);
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert!(result.fired("hasExplicitTechnicalFlag"));
        assert!(result.fired("hasAuthoritySource"));
    }

    #[test]
    fn modifiers_apply_even_without_membership() {
        let reg = registry(
            Strategy::AccumulateAll,
            vec![
                fixed("blanket", Outcome::modify(Effects::none().enable(EffectFlags::SUPPRESS_PHONETIC))),
                fixed("narrow", Outcome::modify(Effects::none().disable(EffectFlags::SUPPRESS_PHONETIC))),
                fixed("deny", Outcome::deny("not taught", 0.5)),
            ],
        );
        let result = classify(&reg, "kṛt", &Context::new());
        assert!(!result.applies);
        assert_eq!(result.effects.get(EffectFlags::SUPPRESS_PHONETIC), Some(false));
        assert_eq!(result.modified_by, vec!["blanket", "narrow"]);
    }

    #[test]
    fn predicates_see_cumulative_progress_only() {
        let reg = registry(
            Strategy::AccumulateAll,
            vec![
                fixed("first", Outcome::grant("base", 0.5)),
                Rule::new("second", FAMILY, |_, _, progress| {
                    if progress.applies() && progress.evaluated() == 1 {
                        Outcome::modify(Effects::none().enable(EffectFlags::MANDATORY))
                    } else {
                        Outcome::NoOpinion
                    }
                }),
            ],
        );
        let result = classify(&reg, "rāma", &Context::new());
        assert!(result.effects.is_set(EffectFlags::MANDATORY));
    }

    mod properties {
        use super::*;
        use proptest::prelude::{Just, prop_assert, prop_assert_eq, prop_oneof, proptest};
        use proptest::strategy::Strategy as PropStrategy;

        const IDS: [&str; 10] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"];

        #[derive(Debug, Clone, Copy)]
        enum Kind {
            Silent,
            Grant(u8),
            Deny,
            Fail,
        }

        impl Kind {
            fn rule(self, id: &'static str) -> Rule {
                Rule::new(id, FAMILY, move |_, _, _| match self {
                    Kind::Silent => Ok(Outcome::NoOpinion),
                    Kind::Grant(c) => Ok(Outcome::grant("granted", f64::from(c) / 10.0)),
                    Kind::Deny => Ok(Outcome::deny("denied", 1.0)),
                    Kind::Fail => Err(PredicateFailure::new("broken")),
                })
            }
        }

        fn kind() -> impl PropStrategy<Value = Kind> {
            prop_oneof![
                Just(Kind::Silent),
                (0u8..=10).prop_map(Kind::Grant),
                Just(Kind::Deny),
                Just(Kind::Fail),
            ]
        }

        fn build(strategy: Strategy, kinds: &[Kind]) -> Registry {
            let rules = kinds.iter().enumerate().map(|(i, k)| k.rule(IDS[i])).collect();
            registry(strategy, rules)
        }

        proptest! {
            #[test]
            fn short_circuit_reports_first_grant(kinds in proptest::collection::vec(kind(), 0..9)) {
                let result = classify(&build(Strategy::ShortCircuitOr, &kinds), "harī", &Context::new());
                let first = kinds.iter().position(|k| matches!(k, Kind::Grant(_)));
                prop_assert_eq!(result.applies, first.is_some());
                prop_assert_eq!(result.fired_rule_ids, first.map(|i| vec![IDS[i]]).unwrap_or_default());
            }

            #[test]
            fn accumulate_reports_every_grant(kinds in proptest::collection::vec(kind(), 0..9)) {
                let result = classify(&build(Strategy::AccumulateAll, &kinds), "harī", &Context::new());
                let grants: Vec<&str> = kinds
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| matches!(k, Kind::Grant(_)))
                    .map(|(i, _)| IDS[i])
                    .collect();
                prop_assert_eq!(&result.fired_rule_ids, &grants);
                prop_assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
            }

            #[test]
            fn appending_never_revokes_a_grant(
                kinds in proptest::collection::vec(kind(), 0..8),
                extra in kind(),
            ) {
                let before = classify(&build(Strategy::ShortCircuitOr, &kinds), "harī", &Context::new());
                let mut extended = kinds.clone();
                extended.push(extra);
                let after = classify(&build(Strategy::ShortCircuitOr, &extended), "harī", &Context::new());
                if before.applies {
                    prop_assert!(after.applies);
                    prop_assert_eq!(before.fired_rule_ids, after.fired_rule_ids);
                    prop_assert_eq!(before.confidence, after.confidence);
                }
            }

            #[test]
            fn failures_do_not_change_the_decision(kinds in proptest::collection::vec(kind(), 0..9)) {
                let without: Vec<Kind> =
                    kinds.iter().map(|k| if matches!(k, Kind::Fail) { Kind::Silent } else { *k }).collect();
                for strategy in [Strategy::ShortCircuitOr, Strategy::AccumulateAll] {
                    let with_failures = classify(&build(strategy, &kinds), "harī", &Context::new());
                    let silent = classify(&build(strategy, &without), "harī", &Context::new());
                    prop_assert_eq!(with_failures.applies, silent.applies);
                    prop_assert_eq!(with_failures.fired_rule_ids, silent.fired_rule_ids);
                }
            }

            #[test]
            fn repeated_evaluation_is_identical(kinds in proptest::collection::vec(kind(), 0..9)) {
                for strategy in [Strategy::ShortCircuitOr, Strategy::AccumulateAll] {
                    let reg = build(strategy, &kinds);
                    prop_assert_eq!(classify(&reg, "amū", &Context::new()), classify(&reg, "amū", &Context::new()));
                }
            }
        }
    }
}
