//! Result reporting.
//!
//! The composer produces a [`Trace`]; this module turns it into the stable
//! [`ClassificationResult`] contract:
//!
//! ```text
//! Trace ──▶ report() ──▶ ClassificationResult
//!            ├─ fired ids    (short-circuit: the deciding grant; accumulate: every grant)
//!            ├─ confidence   (see below)
//!            ├─ effects      (modifiers merged in chain order, last wins per flag)
//!            └─ reasons      (one line per step, in chain order)
//! ```
//!
//! Every field is always present. The no-match path yields empty id lists and
//! a diagnostic reason, never a missing field.
//!
//! ## Confidence
//!
//! - Short-circuit-OR: the confidence of the deciding grant, else 0.
//! - Accumulate-all: the highest grant confidence minus
//!   `Options::confidence_step` for every grant beyond the first, floored at 0.

use std::fmt;

use crate::engine::Strategy;
use crate::engine::trace::{StepOutcome, Trace};
use crate::{Effects, Options, clamp_confidence};

/// The outcome of classifying one token under one family.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub family: String,
    pub applies: bool,
    /// Rules whose `Decisive(true)` made the result apply.
    pub fired_rule_ids: Vec<&'static str>,
    /// Rules whose `Modifier` outcome contributed effects.
    pub modified_by: Vec<&'static str>,
    /// Human-readable diagnostics, one per evaluated step.
    pub reasons: Vec<String>,
    pub confidence: f64,
    pub effects: Effects,
}

impl ClassificationResult {
    /// The canonical non-matching result.
    pub fn rejected(family: &str, reason: impl Into<String>) -> Self {
        ClassificationResult {
            family: family.to_string(),
            applies: false,
            fired_rule_ids: Vec::new(),
            modified_by: Vec::new(),
            reasons: vec![reason.into()],
            confidence: 0.0,
            effects: Effects::none(),
        }
    }

    pub fn fired(&self, rule_id: &str) -> bool {
        self.fired_rule_ids.contains(&rule_id)
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: applies={} fired=[{}] confidence={:.2} effects={}",
            self.family,
            self.applies,
            self.fired_rule_ids.join(", "),
            self.confidence,
            self.effects
        )
    }
}

/// Project a trace into a result.
pub(crate) fn report(trace: &Trace, options: &Options) -> ClassificationResult {
    if !trace.token.is_valid() {
        return ClassificationResult::rejected(&trace.family, "invalid token: no IAST or Devanagari letters in input");
    }
    if trace.chain_len == 0 {
        return ClassificationResult::rejected(
            &trace.family,
            format!("no rules registered for family '{}'", trace.family),
        );
    }

    let mut effects = Effects::none();
    let mut modified_by = Vec::new();
    let mut reasons = Vec::with_capacity(trace.steps.len());

    for step in &trace.steps {
        match &step.outcome {
            StepOutcome::NoOpinion => {
                if options.trace_reasons {
                    reasons.push(format!("{}: no opinion", step.rule_id));
                }
            }
            StepOutcome::Decisive(v) if v.applies => reasons.push(format!("{}: {}", step.rule_id, v.reason)),
            StepOutcome::Decisive(v) => reasons.push(format!("{}: rejected: {}", step.rule_id, v.reason)),
            StepOutcome::Modifier(e) => {
                effects.merge(*e);
                modified_by.push(step.rule_id);
                reasons.push(format!("{}: effects {}", step.rule_id, e));
            }
            StepOutcome::Failed(message) => {
                reasons.push(format!("{}: predicate failed: {}", step.rule_id, message));
            }
        }
    }

    let (fired_rule_ids, confidence) = match trace.strategy {
        Strategy::ShortCircuitOr => match trace.decided_at.and_then(|idx| trace.steps.get(idx)) {
            Some(step) => (vec![step.rule_id], step.outcome.verdict().map(|v| v.confidence).unwrap_or(0.0)),
            None => (Vec::new(), 0.0),
        },
        Strategy::AccumulateAll => {
            let grants: Vec<(&'static str, f64)> = trace.grants().map(|(id, v)| (id, v.confidence)).collect();
            let confidence = accumulated_confidence(grants.iter().map(|(_, c)| *c), options.confidence_step);
            (grants.into_iter().map(|(id, _)| id).collect(), confidence)
        }
    };

    if fired_rule_ids.is_empty() && reasons.is_empty() {
        reasons.push(format!("no rule in '{}' applies", trace.family));
    }

    ClassificationResult {
        family: trace.family.clone(),
        applies: !fired_rule_ids.is_empty(),
        fired_rule_ids,
        modified_by,
        reasons,
        confidence,
        effects,
    }
}

/// `max(c) - step * (n - 1)`, floored at 0; 0 for no grants.
fn accumulated_confidence(confidences: impl Iterator<Item = f64>, step: f64) -> f64 {
    let step = clamp_confidence(step);
    let (count, max) = confidences.fold((0usize, 0.0f64), |(n, m), c| (n + 1, m.max(c)));
    if count == 0 {
        return 0.0;
    }
    (max - step * (count - 1) as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::trace::Step;
    use crate::script::{Token, normalize};
    use crate::{EffectFlags, Outcome};

    fn trace(strategy: Strategy, token: Token, steps: Vec<(&'static str, Outcome)>) -> Trace {
        let mut trace = Trace::new("test", strategy, token, steps.len());
        for (rule_id, outcome) in steps {
            trace.steps.push(Step { rule_id, outcome: outcome.into() });
        }
        trace
    }

    #[test]
    fn accumulated_confidence_formula() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(accumulated_confidence([0.9, 0.6].into_iter(), 0.1), 0.8));
        assert!(close(accumulated_confidence([0.7].into_iter(), 0.1), 0.7));
        assert!(close(accumulated_confidence([0.1, 0.1, 0.1].into_iter(), 0.1), 0.0));
        assert!(close(accumulated_confidence(std::iter::empty(), 0.1), 0.0));
        assert!(close(accumulated_confidence([0.5, 0.5].into_iter(), 0.0), 0.5));
    }

    #[test]
    fn invalid_token_reports_shape() {
        let t = trace(Strategy::ShortCircuitOr, Token::invalid(), vec![]);
        let result = report(&t, &Options::default());
        assert!(!result.applies);
        assert!(result.fired_rule_ids.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].starts_with("invalid token"));
    }

    #[test]
    fn accumulate_merges_effects_in_order() {
        let t = trace(
            Strategy::AccumulateAll,
            normalize("rāma"),
            vec![
                ("m1", Outcome::modify(Effects::none().enable(EffectFlags::RETAINED_FOR_OPERATIONS))),
                ("g1", Outcome::grant("first", 0.6)),
                ("m2", Outcome::modify(Effects::none().disable(EffectFlags::RETAINED_FOR_OPERATIONS))),
            ],
        );
        let result = report(&t, &Options::default());
        assert!(result.applies);
        assert_eq!(result.fired_rule_ids, vec!["g1"]);
        assert_eq!(result.modified_by, vec!["m1", "m2"]);
        assert_eq!(result.effects.get(EffectFlags::RETAINED_FOR_OPERATIONS), Some(false));
        assert!((result.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn no_opinion_reasons_can_be_hidden() {
        let t = trace(Strategy::ShortCircuitOr, normalize("rāma"), vec![("a", Outcome::NoOpinion)]);
        let verbose = report(&t, &Options::default());
        assert_eq!(verbose.reasons, vec!["a: no opinion".to_string()]);

        let quiet = report(&t, &Options { trace_reasons: false, ..Options::default() });
        assert_eq!(quiet.reasons, vec!["no rule in 'test' applies".to_string()]);
    }

    #[test]
    fn display_is_compact() {
        let mut t = trace(Strategy::ShortCircuitOr, normalize("harī"), vec![("1.1.11", Outcome::grant("dual", 1.0))]);
        t.decided_at = Some(0);
        let result = report(&t, &Options::default());
        assert_eq!(result.to_string(), "test: applies=true fired=[1.1.11] confidence=1.00 effects=(none)");
    }
}
