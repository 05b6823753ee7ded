//! Decision traces.
//!
//! A [`Trace`] is what the composer saw while walking a chain: one [`Step`]
//! per evaluated rule, in chain order. Rules after a short-circuit are not
//! evaluated and leave no step. The reporter (`report.rs`) projects a trace
//! into the public result; callers who want the raw record get it from the
//! verbose entry point.

use crate::engine::Strategy;
use crate::script::Token;
use crate::{Effects, Outcome, Verdict};

/// Outcome of one evaluated rule, after failure isolation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    NoOpinion,
    Decisive(Verdict),
    Modifier(Effects),
    /// The predicate returned an error or panicked. Counts as no opinion.
    Failed(String),
}

impl StepOutcome {
    pub fn is_grant(&self) -> bool {
        matches!(self, StepOutcome::Decisive(v) if v.applies)
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            StepOutcome::Decisive(v) => Some(v),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::NoOpinion => "no-opinion",
            StepOutcome::Decisive(v) if v.applies => "granted",
            StepOutcome::Decisive(_) => "rejected",
            StepOutcome::Modifier(_) => "modifier",
            StepOutcome::Failed(_) => "failed",
        }
    }
}

impl From<Outcome> for StepOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::NoOpinion => StepOutcome::NoOpinion,
            Outcome::Decisive(v) => {
                StepOutcome::Decisive(Verdict { confidence: crate::clamp_confidence(v.confidence), ..v })
            }
            Outcome::Modifier(effects) => StepOutcome::Modifier(effects),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub rule_id: &'static str,
    pub outcome: StepOutcome,
}

/// Everything recorded for one `(family, token, context)` evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub family: String,
    pub strategy: Strategy,
    pub token: Token,
    /// Number of rules registered for the family.
    pub chain_len: usize,
    pub steps: Vec<Step>,
    /// Index into `steps` of the grant that ended a short-circuit walk.
    pub decided_at: Option<usize>,
}

impl Trace {
    pub(crate) fn new(family: &str, strategy: Strategy, token: Token, chain_len: usize) -> Self {
        Trace { family: family.to_string(), strategy, token, chain_len, steps: Vec::new(), decided_at: None }
    }

    /// Rules in the chain that were never evaluated.
    pub fn skipped(&self) -> usize {
        self.chain_len.saturating_sub(self.steps.len())
    }

    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s.outcome, StepOutcome::Failed(_))).count()
    }

    pub fn grants(&self) -> impl Iterator<Item = (&'static str, &Verdict)> {
        self.steps.iter().filter_map(|s| s.outcome.verdict().filter(|v| v.applies).map(|v| (s.rule_id, v)))
    }
}

/// The cumulative result so far, as seen by the next predicate in a chain.
///
/// This is the only way a predicate learns about earlier rules; it never
/// sees which individual predicate produced what.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    applies: bool,
    fired: Vec<&'static str>,
    effects: Effects,
    evaluated: usize,
}

impl Progress {
    /// True once any earlier rule granted.
    pub fn applies(&self) -> bool {
        self.applies
    }

    /// Ids of earlier rules that granted, in chain order.
    pub fn fired(&self) -> &[&'static str] {
        &self.fired
    }

    /// Effects merged so far.
    pub fn effects(&self) -> Effects {
        self.effects
    }

    /// Number of rules evaluated before this one.
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub(crate) fn record(&mut self, rule_id: &'static str, outcome: &StepOutcome) {
        self.evaluated += 1;
        match outcome {
            StepOutcome::Decisive(v) if v.applies => {
                self.applies = true;
                self.fired.push(rule_id);
            }
            StepOutcome::Modifier(effects) => self.effects.merge(*effects),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EffectFlags;

    #[test]
    fn progress_accumulates_grants_and_effects() {
        let mut progress = Progress::default();
        progress.record("a", &StepOutcome::NoOpinion);
        progress.record("b", &Outcome::grant("ok", 0.5).into());
        progress.record("c", &StepOutcome::Modifier(Effects::none().enable(EffectFlags::SUPPRESS_PHONETIC)));
        progress.record("d", &StepOutcome::Failed("boom".into()));

        assert!(progress.applies());
        assert_eq!(progress.fired(), &["b"]);
        assert!(progress.effects().suppress_phonetic());
        assert_eq!(progress.evaluated(), 4);
    }

    #[test]
    fn step_labels() {
        assert_eq!(StepOutcome::from(Outcome::grant("x", 1.0)).label(), "granted");
        assert_eq!(StepOutcome::from(Outcome::deny("x", 1.0)).label(), "rejected");
        assert_eq!(StepOutcome::NoOpinion.label(), "no-opinion");
        assert_eq!(StepOutcome::Failed(String::new()).label(), "failed");
    }
}
