//! Rule-chain classification of Sanskrit word-forms.
//!
//! Sūtras are hosted as ordered predicates grouped into *families*. A family
//! is evaluated against one normalized token plus a caller-supplied context
//! and yields a [`ClassificationResult`] recording which rules fired, why,
//! with what confidence, and which side effects were attached.
//!
//! ```
//! use vyakarana::{Context, is_pragrhya};
//!
//! let ctx = Context::new().with("number", "dual");
//! assert!(is_pragrhya("harī", &ctx));
//! assert!(is_pragrhya("हरी", &ctx));
//! ```

extern crate self as vyakarana;

use std::borrow::Cow;
use std::fmt;

#[macro_use]
mod macros;
mod api;
pub mod context;
mod engine;
mod error;
mod rules;
pub mod script;

pub use api::{
    ClassificationVerbose, Options, allows_number_substitution, classify, classify_in, classify_token,
    classify_verbose_with, classify_with, default_registry, is_asishya, is_pragrhya,
};
pub use context::{Context, ContextValue};
pub use engine::{
    ClassificationResult, FamilyChain, Progress, Registry, RegistryBuilder, RunMetrics, Step, StepOutcome, Strategy,
    Trace,
};
pub use error::{ConfigError, PredicateFailure};
pub use script::{Script, Token, normalize};

/// Names of the built-in rule families.
pub mod family {
    /// Sandhi resistance (1.1.11–1.1.19), short-circuit-OR.
    pub const PRAGRHYA: &str = "pragrhya";
    /// Logical retention of what is not taught (1.2.53–1.2.57), accumulate-all.
    pub const ASISHYA: &str = "asishya";
    /// Substitutability of grammatical number (1.2.58–1.2.63), accumulate-all.
    pub const OPTIONAL_NUMBER: &str = "optional-number";

    /// Every built-in family, in the order they appear in the grammar.
    pub const ALL: &[&str] = &[PRAGRHYA, ASISHYA, OPTIONAL_NUMBER];
}

// --- Outcomes ----------------------------------------------------------------

/// What a single predicate says about a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The predicate does not apply to this token/context.
    NoOpinion,
    /// A definite answer with a reason code and confidence in `[0, 1]`.
    Decisive(Verdict),
    /// No membership decision, only side effects to merge into the result.
    Modifier(Effects),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub applies: bool,
    pub reason: Cow<'static, str>,
    pub confidence: f64,
}

impl Outcome {
    pub fn decisive(applies: bool, reason: impl Into<Cow<'static, str>>, confidence: f64) -> Self {
        Outcome::Decisive(Verdict { applies, reason: reason.into(), confidence: clamp_confidence(confidence) })
    }

    /// `Decisive(true, ..)`.
    pub fn grant(reason: impl Into<Cow<'static, str>>, confidence: f64) -> Self {
        Self::decisive(true, reason, confidence)
    }

    /// `Decisive(false, ..)`.
    pub fn deny(reason: impl Into<Cow<'static, str>>, confidence: f64) -> Self {
        Self::decisive(false, reason, confidence)
    }

    pub fn modify(effects: Effects) -> Self {
        Outcome::Modifier(effects)
    }
}

/// Clamp into `[0, 1]`; NaN collapses to 0.
pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

// --- Effects -----------------------------------------------------------------

bitflags::bitflags! {
    /// Side-effect flags a `Modifier` outcome can set or clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EffectFlags: u8 {
        /// The element has no phonetic realization.
        const SUPPRESS_PHONETIC       = 1 << 0;
        /// The element keeps triggering operations after elision.
        const RETAINED_FOR_OPERATIONS = 1 << 1;
        /// Vowel sandhi must not apply at the word boundary.
        const SANDHI_BLOCKED          = 1 << 2;
        /// The optional operation is obligatory here.
        const MANDATORY               = 1 << 3;
    }
}

/// Per-flag tri-state: unspecified, explicitly on, explicitly off.
///
/// Keeping "explicitly off" distinct from "unspecified" is what lets a later
/// rule withdraw an effect an earlier, blanket rule attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Effects {
    specified: EffectFlags,
    enabled: EffectFlags,
}

impl Effects {
    pub const fn none() -> Self {
        Effects { specified: EffectFlags::empty(), enabled: EffectFlags::empty() }
    }

    pub fn with(mut self, flag: EffectFlags, on: bool) -> Self {
        self.specified |= flag;
        self.enabled.set(flag, on);
        self
    }

    pub fn enable(self, flag: EffectFlags) -> Self {
        self.with(flag, true)
    }

    pub fn disable(self, flag: EffectFlags) -> Self {
        self.with(flag, false)
    }

    /// `None` when no rule said anything about `flag`.
    pub fn get(&self, flag: EffectFlags) -> Option<bool> {
        self.specified.contains(flag).then(|| self.enabled.contains(flag))
    }

    /// True only when `flag` was explicitly switched on.
    pub fn is_set(&self, flag: EffectFlags) -> bool {
        self.enabled.contains(flag)
    }

    pub fn suppress_phonetic(&self) -> bool {
        self.is_set(EffectFlags::SUPPRESS_PHONETIC)
    }

    pub fn is_empty(&self) -> bool {
        self.specified.is_empty()
    }

    pub fn specified(&self) -> EffectFlags {
        self.specified
    }

    pub fn active(&self) -> EffectFlags {
        self.enabled
    }

    /// Merge a later effect set into this one; the later set wins per flag.
    pub fn merge(&mut self, later: Effects) {
        self.enabled = (self.enabled - later.specified) | (later.enabled & later.specified);
        self.specified |= later.specified;
    }
}

impl fmt::Display for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for (name, flag) in self.specified.iter_names() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let sign = if self.enabled.contains(flag) { '+' } else { '-' };
            write!(f, "{}{}", sign, name.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

// --- Rules -------------------------------------------------------------------

/// A predicate body. Must be pure in `(Token, Context)`; the `Progress` view
/// is the only window onto what earlier rules in the chain decided.
pub type Evaluator = Box<dyn Fn(&Token, &Context, &Progress) -> Result<Outcome, PredicateFailure> + Send + Sync>;

/// One registered predicate: a stable id (usually the sūtra number), the
/// family it belongs to, and the evaluation function.
pub struct Rule {
    pub id: &'static str,
    pub family: &'static str,
    pub version: u16,
    /// Sūtra text or a one-line description, for reports.
    pub summary: &'static str,
    /// Context keys the predicate reads. Everything else is ignored.
    pub context_keys: &'static [&'static str],
    pub evaluate: Evaluator,
}

impl Rule {
    pub fn new<F, R>(id: &'static str, family: &'static str, evaluate: F) -> Self
    where
        F: Fn(&Token, &Context, &Progress) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Rule {
            id,
            family,
            version: 1,
            summary: "",
            context_keys: &[],
            evaluate: Box::new(move |token, context, progress| evaluate(token, context, progress).into_outcome()),
        }
    }

    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn with_summary(mut self, summary: &'static str) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_context_keys(mut self, keys: &'static [&'static str]) -> Self {
        self.context_keys = keys;
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("version", &self.version)
            .field("summary", &self.summary)
            .field("context_keys", &self.context_keys)
            .field("evaluate", &"<function>")
            .finish()
    }
}

// Trait to convert predicate bodies into outcomes
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure> {
        Ok(self)
    }
}

/// `None` reads as no opinion.
impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure> {
        self.map_or(Ok(Outcome::NoOpinion), IntoOutcome::into_outcome)
    }
}

impl IntoOutcome for Result<Outcome, PredicateFailure> {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure> {
        self
    }
}

impl IntoOutcome for Verdict {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure> {
        Ok(Outcome::Decisive(Verdict { confidence: clamp_confidence(self.confidence), ..self }))
    }
}

impl IntoOutcome for Effects {
    fn into_outcome(self) -> Result<Outcome, PredicateFailure> {
        Ok(Outcome::Modifier(self))
    }
}
