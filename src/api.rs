use crate::engine::{self, ClassificationResult, Composer, Registry, RunMetrics, Trace};
use crate::script::{self, Token};
use crate::{Context, family};
use once_cell::sync::Lazy;

static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(|| match crate::rules::builtin() {
    Ok(builder) => builder.seal(),
    Err(err) => panic!("built-in rule set is misconfigured: {err}"),
});

/// Options that affect how a trace is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Penalty subtracted per extra grant under accumulate-all, clamped to `[0, 1]`.
    pub confidence_step: f64,
    /// List `NoOpinion` steps in `reasons`.
    pub trace_reasons: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { confidence_step: 0.1, trace_reasons: true }
    }
}

/// Result from [`classify_verbose_with`].
#[derive(Debug, Clone)]
pub struct ClassificationVerbose {
    /// The raw input text.
    pub text: String,
    pub result: ClassificationResult,
    /// Every evaluated step, in chain order.
    pub trace: Trace,
    pub metrics: RunMetrics,
}

/// The process-wide registry holding the built-in families.
///
/// Built on first use and sealed; it never changes afterwards.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Classify `text` under `family` using the built-in rules and default [`Options`].
///
/// # Example
/// ```
/// use vyakarana::{Context, classify, family};
///
/// let ctx = Context::new().with("number", "dual");
/// let result = classify(family::PRAGRHYA, "harī", &ctx);
/// assert!(result.applies);
/// assert_eq!(result.fired_rule_ids, vec!["1.1.11"]);
/// ```
pub fn classify(family: &str, text: &str, context: &Context) -> ClassificationResult {
    classify_with(family, text, context, &Options::default())
}

/// Classify `text` under `family` using the built-in rules.
pub fn classify_with(family: &str, text: &str, context: &Context, options: &Options) -> ClassificationResult {
    classify_in(default_registry(), family, text, context, options)
}

/// Classify `text` against a caller-built registry.
pub fn classify_in(
    registry: &Registry,
    family: &str,
    text: &str,
    context: &Context,
    options: &Options,
) -> ClassificationResult {
    classify_token(registry, family, &script::normalize(text), context, options)
}

/// Classify an already normalized token.
pub fn classify_token(
    registry: &Registry,
    family: &str,
    token: &Token,
    context: &Context,
    options: &Options,
) -> ClassificationResult {
    Composer::new(registry, family).run(token, context, options)
}

/// Classify `text` and return the decision trace and timings as well.
///
/// This is useful for rule debugging. The plain [`classify_with`] path does
/// not time anything or keep the trace.
pub fn classify_verbose_with(
    registry: &Registry,
    family: &str,
    text: &str,
    context: &Context,
    options: &Options,
) -> ClassificationVerbose {
    let engine::RunResult { result, trace, metrics } =
        Composer::new(registry, family).run_with_metrics(text, context, options);
    ClassificationVerbose { text: text.to_string(), result, trace, metrics }
}

/// Does `text` resist vowel sandhi (1.1.11–1.1.19)?
pub fn is_pragrhya(text: &str, context: &Context) -> bool {
    classify(family::PRAGRHYA, text, context).applies
}

/// Is the meaning of `text` left untaught (1.2.53–1.2.57)?
pub fn is_asishya(text: &str, context: &Context) -> bool {
    classify(family::ASISHYA, text, context).applies
}

/// May the number of `text` be replaced (1.2.58–1.2.63)?
pub fn allows_number_substitution(text: &str, context: &Context) -> bool {
    classify(family::OPTIONAL_NUMBER, text, context).applies
}
