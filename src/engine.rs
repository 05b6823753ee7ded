//! Rule-chain composition engine.
//!
//! The engine is split into focused submodules under `src/engine/` while the
//! crate root re-exports the types callers need.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all) ──┐
//!               │  RegistryBuilder::register        (registry.rs)
//!               │  - append to the family chain
//!               │  - reject duplicate ids
//!               └──────────────┬─────────────
//!                              │ seal()
//!                              v
//!                          Registry  (read-only from here on)
//!                              │
//! raw ── script::normalize ────┼─ Token
//!                              v
//!                    Composer::evaluate              (composer.rs)
//!                      - walk the chain in order
//!                      - short-circuit-OR | accumulate-all
//!                      - isolate failing predicates
//!                              │
//!                              v
//!                            Trace                   (trace.rs)
//!                              │
//!                              v
//!                    report::report                  (report.rs)
//!                              │
//!                              v
//!                    ClassificationResult
//! ```
//!
//! Chain order is the only precedence mechanism. Predicates never see each
//! other; they only receive the cumulative [`Progress`] the composer has
//! built so far.
//!
//! ## Responsibilities by module
//!
//! - `registry.rs`: family chains, strategies, registration-time validation.
//! - `composer.rs`: evaluation strategies and per-predicate failure isolation.
//! - `trace.rs`: the per-call decision trace and the `Progress` view.
//! - `report.rs`: projects a trace into the stable `ClassificationResult`.
//! - `metrics.rs`: optional timing data for verbose runs.
//!
//! ## Concurrency
//!
//! Registration happens once, single-threaded, before any classification.
//! A sealed [`Registry`] is immutable and `Sync`; evaluating it from many
//! threads at once needs no locking. Nothing here blocks or performs I/O.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events (`trace` per predicate, `debug` per
//! decision, `warn` per failing predicate). The CLI reads `VYAKARANA_LOG`.

#[path = "engine/composer.rs"]
mod composer;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/report.rs"]
mod report;
#[path = "engine/trace.rs"]
mod trace;

pub use composer::Composer;
pub use metrics::{RunMetrics, RunResult};
pub use registry::{FamilyChain, Registry, RegistryBuilder, Strategy};
pub use report::ClassificationResult;
pub use trace::{Progress, Step, StepOutcome, Trace};
