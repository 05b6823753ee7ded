//! Rule chain registration.
//!
//! This module holds the *static* side of the engine: one ordered chain of
//! rules per family, plus the evaluation strategy each family uses.
//!
//! Registration is split in two phases:
//!
//! 1. **Build** ([`RegistryBuilder`]): single-threaded, during process
//!    initialization. Rules are appended in registration order; a duplicate
//!    id inside a family fails immediately.
//! 2. **Sealed** ([`Registry`]): produced by [`RegistryBuilder::seal`]. There
//!    is no way to append to or reorder a sealed registry, so chains are
//!    read-only by construction and the registry can be shared across
//!    threads.
//!
//! ## Invariants
//!
//! - Chain order equals registration order.
//! - Rule ids are unique within a family (the same id may appear in two
//!   different families).
//! - A family that was never configured or registered has an empty chain and
//!   the default strategy; looking it up is not an error.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::Rule;
use crate::error::ConfigError;
use crate::family;

/// How a family's chain is combined into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Stop at the first `Decisive(true)`; `false`/no-opinion never stop.
    #[default]
    ShortCircuitOr,
    /// Evaluate every rule; applies if any rule granted.
    AccumulateAll,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ShortCircuitOr => f.write_str("short-circuit-or"),
            Strategy::AccumulateAll => f.write_str("accumulate-all"),
        }
    }
}

/// One family: its strategy and its rules in precedence order.
#[derive(Debug)]
pub struct FamilyChain {
    name: String,
    strategy: Strategy,
    rules: Vec<Rule>,
    ids: HashSet<&'static str>,
}

impl FamilyChain {
    fn new(name: &str, strategy: Strategy) -> Self {
        FamilyChain { name: name.to_string(), strategy, rules: Vec::new(), ids: HashSet::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Mutable registry used during initialization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    chains: Vec<FamilyChain>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// A builder with the built-in families configured (and still empty).
    pub fn with_builtin_families() -> Self {
        let mut builder = RegistryBuilder::new();
        builder.family_mut(family::PRAGRHYA, Strategy::ShortCircuitOr);
        builder.family_mut(family::ASISHYA, Strategy::AccumulateAll);
        builder.family_mut(family::OPTIONAL_NUMBER, Strategy::AccumulateAll);
        builder
    }

    /// Set the strategy for `family`.
    ///
    /// Re-configuring is allowed while the family is empty. Once rules are
    /// registered, asking for a different strategy is a `StrategyConflict`.
    pub fn configure(&mut self, family: &str, strategy: Strategy) -> Result<&mut Self, ConfigError> {
        match self.index.get(family).copied() {
            Some(idx) => {
                let chain = &mut self.chains[idx];
                if chain.strategy != strategy && !chain.is_empty() {
                    return Err(ConfigError::StrategyConflict {
                        family: family.to_string(),
                        existing: chain.strategy,
                        requested: strategy,
                    });
                }
                chain.strategy = strategy;
            }
            None => {
                self.family_mut(family, strategy);
            }
        }
        Ok(self)
    }

    /// Append `rule` to the chain of `rule.family`.
    pub fn register(&mut self, rule: Rule) -> Result<&mut Self, ConfigError> {
        if rule.id.trim().is_empty() {
            return Err(ConfigError::EmptyRuleId { family: rule.family.to_string() });
        }
        let chain = self.family_mut(rule.family, Strategy::default());
        if !chain.ids.insert(rule.id) {
            return Err(ConfigError::DuplicateRuleId { family: rule.family.to_string(), id: rule.id });
        }
        tracing::trace!(family = rule.family, rule = rule.id, position = chain.rules.len(), "registered rule");
        chain.rules.push(rule);
        Ok(self)
    }

    /// Register every rule in order, stopping at the first error.
    pub fn register_all(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<&mut Self, ConfigError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(self)
    }

    /// The chain registered so far for `family`.
    pub fn chain(&self, family: &str) -> &[Rule] {
        self.index.get(family).map(|&idx| self.chains[idx].rules()).unwrap_or(&[])
    }

    /// Freeze the registry. Nothing can be added afterwards.
    pub fn seal(self) -> Registry {
        let registry = Registry { chains: self.chains, index: self.index };
        tracing::debug!(families = registry.chains.len(), rules = registry.rule_count(), "rule registry sealed");
        registry
    }

    fn family_mut(&mut self, family: &str, strategy: Strategy) -> &mut FamilyChain {
        let idx = match self.index.get(family) {
            Some(&idx) => idx,
            None => {
                self.chains.push(FamilyChain::new(family, strategy));
                self.index.insert(family.to_string(), self.chains.len() - 1);
                self.chains.len() - 1
            }
        };
        &mut self.chains[idx]
    }
}

/// Sealed, read-only set of family chains.
#[derive(Debug, Default)]
pub struct Registry {
    chains: Vec<FamilyChain>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// A registry with no families at all.
    pub fn empty() -> Self {
        Registry::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn family(&self, family: &str) -> Option<&FamilyChain> {
        self.index.get(family).map(|&idx| &self.chains[idx])
    }

    /// Rules of `family` in registration order; empty for unknown families.
    pub fn chain(&self, family: &str) -> &[Rule] {
        self.family(family).map(FamilyChain::rules).unwrap_or(&[])
    }

    pub fn strategy(&self, family: &str) -> Strategy {
        self.family(family).map(FamilyChain::strategy).unwrap_or_default()
    }

    /// Families in the order they were first configured or registered.
    pub fn families(&self) -> impl Iterator<Item = &FamilyChain> {
        self.chains.iter()
    }

    pub fn rule_count(&self) -> usize {
        self.chains.iter().map(FamilyChain::len).sum()
    }
}
