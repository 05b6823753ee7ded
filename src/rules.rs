//! Built-in rule families.
//!
//! Each family lives in `src/rules/<family>/`: `rules.rs` declares the
//! predicates in sūtra order and exposes `get()`, while word lists and shared
//! checks sit beside it. The engine hosts these exactly like caller-supplied
//! rules.

use crate::engine::RegistryBuilder;
use crate::error::ConfigError;

pub mod pragrhya {
    pub mod predicates;
    pub mod rules;

    #[cfg(test)]
    mod tests;
}

pub mod asishya {
    pub mod rules;

    #[cfg(test)]
    mod tests;
}

pub mod number {
    pub mod lexicon;
    pub mod rules;

    #[cfg(test)]
    mod tests;
}

/// A builder with every built-in family configured and registered.
pub fn builtin() -> Result<RegistryBuilder, ConfigError> {
    let mut builder = RegistryBuilder::with_builtin_families();
    builder.register_all(pragrhya::rules::get())?;
    builder.register_all(asishya::rules::get())?;
    builder.register_all(number::rules::get())?;
    Ok(builder)
}
