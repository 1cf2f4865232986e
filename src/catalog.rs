//! Runtime lookup over loaded catalogs.

/// Placeholder substitution
pub mod args;
/// Numerus rules
pub mod plural;
/// Installed catalog stack
pub mod stack;
/// Single-catalog lookup table
pub mod table;

pub use args::{
    placeholders,
    substitute,
    substitute_count,
};
pub use plural::NumerusRule;
pub use stack::TranslatorStack;
pub use table::{
    Catalog,
    LookupOptions,
};
