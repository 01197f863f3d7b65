//! Declarative show/hide and value-sync rules for admin forms.
//!
//! A [`RuleRegistry`] maps controller field values to [`Directive`]s. A
//! [`Binder`] subscribes to the controllers through a [`FormAdapter`] and
//! applies the directives whenever a controller changes.

pub mod adapter;
mod bind;
mod compile;
mod error;
mod evaluate;
pub mod parse;
mod types;

pub use adapter::{AdapterError, ChangeEvent, FormAdapter, MemoryForm, Subscription};
pub use bind::{ApplyOutcome, Binder};
pub use error::FieldgateError;
pub use types::{
    CompileError, Directive, EvaluationReport, ExclusiveGroup, ExclusiveMember, Markup, Predicate,
    Rule, RuleBuilder, RuleRegistry, RuleRegistryBuilder, Trigger, Value, ValueExpr, clear,
    exclusive, hide, set, show, value,
};
