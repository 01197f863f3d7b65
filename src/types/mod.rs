mod controller_index;
mod directive;
mod error;
mod evaluation_report;
mod markup;
mod predicate;
mod registry;
mod rule;
mod trigger;
mod value;

pub use directive::{
    Directive, ExclusiveGroup, ExclusiveMember, clear, exclusive, hide, set, show,
};
pub use error::CompileError;
pub use evaluation_report::EvaluationReport;
pub use markup::Markup;
pub use predicate::{Predicate, ValueExpr, value};
pub use registry::{RuleBuilder, RuleRegistry, RuleRegistryBuilder};
pub use rule::Rule;
pub use trigger::Trigger;
pub use value::Value;

pub(crate) use controller_index::ControllerIndex;
pub(crate) use rule::{CompiledDirective, CompiledRule};
