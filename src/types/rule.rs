use super::directive::Directive;
use super::predicate::Predicate;
use super::trigger::Trigger;

/// A named rule: a controller field, a predicate over its value, and the
/// directives to apply when the predicate does or does not match.
///
/// Rules are created via [`RuleRegistryBuilder`](super::RuleRegistryBuilder) or by
/// parsing DSL text with [`RuleRegistry::from_dsl()`](super::RuleRegistry::from_dsl).
/// `controller` and `condition` stay `None` until the rule builder sets them.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub controller: Option<String>,
    pub trigger: Trigger,
    /// Deferred rules sit out the binder's startup pass and only react to
    /// change events.
    pub deferred: bool,
    pub condition: Option<Predicate>,
    pub on_match: Vec<Directive>,
    pub on_no_match: Vec<Directive>,
}

/// A rule whose group references have been resolved to indices into the
/// registry's exclusive groups. Its controller lives in the registry's
/// controller index.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) name: String,
    pub(crate) condition: Predicate,
    pub(crate) deferred: bool,
    pub(crate) on_match: Vec<CompiledDirective>,
    pub(crate) on_no_match: Vec<CompiledDirective>,
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledDirective {
    Primitive(Directive),
    Exclusive {
        group: usize,
        selected: Option<String>,
    },
}
