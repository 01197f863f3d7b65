use std::fmt;

use super::controller_index::ControllerIndex;
use super::directive::{Directive, ExclusiveGroup};
use super::error::CompileError;
use super::evaluation_report::EvaluationReport;
use super::markup::Markup;
use super::predicate::Predicate;
use super::rule::{CompiledRule, Rule};
use super::trigger::Trigger;
use super::value::Value;

/// Builder for constructing a [`RuleRegistry`].
///
/// Rules are defined via closures and compiled into an immutable, thread-safe
/// structure.
///
/// # Example
///
/// ```
/// use fieldgate::{RuleRegistryBuilder, hide, show, value};
///
/// let registry = RuleRegistryBuilder::new()
///     .rule("exam_sheet", |r| {
///         r.watch("generation_method")
///             .when(value().eq("지정"))
///             .then(show("exam_sheet"))
///             .otherwise(hide("exam_sheet"))
///     })
///     .compile()
///     .unwrap();
///
/// assert_eq!(
///     registry.evaluate("generation_method", &"지정".into()),
///     vec![show("exam_sheet")]
/// );
/// ```
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Rule>,
    groups: Vec<ExclusiveGroup>,
    injections: Vec<Markup>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug)]
pub struct RuleBuilder {
    controller: Option<String>,
    trigger: Trigger,
    deferred: bool,
    condition: Option<Predicate>,
    on_match: Vec<Directive>,
    on_no_match: Vec<Directive>,
}

impl RuleRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. The closure must call `.watch(key)` and `.when(predicate)`.
    ///
    /// Omitting either makes compilation fail with
    /// [`CompileError::MissingController`] or [`CompileError::MissingCondition`].
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder {
            controller: None,
            trigger: Trigger::Change,
            deferred: false,
            condition: None,
            on_match: Vec::new(),
            on_no_match: Vec::new(),
        });
        self.rules.push(Rule {
            name: name.to_owned(),
            controller: builder.controller,
            trigger: builder.trigger,
            deferred: builder.deferred,
            condition: builder.condition,
            on_match: builder.on_match,
            on_no_match: builder.on_no_match,
        });
        self
    }

    /// Declare an exclusive group that `exclusive(..)` directives can name.
    #[must_use]
    pub fn group(mut self, group: ExclusiveGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Declare an element the binder inserts before binding any rule.
    #[must_use]
    pub fn inject(mut self, markup: Markup) -> Self {
        self.injections.push(markup);
        self
    }

    /// Compile the rules into an immutable `RuleRegistry`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if validation fails.
    pub fn compile(self) -> Result<RuleRegistry, CompileError> {
        crate::compile::compile(&self.rules, self.groups, self.injections)
    }
}

impl RuleBuilder {
    /// Set the controller field whose value drives this rule.
    #[must_use]
    pub fn watch(mut self, controller: &str) -> Self {
        self.controller = Some(controller.to_owned());
        self
    }

    /// Set the event granularity that re-evaluates the controller.
    #[must_use]
    pub fn on(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Skip this rule during the binder's startup pass.
    ///
    /// For rules whose no-match branch must not run at page load, such as a
    /// checkbox that rewrites a text field when it is unchecked.
    #[must_use]
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Set the predicate over the controller value.
    #[must_use]
    pub fn when(mut self, condition: Predicate) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Append a directive to the match branch.
    #[must_use]
    pub fn then(mut self, directive: Directive) -> Self {
        self.on_match.push(directive);
        self
    }

    /// Append a directive to the no-match branch.
    #[must_use]
    pub fn otherwise(mut self, directive: Directive) -> Self {
        self.on_no_match.push(directive);
        self
    }
}

/// A compiled, immutable rule registry. Thread-safe and designed to live behind `Arc`.
#[derive(Debug)]
pub struct RuleRegistry {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) groups: Vec<ExclusiveGroup>,
    pub(crate) injections: Vec<Markup>,
    pub(crate) controllers: ControllerIndex,
}

impl RuleRegistry {
    /// Evaluate every rule watching `controller` against its current value.
    ///
    /// Directives come back in rule declaration order, each rule contributing
    /// its match or no-match branch. Exclusive-group directives are lowered to
    /// plain value writes. An unknown controller yields an empty list.
    #[must_use]
    pub fn evaluate(&self, controller: &str, current: &Value) -> Vec<Directive> {
        crate::evaluate::evaluate(
            &self.rules,
            &self.groups,
            self.controllers.rules_for(controller),
            current,
        )
    }

    /// Evaluate for the binder's startup pass: like [`evaluate`](Self::evaluate)
    /// but without deferred rules.
    #[must_use]
    pub fn evaluate_initial(&self, controller: &str, current: &Value) -> Vec<Directive> {
        let watchers: Vec<usize> = self
            .controllers
            .rules_for(controller)
            .iter()
            .copied()
            .filter(|&idx| !self.rules[idx].deferred)
            .collect();
        crate::evaluate::evaluate(&self.rules, &self.groups, &watchers, current)
    }

    /// Evaluate with diagnostics.
    ///
    /// Returns an [`EvaluationReport`] with the directives, which rules
    /// matched, and timing information.
    pub fn evaluate_detailed(&self, controller: &str, current: &Value) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(
            &self.rules,
            &self.groups,
            controller,
            self.controllers.rules_for(controller),
            current,
        )
    }

    /// Expand a single directive into primitive directives.
    ///
    /// Only [`Directive::MutuallyExclusiveSet`] expands, to the group's
    /// complete state (see [`ExclusiveGroup::settle`]); every other directive
    /// is returned as-is. A group this registry does not know expands to nothing.
    #[must_use]
    pub fn lower(&self, directive: &Directive) -> Vec<Directive> {
        match directive {
            Directive::MutuallyExclusiveSet { group, selected } => match self.group(group) {
                Some(g) => g.settle(selected.as_deref()),
                None => {
                    tracing::warn!(group = %group, "unknown exclusive group, directive dropped");
                    Vec::new()
                }
            },
            other => vec![other.clone()],
        }
    }

    /// Parse DSL text and compile it into a `RuleRegistry`.
    ///
    /// This is a convenience method combining [`parse`](crate::parse::parse)
    /// and [`RuleRegistryBuilder::compile()`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldgateError`](crate::FieldgateError) on parse or compile failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::FieldgateError> {
        let parsed = crate::parse::parse(input)?;
        let registry = crate::compile::compile(&parsed.rules, parsed.groups, parsed.injections)?;
        Ok(registry)
    }

    /// Read a DSL file and compile it into a `RuleRegistry`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldgateError`](crate::FieldgateError) on I/O, parse, or compile failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FieldgateError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }

    /// Distinct controller keys, in order of first appearance.
    #[must_use]
    pub fn controllers(&self) -> Vec<&str> {
        self.controllers.keys().collect()
    }

    /// The subscription granularity for a controller, or `None` if no rule
    /// watches it.
    #[must_use]
    pub fn trigger_for(&self, controller: &str) -> Option<Trigger> {
        self.controllers.trigger_for(controller)
    }

    /// Rule names in declaration order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of the rules watching a controller, in declaration order.
    #[must_use]
    pub fn watchers_of(&self, controller: &str) -> Vec<&str> {
        self.controllers
            .rules_for(controller)
            .iter()
            .map(|&idx| self.rules[idx].name.as_str())
            .collect()
    }

    #[must_use]
    pub fn groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&ExclusiveGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Elements the binder inserts at startup, in declaration order.
    #[must_use]
    pub fn injections(&self) -> &[Markup] {
        &self.injections
    }
}

impl fmt::Display for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleRegistry({} rules, {} controllers, {} groups, {} injections)",
            self.rules.len(),
            self.controllers.len(),
            self.groups.len(),
            self.injections.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clear, exclusive, hide, show, value};

    fn quiz_admin() -> RuleRegistry {
        RuleRegistryBuilder::new()
            .rule("exam_sheet", |r| {
                r.watch("generation_method")
                    .when(value().eq("지정"))
                    .then(show("exam_sheet"))
                    .otherwise(hide("exam_sheet"))
            })
            .rule("associated_process", |r| {
                r.watch("category")
                    .when(value().eq("공정"))
                    .then(show("associated_process"))
                    .otherwise(hide("associated_process"))
                    .otherwise(clear("associated_process"))
            })
            .compile()
            .unwrap()
    }

    #[test]
    fn builder_collects_rules() {
        let builder = RuleRegistryBuilder::new()
            .rule("a", |r| {
                r.watch("x")
                    .on(Trigger::Input)
                    .when(value().eq("1"))
                    .then(show("y"))
                    .otherwise(hide("y"))
            })
            .group(
                ExclusiveGroup::new("g", "c", "B")
                    .member("m1", "1")
                    .member("m2", "2"),
            )
            .inject(Markup::new("row", "x"));

        assert_eq!(builder.rules.len(), 1);
        assert_eq!(builder.rules[0].controller.as_deref(), Some("x"));
        assert_eq!(builder.rules[0].trigger, Trigger::Input);
        assert_eq!(builder.rules[0].on_match, vec![show("y")]);
        assert_eq!(builder.rules[0].on_no_match, vec![hide("y")]);
        assert_eq!(builder.groups.len(), 1);
        assert_eq!(builder.injections.len(), 1);
    }

    #[test]
    fn builder_rule_without_when_returns_error() {
        let result = RuleRegistryBuilder::new()
            .rule("bad_rule", |r| r.watch("x"))
            .compile();
        assert!(matches!(
            result,
            Err(CompileError::MissingCondition { rule }) if rule == "bad_rule"
        ));
    }

    #[test]
    fn builder_rule_without_watch_returns_error() {
        let result = RuleRegistryBuilder::new()
            .rule("bad_rule", |r| r.when(value().eq("x")))
            .compile();
        assert!(matches!(
            result,
            Err(CompileError::MissingController { rule }) if rule == "bad_rule"
        ));
    }

    #[test]
    fn introspection() {
        let registry = quiz_admin();
        assert_eq!(registry.controllers(), vec!["generation_method", "category"]);
        assert_eq!(registry.rule_names(), vec!["exam_sheet", "associated_process"]);
        assert_eq!(registry.watchers_of("category"), vec!["associated_process"]);
        assert!(registry.watchers_of("nope").is_empty());
        assert_eq!(registry.trigger_for("category"), Some(Trigger::Change));
        assert_eq!(registry.trigger_for("nope"), None);
    }

    #[test]
    fn display() {
        assert_eq!(
            quiz_admin().to_string(),
            "RuleRegistry(2 rules, 2 controllers, 0 groups, 0 injections)"
        );
    }

    #[test]
    fn lower_passes_primitives_through() {
        let registry = quiz_admin();
        assert_eq!(registry.lower(&show("a")), vec![show("a")]);
    }

    #[test]
    fn lower_unknown_group_is_empty() {
        let registry = quiz_admin();
        assert!(registry.lower(&exclusive("missing", None)).is_empty());
    }

    #[test]
    fn evaluate_initial_skips_deferred_rules() {
        let registry = RuleRegistryBuilder::new()
            .rule("options", |r| {
                r.watch("etch_tas")
                    .when(value().is_checked())
                    .then(show("note"))
                    .otherwise(hide("note"))
            })
            .rule("tas", |r| {
                r.watch("etch_tas")
                    .deferred()
                    .when(value().is_checked())
                    .otherwise(crate::set("process", "ETCH"))
            })
            .compile()
            .unwrap();
        let unchecked = Value::Bool(false);
        assert_eq!(
            registry.evaluate("etch_tas", &unchecked),
            vec![hide("note"), crate::set("process", "ETCH")]
        );
        assert_eq!(registry.evaluate_initial("etch_tas", &unchecked), vec![hide("note")]);
    }
}
