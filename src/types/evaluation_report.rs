use std::fmt;
use std::time::Duration;

use super::directive::Directive;

/// Detailed evaluation report returned by
/// [`RuleRegistry::evaluate_detailed()`](super::registry::RuleRegistry::evaluate_detailed).
///
/// Contains the directives, which rules matched and which did not, and the
/// wall-clock duration of the evaluation. The resolution helpers apply the
/// last-write-wins policy without touching a form.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    controller: String,
    directives: Vec<Directive>,
    matched: Vec<String>,
    unmatched: Vec<String>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        controller: String,
        directives: Vec<Directive>,
        matched: Vec<String>,
        unmatched: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            controller,
            directives,
            matched,
            unmatched,
            duration,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// The directives, same as [`RuleRegistry::evaluate()`](super::registry::RuleRegistry::evaluate).
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Names of rules whose predicate matched, in declaration order.
    #[must_use]
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    /// Names of rules watching the controller whose predicate did not match.
    #[must_use]
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Net visibility of `target` once every directive has been applied.
    #[must_use]
    pub fn visibility(&self, target: &str) -> Option<bool> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::SetVisible {
                target: t,
                visible,
            } if t == target => Some(*visible),
            _ => None,
        })
    }

    /// The last value write (`SetValue` or `ClearValue`) aimed at `target`.
    #[must_use]
    pub fn final_write(&self, target: &str) -> Option<&Directive> {
        self.directives.iter().rev().find(|d| match d {
            Directive::SetValue { target: t, .. } | Directive::ClearValue { target: t } => {
                t == target
            }
            _ => false,
        })
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller: {}", self.controller)?;
        write!(f, ", matched: [{}]", self.matched.join(", "))?;
        let directives: Vec<String> = self.directives.iter().map(ToString::to_string).collect();
        write!(f, ", directives: [{}]", directives.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clear, hide, set, show};

    fn report(directives: Vec<Directive>) -> EvaluationReport {
        EvaluationReport::new(
            "category".into(),
            directives,
            vec!["a".into()],
            vec!["b".into()],
            Duration::ZERO,
        )
    }

    #[test]
    fn visibility_last_write_wins() {
        let r = report(vec![show("x"), hide("y"), hide("x")]);
        assert_eq!(r.visibility("x"), Some(false));
        assert_eq!(r.visibility("y"), Some(false));
        assert_eq!(r.visibility("z"), None);
    }

    #[test]
    fn final_write_ignores_visibility() {
        let r = report(vec![set("x", "a"), show("x"), clear("x")]);
        assert_eq!(r.final_write("x"), Some(&clear("x")));
        assert_eq!(r.final_write("y"), None);
    }

    #[test]
    fn display() {
        let r = report(vec![show("exam_sheet")]);
        assert_eq!(
            r.to_string(),
            "controller: category, matched: [a], directives: [show exam_sheet], duration: 0ns"
        );
    }
}
