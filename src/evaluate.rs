use std::time::Instant;

use crate::types::{CompiledDirective, CompiledRule};
use crate::{Directive, EvaluationReport, ExclusiveGroup, Value};

pub(crate) fn evaluate(
    rules: &[CompiledRule],
    groups: &[ExclusiveGroup],
    watchers: &[usize],
    current: &Value,
) -> Vec<Directive> {
    let mut out = Vec::new();
    for &idx in watchers {
        let rule = &rules[idx];
        let branch = if rule.condition.matches(current) {
            &rule.on_match
        } else {
            &rule.on_no_match
        };
        emit_branch(branch, groups, &mut out);
    }
    out
}

pub(crate) fn evaluate_detailed(
    rules: &[CompiledRule],
    groups: &[ExclusiveGroup],
    controller: &str,
    watchers: &[usize],
    current: &Value,
) -> EvaluationReport {
    let start = Instant::now();

    let mut directives = Vec::new();
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for &idx in watchers {
        let rule = &rules[idx];
        let branch = if rule.condition.matches(current) {
            matched.push(rule.name.clone());
            &rule.on_match
        } else {
            unmatched.push(rule.name.clone());
            &rule.on_no_match
        };
        emit_branch(branch, groups, &mut directives);
    }

    let duration = start.elapsed();
    tracing::debug!(
        controller,
        value = %current,
        matched = matched.len(),
        directives = directives.len(),
        "evaluated controller"
    );

    EvaluationReport::new(
        controller.to_owned(),
        directives,
        matched,
        unmatched,
        duration,
    )
}

fn emit_branch(branch: &[CompiledDirective], groups: &[ExclusiveGroup], out: &mut Vec<Directive>) {
    for directive in branch {
        match directive {
            CompiledDirective::Primitive(d) => out.push(d.clone()),
            CompiledDirective::Exclusive { group, selected } => {
                out.extend(groups[*group].lower(selected.as_deref()));
            }
        }
    }
}
