use std::collections::{HashMap, HashSet};

use crate::types::{CompiledDirective, CompiledRule, ControllerIndex};
use crate::{CompileError, Directive, ExclusiveGroup, Markup, Rule, RuleRegistry};

pub(crate) fn compile(
    rules: &[Rule],
    groups: Vec<ExclusiveGroup>,
    injections: Vec<Markup>,
) -> Result<RuleRegistry, CompileError> {
    check_duplicates(rules)?;
    check_groups(&groups)?;
    check_injections(&injections)?;

    let group_indices: HashMap<&str, usize> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (g.name.as_str(), i))
        .collect();

    let mut controllers = ControllerIndex::new();
    let mut compiled_rules = Vec::with_capacity(rules.len());

    for (index, rule) in rules.iter().enumerate() {
        let controller = rule
            .controller
            .clone()
            .ok_or_else(|| CompileError::MissingController {
                rule: rule.name.clone(),
            })?;
        let condition = rule
            .condition
            .clone()
            .ok_or_else(|| CompileError::MissingCondition {
                rule: rule.name.clone(),
            })?;

        check_exhaustive(rule)?;

        let on_match = compile_branch(rule, &rule.on_match, &groups, &group_indices)?;
        let on_no_match = compile_branch(rule, &rule.on_no_match, &groups, &group_indices)?;

        controllers.register(&controller, index, rule.trigger);
        compiled_rules.push(CompiledRule {
            name: rule.name.clone(),
            condition,
            deferred: rule.deferred,
            on_match,
            on_no_match,
        });
    }

    Ok(RuleRegistry {
        rules: compiled_rules,
        groups,
        injections,
        controllers,
    })
}

fn check_duplicates(rules: &[Rule]) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(&rule.name) {
            return Err(CompileError::DuplicateRule {
                name: rule.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_groups(groups: &[ExclusiveGroup]) -> Result<(), CompileError> {
    let mut names = HashSet::new();
    for group in groups {
        if !names.insert(group.name.as_str()) {
            return Err(CompileError::DuplicateGroup {
                name: group.name.clone(),
            });
        }
        if group.members.len() < 2 {
            return Err(CompileError::DegenerateGroup {
                name: group.name.clone(),
            });
        }
        let mut members = HashSet::new();
        for member in &group.members {
            if !members.insert(member.key.as_str()) {
                return Err(CompileError::DuplicateMember {
                    group: group.name.clone(),
                    member: member.key.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_injections(injections: &[Markup]) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for markup in injections {
        if !seen.insert(markup.key.as_str()) {
            return Err(CompileError::DuplicateInjection {
                key: markup.key.clone(),
            });
        }
    }
    Ok(())
}

/// Every field whose visibility one branch sets must have its visibility set
/// by the other branch too, so no controller transition can strand it.
fn check_exhaustive(rule: &Rule) -> Result<(), CompileError> {
    let shown_on_match = visibility_targets(&rule.on_match);
    let shown_on_no_match = visibility_targets(&rule.on_no_match);

    let stranded = shown_on_match
        .iter()
        .find(|t| !shown_on_no_match.contains(*t))
        .or_else(|| {
            shown_on_no_match
                .iter()
                .find(|t| !shown_on_match.contains(*t))
        });

    match stranded {
        Some(target) => Err(CompileError::NonExhaustiveVisibility {
            rule: rule.name.clone(),
            target: (*target).to_owned(),
        }),
        None => Ok(()),
    }
}

/// Visibility targets in first-appearance order.
fn visibility_targets(branch: &[Directive]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for directive in branch {
        if let Directive::SetVisible { target, .. } = directive {
            if !out.contains(&target.as_str()) {
                out.push(target);
            }
        }
    }
    out
}

fn compile_branch(
    rule: &Rule,
    branch: &[Directive],
    groups: &[ExclusiveGroup],
    group_indices: &HashMap<&str, usize>,
) -> Result<Vec<CompiledDirective>, CompileError> {
    branch
        .iter()
        .map(|directive| match directive {
            Directive::MutuallyExclusiveSet { group, selected } => {
                let idx = *group_indices.get(group.as_str()).ok_or_else(|| {
                    CompileError::UndefinedGroup {
                        rule: rule.name.clone(),
                        group: group.clone(),
                    }
                })?;
                if let Some(member) = selected {
                    if !groups[idx].members.iter().any(|m| &m.key == member) {
                        return Err(CompileError::UnknownMember {
                            rule: rule.name.clone(),
                            group: group.clone(),
                            member: member.clone(),
                        });
                    }
                }
                Ok(CompiledDirective::Exclusive {
                    group: idx,
                    selected: selected.clone(),
                })
            }
            other => Ok(CompiledDirective::Primitive(other.clone())),
        })
        .collect()
}
