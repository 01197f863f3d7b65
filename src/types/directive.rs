use std::fmt;

use super::Value;

/// One atomic effect produced by rule evaluation.
///
/// [`Directive::MutuallyExclusiveSet`] is a configuration-level directive:
/// evaluation lowers it into the [`Directive::SetValue`] writes that enforce
/// the group, so evaluation output only ever holds the three primitive kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    SetVisible { target: String, visible: bool },
    SetValue { target: String, value: Value },
    ClearValue { target: String },
    MutuallyExclusiveSet {
        group: String,
        selected: Option<String>,
    },
}

impl Directive {
    /// The field this directive writes to, or `None` for group directives.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Directive::SetVisible { target, .. }
            | Directive::SetValue { target, .. }
            | Directive::ClearValue { target } => Some(target.as_str()),
            Directive::MutuallyExclusiveSet { .. } => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::SetVisible {
                target,
                visible: true,
            } => write!(f, "show {target}"),
            Directive::SetVisible {
                target,
                visible: false,
            } => write!(f, "hide {target}"),
            Directive::SetValue { target, value } => write!(f, "set {target} = {value}"),
            Directive::ClearValue { target } => write!(f, "clear {target}"),
            Directive::MutuallyExclusiveSet { group, selected } => match selected {
                Some(member) => write!(f, "exclusive {group} select {member}"),
                None => write!(f, "exclusive {group} select none"),
            },
        }
    }
}

#[must_use]
pub fn show(target: &str) -> Directive {
    Directive::SetVisible {
        target: target.to_owned(),
        visible: true,
    }
}

#[must_use]
pub fn hide(target: &str) -> Directive {
    Directive::SetVisible {
        target: target.to_owned(),
        visible: false,
    }
}

#[must_use]
pub fn set(target: &str, value: impl Into<Value>) -> Directive {
    Directive::SetValue {
        target: target.to_owned(),
        value: value.into(),
    }
}

#[must_use]
pub fn clear(target: &str) -> Directive {
    Directive::ClearValue {
        target: target.to_owned(),
    }
}

/// Select `member` in the exclusive group `group`; `None` deselects all.
#[must_use]
pub fn exclusive(group: &str, member: Option<&str>) -> Directive {
    Directive::MutuallyExclusiveSet {
        group: group.to_owned(),
        selected: member.map(str::to_owned),
    }
}

/// A set of checkbox-like fields of which at most one may be checked, plus
/// the composite text field that mirrors the selection.
///
/// The composite holds `base` when nothing is selected and
/// `base + separator + token` when a member is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveGroup {
    pub name: String,
    pub composite: String,
    pub base: String,
    pub separator: String,
    pub members: Vec<ExclusiveMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveMember {
    pub key: String,
    pub token: String,
}

impl ExclusiveGroup {
    /// Create a group with the default `"_"` separator and no members.
    #[must_use]
    pub fn new(name: &str, composite: &str, base: &str) -> Self {
        Self {
            name: name.to_owned(),
            composite: composite.to_owned(),
            base: base.to_owned(),
            separator: "_".to_owned(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn member(mut self, key: &str, token: &str) -> Self {
        self.members.push(ExclusiveMember {
            key: key.to_owned(),
            token: token.to_owned(),
        });
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_owned();
        self
    }

    /// The composite value for a selection. Unknown members compose to `base`.
    #[must_use]
    pub fn compose(&self, selected: Option<&str>) -> String {
        match selected.and_then(|key| self.members.iter().find(|m| m.key == key)) {
            Some(m) => format!("{}{}{}", self.base, self.separator, m.token),
            None => self.base.clone(),
        }
    }

    /// Expand a selection into primitive writes: the composite first, then
    /// every other member unchecked, in member order.
    #[must_use]
    pub fn lower(&self, selected: Option<&str>) -> Vec<Directive> {
        let mut out = Vec::with_capacity(self.members.len() + 1);
        out.push(Directive::SetValue {
            target: self.composite.clone(),
            value: Value::Text(self.compose(selected)),
        });
        for m in &self.members {
            if Some(m.key.as_str()) != selected {
                out.push(Directive::SetValue {
                    target: m.key.clone(),
                    value: Value::Bool(false),
                });
            }
        }
        out
    }

    /// The complete group state for a selection: [`lower`](Self::lower) plus
    /// the selected member checked. An unknown member settles like `None`.
    #[must_use]
    pub fn settle(&self, selected: Option<&str>) -> Vec<Directive> {
        let mut out = self.lower(selected);
        if let Some(m) = selected.and_then(|key| self.members.iter().find(|m| m.key == key)) {
            out.insert(
                1,
                Directive::SetValue {
                    target: m.key.clone(),
                    value: Value::Bool(true),
                },
            );
        }
        out
    }
}
