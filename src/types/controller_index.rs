use std::collections::HashMap;

use super::trigger::Trigger;

/// Maps controller keys to the rules that watch them.
///
/// Built during compilation. Keys keep first-appearance order so the binder
/// subscribes and runs its startup pass in declaration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ControllerIndex {
    order: Vec<String>,
    entries: HashMap<String, ControllerEntry>,
}

#[derive(Debug, Clone)]
struct ControllerEntry {
    rules: Vec<usize>,
    trigger: Trigger,
}

impl ControllerIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that rule `rule_index` watches `key` with `trigger`. Triggers
    /// from several rules on one controller widen to the finest granularity.
    pub(crate) fn register(&mut self, key: &str, rule_index: usize, trigger: Trigger) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.rules.push(rule_index);
            entry.trigger = entry.trigger.widen(trigger);
            return;
        }
        self.order.push(key.to_owned());
        self.entries.insert(
            key.to_owned(),
            ControllerEntry {
                rules: vec![rule_index],
                trigger,
            },
        );
    }

    /// Indices of the rules watching `key`, in declaration order.
    pub(crate) fn rules_for(&self, key: &str) -> &[usize] {
        self.entries.get(key).map_or(&[], |e| e.rules.as_slice())
    }

    pub(crate) fn trigger_for(&self, key: &str) -> Option<Trigger> {
        self.entries.get(key).map(|e| e.trigger)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
