use std::collections::VecDeque;

use super::{AdapterError, ChangeEvent, FormAdapter, Subscription};
use crate::{Markup, Trigger, Value};

/// An ordered in-memory form.
///
/// Fields keep insertion order so injected elements land after their anchor.
/// The user-simulation methods ([`type_text`](Self::type_text),
/// [`commit`](Self::commit), [`check`](Self::check), [`select`](Self::select))
/// update the value and queue an event for subscribers; writes made through
/// [`FormAdapter`] do not.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: Vec<FieldState>,
    subscriptions: Vec<Subscription>,
    queue: VecDeque<ChangeEvent>,
}

#[derive(Debug, Clone)]
struct FieldState {
    key: String,
    value: Value,
    visible: bool,
    html: Option<String>,
}

impl MemoryForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible field. Re-adding a key replaces its value in place.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert_field(key, value.into());
        self
    }

    /// Add a visible field (mutable reference version).
    pub fn insert_field(&mut self, key: &str, value: Value) {
        match self.position(key) {
            Some(pos) => self.fields[pos].value = value,
            None => self.fields.push(FieldState::new(key, value)),
        }
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|pos| &self.fields[pos].value)
    }

    #[must_use]
    pub fn is_visible(&self, key: &str) -> Option<bool> {
        self.position(key).map(|pos| self.fields[pos].visible)
    }

    /// Markup an injected element was created from.
    #[must_use]
    pub fn html_of(&self, key: &str) -> Option<&str> {
        self.position(key)
            .and_then(|pos| self.fields[pos].html.as_deref())
    }

    /// Field keys in document order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Number of queued, undelivered events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Simulate a keystroke that leaves `text` in a text field.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    pub fn type_text(&mut self, key: &str, text: &str) -> Result<(), AdapterError> {
        self.user_write(key, Value::from(text), Trigger::Input)
    }

    /// Simulate a committed change, such as picking a select option or
    /// leaving a text field.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    pub fn commit(&mut self, key: &str, value: impl Into<Value>) -> Result<(), AdapterError> {
        self.user_write(key, value.into(), Trigger::Change)
    }

    /// Simulate toggling a checkbox.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    pub fn check(&mut self, key: &str, checked: bool) -> Result<(), AdapterError> {
        self.commit(key, checked)
    }

    /// Simulate picking an option in a select or radio group.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    pub fn select(&mut self, key: &str, option: &str) -> Result<(), AdapterError> {
        self.commit(key, option)
    }

    fn user_write(&mut self, key: &str, value: Value, kind: Trigger) -> Result<(), AdapterError> {
        let pos = self.require(key)?;
        self.fields[pos].value = value.clone();
        if self
            .subscriptions
            .iter()
            .any(|s| s.key == key && s.trigger.accepts(kind))
        {
            self.queue.push_back(ChangeEvent {
                key: key.to_owned(),
                value,
                kind,
            });
        }
        Ok(())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    fn require(&self, key: &str) -> Result<usize, AdapterError> {
        self.position(key).ok_or_else(|| AdapterError::MissingField {
            key: key.to_owned(),
        })
    }
}

impl FieldState {
    fn new(key: &str, value: Value) -> Self {
        Self {
            key: key.to_owned(),
            value,
            visible: true,
            html: None,
        }
    }
}

impl FormAdapter for MemoryForm {
    fn value(&self, key: &str) -> Result<Value, AdapterError> {
        let pos = self.require(key)?;
        Ok(self.fields[pos].value.clone())
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), AdapterError> {
        let pos = self.require(key)?;
        self.fields[pos].value = value;
        Ok(())
    }

    fn set_visible(&mut self, key: &str, visible: bool) -> Result<(), AdapterError> {
        let pos = self.require(key)?;
        self.fields[pos].visible = visible;
        Ok(())
    }

    fn on_change(&mut self, key: &str, trigger: Trigger) -> Result<Subscription, AdapterError> {
        self.require(key)?;
        let subscription = Subscription {
            id: self.subscriptions.len(),
            key: key.to_owned(),
            trigger,
        };
        self.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    fn next_event(&mut self) -> Option<ChangeEvent> {
        self.queue.pop_front()
    }

    fn insert_element(&mut self, markup: &Markup) -> Result<(), AdapterError> {
        let mut at = self.require(&markup.after)? + 1;

        if self.position(&markup.key).is_none() {
            let mut row = FieldState::new(&markup.key, Value::Text(String::new()));
            row.visible = markup.visible;
            row.html = Some(markup.html.clone());
            self.fields.insert(at, row);
            at += 1;
        }

        for (key, initial) in &markup.fields {
            if self.position(key).is_none() {
                self.fields.insert(at, FieldState::new(key, initial.clone()));
                at += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> MemoryForm {
        MemoryForm::new()
            .field("generation_method", "랜덤")
            .field("exam_sheet", "")
            .field("process", "")
    }

    #[test]
    fn field_and_get() {
        let f = form();
        assert_eq!(f.get("generation_method"), Some(&Value::from("랜덤")));
        assert_eq!(f.is_visible("exam_sheet"), Some(true));
        assert_eq!(f.get("missing"), None);
        assert_eq!(f.is_visible("missing"), None);
    }

    #[test]
    fn readding_field_keeps_position() {
        let f = form().field("generation_method", "지정");
        assert_eq!(f.keys(), vec!["generation_method", "exam_sheet", "process"]);
        assert_eq!(f.get("generation_method"), Some(&Value::from("지정")));
    }

    #[test]
    fn adapter_writes_do_not_queue_events() {
        let mut f = form();
        f.on_change("generation_method", Trigger::Change).unwrap();
        f.set_value("generation_method", Value::from("지정")).unwrap();
        f.set_visible("exam_sheet", false).unwrap();
        assert_eq!(f.pending_events(), 0);
        assert_eq!(f.is_visible("exam_sheet"), Some(false));
    }

    #[test]
    fn adapter_reports_missing_field() {
        let mut f = form();
        let missing = AdapterError::MissingField {
            key: "nope".into(),
        };
        assert_eq!(f.value("nope"), Err(missing.clone()));
        assert_eq!(f.set_value("nope", Value::Bool(true)), Err(missing.clone()));
        assert_eq!(f.set_visible("nope", true), Err(missing.clone()));
        assert_eq!(f.on_change("nope", Trigger::Change), Err(missing.clone()));
        assert_eq!(f.commit("nope", "x"), Err(missing));
    }

    #[test]
    fn unsubscribed_changes_are_not_queued() {
        let mut f = form();
        f.select("generation_method", "지정").unwrap();
        assert_eq!(f.pending_events(), 0);
        assert_eq!(f.get("generation_method"), Some(&Value::from("지정")));
    }

    #[test]
    fn change_subscription_skips_keystrokes() {
        let mut f = form();
        f.on_change("process", Trigger::Change).unwrap();
        f.type_text("process", "E").unwrap();
        assert_eq!(f.pending_events(), 0);
        f.commit("process", "ETCH").unwrap();
        assert_eq!(
            f.next_event(),
            Some(ChangeEvent::new("process", "ETCH", Trigger::Change))
        );
    }

    #[test]
    fn input_subscription_gets_both_kinds_in_order() {
        let mut f = form();
        f.on_change("process", Trigger::Input).unwrap();
        f.type_text("process", "E").unwrap();
        f.type_text("process", "ET").unwrap();
        f.commit("process", "ET").unwrap();
        assert_eq!(f.pending_events(), 3);
        assert_eq!(f.next_event().map(|e| e.value), Some(Value::from("E")));
        assert_eq!(f.next_event().map(|e| e.value), Some(Value::from("ET")));
        assert_eq!(f.next_event().map(|e| e.kind), Some(Trigger::Change));
        assert_eq!(f.next_event(), None);
    }

    #[test]
    fn subscriptions_are_numbered() {
        let mut f = form();
        let a = f.on_change("process", Trigger::Input).unwrap();
        let b = f.on_change("generation_method", Trigger::Change).unwrap();
        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
        assert_eq!(f.subscriptions().len(), 2);
    }

    #[test]
    fn insert_element_after_anchor() {
        let mut f = form();
        let markup = Markup::new("etch_options", "exam_sheet")
            .html("<div class=\"form-row field-etch_options\"></div>")
            .field("etch_tas", false)
            .field("etch_lam", false)
            .hidden();
        f.insert_element(&markup).unwrap();

        assert_eq!(
            f.keys(),
            vec![
                "generation_method",
                "exam_sheet",
                "etch_options",
                "etch_tas",
                "etch_lam",
                "process"
            ]
        );
        assert_eq!(f.is_visible("etch_options"), Some(false));
        assert_eq!(f.is_visible("etch_tas"), Some(true));
        assert_eq!(f.get("etch_lam"), Some(&Value::Bool(false)));
        assert_eq!(
            f.html_of("etch_options"),
            Some("<div class=\"form-row field-etch_options\"></div>")
        );
    }

    #[test]
    fn insert_element_missing_anchor() {
        let mut f = form();
        assert_eq!(
            f.insert_element(&Markup::new("row", "nope")),
            Err(AdapterError::MissingField { key: "nope".into() })
        );
    }

    #[test]
    fn insert_element_keeps_existing_fields() {
        let mut f = form().field("etch_tas", true);
        f.insert_element(&Markup::new("row", "process").field("etch_tas", false))
            .unwrap();
        assert_eq!(f.get("etch_tas"), Some(&Value::Bool(true)));
    }
}
