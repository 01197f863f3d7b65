//! The boundary between the engine and the page that hosts the form.
//!
//! The engine never touches a rendering surface. Everything it reads or
//! writes goes through [`FormAdapter`], which the host implements over its
//! real widgets. [`MemoryForm`] is an in-memory implementation for tests,
//! demos and headless hosts.

mod memory;

use std::fmt;

use thiserror::Error;

use crate::{Markup, Trigger, Value};

pub use memory::MemoryForm;

/// Failures a host can report back to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("field '{key}' is not present in the form")]
    MissingField { key: String },

    #[error("adapter does not support {capability}")]
    Unsupported { capability: &'static str },
}

/// Handle returned by [`FormAdapter::on_change`]. Subscriptions live as long
/// as the form; there is no teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: usize,
    pub key: String,
    pub trigger: Trigger,
}

/// A user-originated change to a field, as queued by the host.
///
/// `kind` is the granularity of the DOM event that produced it:
/// [`Trigger::Input`] for keystrokes, [`Trigger::Change`] for commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
    pub value: Value,
    pub kind: Trigger,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(key: &str, value: impl Into<Value>, kind: Trigger) -> Self {
        Self {
            key: key.to_owned(),
            value: value.into(),
            kind,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {}", self.kind, self.key, self.value)
    }
}

/// Capabilities the engine needs from the hosting form.
///
/// Writes made through this trait are programmatic and must not produce
/// change events, matching how DOM property writes behave.
pub trait FormAdapter {
    /// Current normalized value of a field.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    fn value(&self, key: &str) -> Result<Value, AdapterError>;

    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), AdapterError>;

    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    fn set_visible(&mut self, key: &str, visible: bool) -> Result<(), AdapterError>;

    /// Start delivering events for `key` at the given granularity.
    ///
    /// # Errors
    ///
    /// [`AdapterError::MissingField`] if the key does not resolve.
    fn on_change(&mut self, key: &str, trigger: Trigger) -> Result<Subscription, AdapterError>;

    /// Pop the oldest undelivered event, if any.
    fn next_event(&mut self) -> Option<ChangeEvent>;

    /// Insert an element after an existing field.
    ///
    /// Optional: the default reports [`AdapterError::Unsupported`], and rules
    /// that depend on injected fields then see them as missing.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Unsupported`] by default; implementations report
    /// [`AdapterError::MissingField`] when the anchor does not resolve.
    fn insert_element(&mut self, markup: &Markup) -> Result<(), AdapterError> {
        let _ = markup;
        Err(AdapterError::Unsupported {
            capability: "element insertion",
        })
    }
}
