use std::fmt;

/// A normalized form field value.
///
/// Text inputs, single selects and radio groups all surface as [`Value::Text`];
/// checkboxes surface as [`Value::Bool`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// The textual value of an input, select or radio group.
    Text(String),
    /// The checked state of a checkbox.
    Bool(bool),
}

impl Value {
    /// The value a field holds after it has been cleared: an empty string for
    /// text-like fields, unchecked for checkboxes.
    #[must_use]
    pub fn cleared(&self) -> Value {
        match self {
            Value::Text(_) => Value::Text(String::new()),
            Value::Bool(_) => Value::Bool(false),
        }
    }

    /// Returns the text, or `None` for checkbox values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            Value::Bool(_) => None,
        }
    }

    /// Returns the checked state, or `None` for text values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A string rendered as a DSL string literal, with `"`, `\`, newlines and
/// tabs escaped.
pub(crate) struct Quoted<'a>(pub(crate) &'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => write!(f, "{}", Quoted(v)),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}
