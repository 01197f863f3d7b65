use super::Value;

/// An element the binder inserts into the form before any rule is bound,
/// such as a row of detail checkboxes or a radio group that only exists to
/// drive other fields.
///
/// `html` is handed to the host verbatim. `fields` names the controls the
/// markup creates together with their initial values, so hosts that do not
/// render markup can still materialize them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub key: String,
    pub after: String,
    pub html: String,
    pub fields: Vec<(String, Value)>,
    pub visible: bool,
}

impl Markup {
    #[must_use]
    pub fn new(key: &str, after: &str) -> Self {
        Self {
            key: key.to_owned(),
            after: after.to_owned(),
            html: String::new(),
            fields: Vec::new(),
            visible: true,
        }
    }

    #[must_use]
    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_owned();
        self
    }

    #[must_use]
    pub fn field(mut self, key: &str, initial: impl Into<Value>) -> Self {
        self.fields.push((key.to_owned(), initial.into()));
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
