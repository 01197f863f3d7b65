use crate::{ExclusiveGroup, Markup, Rule};

/// The result of parsing a form's rule text.
#[derive(Debug, Default)]
pub struct ParsedForm {
    pub rules: Vec<Rule>,
    pub groups: Vec<ExclusiveGroup>,
    pub injections: Vec<Markup>,
}
