use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("rule '{rule}' does not watch a controller field")]
    MissingController { rule: String },

    #[error("rule '{rule}' has no condition")]
    MissingCondition { rule: String },

    #[error("rule '{rule}' sets visibility of '{target}' in only one branch")]
    NonExhaustiveVisibility { rule: String, target: String },

    #[error("duplicate exclusive group '{name}'")]
    DuplicateGroup { name: String },

    #[error("exclusive group '{name}' needs at least two members")]
    DegenerateGroup { name: String },

    #[error("member '{member}' appears twice in exclusive group '{group}'")]
    DuplicateMember { group: String, member: String },

    #[error("undefined exclusive group '{group}' in rule '{rule}'")]
    UndefinedGroup { rule: String, group: String },

    #[error("'{member}' is not a member of exclusive group '{group}' (rule '{rule}')")]
    UnknownMember {
        rule: String,
        group: String,
        member: String,
    },

    #[error("duplicate injected element '{key}'")]
    DuplicateInjection { key: String },
}
