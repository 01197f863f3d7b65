use std::fmt;

/// Which event granularity re-evaluates a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Trigger {
    /// Committed changes only (select change, checkbox toggle, blur).
    #[default]
    Change,
    /// Committed changes plus every keystroke on text-like fields.
    Input,
}

impl Trigger {
    /// Whether a subscription with this trigger receives an event of `kind`.
    #[must_use]
    pub fn accepts(self, kind: Trigger) -> bool {
        match self {
            Trigger::Input => true,
            Trigger::Change => kind == Trigger::Change,
        }
    }

    /// The finer of two triggers; `Input` subsumes `Change`.
    #[must_use]
    pub fn widen(self, other: Trigger) -> Trigger {
        if self == Trigger::Input || other == Trigger::Input {
            Trigger::Input
        } else {
            Trigger::Change
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Change => write!(f, "change"),
            Trigger::Input => write!(f, "input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_accepts_everything() {
        assert!(Trigger::Input.accepts(Trigger::Input));
        assert!(Trigger::Input.accepts(Trigger::Change));
    }

    #[test]
    fn change_ignores_keystrokes() {
        assert!(Trigger::Change.accepts(Trigger::Change));
        assert!(!Trigger::Change.accepts(Trigger::Input));
    }

    #[test]
    fn widen() {
        assert_eq!(Trigger::Change.widen(Trigger::Change), Trigger::Change);
        assert_eq!(Trigger::Change.widen(Trigger::Input), Trigger::Input);
        assert_eq!(Trigger::Input.widen(Trigger::Change), Trigger::Input);
    }
}
