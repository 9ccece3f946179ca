//! Form submission state machine.

use crate::error::FormError;

/// What the participant sees after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Elapsed seconds sent with the submission.
    pub time_spent: u64,
    pub participant_id: String,
}

/// The state of the form in its lifecycle.
///
/// State transitions:
/// ```text
/// Editing ──► Submitting ──┬──► Submitted
///    ▲                     │
///    └─────── (error) ─────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Answers can be changed; `error` is the message shown inline, if any.
    Editing { error: Option<FormError> },

    /// A request is outstanding; the submit control is disabled.
    Submitting { time_spent: u64 },

    /// Terminal: the form is replaced by the confirmation.
    Submitted(Confirmation),
}

impl Default for FormState {
    fn default() -> Self {
        FormState::Editing { error: None }
    }
}

impl FormState {
    /// Returns true if answers may still be edited.
    pub fn accepts_edits(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if a submit attempt may start from this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, FormState::Editing { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FormState::Submitted(_))
    }

    /// The inline error, if one is showing.
    pub fn error(&self) -> Option<FormError> {
        match self {
            FormState::Editing { error } => *error,
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Editing { .. } => "Editing",
            FormState::Submitting { .. } => "Submitting",
            FormState::Submitted(_) => "Submitted",
        }
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
