//! What the page shows for a given controller state.

use std::fmt;

use common::{AgeGroup, ExperienceLevel, format_elapsed};

use crate::controller::{FormController, SurveyDraft};
use crate::state::FormState;

const SUBMIT_LABEL: &str = "Submit";
const LOADING_LABEL: &str = "Submitting...";

/// The submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

/// Rendered page, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    Form {
        elapsed_label: String,
        /// Present only when a participant ID was found in the URL.
        participant_banner: Option<String>,
        draft: SurveyDraft,
        error: Option<String>,
        submit: SubmitControl,
    },
    Confirmation {
        elapsed_label: String,
        participant_id: Option<String>,
    },
}

fn non_empty(id: &str) -> Option<String> {
    (!id.is_empty()).then(|| id.to_string())
}

impl FormView {
    pub fn render(controller: &FormController) -> Self {
        let session = controller.session();

        match controller.state() {
            FormState::Submitted(confirmation) => FormView::Confirmation {
                elapsed_label: format_elapsed(confirmation.time_spent),
                participant_id: non_empty(&confirmation.participant_id),
            },
            state => {
                let submitting = matches!(state, FormState::Submitting { .. });
                FormView::Form {
                    elapsed_label: format_elapsed(session.elapsed_seconds()),
                    participant_banner: non_empty(session.participant_id()),
                    draft: controller.draft().clone(),
                    error: state.error().map(|e| e.to_string()),
                    submit: SubmitControl {
                        enabled: !submitting,
                        label: if submitting { LOADING_LABEL } else { SUBMIT_LABEL },
                    },
                }
            }
        }
    }
}

fn mark(selected: bool) -> &'static str {
    if selected { "(x)" } else { "( )" }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormView::Confirmation {
                elapsed_label,
                participant_id,
            } => {
                writeln!(f, "Thank You!")?;
                writeln!(f, "Your responses have been successfully submitted.")?;
                writeln!(f, "Time spent: {elapsed_label}")?;
                if let Some(id) = participant_id {
                    writeln!(f, "Prolific ID: {id}")?;
                }
                writeln!(f, "You can now close this window or return to Prolific.")
            }
            FormView::Form {
                elapsed_label,
                participant_banner,
                draft,
                error,
                submit,
            } => {
                writeln!(f, "Study Survey [{elapsed_label}]")?;
                if let Some(id) = participant_banner {
                    writeln!(f, "Prolific ID: {id}")?;
                }

                writeln!(f, "Age Group *")?;
                for group in AgeGroup::ALL {
                    writeln!(f, "  {} {group}", mark(draft.age_group == Some(group)))?;
                }

                writeln!(f, "How would you rate your experience with online surveys? *")?;
                for level in ExperienceLevel::ALL {
                    writeln!(
                        f,
                        "  {} {}",
                        mark(draft.experience_level == Some(level)),
                        level.label()
                    )?;
                }

                writeln!(f, "Additional Feedback (Optional): {}", draft.feedback)?;
                if let Some(message) = error {
                    writeln!(f, "! {message}")?;
                }

                let state = if submit.enabled { "" } else { " (disabled)" };
                writeln!(f, "[{}]{state}", submit.label)
            }
        }
    }
}
