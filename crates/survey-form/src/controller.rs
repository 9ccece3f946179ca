//! Form controller: answers in progress plus the submission state machine.

use chrono::{DateTime, Utc};
use common::{AgeGroup, ExperienceLevel, SubmissionPayload, SurveyResponse};

use crate::client::StudyDataClient;
use crate::error::{FormError, SubmitError};
use crate::session::Session;
use crate::state::{Confirmation, FormState};

/// Answers as currently entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyDraft {
    pub age_group: Option<AgeGroup>,
    pub experience_level: Option<ExperienceLevel>,
    pub feedback: String,
}

impl SurveyDraft {
    /// Builds the wire response, or `None` if a required answer is missing.
    pub fn complete(&self) -> Option<SurveyResponse> {
        Some(SurveyResponse {
            age_group: self.age_group?,
            experience_level: self.experience_level?,
            feedback: self.feedback.clone(),
        })
    }
}

/// Drives one survey page from first render to confirmation.
#[derive(Debug)]
pub struct FormController {
    session: Session,
    draft: SurveyDraft,
    state: FormState,
}

impl FormController {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            draft: SurveyDraft::default(),
            state: FormState::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn draft(&self) -> &SurveyDraft {
        &self.draft
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Applies a timer tick.
    pub fn observe_elapsed(&mut self, seconds: u64) -> u64 {
        self.session.observe_elapsed(seconds)
    }

    pub fn select_age_group(&mut self, age_group: AgeGroup) {
        self.edit(|draft| draft.age_group = Some(age_group));
    }

    pub fn select_experience_level(&mut self, level: ExperienceLevel) {
        self.edit(|draft| draft.experience_level = Some(level));
    }

    pub fn set_feedback(&mut self, feedback: impl Into<String>) {
        let feedback = feedback.into();
        self.edit(|draft| draft.feedback = feedback);
    }

    // Edits clear the inline error but do not revalidate.
    fn edit(&mut self, apply: impl FnOnce(&mut SurveyDraft)) {
        if !self.state.accepts_edits() {
            tracing::debug!(state = %self.state, "ignoring edit on submitted form");
            return;
        }
        apply(&mut self.draft);
        if let FormState::Editing { error } = &mut self.state {
            *error = None;
        }
    }

    /// Starts a submit attempt at instant `now`.
    ///
    /// On success the form is `Submitting` and the returned payload must be
    /// sent, with the outcome reported through [`finish_submit`].
    ///
    /// [`finish_submit`]: FormController::finish_submit
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<SubmissionPayload, FormError> {
        match &self.state {
            FormState::Submitting { .. } => return Err(FormError::SubmissionInFlight),
            FormState::Submitted(_) => return Err(FormError::AlreadySubmitted),
            FormState::Editing { .. } => {}
        }

        let Some(responses) = self.draft.complete() else {
            self.state = FormState::Editing {
                error: Some(FormError::MissingRequiredFields),
            };
            return Err(FormError::MissingRequiredFields);
        };

        let time_spent = self.session.elapsed_seconds();
        self.state = FormState::Submitting { time_spent };

        Ok(SubmissionPayload {
            prolific_id: self.session.participant_id().to_string(),
            time_spent,
            responses,
            start_time: self.session.start_time(),
            end_time: now,
        })
    }

    /// Records the outcome of the request started by [`begin_submit`].
    ///
    /// [`begin_submit`]: FormController::begin_submit
    pub fn finish_submit(&mut self, outcome: Result<(), SubmitError>) -> &FormState {
        let FormState::Submitting { time_spent } = self.state else {
            tracing::debug!(state = %self.state, "no submission in flight");
            return &self.state;
        };

        self.state = match outcome {
            Ok(()) => {
                tracing::info!(
                    participant_id = self.session.participant_id(),
                    time_spent,
                    "survey submitted"
                );
                FormState::Submitted(Confirmation {
                    time_spent,
                    participant_id: self.session.participant_id().to_string(),
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission error");
                FormState::Editing {
                    error: Some(FormError::SubmissionFailed),
                }
            }
        };
        &self.state
    }

    /// Runs a whole submit attempt against `client`.
    pub async fn submit<C>(&mut self, client: &C, now: DateTime<Utc>) -> Result<(), FormError>
    where
        C: StudyDataClient + ?Sized,
    {
        let payload = self.begin_submit(now)?;
        let outcome = client.submit(&payload).await;

        match self.finish_submit(outcome) {
            FormState::Submitted(_) => Ok(()),
            _ => Err(FormError::SubmissionFailed),
        }
    }
}
