//! Client side of the study survey.
//!
//! This crate provides:
//! - Session: participant ID taken from the page URL plus elapsed time
//! - ElapsedTimer: the 1 Hz tick that keeps elapsed time current
//! - FormController: answers in progress and the submission state machine
//! - StudyDataClient: the single network call made on submit
//! - FormView: a plain description of what the page shows

pub mod client;
pub mod clock;
pub mod controller;
pub mod error;
pub mod session;
pub mod state;
pub mod terminal;
pub mod timer;
pub mod view;

pub use client::{HttpStudyDataClient, InMemoryStudyDataClient, StudyDataClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{FormController, SurveyDraft};
pub use error::{FormError, SubmitError};
pub use session::{Session, participant_id_from_query};
pub use state::{Confirmation, FormState};
pub use terminal::run_terminal;
pub use timer::ElapsedTimer;
pub use view::{FormView, SubmitControl};
