//! Submission controller
//!
//! A submission runs in three phases so the network call is the only
//! suspension point:
//!
//! 1. [`SubmissionController::begin`] checks the step, re-entrancy and
//!    validation synchronously, then marks the session in flight.
//! 2. [`PendingSubmission::execute`] performs the HTTP request. It borrows
//!    nothing from the session and can run on another task.
//! 3. [`SubmissionController::complete`] applies the outcome in a single
//!    mutation, or discards it if the session moved on.

use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::api::{ReportClient, ReportRequest, SubmissionError, ValidationError};
use crate::wizard::artifact::ArtifactHandle;
use crate::wizard::sequencer;
use crate::wizard::session::{Session, Step, SubmissionState, SubmissionTicket};

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern is valid"));

/// Why `begin` did not start a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Submitting is only possible from the upload step; nothing changed
    #[error("cannot submit from the {0:?} step")]
    NotOnUploadStep(Step),

    /// Another request for this session has not resolved yet; nothing changed
    #[error("a submission is already in flight")]
    AlreadyInFlight,

    /// Validation failed; the session now records the failure
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// An accepted submission waiting for its request to run
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub request: ReportRequest,
}

impl PendingSubmission {
    /// Issue the request. Exactly one call to the endpoint, no retry.
    pub async fn execute(self, client: &dyn ReportClient) -> CompletedSubmission {
        let outcome = client.generate(self.request).await;
        CompletedSubmission {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// The resolved request, ready to be applied to its session
#[derive(Debug, Clone)]
pub struct CompletedSubmission {
    pub ticket: SubmissionTicket,
    pub outcome: Result<Bytes, SubmissionError>,
}

/// What applying a completed submission did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded(ArtifactHandle),
    Failed(SubmissionError),
    /// The session was reset or superseded; the response was dropped
    Discarded,
}

/// Validate the year filter. Empty (after trimming) means no filter.
pub fn validate_year(raw: &str) -> Result<Option<String>, ValidationError> {
    let year = raw.trim();
    if year.is_empty() {
        Ok(None)
    } else if YEAR_PATTERN.is_match(year) {
        Ok(Some(year.to_string()))
    } else {
        Err(ValidationError::YearFormat)
    }
}

/// Build the request from the session, checking the file first and the
/// year second.
pub fn validate(session: &Session) -> Result<ReportRequest, ValidationError> {
    let file = session
        .selected_file()
        .ok_or(ValidationError::FileRequired)?;
    let year = validate_year(session.year_filter())?;

    Ok(ReportRequest {
        file_name: file.name().to_string(),
        content: file.content().clone(),
        year,
    })
}

/// Drives report submissions for wizard sessions
#[derive(Clone)]
pub struct SubmissionController {
    client: Arc<dyn ReportClient>,
}

impl SubmissionController {
    pub fn new(client: Arc<dyn ReportClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> Arc<dyn ReportClient> {
        Arc::clone(&self.client)
    }

    pub fn endpoint(&self) -> String {
        self.client.endpoint()
    }

    /// Synchronous half of a submission.
    ///
    /// Starting a new attempt releases a result kept from an earlier run
    /// (reachable by going back from the result step), so a stale archive
    /// never sits next to a fresh one.
    pub fn begin(&self, session: &mut Session) -> Result<PendingSubmission, SubmitRejected> {
        if session.step != Step::Upload {
            tracing::debug!(session = %session.id, step = ?session.step, "Submit ignored outside the upload step");
            return Err(SubmitRejected::NotOnUploadStep(session.step));
        }
        if session.submission.is_in_flight() {
            tracing::debug!(session = %session.id, "Submit ignored, request already in flight");
            return Err(SubmitRejected::AlreadyInFlight);
        }

        let request = match validate(session) {
            Ok(request) => request,
            Err(err) => {
                tracing::info!(session = %session.id, error = %err, "Submission failed validation");
                session.set_submission(SubmissionState::Failed { error: err.into() });
                return Err(SubmitRejected::Invalid(err));
            }
        };

        session.attempts += 1;
        let ticket = SubmissionTicket {
            session: session.id,
            attempt: session.attempts,
        };
        session.set_submission(SubmissionState::InFlight { ticket });

        tracing::info!(
            session = %session.id,
            attempt = ticket.attempt,
            file = %request.file_name,
            bytes = request.content.len(),
            year = ?request.year,
            "Submitting report request"
        );

        Ok(PendingSubmission { ticket, request })
    }

    /// Apply a resolved request. Success records the archive, flips the
    /// status and enters the result step in one go.
    pub fn complete(&self, session: &mut Session, completed: CompletedSubmission) -> Completion {
        if session.submission.ticket() != Some(completed.ticket) {
            tracing::warn!(
                session = %session.id,
                ticket_session = %completed.ticket.session,
                attempt = completed.ticket.attempt,
                "Discarding stale submission result"
            );
            return Completion::Discarded;
        }

        match completed.outcome {
            Ok(bytes) => {
                let size = bytes.len();
                let artifact = session.artifacts.create(bytes);
                session.set_submission(SubmissionState::Succeeded { artifact });
                sequencer::enter_result(session);
                tracing::info!(session = %session.id, %artifact, bytes = size, "Report generated");
                Completion::Succeeded(artifact)
            }
            Err(error) => {
                tracing::info!(session = %session.id, %error, "Report generation failed");
                session.set_submission(SubmissionState::Failed {
                    error: error.clone(),
                });
                Completion::Failed(error)
            }
        }
    }

    /// All three phases in one call, for callers that can hold the session
    /// across the request.
    pub async fn submit(&self, session: &mut Session) -> Result<Completion, SubmitRejected> {
        let pending = self.begin(session)?;
        let completed = pending.execute(&*self.client).await;
        Ok(self.complete(session, completed))
    }
}
