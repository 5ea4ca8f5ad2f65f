//! Wizard session state
//!
//! Plain data plus the three user-driven updates (file, year,
//! acknowledgement). Step changes belong to the sequencer and submission
//! changes to the controller; both reach into the crate-visible fields.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::api::SubmissionError;
use crate::wizard::artifact::{ArtifactHandle, ArtifactStore};

/// Steps of the wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Informational-only disclaimer that must be acknowledged
    Disclaimer,
    /// How to export the CSV from Coinmotion
    Instructions,
    /// File selection, year filter and submission
    Upload,
    /// Report ready for download
    Result,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[Step::Disclaimer, Step::Instructions, Step::Upload, Step::Result]
    }

    /// Zero-based position
    pub fn index(self) -> usize {
        match self {
            Step::Disclaimer => 0,
            Step::Instructions => 1,
            Step::Upload => 2,
            Step::Result => 3,
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::all().get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::all()[i])
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Disclaimer => "Disclaimer",
            Step::Instructions => "Instructions",
            Step::Upload => "Upload",
            Step::Result => "Result",
        }
    }
}

/// A file the user picked, with its content already read
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk, naming it after the last path component
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// Content is left out, exports can be megabytes
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Identity of one wizard activation; a reset issues a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket {
    pub session: SessionId,
    pub attempt: u64,
}

/// Flat status for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Submission status together with its payload.
///
/// The handle only exists in `Succeeded` and the error only in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight {
        ticket: SubmissionTicket,
    },
    Succeeded {
        artifact: ArtifactHandle,
    },
    Failed {
        error: SubmissionError,
    },
}

impl SubmissionState {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            SubmissionState::Idle => SubmissionStatus::Idle,
            SubmissionState::InFlight { .. } => SubmissionStatus::InFlight,
            SubmissionState::Succeeded { .. } => SubmissionStatus::Succeeded,
            SubmissionState::Failed { .. } => SubmissionStatus::Failed,
        }
    }

    pub fn artifact(&self) -> Option<ArtifactHandle> {
        match self {
            SubmissionState::Succeeded { artifact } => Some(*artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            SubmissionState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn ticket(&self) -> Option<SubmissionTicket> {
        match self {
            SubmissionState::InFlight { ticket } => Some(*ticket),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::InFlight { .. })
    }
}

/// A broken session invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("result step shown without a successful submission")]
    ResultWithoutSuccess,

    #[error("submission in flight outside the upload step ({0:?})")]
    InFlightOffUpload(Step),

    #[error("succeeded submission points at released {0}")]
    DanglingArtifact(ArtifactHandle),

    #[error("{live} live artifacts, expected {expected}")]
    LiveArtifactCount { live: usize, expected: usize },

    #[error("in-flight ticket belongs to another session")]
    ForeignTicket,
}

/// All state for one wizard activation
#[derive(Debug)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) step: Step,
    pub(crate) acknowledged: bool,
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) year_filter: String,
    pub(crate) submission: SubmissionState,
    pub(crate) artifacts: ArtifactStore,
    pub(crate) attempts: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            step: Step::Disclaimer,
            acknowledged: false,
            selected_file: None,
            year_filter: String::new(),
            submission: SubmissionState::Idle,
            artifacts: ArtifactStore::new(),
            attempts: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn year_filter(&self) -> &str {
        &self.year_filter
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn status(&self) -> SubmissionStatus {
        self.submission.status()
    }

    pub fn error_message(&self) -> Option<String> {
        self.submission.error().map(SubmissionError::user_message)
    }

    pub fn result_handle(&self) -> Option<ArtifactHandle> {
        self.submission.artifact()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Pick a new file (or clear it). Invalidates any previous result.
    pub fn update_file(&mut self, file: Option<SelectedFile>) {
        if self.submission.is_in_flight() {
            tracing::warn!(session = %self.id, "Ignoring file change while a submission is in flight");
            return;
        }

        tracing::debug!(session = %self.id, file = ?file.as_ref().map(SelectedFile::name), "File selection changed");
        self.set_submission(SubmissionState::Idle);
        self.selected_file = file;
    }

    /// Raw year text; validated only at submission time
    pub fn update_year(&mut self, text: impl Into<String>) {
        self.year_filter = text.into();
    }

    pub fn update_acknowledgement(&mut self, acknowledged: bool) {
        self.acknowledged = acknowledged;
    }

    /// Wizard close: release the result, then restore every default.
    ///
    /// A response still in flight for the old session will no longer match
    /// the new session id and gets discarded when it lands.
    pub fn reset(&mut self) {
        self.artifacts.release_all();

        let previous = self.id;
        self.id = SessionId::new();
        self.step = Step::Disclaimer;
        self.acknowledged = false;
        self.selected_file = None;
        self.year_filter.clear();
        self.submission = SubmissionState::Idle;
        self.attempts = 0;

        tracing::debug!(%previous, session = %self.id, "Session reset");
    }

    /// Replace the submission state, releasing a result it held
    pub(crate) fn set_submission(&mut self, next: SubmissionState) {
        let previous = std::mem::replace(&mut self.submission, next);
        if let Some(artifact) = previous.artifact() {
            if self.submission.artifact() != Some(artifact) {
                self.artifacts.release(artifact);
            }
        }
    }

    /// Every invariant the session currently breaks (empty when healthy)
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if self.step == Step::Result && self.status() != SubmissionStatus::Succeeded {
            violations.push(InvariantViolation::ResultWithoutSuccess);
        }

        if let Some(ticket) = self.submission.ticket() {
            if self.step != Step::Upload {
                violations.push(InvariantViolation::InFlightOffUpload(self.step));
            }
            if ticket.session != self.id {
                violations.push(InvariantViolation::ForeignTicket);
            }
        }

        let expected = match self.submission.artifact() {
            Some(artifact) => {
                if !self.artifacts.is_live(artifact) {
                    violations.push(InvariantViolation::DanglingArtifact(artifact));
                }
                1
            }
            None => 0,
        };
        let live = self.artifacts.live_count();
        if live != expected {
            violations.push(InvariantViolation::LiveArtifactCount { live, expected });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert!(Step::Disclaimer < Step::Instructions);
        assert!(Step::Instructions < Step::Upload);
        assert!(Step::Upload < Step::Result);
        assert_eq!(Step::Disclaimer.next(), Some(Step::Instructions));
        assert_eq!(Step::Result.next(), None);
        assert_eq!(Step::Disclaimer.previous(), None);
        assert_eq!(Step::Result.previous(), Some(Step::Upload));
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert_eq!(session.step(), Step::Disclaimer);
        assert!(!session.acknowledged());
        assert!(session.selected_file().is_none());
        assert_eq!(session.year_filter(), "");
        assert_eq!(session.status(), SubmissionStatus::Idle);
        assert!(session.error_message().is_none());
        assert!(session.result_handle().is_none());
        assert!(session.check_invariants().is_empty());
    }

    #[test]
    fn test_update_year_does_not_validate() {
        let mut session = Session::new();
        session.update_year("twenty");
        assert_eq!(session.year_filter(), "twenty");
        assert_eq!(session.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_update_file_clears_failure() {
        let mut session = Session::new();
        session.set_submission(SubmissionState::Failed {
            error: SubmissionError::transport("refused"),
        });

        session.update_file(Some(SelectedFile::new("statement.csv", "a,b\n")));
        assert_eq!(session.status(), SubmissionStatus::Idle);
        assert!(session.error_message().is_none());
        assert_eq!(session.selected_file().unwrap().name(), "statement.csv");
    }

    #[test]
    fn test_update_file_releases_result() {
        let mut session = Session::new();
        let artifact = session.artifacts.create(Bytes::from_static(b"zip"));
        session.set_submission(SubmissionState::Succeeded { artifact });

        session.update_file(None);
        assert!(session.result_handle().is_none());
        assert!(!session.artifacts().is_live(artifact));
        assert_eq!(session.artifacts().stats().released, 1);
        assert!(session.check_invariants().is_empty());
    }

    #[test]
    fn test_update_file_ignored_while_in_flight() {
        let mut session = Session::new();
        session.step = Step::Upload;
        session.selected_file = Some(SelectedFile::new("first.csv", "x"));
        let ticket = SubmissionTicket {
            session: session.id(),
            attempt: 1,
        };
        session.set_submission(SubmissionState::InFlight { ticket });

        session.update_file(Some(SelectedFile::new("second.csv", "y")));
        assert_eq!(session.selected_file().unwrap().name(), "first.csv");
        assert!(session.submission().is_in_flight());
    }

    #[test]
    fn test_reset_restores_defaults_and_new_id() {
        let mut session = Session::new();
        let old_id = session.id();
        session.update_acknowledgement(true);
        session.update_year("2024");
        session.update_file(Some(SelectedFile::new("statement.csv", "x")));
        session.step = Step::Upload;

        session.reset();
        assert_ne!(session.id(), old_id);
        assert_eq!(session.step(), Step::Disclaimer);
        assert!(!session.acknowledged());
        assert!(session.selected_file().is_none());
        assert_eq!(session.year_filter(), "");
    }

    #[test]
    fn test_invariants_flag_result_without_success() {
        let mut session = Session::new();
        session.step = Step::Result;
        assert_eq!(
            session.check_invariants(),
            vec![InvariantViolation::ResultWithoutSuccess]
        );
    }

    #[test]
    fn test_invariants_flag_dangling_artifact() {
        let mut session = Session::new();
        let artifact = session.artifacts.create(Bytes::from_static(b"zip"));
        session.submission = SubmissionState::Succeeded { artifact };
        session.artifacts.release(artifact);

        let violations = session.check_invariants();
        assert!(violations.contains(&InvariantViolation::DanglingArtifact(artifact)));
    }

    #[test]
    fn test_selected_file_read_uses_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("statement.csv");
        std::fs::write(&path, "Date,Type\n").unwrap();

        let file = SelectedFile::read(&path).unwrap();
        assert_eq!(file.name(), "statement.csv");
        assert_eq!(file.len(), 10);
        assert!(SelectedFile::read(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_selected_file_debug_omits_content() {
        let file = SelectedFile::new("statement.csv", "secret,data");
        let debug = format!("{:?}", file);
        assert!(debug.contains("statement.csv"));
        assert!(!debug.contains("secret"));
    }
}
