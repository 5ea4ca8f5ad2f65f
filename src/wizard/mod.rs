//! Report wizard core: session state, step sequencing, submission and the
//! lifecycle of the generated archive.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::api::ReportClient;

pub mod artifact;
pub mod sequencer;
pub mod session;
pub mod submission;

pub use artifact::{
    suggested_file_name, ArtifactError, ArtifactHandle, ArtifactStats, ArtifactStore,
    ARCHIVE_EXTENSION, DEFAULT_ARCHIVE_BASENAME,
};
pub use sequencer::NavigationRejected;
pub use session::{
    InvariantViolation, SelectedFile, Session, SessionId, Step, SubmissionState, SubmissionStatus,
    SubmissionTicket,
};
pub use submission::{
    CompletedSubmission, Completion, PendingSubmission, SubmissionController, SubmitRejected,
};


/// Read-only projection of the session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    pub step: Step,
    /// 1-based, for "Step 2 of 4" style headers
    pub step_number: usize,
    pub step_count: usize,
    pub acknowledged: bool,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub can_submit: bool,
    pub status: SubmissionStatus,
    pub error_message: Option<String>,
    pub selected_file: Option<String>,
    pub year_filter: String,
    pub download_available: bool,
    pub suggested_file_name: Option<String>,
    pub endpoint: String,
}

/// One wizard: a session plus the controller that submits it.
///
/// Each method is one user action from the presentation boundary.
pub struct Wizard {
    session: Session,
    controller: SubmissionController,
}

impl Wizard {
    pub fn new(client: Arc<dyn ReportClient>) -> Self {
        Self {
            session: Session::new(),
            controller: SubmissionController::new(client),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn view(&self) -> WizardView {
        let session = &self.session;
        let download_available = session
            .result_handle()
            .is_some_and(|h| session.artifacts().is_live(h));

        WizardView {
            step: session.step(),
            step_number: session.step().index() + 1,
            step_count: Step::all().len(),
            acknowledged: session.acknowledged(),
            can_advance: sequencer::can_advance(session),
            can_retreat: sequencer::can_retreat(session),
            can_submit: session.step() == Step::Upload && !session.submission().is_in_flight(),
            status: session.status(),
            error_message: session.error_message(),
            selected_file: session.selected_file().map(|f| f.name().to_string()),
            year_filter: session.year_filter().to_string(),
            download_available,
            suggested_file_name: download_available.then(suggested_file_name),
            endpoint: self.controller.endpoint(),
        }
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.session.update_file(file);
        self.audit("select_file");
    }

    pub fn set_year(&mut self, text: impl Into<String>) {
        self.session.update_year(text);
    }

    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.session.update_acknowledgement(acknowledged);
    }

    pub fn go_next(&mut self) -> bool {
        let moved = sequencer::advance(&mut self.session);
        self.audit("go_next");
        moved
    }

    pub fn go_previous(&mut self) -> bool {
        let moved = sequencer::retreat(&mut self.session);
        self.audit("go_previous");
        moved
    }

    pub fn go_to(&mut self, step: Step) -> Result<(), NavigationRejected> {
        let result = sequencer::go_to(&mut self.session, step);
        self.audit("go_to");
        result
    }

    /// Start a submission whose request the caller runs elsewhere
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        let result = self.controller.begin(&mut self.session);
        self.audit("begin_submit");
        result
    }

    /// Apply a request started with [`Wizard::begin_submit`]
    pub fn finish_submit(&mut self, completed: CompletedSubmission) -> Completion {
        let completion = self.controller.complete(&mut self.session, completed);
        self.audit("finish_submit");
        completion
    }

    pub async fn submit(&mut self) -> Result<Completion, SubmitRejected> {
        let result = self.controller.submit(&mut self.session).await;
        self.audit("submit");
        result
    }

    /// Save the current archive into `dir`, returning the written path
    pub fn download_result(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let handle = self.session.result_handle().ok_or(ArtifactError::NoResult)?;
        self.session.artifacts().download(handle, dir)
    }

    /// Close the wizard. Safe to call more than once.
    pub fn close_session(&mut self) {
        self.session.reset();
        self.audit("close_session");
    }

    fn audit(&self, action: &str) {
        let violations = self.session.check_invariants();
        if !violations.is_empty() {
            tracing::warn!(action, ?violations, "Wizard session invariants violated");
        }
    }
}
