//! Step transitions and their guards

use thiserror::Error;

use crate::wizard::session::{Session, Step, SubmissionStatus};

/// Why a direct jump to a step was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRejected {
    #[error("the disclaimer has not been acknowledged")]
    NotAcknowledged,

    #[error("a submission is in flight")]
    SubmissionInFlight,

    #[error("no generated report is available")]
    NoResult,
}

/// Whether the "next" control is enabled.
///
/// Upload and Result never advance by user action: the result step is only
/// entered when a submission succeeds.
pub fn can_advance(session: &Session) -> bool {
    if session.submission.is_in_flight() {
        return false;
    }
    match session.step {
        Step::Disclaimer => session.acknowledged,
        Step::Instructions => true,
        Step::Upload | Step::Result => false,
    }
}

/// Whether the "previous" control is enabled
pub fn can_retreat(session: &Session) -> bool {
    !session.submission.is_in_flight() && session.step != Step::Disclaimer
}

/// Move one step forward. Returns false (and changes nothing) when guarded.
pub fn advance(session: &mut Session) -> bool {
    if !can_advance(session) {
        tracing::debug!(step = ?session.step, "Advance refused");
        return false;
    }
    match session.step.next() {
        Some(next) => {
            transition(session, next);
            true
        }
        None => false,
    }
}

/// Move one step back. From Result this returns to Upload and keeps the
/// generated archive so it can still be downloaded.
pub fn retreat(session: &mut Session) -> bool {
    if !can_retreat(session) {
        tracing::debug!(step = ?session.step, "Retreat refused");
        return false;
    }
    match session.step.previous() {
        Some(previous) => {
            transition(session, previous);
            true
        }
        None => false,
    }
}

/// Jump straight to a step, subject to the same guards as stepwise moves
pub fn go_to(session: &mut Session, target: Step) -> Result<(), NavigationRejected> {
    if target == session.step {
        return Ok(());
    }
    if session.submission.is_in_flight() {
        return Err(NavigationRejected::SubmissionInFlight);
    }
    if target > Step::Disclaimer && !session.acknowledged {
        return Err(NavigationRejected::NotAcknowledged);
    }
    if target == Step::Result && session.status() != SubmissionStatus::Succeeded {
        return Err(NavigationRejected::NoResult);
    }
    transition(session, target);
    Ok(())
}

/// Called by the submission controller in the same mutation that records
/// success.
pub(crate) fn enter_result(session: &mut Session) {
    debug_assert_eq!(session.status(), SubmissionStatus::Succeeded);
    transition(session, Step::Result);
}

fn transition(session: &mut Session, to: Step) {
    tracing::debug!(session = %session.id, from = ?session.step, ?to, "Step transition");
    session.step = to;
}
