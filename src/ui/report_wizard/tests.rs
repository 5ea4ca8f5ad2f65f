//! Tests for the report wizard screen

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

use super::*;
use crate::api::{ReportClient, ReportRequest, SubmissionError};
use crate::wizard::{Completion, SubmissionStatus};

struct StaticClient(Result<Bytes, SubmissionError>);

#[async_trait]
impl ReportClient for StaticClient {
    fn endpoint(&self) -> String {
        "http://reports.test/report/pdf-zip".to_string()
    }

    async fn generate(&self, _request: ReportRequest) -> Result<Bytes, SubmissionError> {
        self.0.clone()
    }
}

fn screen(response: Result<Bytes, SubmissionError>, dir: &Path) -> WizardScreen {
    WizardScreen::new(
        Wizard::new(Arc::new(StaticClient(response))),
        dir.to_path_buf(),
    )
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(screen: &mut WizardScreen, text: &str) {
    for c in text.chars() {
        screen.handle_key(key(KeyCode::Char(c)));
    }
}

fn to_upload(screen: &mut WizardScreen) {
    screen.handle_key(key(KeyCode::Char(' ')));
    screen.handle_key(key(KeyCode::Enter));
    screen.handle_key(key(KeyCode::Enter));
    assert_eq!(screen.view().step, Step::Upload);
}

fn rendered(screen: &mut WizardScreen) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| screen.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn write_csv(dir: &Path) -> PathBuf {
    let path = dir.join("transactions.csv");
    std::fs::write(&path, "Date,Type,Amount\n2024-03-01,buy,1\n").unwrap();
    path
}

// ─── Key handling ───────────────────────────────────────────────────────────

#[test]
fn test_enter_without_acknowledgement_stays_on_disclaimer() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());

    assert_eq!(
        screen.handle_key(key(KeyCode::Enter)),
        WizardScreenResult::Continue
    );
    assert_eq!(screen.view().step, Step::Disclaimer);

    screen.handle_key(key(KeyCode::Char(' ')));
    assert!(screen.view().acknowledged);
    screen.handle_key(key(KeyCode::Enter));
    assert_eq!(screen.view().step, Step::Instructions);
}

#[test]
fn test_space_toggles_acknowledgement_off_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());

    screen.handle_key(key(KeyCode::Char(' ')));
    screen.handle_key(key(KeyCode::Char(' ')));
    assert!(!screen.view().acknowledged);
}

#[test]
fn test_ctrl_c_closes_from_any_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);

    let result = screen.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(result, WizardScreenResult::Close);
}

#[test]
fn test_esc_on_disclaimer_closes() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    assert_eq!(
        screen.handle_key(key(KeyCode::Esc)),
        WizardScreenResult::Close
    );
}

#[test]
fn test_tab_moves_typing_to_year_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);

    type_text(&mut screen, "a.csv");
    screen.handle_key(key(KeyCode::Tab));
    assert_eq!(screen.focus, UploadField::Year);
    type_text(&mut screen, "2023");

    assert_eq!(screen.file_input.lines()[0], "a.csv");
    assert_eq!(screen.year_input.lines()[0], "2023");
}

#[test]
fn test_esc_on_upload_goes_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);

    screen.handle_key(key(KeyCode::Esc));
    assert_eq!(screen.view().step, Step::Instructions);
}

// ─── Committing inputs ──────────────────────────────────────────────────────

#[test]
fn test_enter_on_upload_loads_file_and_requests_submit() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);

    type_text(&mut screen, &path.display().to_string());
    screen.handle_key(key(KeyCode::Tab));
    type_text(&mut screen, "2024");

    assert_eq!(
        screen.handle_key(key(KeyCode::Enter)),
        WizardScreenResult::Submit
    );
    let view = screen.view();
    assert_eq!(view.selected_file.as_deref(), Some("transactions.csv"));
    assert_eq!(view.year_filter, "2024");
    assert!(screen.notice.is_none());
}

#[test]
fn test_unreadable_path_sets_notice_and_clears_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);

    type_text(&mut screen, "/definitely/not/here.csv");
    screen.handle_key(key(KeyCode::Enter));

    assert!(screen.view().selected_file.is_none());
    assert!(matches!(screen.notice, Some(Notice::Error(_))));
}

#[tokio::test]
async fn test_repeated_enter_keeps_existing_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let mut screen = screen(Ok(Bytes::from_static(b"PK zip")), dir.path());
    to_upload(&mut screen);
    type_text(&mut screen, &path.display().to_string());

    screen.commit_inputs();
    let completion = screen.wizard.submit().await.unwrap();
    assert!(matches!(completion, Completion::Succeeded(_)));
    assert_eq!(screen.view().step, Step::Result);

    // Same path committed again must not count as a new file
    screen.commit_inputs();
    assert!(screen.view().download_available);
}

// ─── Result step ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_download_writes_archive_and_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let out = dir.path().join("out");
    let mut screen = screen(Ok(Bytes::from_static(b"PK zip")), &out);
    to_upload(&mut screen);
    type_text(&mut screen, &path.display().to_string());
    screen.commit_inputs();
    screen.wizard.submit().await.unwrap();

    screen.handle_key(key(KeyCode::Char('d')));

    let written = out.join("pdf_reports.zip");
    assert_eq!(std::fs::read(&written).unwrap(), b"PK zip");
    assert!(matches!(screen.notice, Some(Notice::Info(_))));
}

#[tokio::test]
async fn test_failed_submission_stays_on_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let mut screen = screen(
        Err(SubmissionError::remote(422, "Invalid CSV header")),
        dir.path(),
    );
    to_upload(&mut screen);
    type_text(&mut screen, &path.display().to_string());
    screen.commit_inputs();
    screen.wizard.submit().await.unwrap();

    let view = screen.view();
    assert_eq!(view.step, Step::Upload);
    assert_eq!(view.status, SubmissionStatus::Failed);
    assert!(rendered(&mut screen).contains("Invalid CSV header"));
}

#[test]
fn test_close_resets_inputs_and_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());
    to_upload(&mut screen);
    type_text(&mut screen, "some.csv");

    screen.close();

    assert_eq!(screen.view().step, Step::Disclaimer);
    assert!(!screen.view().acknowledged);
    assert_eq!(screen.file_input.lines()[0], "");
    assert_eq!(screen.focus, UploadField::FilePath);
}

// ─── Rendering ──────────────────────────────────────────────────────────────

#[test]
fn test_render_each_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut screen = screen(Ok(Bytes::new()), dir.path());

    let text = rendered(&mut screen);
    assert!(text.contains("Disclaimer"));
    assert!(text.contains("Step 1 of 4"));

    screen.handle_key(key(KeyCode::Char(' ')));
    screen.handle_key(key(KeyCode::Enter));
    let text = rendered(&mut screen);
    assert!(text.contains("Export your transactions"));

    screen.handle_key(key(KeyCode::Enter));
    let text = rendered(&mut screen);
    assert!(text.contains("CSV file"));
    assert!(text.contains("Step 3 of 4"));
}
