//! Terminal rendition of the report wizard
//!
//! The screen owns the [`Wizard`] and two text inputs. Key presses become
//! wizard actions; everything drawn comes from [`Wizard::view`].

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::ui::dialogs::centered_rect;
use crate::wizard::{SelectedFile, Step, Wizard, WizardView};

pub mod steps;
pub mod types;

pub use types::*;

#[cfg(test)]
mod tests;

/// Transient message under the step content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct WizardScreen {
    pub wizard: Wizard,
    pub(crate) file_input: TextArea<'static>,
    pub(crate) year_input: TextArea<'static>,
    pub(crate) focus: UploadField,
    pub(crate) notice: Option<Notice>,
    /// Path whose content is currently selected in the session
    loaded_path: Option<String>,
    download_dir: PathBuf,
}

impl WizardScreen {
    pub fn new(wizard: Wizard, download_dir: PathBuf) -> Self {
        Self {
            wizard,
            file_input: new_input("path/to/transactions.csv"),
            year_input: new_input("all years"),
            focus: UploadField::FilePath,
            notice: None,
            loaded_path: None,
            download_dir,
        }
    }

    pub fn view(&self) -> WizardView {
        self.wizard.view()
    }

    /// Route a key press to the current step
    pub fn handle_key(&mut self, key: KeyEvent) -> WizardScreenResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return WizardScreenResult::Close;
        }

        match self.wizard.view().step {
            Step::Disclaimer => self.handle_disclaimer_key(key.code),
            Step::Instructions => self.handle_instructions_key(key.code),
            Step::Upload => self.handle_upload_key(key),
            Step::Result => self.handle_result_key(key.code),
        }
    }

    fn handle_disclaimer_key(&mut self, code: KeyCode) -> WizardScreenResult {
        match code {
            KeyCode::Char(' ') => {
                let acknowledged = self.wizard.view().acknowledged;
                self.wizard.set_acknowledged(!acknowledged);
                WizardScreenResult::Continue
            }
            KeyCode::Enter => {
                self.wizard.go_next();
                WizardScreenResult::Continue
            }
            KeyCode::Esc | KeyCode::Char('q') => WizardScreenResult::Close,
            _ => WizardScreenResult::Continue,
        }
    }

    fn handle_instructions_key(&mut self, code: KeyCode) -> WizardScreenResult {
        match code {
            KeyCode::Enter => {
                self.wizard.go_next();
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.wizard.go_previous();
            }
            KeyCode::Char('q') => return WizardScreenResult::Close,
            _ => {}
        }
        WizardScreenResult::Continue
    }

    fn handle_upload_key(&mut self, key: KeyEvent) -> WizardScreenResult {
        let in_flight = !self.wizard.view().can_submit;

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggled();
            }
            KeyCode::Enter => {
                if in_flight {
                    return WizardScreenResult::Continue;
                }
                self.commit_inputs();
                return WizardScreenResult::Submit;
            }
            KeyCode::Esc => {
                if !self.wizard.go_previous() {
                    self.notice = Some(Notice::Info(
                        "Wait for the report to finish before leaving this step.".to_string(),
                    ));
                }
            }
            _ => {
                let input = match self.focus {
                    UploadField::FilePath => &mut self.file_input,
                    UploadField::Year => &mut self.year_input,
                };
                input.input(key);
            }
        }
        WizardScreenResult::Continue
    }

    fn handle_result_key(&mut self, code: KeyCode) -> WizardScreenResult {
        match code {
            KeyCode::Char('d') => self.download(),
            KeyCode::Esc | KeyCode::Backspace => {
                self.wizard.go_previous();
            }
            KeyCode::Char('q') | KeyCode::Enter => return WizardScreenResult::Close,
            _ => {}
        }
        WizardScreenResult::Continue
    }

    /// Push the text inputs into the session before submitting.
    ///
    /// The file is only re-read when the path changed, so pressing Enter
    /// twice does not throw away a result.
    pub(crate) fn commit_inputs(&mut self) {
        self.wizard.set_year(input_text(&self.year_input));

        let path = input_text(&self.file_input).trim().to_string();
        if path.is_empty() {
            if self.loaded_path.take().is_some() {
                self.wizard.select_file(None);
            }
            return;
        }
        if self.loaded_path.as_deref() == Some(path.as_str()) {
            return;
        }

        match SelectedFile::read(Path::new(&path)) {
            Ok(file) => {
                tracing::debug!(%path, bytes = file.len(), "Loaded transaction export");
                self.wizard.select_file(Some(file));
                self.loaded_path = Some(path);
                self.notice = None;
            }
            Err(err) => {
                tracing::warn!(%path, error = %err, "Failed to read transaction export");
                self.wizard.select_file(None);
                self.loaded_path = None;
                self.notice = Some(Notice::Error(format!("Cannot read {}: {}", path, err)));
            }
        }
    }

    /// Save the archive into the configured download directory
    pub fn download(&mut self) {
        self.notice = Some(match self.wizard.download_result(&self.download_dir) {
            Ok(path) => Notice::Info(format!("Saved {}", path.display())),
            Err(err) => {
                tracing::warn!(error = %err, "Download failed");
                Notice::Error(err.to_string())
            }
        });
    }

    /// Close the wizard and forget everything typed
    pub fn close(&mut self) {
        self.wizard.close_session();
        self.file_input = new_input("path/to/transactions.csv");
        self.year_input = new_input("all years");
        self.focus = UploadField::FilePath;
        self.notice = None;
        self.loaded_path = None;
    }

    /// Render the current step
    pub fn render(&mut self, frame: &mut Frame) {
        let view = self.wizard.view();
        match view.step {
            Step::Disclaimer => self.render_disclaimer_step(frame, &view),
            Step::Instructions => self.render_instructions_step(frame, &view),
            Step::Upload => self.render_upload_step(frame, &view),
            Step::Result => self.render_result_step(frame, &view),
        }
    }

    /// Draw the dialog chrome and return the area inside it
    pub(crate) fn render_frame(&self, frame: &mut Frame, view: &WizardView) -> Rect {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    HEADER_EYEBROW,
                    Style::default()
                        .fg(Color::LightCyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {} ", HEADER_TITLE)),
            ]))
            .title_bottom(
                Line::from(format!(
                    " Step {} of {}: {} ",
                    view.step_number,
                    view.step_count,
                    view.step.label()
                ))
                .alignment(Alignment::Right),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }

    /// Notice line, if any
    pub(crate) fn render_notice(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = &self.notice else {
            return;
        };
        let (text, color) = match notice {
            Notice::Info(text) => (text.as_str(), Color::Green),
            Notice::Error(text) => (text.as_str(), Color::Red),
        };
        let para = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
    }
}

/// Key hint footer, e.g. `Enter next  |  Esc back`
pub(crate) fn footer_line(hints: &[(&'static str, &'static str, bool)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, label, enabled)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  |  "));
        }
        let key_style = if *enabled {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(" {}", label)));
    }
    Line::from(spans)
}

fn new_input(placeholder: &str) -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_placeholder_text(placeholder.to_string());
    input.set_placeholder_style(Style::default().fg(Color::DarkGray));
    input.set_cursor_line_style(Style::default());
    input
}

fn input_text(input: &TextArea<'_>) -> String {
    input.lines().first().cloned().unwrap_or_default()
}
