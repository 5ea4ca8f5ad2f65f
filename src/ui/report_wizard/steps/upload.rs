//! Upload step rendering

use crate::ui::report_wizard::{
    footer_line, UploadField, WizardScreen, IN_FLIGHT_TEXT, READY_TEXT, UPLOAD_HINT,
};
use crate::wizard::{SubmissionStatus, WizardView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_upload_step(&mut self, frame: &mut Frame, view: &WizardView) {
        let inner = self.render_frame(frame, view);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Hint
                Constraint::Length(3), // File path
                Constraint::Length(3), // Year
                Constraint::Length(1), // Spacer
                Constraint::Min(2),    // Status
                Constraint::Length(1), // Notice
                Constraint::Length(2), // Footer
            ])
            .split(inner);

        let hint = Paragraph::new(UPLOAD_HINT).wrap(Wrap { trim: true });
        frame.render_widget(hint, chunks[0]);

        let file_title = match &view.selected_file {
            Some(name) => format!(" CSV file ({}) ", name),
            None => " CSV file ".to_string(),
        };
        style_input(
            &mut self.file_input,
            file_title,
            self.focus == UploadField::FilePath,
        );
        frame.render_widget(&self.file_input, chunks[1]);

        style_input(
            &mut self.year_input,
            " Year (optional) ".to_string(),
            self.focus == UploadField::Year,
        );
        frame.render_widget(&self.year_input, chunks[2]);

        let status = match view.status {
            SubmissionStatus::InFlight => Line::from(Span::styled(
                IN_FLIGHT_TEXT,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            SubmissionStatus::Failed => Line::from(Span::styled(
                view.error_message.clone().unwrap_or_default(),
                Style::default().fg(Color::Red),
            )),
            SubmissionStatus::Succeeded => {
                Line::from(Span::styled(READY_TEXT, Style::default().fg(Color::Green)))
            }
            SubmissionStatus::Idle => Line::from(Span::styled(
                format!("Sends to {}", view.endpoint),
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[4]);

        self.render_notice(frame, chunks[5]);

        let footer = Paragraph::new(footer_line(&[
            ("Tab", "switch field", true),
            ("Enter", "generate", view.can_submit),
            ("Esc", "back", view.can_retreat),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[6]);
    }
}

fn style_input(input: &mut tui_textarea::TextArea<'static>, title: String, focused: bool) {
    input.set_cursor_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            }),
    );
}
