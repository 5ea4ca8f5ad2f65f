//! Result step rendering

use crate::ui::report_wizard::{footer_line, WizardScreen, RESULT_TEXT};
use crate::wizard::WizardView;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_result_step(&self, frame: &mut Frame, view: &WizardView) {
        let inner = self.render_frame(frame, view);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(3),    // Archive
                Constraint::Length(1), // Notice
                Constraint::Length(2), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            RESULT_TEXT,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let body = match &view.suggested_file_name {
            Some(name) => vec![
                Line::from(vec![
                    Span::raw("Archive: "),
                    Span::styled(name.clone(), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(Span::styled(
                    format!("Saved to {}", self.download_dir.display()),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            None => vec![Line::from(Span::styled(
                "The archive is no longer available.",
                Style::default().fg(Color::Red),
            ))],
        };
        frame.render_widget(Paragraph::new(body).alignment(Alignment::Center), chunks[1]);

        self.render_notice(frame, chunks[2]);

        let footer = Paragraph::new(footer_line(&[
            ("d", "download", view.download_available),
            ("Esc", "back", view.can_retreat),
            ("q", "close", true),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[3]);
    }
}
