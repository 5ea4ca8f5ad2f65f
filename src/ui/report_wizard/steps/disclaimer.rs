//! Disclaimer step rendering

use crate::ui::report_wizard::{
    footer_line, WizardScreen, ACKNOWLEDGEMENT_LABEL, DISCLAIMER_PARAGRAPHS,
};
use crate::wizard::WizardView;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_disclaimer_step(&self, frame: &mut Frame, view: &WizardView) {
        let inner = self.render_frame(frame, view);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(8),    // Disclaimer text
                Constraint::Length(3), // Acknowledgement
                Constraint::Length(1), // Notice
                Constraint::Length(2), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Disclaimer",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, chunks[0]);

        let mut lines = Vec::new();
        for paragraph in DISCLAIMER_PARAGRAPHS {
            lines.push(Line::from(*paragraph));
            lines.push(Line::from(""));
        }
        let body = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(body, chunks[1]);

        let (marker, marker_style) = if view.acknowledged {
            ("[x] ", Style::default().fg(Color::Green))
        } else {
            ("[ ] ", Style::default().fg(Color::Gray))
        };
        let ack = Paragraph::new(Line::from(vec![
            Span::styled(marker, marker_style),
            Span::raw(ACKNOWLEDGEMENT_LABEL),
        ]))
        .wrap(Wrap { trim: true });
        frame.render_widget(ack, chunks[2]);

        self.render_notice(frame, chunks[3]);

        let footer = Paragraph::new(footer_line(&[
            ("Space", "toggle", true),
            ("Enter", "continue", view.can_advance),
            ("Esc", "close", true),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[4]);
    }
}
