//! Instructions step rendering

use crate::ui::report_wizard::{footer_line, WizardScreen, INSTRUCTION_STEPS};
use crate::wizard::WizardView;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_instructions_step(&self, frame: &mut Frame, view: &WizardView) {
        let inner = self.render_frame(frame, view);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(6),    // Numbered steps
                Constraint::Length(2), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Export your transactions",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, chunks[0]);

        let lines: Vec<Line> = INSTRUCTION_STEPS
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {}. ", i + 1),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(*text),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);

        let footer = Paragraph::new(footer_line(&[
            ("Enter", "continue", view.can_advance),
            ("Esc", "back", view.can_retreat),
            ("q", "close", true),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[2]);
    }
}
