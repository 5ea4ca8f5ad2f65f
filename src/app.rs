use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::ReportClient;
use crate::config::Config;
use crate::ui::{TerminalGuard, WizardScreen, WizardScreenResult};
use crate::wizard::{CompletedSubmission, Completion, Wizard};

pub struct App {
    config: Config,
    screen: WizardScreen,
    /// Finished report requests, applied between key events
    completions_tx: mpsc::UnboundedSender<CompletedSubmission>,
    completions_rx: mpsc::UnboundedReceiver<CompletedSubmission>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: Arc<dyn ReportClient>) -> Self {
        let screen = WizardScreen::new(Wizard::new(client), config.download_path());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            config,
            screen,
            completions_tx,
            completions_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.screen.render(f))?;

            self.drain_completions();

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let result = self.screen.handle_key(key);
                        self.handle_screen_result(result);
                    }
                }
            }
        }

        terminal.show_cursor()?;
        Ok(())
    }

    fn handle_screen_result(&mut self, result: WizardScreenResult) {
        match result {
            WizardScreenResult::Continue => {}
            WizardScreenResult::Submit => self.start_submission(),
            WizardScreenResult::Close => {
                self.screen.close();
                self.should_quit = true;
            }
        }
    }

    /// Begin a submission and run its request on a background task
    fn start_submission(&mut self) {
        let pending = match self.screen.wizard.begin_submit() {
            Ok(pending) => pending,
            Err(rejected) => {
                tracing::debug!(reason = %rejected, "Submission not started");
                return;
            }
        };

        let client = self.screen.wizard.controller().client();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let completed = pending.execute(&*client).await;
            // Receiver is gone only when the app has exited
            let _ = tx.send(completed);
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(completed) = self.completions_rx.try_recv() {
            match self.screen.wizard.finish_submit(completed) {
                Completion::Succeeded(handle) => {
                    tracing::info!(%handle, "Report ready");
                }
                Completion::Failed(err) => {
                    tracing::info!(error = %err, "Report generation failed");
                }
                Completion::Discarded => {}
            }
        }
    }
}
