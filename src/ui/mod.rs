pub mod dialogs;
pub mod report_wizard;
pub mod terminal_guard;

pub use report_wizard::{WizardScreen, WizardScreenResult};
pub use terminal_guard::{install_panic_hook, TerminalGuard};
