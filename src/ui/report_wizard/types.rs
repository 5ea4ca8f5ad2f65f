//! Type definitions and copy for the report wizard screen

/// Input that receives typing on the upload step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    FilePath,
    Year,
}

impl UploadField {
    pub fn toggled(self) -> Self {
        match self {
            UploadField::FilePath => UploadField::Year,
            UploadField::Year => UploadField::FilePath,
        }
    }
}

/// Result of a key press on the wizard screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardScreenResult {
    /// Nothing for the app to do
    Continue,
    /// Inputs are committed; the app should start a submission
    Submit,
    /// Close the wizard
    Close,
}

pub const HEADER_EYEBROW: &str = "Coinmotion";
pub const HEADER_TITLE: &str = "Generate your tax report";

pub const DISCLAIMER_PARAGRAPHS: &[&str] = &[
    "This service generates an automated, calculated report based on transaction data from Coinmotion.",
    "The report is for informational purposes only and does not constitute tax advice.",
    "The user is solely responsible for verifying the accuracy of the data and the information submitted to tax authorities.",
    "The service provider is not responsible for any tax consequences or errors resulting from the use of this report.",
];

pub const ACKNOWLEDGEMENT_LABEL: &str =
    "I understand that this report is informational only and does not replace official tax advice.";

pub const INSTRUCTION_STEPS: &[&str] = &[
    "Open Coinmotion and navigate to transactions.",
    "Choose the CSV export for the full date range.",
    "Save the CSV file to your computer.",
];

pub const UPLOAD_HINT: &str = "We will return a zip file containing one PDF report per currency.";

pub const IN_FLIGHT_TEXT: &str = "Generating…";

pub const READY_TEXT: &str = "Your report is ready. Download the zip file to view the PDFs.";

pub const RESULT_TEXT: &str = "Your PDF zip has been generated.";
