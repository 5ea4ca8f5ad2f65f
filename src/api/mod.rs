//! Report endpoint integration
//!
//! This module provides:
//! - The `ReportClient` seam and its reqwest implementation
//! - The submission error taxonomy shared with the wizard core

pub mod error;
pub mod report;

pub use error::{SubmissionError, ValidationError, GENERIC_UPLOAD_FAILURE};
pub use report::{endpoint_url, HttpReportClient, ReportClient, ReportRequest};
