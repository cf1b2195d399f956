//! Spreadsheet upload form.
//!
//! # Structure
//!
//! - [`form`]: form state and the submit operation
//! - [`view`]: form and result dialog markup

pub mod form;
pub mod view;

pub use form::{FormState, ImportOutcome, SelectedFile, UploadForm};
pub use view::{render_error_dialog, render_form, render_result_dialog};

/// Multipart field carrying the project name.
pub const PROJECT_NAME_FIELD: &str = "project_name";

/// Multipart field carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

/// Project name used until the user edits it.
pub const DEFAULT_PROJECT_NAME: &str = "Proyecto Demo";
