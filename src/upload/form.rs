//! Upload form state.

use axum::extract::Multipart;
use mime::Mime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{DEFAULT_PROJECT_NAME, FILE_FIELD, PROJECT_NAME_FIELD};
use crate::client::ImportApi;
use crate::error::ImportError;

/// A file picked in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl SelectedFile {
    /// Create a selection from its name, declared type and contents.
    pub fn new(name: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            data,
        }
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Declared content type when it parses, else one guessed from the file name.
    pub fn mime_type(&self) -> String {
        self.content_type
            .as_deref()
            .filter(|ct| ct.parse::<Mime>().is_ok())
            .map_or_else(
                || {
                    mime_guess::from_path(&self.name)
                        .first_or_octet_stream()
                        .to_string()
                },
                str::to_string,
            )
    }
}

/// Whether the form can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No file selected; submit does nothing.
    Idle,
    /// A file is selected.
    Ready,
}

/// Opaque JSON answer from the import API.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    body: serde_json::Value,
}

impl ImportOutcome {
    /// Wrap a decoded response body.
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }

    /// The decoded response body.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Compact JSON text shown to the user.
    pub fn display(&self) -> String {
        self.body.to_string()
    }
}

/// Local state of the upload form: one optional file and a project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    selected_file: Option<SelectedFile>,
    project_name: String,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            selected_file: None,
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

impl UploadForm {
    /// Empty form with the default project name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the form from a browser submission.
    ///
    /// Fields are applied in order: every `file` field replaces the
    /// selection, and an empty unnamed file (nothing chosen) clears it.
    /// Unknown fields are ignored.
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, ImportError> {
        let mut form = Self::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                PROJECT_NAME_FIELD => form.set_project_name(field.text().await?),
                FILE_FIELD => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    if file_name.is_empty() && data.is_empty() {
                        form.set_file(None);
                    } else {
                        form.set_file(Some(SelectedFile::new(
                            file_name,
                            content_type,
                            data.to_vec(),
                        )));
                    }
                }
                _ => debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Current project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Currently selected file, if any.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    /// Store the project name verbatim.
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    /// Replace or clear the selected file.
    pub fn set_file(&mut self, file: Option<SelectedFile>) {
        self.selected_file = file;
    }

    /// `Ready` once a file is selected, `Idle` otherwise.
    pub fn state(&self) -> FormState {
        if self.selected_file.is_some() {
            FormState::Ready
        } else {
            FormState::Idle
        }
    }

    /// Send the selection to the import API.
    ///
    /// Returns `Ok(None)` without touching the network when no file is
    /// selected. The form itself is left unchanged either way.
    pub async fn submit(&self, api: &dyn ImportApi) -> Result<Option<ImportOutcome>, ImportError> {
        let Some(file) = &self.selected_file else {
            debug!(name: "import.skipped", "Submit without a file, nothing sent");
            return Ok(None);
        };

        let submission_id = Uuid::new_v4();
        info!(
            name: "import.submitted",
            %submission_id,
            project_name = %self.project_name,
            file_name = %file.name(),
            size = file.len(),
            "Submitting spreadsheet"
        );

        match api.import_excel(&self.project_name, file).await {
            Ok(body) => {
                info!(name: "import.completed", %submission_id, "Import API answered");
                Ok(Some(ImportOutcome::new(body)))
            }
            Err(e) => {
                warn!(name: "import.failed", %submission_id, error = %e, "Import failed");
                Err(e)
            }
        }
    }
}
