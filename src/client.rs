//! HTTP client for the remote import API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use url::Url;

use crate::error::ImportError;
use crate::upload::{FILE_FIELD, PROJECT_NAME_FIELD, SelectedFile};

/// Import endpoint, relative to the API base URL.
pub const IMPORT_EXCEL_PATH: &str = "api/v1/imports/excel";

/// Seam between the upload form and the remote import API.
#[async_trait]
pub trait ImportApi: Send + Sync {
    /// Send a spreadsheet and its project name, returning the decoded JSON body.
    async fn import_excel(
        &self,
        project_name: &str,
        file: &SelectedFile,
    ) -> Result<serde_json::Value, ImportError>;
}

/// [`ImportApi`] backed by `reqwest`.
///
/// # Example
///
/// ```rust,no_run
/// use ofitec_web::client::HttpImportClient;
/// use std::time::Duration;
///
/// let client = HttpImportClient::new("http://localhost:8000", Duration::from_secs(60))?;
/// assert_eq!(client.endpoint().path(), "/api/v1/imports/excel");
/// # Ok::<(), ofitec_web::error::ImportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpImportClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpImportClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ImportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ImportError> {
        Ok(Self {
            endpoint: excel_endpoint(base_url)?,
            http,
        })
    }

    /// Full URL the spreadsheet is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ImportApi for HttpImportClient {
    async fn import_excel(
        &self,
        project_name: &str,
        file: &SelectedFile,
    ) -> Result<serde_json::Value, ImportError> {
        let part = Part::bytes(file.data().to_vec())
            .file_name(file.name().to_string())
            .mime_str(&file.mime_type())?;

        let form = Form::new()
            .text(PROJECT_NAME_FIELD, project_name.to_string())
            .part(FILE_FIELD, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ImportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Join the import path onto `base`, keeping any path prefix the base carries.
fn excel_endpoint(base: &str) -> Result<Url, ImportError> {
    let mut base = Url::parse(base.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(IMPORT_EXCEL_PATH)?)
}
