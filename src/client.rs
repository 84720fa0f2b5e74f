//! Clients for the two remote endpoints.
//!
//! [`SheetClient`] downloads the published spreadsheet as CSV for the
//! showcase. [`ScriptClient`] talks to the deployed script that lists,
//! creates, updates and deletes projects for the dashboard.

use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, ShowcaseError};
use crate::loader::parse_csv;
use crate::record::{ProjectRecord, ROW_KEY};

/// Builds the HTTP client shared by both endpoint clients.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(ShowcaseError::HttpStatus(status.as_u16()));
    }
    Ok(response)
}

/// Reads projects from the spreadsheet's CSV export.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    csv_url: String,
}

impl SheetClient {
    pub fn new(http: reqwest::Client, csv_url: impl Into<String>) -> Self {
        Self {
            http,
            csv_url: csv_url.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, config.csv_url.clone())
    }

    pub async fn fetch_text(&self) -> Result<String> {
        let response = self.http.get(&self.csv_url).send().await?;
        Ok(check_status(response)?.text().await?)
    }

    /// Fetches and parses the sheet. Ragged rows are silently dropped.
    pub async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>> {
        let text = self.fetch_text().await?;
        let projects = parse_csv(&text);
        log::debug!("fetched {} projects from {}", projects.len(), self.csv_url);
        Ok(projects)
    }
}

/// Write actions understood by the script endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Lists and edits projects through the deployed script.
///
/// Writes POST a JSON object `{action, ...fields, _row?}`. Unlike a browser
/// `no-cors` request the status is visible here, so a refused write comes
/// back as [`ShowcaseError::HttpStatus`].
#[derive(Debug, Clone)]
pub struct ScriptClient {
    http: reqwest::Client,
    url: String,
}

impl ScriptClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, config.script_url.clone())
    }

    /// Every project currently in the sheet, each tagged with its `_row`.
    ///
    /// Entries that are not objects are skipped. A record whose `_row` is not a
    /// usable row number is still listed, it just cannot be edited or deleted.
    pub async fn list(&self) -> Result<Vec<ProjectRecord>> {
        let response = self.http.get(&self.url).send().await?;
        let entries: Vec<Value> = check_status(response)?.json().await?;

        let mut projects = Vec::with_capacity(entries.len());
        for entry in entries {
            match ProjectRecord::try_from(entry) {
                Ok(project) => {
                    if project.row().is_none() {
                        log::debug!("project {:?} has no usable {}", project.name(), ROW_KEY);
                    }
                    projects.push(project);
                }
                Err(e) => log::debug!("skipping list entry: {}", e),
            }
        }
        Ok(projects)
    }

    pub async fn create(&self, project: &ProjectRecord) -> Result<()> {
        self.submit(Action::Create, project.to_json_map()).await
    }

    pub async fn update(&self, row: u32, project: &ProjectRecord) -> Result<()> {
        let mut payload = project.to_json_map();
        payload.insert(ROW_KEY.to_string(), Value::from(row));
        self.submit(Action::Update, payload).await
    }

    pub async fn delete(&self, row: u32) -> Result<()> {
        let mut payload = Map::new();
        payload.insert(ROW_KEY.to_string(), Value::from(row));
        self.submit(Action::Delete, payload).await
    }

    async fn submit(&self, action: Action, mut payload: Map<String, Value>) -> Result<()> {
        payload.insert("action".to_string(), Value::from(action.as_str()));
        log::info!("sending {} to script endpoint", action.as_str());

        let response = self
            .http
            .post(&self.url)
            .json(&Value::Object(payload))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}
