//! SysML v2 API client
//!
//! Lists projects and commits of a SysML v2 API server and downloads the
//! elements of the most recent commit of the most recent project. Every
//! request asks for JSON-LD.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{Result, SemtagError};
use crate::output::write_output;

/// Media type requested from the API
pub const JSONLD_ACCEPT: &str = "application/ld+json";

/// File name used for downloaded elements when no destination is given
pub const ELEMENTS_FILE: &str = "elements.jsonld";

/// Project or commit entry of an API listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRecord {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created: DateTime<Utc>,
}

/// Elements of the latest commit, saved to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestElements {
    pub project_id: String,
    pub commit_id: String,
    pub path: PathBuf,
    /// `http://projects/{project}/commits/{commit}/elements/`
    pub base_uri: String,
}

pub struct ApiClient {
    api_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: normalize_api_url(api_url),
            http: Client::new(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn projects_url(&self) -> String {
        format!("{}projects", self.api_url)
    }

    pub fn commits_url(&self, project_id: &str) -> String {
        format!("{}projects/{}/commits", self.api_url, project_id)
    }

    pub fn elements_url(&self, project_id: &str, commit_id: &str) -> String {
        format!(
            "{}projects/{}/commits/{}/elements",
            self.api_url, project_id, commit_id
        )
    }

    /// Projects, newest first
    pub fn get_projects(&self) -> Result<Vec<ApiRecord>> {
        let records: Vec<ApiRecord> = self.get(&self.projects_url())?.json()?;
        Ok(latest_first(records))
    }

    /// Commits of a project, newest first
    pub fn get_commits(&self, project_id: &str) -> Result<Vec<ApiRecord>> {
        let records: Vec<ApiRecord> = self.get(&self.commits_url(project_id))?.json()?;
        Ok(latest_first(records))
    }

    /// Elements of one commit, as returned by the API
    pub fn get_elements(&self, project_id: &str, commit_id: &str) -> Result<Value> {
        Ok(self.get(&self.elements_url(project_id, commit_id))?.json()?)
    }

    /// Save the elements of the latest commit of the latest project to `dest`
    pub fn download_latest_elements(&self, dest: &Path) -> Result<LatestElements> {
        let project = newest(self.get_projects()?, "projects", &self.projects_url())?;
        info!(project = %project.id, created = %project.created.to_rfc3339(), "latest project");

        let commit = newest(
            self.get_commits(&project.id)?,
            "commits",
            &self.commits_url(&project.id),
        )?;
        info!(commit = %commit.id, created = %commit.created.to_rfc3339(), "latest commit");

        let elements = self.get_elements(&project.id, &commit.id)?;
        write_output(dest, &serde_json::to_vec_pretty(&elements)?)?;

        let path = fs::canonicalize(dest)?;
        info!(path = %path.display(), "elements downloaded");

        Ok(LatestElements {
            base_uri: elements_base_uri(&project.id, &commit.id),
            project_id: project.id,
            commit_id: commit.id,
            path,
        })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, JSONLD_ACCEPT)
            .send()?
            .error_for_status()?;
        Ok(response)
    }
}

/// Ensure the API URL ends with `/`
pub fn normalize_api_url(api_url: &str) -> String {
    if api_url.ends_with('/') {
        api_url.to_string()
    } else {
        format!("{}/", api_url)
    }
}

/// Base URI of the elements of one commit
pub fn elements_base_uri(project_id: &str, commit_id: &str) -> String {
    format!(
        "http://projects/{}/commits/{}/elements/",
        project_id, commit_id
    )
}

/// Sort by `created` descending; equal timestamps fall back to `@id` descending
pub fn latest_first(mut records: Vec<ApiRecord>) -> Vec<ApiRecord> {
    records.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| b.id.cmp(&a.id))
    });
    records
}

/// RFC 3339, or an ISO-8601 date-time without offset read as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SemtagError::Parse(format!("Invalid timestamp '{}'", value)))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value).map_err(serde::de::Error::custom)
}

fn newest(records: Vec<ApiRecord>, what: &str, url: &str) -> Result<ApiRecord> {
    records
        .into_iter()
        .next()
        .ok_or_else(|| SemtagError::NoData(format!("No {} returned by {}", what, url)))
}
