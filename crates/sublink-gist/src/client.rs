//! GitHub gist client — load, publish, and history replay.
//!
//! Window filtering and file plucking are pure functions over the API's
//! JSON shapes so they can be tested without a network.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GistError, GistResult};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";

// ── API payload shapes ─────────────────────────────────────────────

/// One file inside a gist response.
#[derive(Debug, Deserialize)]
struct GistFile {
    content: Option<String>,
}

/// A gist (or one historical version of it).
#[derive(Debug, Deserialize)]
struct Gist {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

/// One entry of the gist commit history.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GistCommit {
    pub version: String,
    pub committed_at: String,
}

#[derive(Debug, Serialize)]
struct FilePatch<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct GistPatch<'a> {
    files: HashMap<&'a str, FilePatch<'a>>,
}

// ── Pure helpers ───────────────────────────────────────────────────

/// Versions committed within the trailing `hours` window, newest first as
/// the API returns them.
fn versions_within(commits: &[GistCommit], now: DateTime<Utc>, hours: u64) -> Vec<String> {
    let window = chrono::Duration::hours(hours as i64);
    commits
        .iter()
        .filter(|c| match DateTime::parse_from_rfc3339(&c.committed_at) {
            Ok(at) => now.signed_duration_since(at.with_timezone(&Utc)) <= window,
            Err(e) => {
                warn!(committed_at = %c.committed_at, error = %e, "unparseable commit timestamp");
                false
            }
        })
        .map(|c| c.version.clone())
        .collect()
}

/// Extract the named file's content from a gist response.
fn pluck_file(gist: &Gist, filename: &str) -> Option<String> {
    gist.files.get(filename).and_then(|f| f.content.clone())
}

// ── Client ─────────────────────────────────────────────────────────

/// Minimal GitHub gist client.
#[derive(Debug, Clone)]
pub struct GistClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl GistClient {
    pub fn new(token: impl Into<String>) -> GistResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("sublink-gist/0.1")
            .build()
            .map_err(|e| GistError::Http(e.to_string()))?;
        Ok(Self {
            http,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Accept", ACCEPT)
            .header("Authorization", format!("token {}", self.token))
    }

    /// Load one file from the gist. A gist without that file is `Ok(None)`.
    pub async fn load_file(&self, gist_id: &str, filename: &str) -> GistResult<Option<String>> {
        let url = format!("{}/gists/{gist_id}", self.base_url);
        let gist: Gist = self.fetch_json(&url).await?;
        let content = pluck_file(&gist, filename);
        debug!(
            gist_id,
            filename,
            found = content.is_some(),
            "gist file loaded"
        );
        Ok(content)
    }

    /// Publish one file to the gist, creating or replacing it.
    pub async fn upload_file(&self, gist_id: &str, filename: &str, content: &str) -> GistResult<()> {
        let url = format!("{}/gists/{gist_id}", self.base_url);
        let mut files = HashMap::new();
        files.insert(filename, FilePatch { content });
        let resp = self
            .http
            .patch(&url)
            .header("Accept", ACCEPT)
            .header("Authorization", format!("token {}", self.token))
            .json(&GistPatch { files })
            .send()
            .await
            .map_err(|e| GistError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GistError::Status(status.as_u16()));
        }
        info!(gist_id, filename, bytes = content.len(), "gist file published");
        Ok(())
    }

    /// Replay the named file's content across every revision committed in
    /// the trailing `hours` window. Revisions missing the file are skipped.
    pub async fn history(
        &self,
        gist_id: &str,
        filename: &str,
        hours: u64,
    ) -> GistResult<Vec<String>> {
        let url = format!("{}/gists/{gist_id}/commits?per_page=100", self.base_url);
        let commits: Vec<GistCommit> = self.fetch_json(&url).await?;
        let versions = versions_within(&commits, Utc::now(), hours);
        info!(
            gist_id,
            filename,
            hours,
            commits = commits.len(),
            in_window = versions.len(),
            "replaying gist history"
        );

        let mut snapshots = Vec::with_capacity(versions.len());
        for version in versions {
            let url = format!("{}/gists/{gist_id}/{version}", self.base_url);
            match self.fetch_json::<Gist>(&url).await {
                Ok(gist) => {
                    if let Some(content) = pluck_file(&gist, filename) {
                        snapshots.push(content);
                    }
                }
                Err(e) => {
                    // One unreadable revision doesn't sink the replay.
                    warn!(gist_id, %version, error = %e, "failed to fetch gist revision");
                }
            }
        }
        Ok(snapshots)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> GistResult<T> {
        let resp = self
            .get(url)
            .send()
            .await
            .map_err(|e| GistError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GistError::Status(status.as_u16()));
        }
        resp.json::<T>()
            .await
            .map_err(|e| GistError::Decode(e.to_string()))
    }
}
