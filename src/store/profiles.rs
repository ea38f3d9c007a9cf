//! Profile service client: XP awards for finished matches

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::MatchReport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Award returned by the profile service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub xp_awarded: u64,
    pub did_win: bool,
}

/// Client for the external profile service
#[derive(Clone)]
pub struct ProfileClient {
    client: Client,
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProfileError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn award_url(&self) -> String {
        format!("{}/matches/award", self.base_url)
    }

    /// Report a finished match and return the XP it earned
    pub async fn award_match_xp(&self, report: &MatchReport) -> Result<XpAward, ProfileError> {
        let url = self.award_url();
        debug!(%url, did_win = report.did_win, "Posting match report");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(report)
            .send()
            .await
            .map_err(ProfileError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(ProfileError::Parse)
    }
}

/// Profile service errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),
}
