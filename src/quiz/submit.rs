use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::quiz::config::GameConfig;
use crate::quiz::summary::FinalSummary;

/// Everything recorded about a finished game, as posted to the results endpoint.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub config: GameConfig,
    #[serde(flatten)]
    pub summary: FinalSummary,
    pub submitted_at: DateTime<Utc>,
}

impl GameReport {
    pub fn new(config: GameConfig, summary: FinalSummary) -> Self {
        Self {
            config,
            summary,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("results request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("results endpoint answered {0}")]
    Rejected(StatusCode),
}

/// Receives finished games. Must return immediately and never fail the caller.
pub trait ResultSink: Send + Sync {
    fn submit(&self, report: GameReport);
}

#[derive(Debug, Clone)]
pub struct HttpResultSink {
    client: Client,
    endpoint: String,
}

impl HttpResultSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the report as JSON and waits for the reply.
    pub async fn deliver(&self, report: &GameReport) -> Result<(), SubmitError> {
        let response = self.client.post(&self.endpoint).json(report).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected(status));
        }
        Ok(())
    }
}

impl ResultSink for HttpResultSink {
    fn submit(&self, report: GameReport) {
        let sink = self.clone();
        tokio::spawn(async move {
            match sink.deliver(&report).await {
                Ok(()) => info!("Submitted game results to {}", sink.endpoint()),
                Err(err) => warn!("Could not submit game results: {}", err),
            }
        });
    }
}

/// Used when no results endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResultSink;

impl ResultSink for LogResultSink {
    fn submit(&self, report: GameReport) {
        info!(
            "Game finished at {}: score {}, {} of {} correct",
            report.submitted_at,
            report.summary.total_score,
            report.summary.correct_count,
            report.summary.total_questions
        );
    }
}
