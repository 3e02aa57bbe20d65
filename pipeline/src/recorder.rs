use crate::traits::RecordSink;
use async_trait::async_trait;
use blogrank_core::AnalysisResult;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fire-and-forget appender posting log lines and result rows to a
/// configured webhook (typically a spreadsheet bridge). Failures are
/// swallowed; the sink must never slow down or fail an analysis.
#[derive(Debug)]
pub struct WebhookRecorder {
    http_client: Client,
    webhook_url: String,
    run_id: Uuid,
}

impl WebhookRecorder {
    pub fn new(webhook_url: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            webhook_url,
            run_id: Uuid::new_v4(),
        }
    }

    async fn post(&self, payload: serde_json::Value) {
        let outcome = self
            .http_client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await;

        match outcome {
            Ok(response) if response.status().is_success() => {
                debug!("Record appended");
            }
            Ok(response) => {
                warn!("Record sink rejected append: HTTP {}", response.status());
            }
            Err(e) => {
                warn!("Record sink unreachable: {}", e);
            }
        }
    }
}

#[async_trait]
impl RecordSink for WebhookRecorder {
    async fn append_log(&self, line: &str) {
        self.post(json!({
            "type": "log",
            "run_id": self.run_id,
            "timestamp": Utc::now().to_rfc3339(),
            "message": line,
        }))
        .await;
    }

    async fn append_result(&self, result: &AnalysisResult) {
        self.post(json!({
            "type": "result",
            "run_id": self.run_id,
            "timestamp": Utc::now().to_rfc3339(),
            "result": result,
        }))
        .await;
    }
}
