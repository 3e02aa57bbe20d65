use blogrank_core::{SearchAdCredentials, SearchVolume, VolumeApiError};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

const VOLUME_API_BASE: &str = "https://api.naver.com";
const KEYWORD_TOOL_PATH: &str = "/keywordstool";

/// Floor substituted for "< N" sentinel counts so low-volume keywords are
/// not reported as zero.
const LOW_VOLUME_FLOOR: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordToolResponse {
    #[serde(rename = "keywordList", default)]
    pub keyword_list: Vec<KeywordToolEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordToolEntry {
    #[serde(rename = "relKeyword", default)]
    pub rel_keyword: String,
    #[serde(rename = "monthlyPcQcCnt", default)]
    pub monthly_pc_qc_cnt: Value,
    #[serde(rename = "monthlyMobileQcCnt", default)]
    pub monthly_mobile_qc_cnt: Value,
}

/// Client for the Naver SearchAd keyword tool. Construction is gated on all
/// three credential fields being present; an incomplete credential set means
/// the enrichment feature is unavailable, not that anything failed.
#[derive(Debug)]
pub struct VolumeClient {
    http_client: Client,
    api_key: String,
    secret_key: String,
    customer_id: String,
}

impl VolumeClient {
    pub fn from_credentials(
        credentials: &SearchAdCredentials,
        timeout: Duration,
    ) -> Option<Self> {
        let api_key = credentials.api_key.clone()?;
        let secret_key = credentials.secret_key.clone()?;
        let customer_id = credentials.customer_id.clone()?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            http_client,
            api_key,
            secret_key,
            customer_id,
        })
    }

    /// Monthly query volume for `keyword`. Best-effort: every failure is
    /// logged and degrades to `None`.
    pub async fn volume_for(&self, keyword: &str) -> Option<SearchVolume> {
        let timestamp = Utc::now().timestamp_millis();
        let signature = match sign(&self.secret_key, timestamp, "GET", KEYWORD_TOOL_PATH) {
            Ok(signature) => signature,
            Err(e) => {
                warn!("Volume signature failed: {}", e);
                return None;
            }
        };

        let url = format!("{}{}", VOLUME_API_BASE, KEYWORD_TOOL_PATH);
        let hint = keyword.replace(' ', "");
        let response = self
            .http_client
            .get(&url)
            .header("X-Timestamp", timestamp.to_string())
            .header("X-API-KEY", &self.api_key)
            .header("X-Customer", &self.customer_id)
            .header("X-Signature", signature)
            .query(&[("hintKeywords", hint.as_str()), ("showDetail", "1")])
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(
                    "Volume lookup for '{}' rejected: HTTP {}",
                    keyword,
                    response.status()
                );
                return None;
            }
            Err(e) => {
                warn!("Volume lookup for '{}' failed: {}", keyword, e);
                return None;
            }
        };

        let parsed: KeywordToolResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Volume response for '{}' unparseable: {}", keyword, e);
                return None;
            }
        };

        let entry = select_entry(&parsed.keyword_list, keyword)?;
        let pc = parse_count(&entry.monthly_pc_qc_cnt);
        let mobile = parse_count(&entry.monthly_mobile_qc_cnt);
        let volume = SearchVolume::new(pc, mobile);
        debug!(
            "Volume for '{}': pc={} mobile={} total={}",
            keyword, volume.pc, volume.mobile, volume.total
        );
        Some(volume)
    }
}

/// Base64-encoded HMAC-SHA256 over `"{timestamp}.{method}.{path}"`.
pub fn sign(
    secret_key: &str,
    timestamp_millis: i64,
    method: &str,
    path: &str,
) -> Result<String, VolumeApiError> {
    use base64::Engine;

    let message = format!("{}.{}.{}", timestamp_millis, method, path);
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).map_err(|e| {
        VolumeApiError::SignatureFailed {
            reason: format!("invalid secret key: {}", e),
        }
    })?;
    mac.update(message.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// The response entry for `keyword`: exact match first, then a match with
/// whitespace removed, then the first returned entry.
pub fn select_entry<'a>(
    entries: &'a [KeywordToolEntry],
    keyword: &str,
) -> Option<&'a KeywordToolEntry> {
    let collapsed: String = keyword.split_whitespace().collect();
    entries
        .iter()
        .find(|entry| entry.rel_keyword == keyword)
        .or_else(|| {
            entries
                .iter()
                .find(|entry| entry.rel_keyword.split_whitespace().collect::<String>() == collapsed)
        })
        .or_else(|| entries.first())
}

/// Counts arrive as numbers or strings; a string containing `<` means
/// "fewer than N" and parses to the fixed floor. Unparseable values are 0.
pub fn parse_count(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number.as_u64().unwrap_or(0),
        Value::String(raw) => {
            if raw.contains('<') {
                LOW_VOLUME_FLOOR
            } else {
                raw.trim().replace(',', "").parse().unwrap_or(0)
            }
        }
        _ => 0,
    }
}
