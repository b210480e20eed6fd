//! Soroban RPC client: polls `getEvents` and decodes escrow contract events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent, STATUS_NAMES};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// Topic list, as JSON-rendered `ScVal`s
    #[serde(alias = "topicJson", default)]
    pub topic: Vec<Value>,
    /// Event payload, as a JSON-rendered `ScVal`
    #[serde(alias = "valueJson", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`      : optional opaque pagination cursor from a previous response.
/// * `limit`       : maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything else we retry
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::Rpc(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::Rpc("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}


// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`LedgerEvent`] structs.
///
/// Events from contract calls that did not succeed are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<LedgerEvent> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let campaign_id = raw.topic.get(1).and_then(|t| scalar_string(&plain(t)));

    let (actor, amount, detail) = decode_data(&plain(&raw.value), &kind);

    Some(LedgerEvent {
        event_id: raw.id.clone().or_else(|| raw.paging_token.clone()),
        event_type: kind.as_str().to_string(),
        campaign_id,
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Split a normalised payload into `(actor, amount, detail)` for storage.
fn decode_data(value: &Value, kind: &EventKind) -> (Option<String>, Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => (
            extract_field(value, &["creator"]),
            extract_field(value, &["goal_amount"]),
            extract_field(value, &["title"]),
        ),
        EventKind::Contributed => (
            extract_field(value, &["contributor"]),
            extract_field(value, &["amount"]),
            extract_field(value, &["raised_amount"]),
        ),
        EventKind::StateChanged => {
            let status = extract_field(value, &["status"]).map(|s| status_name(&s));
            (None, None, status)
        }
        EventKind::FundsReleased => (
            extract_field(value, &["creator"]),
            extract_field(value, &["creator_amount"]),
            extract_field(value, &["fee"]),
        ),
        EventKind::Refunded => (
            extract_field(value, &["contributor"]),
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::FeesWithdrawn | EventKind::EmergencyWithdrawal => (
            extract_field(value, &["owner"]),
            extract_field(value, &["amount"]),
            None,
        ),
        EventKind::Paused | EventKind::Unpaused => {
            // The payload is the caller address itself.
            let actor = scalar_string(value).or_else(|| extract_field(value, &["caller"]));
            (actor, None, None)
        }
        EventKind::OwnershipTransferred => (
            extract_field(value, &["new_owner"]),
            None,
            extract_field(value, &["previous_owner"]),
        ),
        EventKind::Unknown => (None, None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(scalar_string))
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Map a `CampaignStatus` discriminant to its lowercase name. Values that are
/// already names pass through.
fn status_name(raw: &str) -> String {
    match raw.parse::<usize>() {
        Ok(n) => STATUS_NAMES
            .get(n)
            .map(|s| s.to_string())
            .unwrap_or_else(|| raw.to_string()),
        Err(_) => raw.to_lowercase(),
    }
}

/// Normalise a JSON-rendered `ScVal` into plain JSON.
///
/// Accepts the RPC's `xdrFormat: json` shapes (`{"symbol":"created"}`,
/// `{"i128":"500"}`, `{"map":[{"key":…,"val":…}]}`), the older
/// `{"type":…,"value":…}` wrapper, strings holding either of those, and
/// values that are already plain.
fn plain(value: &Value) -> Value {
    match value {
        Value::String(s) if s.starts_with('{') => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => plain(&parsed),
            Err(_) => value.clone(),
        },
        Value::Object(map) => {
            if let (Some(_), Some(inner)) = (map.get("type"), map.get("value")) {
                if map.len() == 2 {
                    return plain(inner);
                }
            }
            if map.len() == 1 {
                if let Some((tag, inner)) = map.iter().next() {
                    match tag.as_str() {
                        "symbol" | "string" | "address" | "bool" => return inner.clone(),
                        "u32" | "i32" | "u64" | "i64" | "u128" | "i128" | "u256" | "i256" => {
                            return scalar_string(inner).map(Value::String).unwrap_or(Value::Null)
                        }
                        "vec" => {
                            let items: Vec<Value> = inner
                                .as_array()
                                .map(|a| a.iter().map(plain).collect())
                                .unwrap_or_default();
                            return Value::Array(items);
                        }
                        "map" => {
                            let mut out = serde_json::Map::new();
                            for entry in inner.as_array().into_iter().flatten() {
                                let key = entry.get("key").map(plain).and_then(|k| scalar_string(&k));
                                if let (Some(key), Some(val)) = (key, entry.get("val")) {
                                    out.insert(key, plain(val));
                                }
                            }
                            return Value::Object(out);
                        }
                        _ => {}
                    }
                }
            }
            Value::Object(map.iter().map(|(k, v)| (k.clone(), plain(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(plain).collect()),
        _ => value.clone(),
    }
}

/// Extract the Soroban Symbol carried by a topic entry.
fn extract_symbol(raw: &Value) -> String {
    let normalised = plain(raw);
    scalar_string(&normalised).unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
