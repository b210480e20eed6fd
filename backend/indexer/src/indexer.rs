//! Background task that follows the escrow contract's event stream.
//!
//! Each round fetches one page from `getEvents`, stores the decoded events
//! and persists the resume point, so a restart picks up where the last
//! committed page ended. Rows are deduplicated on insert, which makes
//! replaying a page after a crash harmless.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next `getEvents` call starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResumePoint {
    ledger: u32,
    cursor: Option<String>,
}

impl ResumePoint {
    /// Saved state wins over the configured start ledger.
    async fn load(pool: &SqlitePool, start_ledger: u32) -> Self {
        let saved = match db::get_last_ledger(pool).await {
            Ok(ledger) => ledger,
            Err(e) => {
                error!("Could not read saved ledger, using START_LEDGER: {e}");
                0
            }
        };
        let cursor = db::get_cursor_string(pool).await.unwrap_or(None);
        ResumePoint {
            ledger: if saved > 0 { saved as u32 } else { start_ledger },
            cursor,
        }
    }
}

/// Run the poll loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting, contract: {}", state.config.contract_id);

    let mut resume = ResumePoint::load(&state.pool, state.config.start_ledger).await;
    info!("Resuming from ledger {}", resume.ledger);

    let interval = Duration::from_secs(state.config.poll_interval_secs);

    loop {
        // A pending RPC back-off is abandoned on shutdown.
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = poll_once(&state, &resume) => outcome,
        };

        match outcome {
            Ok(next) => resume = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Indexer stopped at ledger {}", resume.ledger);
}

/// Fetch, store and checkpoint one page of events.
async fn poll_once(state: &IndexerState, from: &ResumePoint) -> Result<ResumePoint> {
    let config = &state.config;
    let (raw_events, next_cursor, latest_ledger) = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        from.ledger,
        from.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if raw_events.is_empty() {
        debug!("No new events since ledger {}", from.ledger);
    } else {
        let decoded = rpc::decode_events(&raw_events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            raw_events.len(),
            inserted
        );
    }

    let next = ResumePoint {
        ledger: latest_ledger
            .map(|l| (l as u32).max(from.ledger))
            .unwrap_or(from.ledger),
        cursor: next_cursor,
    };
    db::save_cursor(&state.pool, next.ledger as i64, next.cursor.as_deref()).await?;

    Ok(next)
}
