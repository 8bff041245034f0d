//! Combination dataset cache
//!
//! Every read prefers the copy in the key-value store and falls back to the
//! upstream JSON document. Whichever copy was used is written back to the
//! store on a detached task; the caller never waits for that write. The store
//! entry has no expiry, it is simply overwritten on each use.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::errors::{AppResult, FetchError, FetchResult};
use crate::models::CombinationDataset;
use crate::storage::KeyValueStore;
use crate::utils::StandardHttpClient;

/// Parsed dataset together with the exact text it was parsed from
#[derive(Debug, Clone)]
struct Snapshot {
    raw: Arc<str>,
    dataset: Arc<CombinationDataset>,
}

type SharedFetch = Shared<BoxFuture<'static, FetchResult<Snapshot>>>;

#[derive(Default)]
struct FlightState {
    next_generation: u64,
    current: Option<(u64, SharedFetch)>,
}

pub struct DatasetCache {
    store: Arc<dyn KeyValueStore>,
    client: StandardHttpClient,
    dataset_url: String,
    key: String,
    single_flight: bool,
    in_flight: Mutex<FlightState>,
}

impl DatasetCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        client: StandardHttpClient,
        dataset_url: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            client,
            dataset_url: dataset_url.into(),
            key: key.into(),
            single_flight: true,
            in_flight: Mutex::new(FlightState::default()),
        }
    }

    /// Let concurrent cold-cache readers share one upstream fetch
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// Current dataset, from the store if present, upstream otherwise
    ///
    /// Upstream failures propagate; nothing is retried.
    pub async fn get_dataset(&self) -> AppResult<Arc<CombinationDataset>> {
        let snapshot = match self.read_cached().await? {
            Some(snapshot) => {
                debug!("Serving combination dataset from store key '{}'", self.key);
                snapshot
            }
            None => self.fetch_remote().await?,
        };

        self.schedule_write_back(snapshot.raw.clone());
        Ok(snapshot.dataset)
    }

    async fn read_cached(&self) -> AppResult<Option<Snapshot>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CombinationDataset>(&raw) {
            Ok(dataset) => Ok(Some(Snapshot {
                raw: Arc::from(raw),
                dataset: Arc::new(dataset),
            })),
            Err(e) => {
                warn!(
                    "Ignoring unreadable dataset under store key '{}': {}",
                    self.key, e
                );
                Ok(None)
            }
        }
    }

    async fn fetch_remote(&self) -> FetchResult<Snapshot> {
        if !self.single_flight {
            return fetch_snapshot(self.client.clone(), self.dataset_url.clone()).await;
        }

        let (generation, fetch) = {
            let mut state = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            let joined = state
                .current
                .as_ref()
                .map(|(generation, fetch)| (*generation, fetch.clone()));
            match joined {
                Some(flight) => {
                    debug!("Joining in-flight dataset fetch");
                    flight
                }
                None => {
                    let generation = state.next_generation;
                    state.next_generation += 1;
                    let fetch = fetch_snapshot(self.client.clone(), self.dataset_url.clone())
                        .boxed()
                        .shared();
                    state.current = Some((generation, fetch.clone()));
                    (generation, fetch)
                }
            }
        };

        let result = fetch.await;

        // Whoever finishes first retires the fetch so later misses start fresh
        let mut state = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(&state.current, Some((current, _)) if *current == generation) {
            state.current = None;
        }

        result
    }

    fn schedule_write_back(&self, raw: Arc<str>) {
        let store = self.store.clone();
        let key = self.key.clone();

        tokio::spawn(async move {
            match store.put(&key, raw.to_string()).await {
                Ok(()) => debug!("Refreshed store key '{}' ({} bytes)", key, raw.len()),
                Err(e) => warn!("Failed to refresh store key '{}': {}", key, e),
            }
        });
    }
}

async fn fetch_snapshot(client: StandardHttpClient, url: String) -> FetchResult<Snapshot> {
    let raw = client.fetch_text(&url).await?;
    let dataset: CombinationDataset =
        serde_json::from_str(&raw).map_err(|e| FetchError::Parse {
            message: e.to_string(),
        })?;

    info!(
        "Fetched combination dataset from {}: {} keys, {} bytes",
        url,
        dataset.len(),
        raw.len()
    );

    Ok(Snapshot {
        raw: Arc::from(raw),
        dataset: Arc::new(dataset),
    })
}
