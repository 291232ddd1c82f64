//! Device catalog cache.
//!
//! One cached collection under a fixed resource name. It is only re-fetched
//! on first use, after an explicit [`CatalogCache::invalidate`], or on a
//! manual [`CatalogCache::refresh`]; there is no background refresh.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::transport::DeviceTransport;
use crate::types::DeviceSummary;

/// Cache key of the catalog collection
pub const CATALOG_RESOURCE: &str = "devices";

/// What a front end needs to render the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub devices: Arc<Vec<DeviceSummary>>,
    /// The last fetch failed; `devices` holds whatever was fetched before
    pub is_error: bool,
    pub is_loading: bool,
    /// Invalidated since the data was fetched
    pub is_stale: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Result of a [`CatalogCache::refresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed,
    /// Another refresh was running; nothing was started
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct CatalogEntry {
    devices: Option<Arc<Vec<DeviceSummary>>>,
    error: Option<TransportError>,
    in_flight: bool,
    /// Bumped by every invalidation
    version: u64,
    fetched_version: u64,
    /// Version the last fetch started at, whether it succeeded or not
    attempted_version: Option<u64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    fn is_stale(&self) -> bool {
        self.devices.is_some() && self.fetched_version != self.version
    }

    fn needs_fetch(&self) -> bool {
        self.attempted_version != Some(self.version)
    }
}

/// Holds the full device list.
pub struct CatalogCache {
    transport: Arc<dyn DeviceTransport>,
    entry: Mutex<CatalogEntry>,
}

/// Clears the in-flight flag even if the refresh future is dropped.
struct InFlight<'a> {
    cache: &'a CatalogCache,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.cache.entry().in_flight = false;
    }
}

impl CatalogCache {
    pub fn new(transport: Arc<dyn DeviceTransport>) -> Self {
        Self {
            transport,
            entry: Mutex::new(CatalogEntry::default()),
        }
    }

    pub fn resource(&self) -> &'static str {
        CATALOG_RESOURCE
    }

    fn entry(&self) -> MutexGuard<'_, CatalogEntry> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the catalog, fetching it first if no fetch was attempted since
    /// the last invalidation. A failure is not retried until the next
    /// invalidation; call [`refresh`](Self::refresh) for that.
    pub async fn list(&self) -> CatalogSnapshot {
        if self.entry().needs_fetch() {
            self.refresh().await;
        }

        self.snapshot()
    }

    /// Force a re-fetch. A no-op while another refresh is in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        let version = {
            let mut entry = self.entry();
            if entry.in_flight {
                debug!(resource = CATALOG_RESOURCE, "refresh already in flight");
                return RefreshOutcome::AlreadyInFlight;
            }
            entry.in_flight = true;
            entry.version
        };
        let guard = InFlight { cache: self };

        let result = self.transport.list_devices().await;

        let mut entry = self.entry();
        entry.attempted_version = Some(version);
        let outcome = match result {
            Ok(devices) => {
                info!(resource = CATALOG_RESOURCE, count = devices.len(), "catalog fetched");
                entry.devices = Some(Arc::new(devices));
                entry.error = None;
                entry.fetched_version = version;
                entry.fetched_at = Some(Utc::now());
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                warn!(resource = CATALOG_RESOURCE, error = %e, "catalog fetch failed");
                entry.error = Some(e);
                RefreshOutcome::Failed
            }
        };
        drop(entry);
        drop(guard);

        outcome
    }

    /// Mark the catalog stale; the next [`list`](Self::list) re-fetches.
    ///
    /// A refresh already in flight does not clear the mark, since it may
    /// have read pre-mutation data.
    pub fn invalidate(&self) {
        let mut entry = self.entry();
        entry.version += 1;
        debug!(resource = CATALOG_RESOURCE, version = entry.version, "catalog invalidated");
    }

    /// Current state without fetching.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let entry = self.entry();
        CatalogSnapshot {
            devices: entry.devices.clone().unwrap_or_default(),
            is_error: entry.error.is_some(),
            is_loading: entry.in_flight,
            is_stale: entry.is_stale(),
            fetched_at: entry.fetched_at,
        }
    }

    /// The error of the last fetch, if it failed.
    pub fn last_error(&self) -> Option<TransportError> {
        self.entry().error.clone()
    }
}
