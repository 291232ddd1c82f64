//! Single-slot device detail fetching with stale-response suppression.
//!
//! There is no transport-level cancellation. Each [`DetailFetchCoordinator::fetch`]
//! bumps a generation counter and a response is committed only if the
//! counter still has the value its request was issued with, so the last
//! request wins regardless of completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::TransportError;
use crate::transport::DeviceTransport;
use crate::types::DeviceDetail;

/// What the detail slot currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { id: String },
    Resolved { id: String, detail: DeviceDetail },
    Errored { id: String, error: TransportError },
}

impl DetailState {
    /// Id the slot is bound to, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading { id }
            | DetailState::Resolved { id, .. }
            | DetailState::Errored { id, .. } => Some(id),
        }
    }

    pub fn detail(&self) -> Option<&DeviceDetail> {
        match self {
            DetailState::Resolved { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading { .. })
    }
}

/// Whether a fetch's result reached the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed,
    /// A newer fetch or a mutation took over the slot first
    Superseded,
}

#[derive(Debug)]
struct DetailSlot {
    generation: u64,
    state: DetailState,
}

/// Owns the "currently viewed device" slot.
pub struct DetailFetchCoordinator {
    transport: Arc<dyn DeviceTransport>,
    slot: Mutex<DetailSlot>,
}

impl DetailFetchCoordinator {
    pub fn new(transport: Arc<dyn DeviceTransport>) -> Self {
        Self {
            transport,
            slot: Mutex::new(DetailSlot {
                generation: 0,
                state: DetailState::Idle,
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, DetailSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch `id` into the slot.
    ///
    /// Always issues a request, even when `id` is already loading or shown.
    pub async fn fetch(&self, id: &str) -> FetchOutcome {
        let generation = {
            let mut slot = self.slot();
            slot.generation += 1;
            slot.state = DetailState::Loading { id: id.to_string() };
            slot.generation
        };

        let result = self.transport.get_device(id).await;

        let mut slot = self.slot();
        if slot.generation != generation {
            debug!(
                %id,
                issued = generation,
                current = slot.generation,
                "stale detail response discarded"
            );
            return FetchOutcome::Superseded;
        }

        slot.state = match result {
            Ok(detail) => DetailState::Resolved {
                id: id.to_string(),
                detail,
            },
            Err(error) => {
                debug!(%id, %error, "detail fetch failed");
                DetailState::Errored {
                    id: id.to_string(),
                    error,
                }
            }
        };

        FetchOutcome::Committed
    }

    pub fn state(&self) -> DetailState {
        self.slot().state.clone()
    }

    pub fn current_id(&self) -> Option<String> {
        self.slot().state.id().map(str::to_string)
    }

    pub fn detail(&self) -> Option<DeviceDetail> {
        self.slot().state.detail().cloned()
    }

    /// Generation of the latest request or mutation applied to the slot.
    pub fn generation(&self) -> u64 {
        self.slot().generation
    }

    /// Show `detail` if the slot is bound to `id`, superseding any fetch in
    /// flight for it. Returns whether the slot changed.
    pub(crate) fn replace_if_current(&self, id: &str, detail: DeviceDetail) -> bool {
        let mut slot = self.slot();
        if slot.state.id() != Some(id) {
            return false;
        }

        slot.generation += 1;
        slot.state = DetailState::Resolved {
            id: id.to_string(),
            detail,
        };
        true
    }

    /// Return to [`DetailState::Idle`] if the slot is bound to `id`.
    pub(crate) fn clear_if_current(&self, id: &str) -> bool {
        let mut slot = self.slot();
        if slot.state.id() != Some(id) {
            return false;
        }

        slot.generation += 1;
        slot.state = DetailState::Idle;
        true
    }
}
