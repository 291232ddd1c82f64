//! devfinder core
//!
//! Session coordinator for the devfinder device catalog: the cached catalog,
//! the tab-scoped conversational search session, and the single device detail
//! slot with stale-response suppression. Front ends construct a
//! [`SessionCoordinator`] with a [`DeviceTransport`] and a [`TabStorage`].

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod detail;
pub mod error;
pub mod mutation;
pub mod search;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{CatalogCache, CatalogSnapshot, RefreshOutcome};
pub use config::ClientConfig;
pub use coordinator::{SessionCoordinator, Submission};
pub use detail::{DetailFetchCoordinator, DetailState, FetchOutcome};
pub use error::{CoreError, Result};
pub use mutation::MutationGateway;
pub use search::{SearchOutcome, SearchRecord, SearchRound};
pub use session::{SearchSessionState, SessionPayload, SetCriteriaOutcome};
pub use storage::{FileTabStorage, MemoryStorage, PersistenceGateway, TabStorage, TeardownSignal};
pub use transport::{DeviceTransport, HttpTransport};
