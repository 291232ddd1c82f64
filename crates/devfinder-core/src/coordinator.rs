//! Session coordinator.
//!
//! Wires one instance of each component around an injected transport and tab
//! storage. Coordinators share nothing, so several can live side by side
//! (one per tab, or one per test).

use std::sync::Arc;

use tracing::info;

use crate::catalog::CatalogCache;
use crate::config::ClientConfig;
use crate::detail::DetailFetchCoordinator;
use crate::error::TransportError;
use crate::mutation::MutationGateway;
use crate::search::{SearchOutcome, SearchRound};
use crate::session::{SearchSessionState, SessionPayload, SetCriteriaOutcome};
use crate::storage::{PersistenceGateway, TabStorage, TeardownSignal};
use crate::transport::DeviceTransport;

/// Result of [`SessionCoordinator::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub criteria: SetCriteriaOutcome,
    pub search: SearchOutcome,
}

pub struct SessionCoordinator {
    transport: Arc<dyn DeviceTransport>,
    gateway: Arc<PersistenceGateway>,
    session: Arc<SearchSessionState>,
    catalog: Arc<CatalogCache>,
    details: Arc<DetailFetchCoordinator>,
    mutations: MutationGateway,
    search: SearchRound,
}

impl SessionCoordinator {
    /// Hydrate the tab's session and build the components.
    pub async fn start(
        transport: Arc<dyn DeviceTransport>,
        storage: Arc<dyn TabStorage>,
        config: &ClientConfig,
    ) -> Self {
        let gateway = Arc::new(PersistenceGateway::new(storage));
        let initial = gateway.hydrate().await;

        let session = Arc::new(SearchSessionState::new(
            initial,
            gateway.clone(),
            config.skip_identical_resubmit,
        ));
        let catalog = Arc::new(CatalogCache::new(transport.clone()));
        let details = Arc::new(DetailFetchCoordinator::new(transport.clone()));
        let mutations = MutationGateway::new(transport.clone(), catalog.clone(), details.clone());
        let search = SearchRound::new(transport.clone(), session.clone());

        info!(
            skip_identical_resubmit = config.skip_identical_resubmit,
            "session coordinator started"
        );

        Self {
            transport,
            gateway,
            session,
            catalog,
            details,
            mutations,
            search,
        }
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn details(&self) -> &DetailFetchCoordinator {
        &self.details
    }

    pub fn mutations(&self) -> &MutationGateway {
        &self.mutations
    }

    pub fn session(&self) -> &SearchSessionState {
        &self.session
    }

    pub fn search(&self) -> &SearchRound {
        &self.search
    }

    /// Set the search criteria and, when a new token was minted, run the
    /// round for it.
    pub async fn submit(
        &self,
        payload: impl Into<SessionPayload>,
    ) -> Result<Submission, TransportError> {
        let criteria = self.session.set_criteria(payload).await;

        let search = if criteria.starts_round() {
            self.search.run().await?
        } else {
            SearchOutcome::Idle
        };

        Ok(Submission { criteria, search })
    }

    /// Purge the tab's stored session; in-memory state is kept.
    pub async fn teardown(&self, signal: TeardownSignal) {
        self.gateway.teardown(signal).await;
    }

    /// Admin analytics, as the backend sends them.
    pub async fn analytics(&self) -> Result<serde_json::Value, TransportError> {
        self.transport.analytics().await
    }
}
