//! Conversational search rounds.
//!
//! A round runs for the request token the session holds when it starts. Its
//! response is kept only if the session still holds that token when the
//! response arrives; otherwise a newer `set_criteria` has superseded it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::TransportError;
use crate::session::SearchSessionState;
use crate::transport::DeviceTransport;
use crate::types::{SearchRequest, SearchResponse};

/// A committed search response and the token it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub request_id: String,
    pub response: SearchResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No active search (no criteria or no token); nothing was sent
    Idle,
    Committed(SearchResponse),
    /// The session moved to a newer token while the round was in flight
    Superseded,
}

pub struct SearchRound {
    transport: Arc<dyn DeviceTransport>,
    session: Arc<SearchSessionState>,
    latest: Mutex<Option<SearchRecord>>,
}

impl SearchRound {
    pub fn new(transport: Arc<dyn DeviceTransport>, session: Arc<SearchSessionState>) -> Self {
        Self {
            transport,
            session,
            latest: Mutex::new(None),
        }
    }

    fn latest_slot(&self) -> MutexGuard<'_, Option<SearchRecord>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the round for the session's current token.
    ///
    /// A failure is returned only while its round is still current; stale
    /// failures are reported as [`SearchOutcome::Superseded`].
    pub async fn run(&self) -> Result<SearchOutcome, TransportError> {
        let session = self.session.snapshot().await;
        if !session.has_active_search() {
            return Ok(SearchOutcome::Idle);
        }

        let request = SearchRequest::from(&session);
        debug!(
            request_id = %session.request_id,
            turns = request.conversation_history.len(),
            "search round started"
        );
        let result = self.transport.search(&request).await;

        let current = self.session.request_id().await;
        if current != session.request_id {
            debug!(
                issued = %session.request_id,
                %current,
                "stale search response discarded"
            );
            return Ok(SearchOutcome::Superseded);
        }

        let response = result?;
        match &response {
            SearchResponse::Ask { .. } => info!(request_id = %session.request_id, "search asked a follow-up"),
            SearchResponse::Result(devices) => {
                info!(request_id = %session.request_id, count = devices.len(), "search returned results")
            }
        }

        *self.latest_slot() = Some(SearchRecord {
            request_id: session.request_id,
            response: response.clone(),
        });

        Ok(SearchOutcome::Committed(response))
    }

    /// The last committed response, whatever token it answers.
    pub fn latest(&self) -> Option<SearchRecord> {
        self.latest_slot().clone()
    }

    /// The last committed response if it answers the session's current token.
    pub async fn current(&self) -> Option<SearchResponse> {
        let request_id = self.session.request_id().await;
        self.latest()
            .filter(|record| record.request_id == request_id)
            .map(|record| record.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, PersistenceGateway};
    use crate::test_support::{detail, server_error, ScriptedTransport};
    use serde_json::json;

    async fn create_round(transport: &Arc<ScriptedTransport>) -> (Arc<SearchRound>, Arc<SearchSessionState>) {
        let gateway = Arc::new(PersistenceGateway::new(Arc::new(MemoryStorage::new())));
        let initial = gateway.hydrate().await;
        let session = Arc::new(SearchSessionState::new(initial, gateway, false));
        let round = Arc::new(SearchRound::new(transport.clone(), session.clone()));
        (round, session)
    }

    fn criteria(description: &str) -> serde_json::Value {
        json!({"criteria": [{"type": "usage", "description": description}]})
    }

    #[tokio::test]
    async fn test_no_active_search_is_idle() {
        let transport = Arc::new(ScriptedTransport::new());
        let (round, _session) = create_round(&transport).await;

        assert_eq!(round.run().await.unwrap(), SearchOutcome::Idle);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_committed_result_is_recorded() {
        let response = SearchResponse::Result(vec![detail("p1", "Pixel")]);
        let transport = Arc::new(ScriptedTransport::new().with_search_response(response.clone()));
        let (round, session) = create_round(&transport).await;

        let outcome = session.set_criteria(criteria("photography")).await;
        assert_eq!(
            round.run().await.unwrap(),
            SearchOutcome::Committed(response.clone())
        );

        let record = round.latest().unwrap();
        assert_eq!(record.request_id, outcome.request_id());
        assert_eq!(round.current().await, Some(response));
    }

    #[tokio::test]
    async fn test_round_superseded_by_new_criteria() {
        let transport = Arc::new(ScriptedTransport::new());
        let (round, session) = create_round(&transport).await;
        let gate = transport.gate_search();

        session.set_criteria(criteria("gaming")).await;
        let first = tokio::spawn({
            let round = round.clone();
            async move { round.run().await }
        });
        transport.wait_for("POST /devices/search", 1).await;

        session.set_criteria(criteria("gaming")).await;
        gate.send(Ok(SearchResponse::Ask {
            text: "Which budget?".to_string(),
        }))
        .unwrap();

        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Superseded);
        assert!(round.latest().is_none());
    }

    #[tokio::test]
    async fn test_stale_failure_is_not_an_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let (round, session) = create_round(&transport).await;
        let gate = transport.gate_search();

        session.set_criteria(criteria("battery life")).await;
        let first = tokio::spawn({
            let round = round.clone();
            async move { round.run().await }
        });
        transport.wait_for("POST /devices/search", 1).await;

        session.set_criteria(criteria("battery life, cheap")).await;
        gate.send(Err(server_error())).unwrap();

        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Superseded);
    }

    #[tokio::test]
    async fn test_current_failure_is_returned() {
        let transport = Arc::new(ScriptedTransport::new());
        let (round, session) = create_round(&transport).await;
        let gate = transport.gate_search();
        gate.send(Err(server_error())).unwrap();

        session.set_criteria(criteria("camera")).await;
        assert_eq!(round.run().await.unwrap_err(), server_error());
        assert!(round.latest().is_none());
    }

    #[tokio::test]
    async fn test_current_ignores_older_token() {
        let transport = Arc::new(ScriptedTransport::new());
        let (round, session) = create_round(&transport).await;

        session.set_criteria(criteria("compact")).await;
        round.run().await.unwrap();
        assert!(round.current().await.is_some());

        session.set_criteria(criteria("compact")).await;
        assert!(round.latest().is_some());
        assert!(round.current().await.is_none());
    }
}
