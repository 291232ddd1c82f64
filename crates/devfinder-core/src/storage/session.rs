//! Search-session persistence.
//!
//! The gateway is the only writer of the session key. What it reads back is
//! deliberately partial: free-text input and selector facets survive a reload,
//! criteria and the request token never do, so a reload cannot re-issue the
//! previous search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::TabStorage;
use crate::types::{SearchSession, SelectorFilters};

/// Storage key holding the serialized [`SearchSession`]
pub const SESSION_STORAGE_KEY: &str = "searchSession";

/// Tab lifecycle events that purge the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownSignal {
    /// The tab is being closed or reloaded
    Unload,
    /// The tab was hidden (switched away, minimized)
    Hidden,
}

/// Reads the session once at startup and writes it back after every change.
pub struct PersistenceGateway {
    storage: Arc<dyn TabStorage>,
    hydrated: AtomicBool,
}

impl PersistenceGateway {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self {
            storage,
            hydrated: AtomicBool::new(false),
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Restore the session from tab storage.
    ///
    /// Missing, unreadable or corrupt values yield the empty session. Either
    /// way the returned session becomes the initial persisted state.
    pub async fn hydrate(&self) -> SearchSession {
        let session = match self.storage.get_item(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => restore_session(&value),
                Err(e) => {
                    debug!(error = %e, "stored search session is corrupt, starting empty");
                    SearchSession::default()
                }
            },
            Ok(None) => SearchSession::default(),
            Err(e) => {
                warn!(error = %e, "tab storage unavailable, starting with empty session");
                SearchSession::default()
            }
        };

        info!(
            console_input = !session.console_input.is_empty(),
            selectors = session.selectors.len(),
            "search session hydrated"
        );

        self.write(&session).await;
        self.hydrated.store(true, Ordering::Release);
        session
    }

    /// Write the session. Ignored until [`hydrate`](Self::hydrate) finished;
    /// returns whether a write was attempted.
    pub async fn persist(&self, session: &SearchSession) -> bool {
        if !self.is_hydrated() {
            debug!("persist skipped, hydration not complete");
            return false;
        }

        self.write(session).await;
        true
    }

    /// Purge the stored session. The in-memory session is untouched.
    pub async fn teardown(&self, signal: TeardownSignal) {
        match self.storage.remove_item(SESSION_STORAGE_KEY).await {
            Ok(()) => info!(?signal, "search session purged from tab storage"),
            Err(e) => warn!(?signal, error = %e, "failed to purge search session"),
        }
    }

    async fn write(&self, session: &SearchSession) {
        let content = match serde_json::to_string(session) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "failed to serialize search session");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(SESSION_STORAGE_KEY, &content).await {
            warn!(error = %e, "failed to persist search session");
        }
    }
}

/// Carry forward only `consoleInput` and the known selectors.
pub fn restore_session(value: &Value) -> SearchSession {
    let console_input = value
        .get("consoleInput")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let selectors = value
        .get("selectors")
        .map(SelectorFilters::from_value)
        .unwrap_or_default();

    SearchSession {
        criteria: Vec::new(),
        console_input,
        selectors,
        request_id: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use crate::types::{SearchCriterion, SelectorKey};
    use async_trait::async_trait;
    use serde_json::json;

    struct BrokenStorage;

    #[async_trait]
    impl TabStorage for BrokenStorage {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    /// Holds every write until the test releases it.
    #[derive(Default)]
    struct GatedStorage {
        inner: MemoryStorage,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl TabStorage for GatedStorage {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key).await
        }
    }

    async fn stored(storage: &MemoryStorage) -> Option<Value> {
        storage
            .get_item(SESSION_STORAGE_KEY)
            .await
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_hydrate_strips_criteria_and_request_id() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                SESSION_STORAGE_KEY,
                &json!({
                    "criteria": [{"type": "ram", "description": "8"}],
                    "requestId": "r1",
                    "consoleInput": "hello",
                    "selectors": {"ram": "8"}
                })
                .to_string(),
            )
            .await
            .unwrap();

        let gateway = PersistenceGateway::new(storage.clone());
        let session = gateway.hydrate().await;

        assert!(session.criteria.is_empty());
        assert_eq!(session.request_id, "");
        assert_eq!(session.console_input, "hello");
        assert_eq!(session.selectors.get(SelectorKey::Ram), Some("8"));
        assert_eq!(session.selectors.len(), 1);

        // The stripped session replaces what was stored.
        let persisted = stored(&storage).await.unwrap();
        assert_eq!(persisted["requestId"], json!(""));
        assert_eq!(persisted["criteria"], json!([]));
    }

    #[tokio::test]
    async fn test_hydrate_drops_unknown_selector_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                SESSION_STORAGE_KEY,
                r#"{"selectors":{"foo":"bar","camera":"  ","battery":"5000"}}"#,
            )
            .await
            .unwrap();

        let session = PersistenceGateway::new(storage).hydrate().await;

        assert_eq!(session.selectors.len(), 1);
        assert_eq!(session.selectors.get(SelectorKey::Battery), Some("5000"));
        let value = serde_json::to_value(&session.selectors).unwrap();
        assert!(value.get("foo").is_none());
    }

    #[tokio::test]
    async fn test_hydrate_empty_storage_writes_default() {
        let storage = Arc::new(MemoryStorage::new());
        let gateway = PersistenceGateway::new(storage.clone());

        let session = gateway.hydrate().await;

        assert_eq!(session, SearchSession::default());
        assert_eq!(
            stored(&storage).await.unwrap(),
            serde_json::to_value(SearchSession::default()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_hydrate_corrupt_json_is_empty_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(SESSION_STORAGE_KEY, "{not json")
            .await
            .unwrap();

        let session = PersistenceGateway::new(storage).hydrate().await;
        assert_eq!(session, SearchSession::default());
    }

    #[tokio::test]
    async fn test_unavailable_storage_never_errors() {
        let gateway = PersistenceGateway::new(Arc::new(BrokenStorage));

        let session = gateway.hydrate().await;
        assert_eq!(session, SearchSession::default());
        assert!(gateway.persist(&session).await);
        gateway.teardown(TeardownSignal::Unload).await;
    }

    #[tokio::test]
    async fn test_persist_ignored_before_hydration() {
        let storage = Arc::new(MemoryStorage::new());
        let gateway = PersistenceGateway::new(storage.clone());

        let mut session = SearchSession::default();
        session.console_input = "early".to_string();

        assert!(!gateway.persist(&session).await);
        assert!(stored(&storage).await.is_none());

        gateway.hydrate().await;
        assert!(gateway.persist(&session).await);
        assert_eq!(stored(&storage).await.unwrap()["consoleInput"], json!("early"));
    }

    #[tokio::test]
    async fn test_not_hydrated_until_initial_write_lands() {
        let storage = Arc::new(GatedStorage::default());
        let gateway = Arc::new(PersistenceGateway::new(storage.clone()));

        let hydrate = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.hydrate().await }
        });
        storage.entered.notified().await;

        let mut session = SearchSession::default();
        session.console_input = "during hydration".to_string();
        assert!(!gateway.is_hydrated());
        assert!(!gateway.persist(&session).await);

        storage.release.notify_one();
        assert_eq!(hydrate.await.unwrap(), SearchSession::default());
        assert!(gateway.is_hydrated());

        storage.release.notify_one();
        assert!(gateway.persist(&session).await);
        assert_eq!(stored(&storage.inner).await.unwrap()["consoleInput"], json!("during hydration"));
    }

    #[tokio::test]
    async fn test_teardown_clears_storage() {
        for signal in [TeardownSignal::Unload, TeardownSignal::Hidden] {
            let storage = Arc::new(MemoryStorage::new());
            let gateway = PersistenceGateway::new(storage.clone());
            gateway.hydrate().await;

            let mut session = SearchSession::default();
            session.criteria.push(SearchCriterion::new("camera", "night shots"));
            session.request_id = "token".to_string();
            gateway.persist(&session).await;
            assert!(stored(&storage).await.is_some());

            gateway.teardown(signal).await;
            assert!(storage.get_item(SESSION_STORAGE_KEY).await.unwrap().is_none());
        }
    }

    #[test]
    fn test_restore_session_non_object() {
        assert_eq!(restore_session(&json!(42)), SearchSession::default());
        assert_eq!(
            restore_session(&json!({"consoleInput": 7})),
            SearchSession::default()
        );
    }
}
