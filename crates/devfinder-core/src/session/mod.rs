//! Conversational search session state.
//!
//! [`SearchSessionState::set_criteria`] is the only way to change the
//! session. Every call normalizes its payload and, by default, mints a new
//! request token even when nothing changed, so "search again" with the same
//! filters still starts a new round.

pub mod token;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::storage::PersistenceGateway;
use crate::types::{SearchCriterion, SearchSession, SelectorFilters};

/// A loosely-typed, session-shaped update.
///
/// Accepts arbitrary JSON so front ends can pass form state as-is; fields are
/// normalized by [`SearchSessionState::set_criteria`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionPayload(Value);

impl SessionPayload {
    pub fn new(
        criteria: Vec<SearchCriterion>,
        console_input: impl Into<String>,
        selectors: SelectorFilters,
    ) -> Self {
        SearchSession {
            criteria,
            console_input: console_input.into(),
            selectors,
            request_id: String::new(),
        }
        .into()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for SessionPayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<SearchSession> for SessionPayload {
    fn from(session: SearchSession) -> Self {
        Self(serde_json::to_value(&session).unwrap_or_default())
    }
}

/// Result of a [`SearchSessionState::set_criteria`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCriteriaOutcome {
    /// The session was replaced; `request_id` is the new token (empty when
    /// the normalized criteria are empty).
    Updated { request_id: String },
    /// Identical resubmission skipped; only with `skip_identical_resubmit`.
    Unchanged { request_id: String },
}

impl SetCriteriaOutcome {
    pub fn request_id(&self) -> &str {
        match self {
            SetCriteriaOutcome::Updated { request_id }
            | SetCriteriaOutcome::Unchanged { request_id } => request_id,
        }
    }

    /// Whether a new search round should start.
    pub fn starts_round(&self) -> bool {
        matches!(self, SetCriteriaOutcome::Updated { request_id } if !request_id.is_empty())
    }
}

/// Holds the live [`SearchSession`] and persists it on every change.
pub struct SearchSessionState {
    session: RwLock<SearchSession>,
    gateway: Arc<PersistenceGateway>,
    skip_identical_resubmit: bool,
}

impl SearchSessionState {
    /// Wrap a hydrated session. `gateway` must be the one that hydrated it.
    pub fn new(
        initial: SearchSession,
        gateway: Arc<PersistenceGateway>,
        skip_identical_resubmit: bool,
    ) -> Self {
        Self {
            session: RwLock::new(initial),
            gateway,
            skip_identical_resubmit,
        }
    }

    /// Snapshot of the current session.
    pub async fn snapshot(&self) -> SearchSession {
        self.session.read().await.clone()
    }

    pub async fn request_id(&self) -> String {
        self.session.read().await.request_id.clone()
    }

    /// Replace the session with the normalized payload and mint a token.
    pub async fn set_criteria(&self, payload: impl Into<SessionPayload>) -> SetCriteriaOutcome {
        let payload = payload.into();
        let criteria = normalize_criteria(payload.0.get("criteria"));
        let console_input = normalize_console_input(payload.0.get("consoleInput"));
        let selectors = payload
            .0
            .get("selectors")
            .map(SelectorFilters::from_value)
            .unwrap_or_default();

        // Held across the persist so writes land in call order.
        let mut session = self.session.write().await;

        let identical = session.criteria == criteria
            && session.console_input == console_input
            && session.selectors == selectors;
        if identical && self.skip_identical_resubmit {
            debug!("identical search payload, keeping request token");
            return SetCriteriaOutcome::Unchanged {
                request_id: session.request_id.clone(),
            };
        }

        let request_id = if criteria.is_empty() {
            String::new()
        } else {
            token::mint_distinct(&session.request_id)
        };

        *session = SearchSession {
            criteria,
            console_input,
            selectors,
            request_id: request_id.clone(),
        };
        debug!(
            criteria = session.criteria.len(),
            selectors = session.selectors.len(),
            %request_id,
            "search criteria set"
        );

        self.gateway.persist(&session).await;

        SetCriteriaOutcome::Updated { request_id }
    }
}

/// Keep only `{type, description}` of object entries; scalars other than
/// strings are stringified, missing fields become empty.
fn normalize_criteria(value: Option<&Value>) -> Vec<SearchCriterion> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            Some(SearchCriterion {
                kind: scalar_to_string(obj.get("type")),
                description: scalar_to_string(obj.get("description")),
            })
        })
        .collect()
}

fn scalar_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn normalize_console_input(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}
