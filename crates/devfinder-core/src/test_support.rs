//! Scripted transport for unit tests.
//!
//! Responses are either canned or gated: a gated call blocks until the test
//! sends its result through the returned `oneshot::Sender`, which lets tests
//! choose the completion order of concurrent requests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::error::TransportError;
use crate::transport::DeviceTransport;
use crate::types::{
    DeviceDetail, DevicePayload, DeviceSummary, SearchRequest, SearchResponse,
};

type Reply<T> = oneshot::Receiver<Result<T, TransportError>>;
pub(crate) type Gate<T> = oneshot::Sender<Result<T, TransportError>>;

pub(crate) fn summary(id: &str, title: &str) -> DeviceSummary {
    DeviceSummary {
        id: id.to_string(),
        title: title.to_string(),
        images: vec![format!("https://img.example/{}.png", id)],
        specs: BTreeMap::from([("ram".to_string(), "8".to_string())]),
        price: Some(499.0),
    }
}

pub(crate) fn detail(id: &str, title: &str) -> DeviceDetail {
    DeviceDetail {
        summary: summary(id, title),
        spec_score: None,
        opinion_score: None,
        score_breakdown: None,
        category_weights: None,
    }
}

pub(crate) fn server_error() -> TransportError {
    TransportError::Http {
        url: "http://test/devices".to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    calls: Mutex<Vec<String>>,
    notify: Notify,
    devices: Mutex<Vec<DeviceSummary>>,
    list_error: Mutex<Option<TransportError>>,
    list_gates: Mutex<VecDeque<Reply<Vec<DeviceSummary>>>>,
    details: Mutex<HashMap<String, DeviceDetail>>,
    detail_gates: Mutex<HashMap<String, VecDeque<Reply<DeviceDetail>>>>,
    search_gates: Mutex<VecDeque<Reply<SearchResponse>>>,
    search_response: Mutex<Option<SearchResponse>>,
    mutation_error: Mutex<Option<TransportError>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_devices(self, devices: Vec<DeviceSummary>) -> Self {
        *lock(&self.devices) = devices;
        self
    }

    pub(crate) fn with_detail(self, detail: DeviceDetail) -> Self {
        lock(&self.details).insert(detail.id().to_string(), detail);
        self
    }

    pub(crate) fn with_search_response(self, response: SearchResponse) -> Self {
        *lock(&self.search_response) = Some(response);
        self
    }

    pub(crate) fn set_devices(&self, devices: Vec<DeviceSummary>) {
        *lock(&self.devices) = devices;
    }

    pub(crate) fn fail_list(&self, error: Option<TransportError>) {
        *lock(&self.list_error) = error;
    }

    pub(crate) fn fail_mutations(&self, error: Option<TransportError>) {
        *lock(&self.mutation_error) = error;
    }

    /// The next `list_devices` call waits for the returned sender.
    pub(crate) fn gate_list(&self) -> Gate<Vec<DeviceSummary>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.list_gates).push_back(rx);
        tx
    }

    /// The next `get_device(id)` call waits for the returned sender.
    pub(crate) fn gate_detail(&self, id: &str) -> Gate<DeviceDetail> {
        let (tx, rx) = oneshot::channel();
        lock(&self.detail_gates)
            .entry(id.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    /// The next `search` call waits for the returned sender.
    pub(crate) fn gate_search(&self) -> Gate<SearchResponse> {
        let (tx, rx) = oneshot::channel();
        lock(&self.search_gates).push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        lock(&self.calls).iter().filter(|c| *c == call).count()
    }

    /// Wait until `call` has been issued at least `n` times.
    pub(crate) async fn wait_for(&self, call: &str, n: usize) {
        loop {
            let notified = self.notify.notified();
            if self.count(call) >= n {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
        self.notify.notify_waiters();
    }

    fn mutation_result(&self) -> Result<(), TransportError> {
        match lock(&self.mutation_error).clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn await_reply<T>(reply: Reply<T>) -> Result<T, TransportError> {
        reply.await.unwrap_or_else(|_| {
            Err(TransportError::Request {
                url: "http://test".to_string(),
                message: "gate dropped".to_string(),
            })
        })
    }
}

#[async_trait]
impl DeviceTransport for ScriptedTransport {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, TransportError> {
        let gate = lock(&self.list_gates).pop_front();
        self.record("GET /devices".to_string());
        if let Some(reply) = gate {
            return Self::await_reply(reply).await;
        }

        match lock(&self.list_error).clone() {
            Some(e) => Err(e),
            None => Ok(lock(&self.devices).clone()),
        }
    }

    async fn get_device(&self, id: &str) -> Result<DeviceDetail, TransportError> {
        let gate = lock(&self.detail_gates)
            .get_mut(id)
            .and_then(VecDeque::pop_front);
        self.record(format!("GET /devices/{}", id));
        if let Some(reply) = gate {
            return Self::await_reply(reply).await;
        }

        lock(&self.details)
            .get(id)
            .cloned()
            .ok_or_else(|| TransportError::Http {
                url: format!("http://test/devices/{}", id),
                status: 404,
                body: "not found".to_string(),
            })
    }

    async fn create_device(&self, payload: &DevicePayload) -> Result<DeviceDetail, TransportError> {
        self.record("POST /devices".to_string());
        self.mutation_result()?;

        let id = format!("new-{}", self.count("POST /devices"));
        let mut created = detail(&id, &payload.title);
        created.summary.specs = payload.specs.clone();
        created.summary.price = payload.price;
        Ok(created)
    }

    async fn update_device(
        &self,
        id: &str,
        payload: &DevicePayload,
    ) -> Result<DeviceDetail, TransportError> {
        self.record(format!("PUT /devices/{}", id));
        self.mutation_result()?;

        let mut updated = detail(id, &payload.title);
        updated.summary.images = payload.images.clone();
        updated.summary.specs = payload.specs.clone();
        updated.summary.price = payload.price;
        Ok(updated)
    }

    async fn delete_device(&self, id: &str) -> Result<(), TransportError> {
        self.record(format!("DELETE /devices/{}", id));
        self.mutation_result()
    }

    async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, TransportError> {
        let gate = lock(&self.search_gates).pop_front();
        self.record("POST /devices/search".to_string());
        if let Some(reply) = gate {
            return Self::await_reply(reply).await;
        }

        Ok(lock(&self.search_response)
            .clone()
            .unwrap_or(SearchResponse::Result(Vec::new())))
    }

    async fn analytics(&self) -> Result<serde_json::Value, TransportError> {
        self.record("GET /admin/analytics".to_string());
        Ok(serde_json::json!({"visits": 12, "searches": 3}))
    }
}
