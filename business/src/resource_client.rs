//! Fetch state and CRUD requests for one backend collection.
//!
//! A [`ResourceClient`] is owned by a page. Requests are issued through a cloneable
//! [`ResourceHandle`], run on the platform executor, and report back through a
//! latest-only update channel that the page drains once per frame with
//! [`ResourceClient::sync`].
//!
//! - Each request takes the next generation. Only the latest generation may change
//!   `data` or `error`; older settlements are discarded.
//! - `loading` is derived: a generation was issued that has not settled yet. It turns
//!   on as soon as a request is issued and turns off on every exit path, including the
//!   request future being dropped unpolled.
//! - Dropping the client cancels every outstanding request. Late responses are no-ops.

use std::future::Future;
use std::marker::PhantomData;

use billing_states::{LatestOnlyUpdater, UpdateChannel, UpdateIssuer};
use serde::Deserialize as _;
use serde::de::DeserializeOwned;
use serde_json::Value;
use ustr::Ustr;

use crate::config::BusinessConfig;
use crate::error::RequestError;
use crate::http::{Client, Method, Response};
use crate::models::Record;
use crate::resource::Resource;

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// Body declared a JSON content type.
    Json(Value),
    /// Any other non-empty body, such as a PDF booklet.
    Binary(Vec<u8>),
    #[default]
    Empty,
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    fn from_response(method: Method, response: &Response) -> Result<Self, RequestError> {
        if response.is_json() {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Payload::Empty);
            }
            response
                .json()
                .map(Payload::Json)
                .map_err(|err| RequestError::decode(method, err))
        } else if response.body.is_empty() {
            Ok(Payload::Empty)
        } else {
            Ok(Payload::Binary(response.body.clone()))
        }
    }
}

/// Construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Issue one request with `method` and `body` right away.
    pub immediate: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            body: None,
            immediate: true,
        }
    }
}

impl RequestOptions {
    /// No request until the caller asks for one.
    pub fn deferred() -> Self {
        Self {
            immediate: false,
            ..Self::default()
        }
    }
}

/// Last known state of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Last successfully fetched collection, `None` before the first load.
    pub data: Option<Vec<T>>,
    /// Message of the last failed request, cleared by the next success.
    pub error: Option<String>,
    /// Bumped every time `data` is replaced.
    pub version: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            version: 0,
        }
    }
}

enum Settlement<T> {
    Collection(Vec<T>),
    Succeeded,
    Failed(String),
    /// Released without an outcome: cancelled, or the future was dropped.
    Abandoned,
}

/// Reports exactly one settlement for a generation, `Abandoned` if dropped unsettled.
struct SettleGuard<T> {
    updater: Option<LatestOnlyUpdater<Settlement<T>>>,
}

impl<T> SettleGuard<T> {
    fn new(updater: LatestOnlyUpdater<Settlement<T>>) -> Self {
        Self {
            updater: Some(updater),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.updater.as_ref().is_none_or(|u| u.is_cancelled())
    }

    fn settle(mut self, settlement: Settlement<T>) {
        if let Some(updater) = self.updater.take() {
            updater.set(settlement);
        }
    }
}

impl<T> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        if let Some(updater) = self.updater.take() {
            log::debug!("{}: request released without settling", updater.task_id());
            updater.set(Settlement::Abandoned);
        }
    }
}

/// Cloneable request issuer feeding one [`ResourceClient`].
pub struct ResourceHandle<T> {
    base_url: String,
    resource: Resource,
    issuer: UpdateIssuer<Settlement<T>>,
}

impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            resource: self.resource,
            issuer: self.issuer.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("resource", &self.resource)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl<T> ResourceHandle<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn url(&self, id: Option<i64>) -> Ustr {
        Ustr::from(&format!("{}{}", self.base_url, self.resource.member_path(id)))
    }

    /// Issue a request against `path` or `path/{id}`.
    ///
    /// The generation is taken (and `loading` turns on) when this is called, before the
    /// returned future is first polled. A successful collection `GET` replaces the
    /// client's `data`; any other success only clears `error`.
    pub fn request(
        &self,
        method: Method,
        body: Option<Value>,
        id: Option<i64>,
    ) -> impl Future<Output = Result<Payload, RequestError>> + Send + 'static {
        let guard = SettleGuard::new(self.issuer.updater());
        let url = self.url(id);
        let replaces_collection = method == Method::Get && id.is_none();

        async move {
            if guard.is_cancelled() {
                return Err(RequestError::Cancelled { method });
            }

            let mut builder = Client::request(method, url.as_str());
            if let Some(body) = &body {
                builder = match builder.json(body) {
                    Ok(builder) => builder,
                    Err(err) => {
                        let err = RequestError::decode(method, err);
                        guard.settle(Settlement::Failed(err.to_string()));
                        return Err(err);
                    }
                };
            }

            let response = builder.send().await;
            if guard.is_cancelled() {
                log::debug!("{method} {url}: owner dropped, response ignored");
                return Err(RequestError::Cancelled { method });
            }

            let result = response
                .map_err(|err| RequestError::Transport {
                    method,
                    message: err.message,
                })
                .and_then(|response| {
                    if response.is_success() {
                        Payload::from_response(method, &response)
                    } else {
                        Err(RequestError::Status {
                            method,
                            status: response.status,
                        })
                    }
                });

            match result {
                Ok(payload) if replaces_collection => match decode_collection(method, &payload) {
                    Ok(rows) => {
                        log::debug!("{method} {url}: {} records", rows.len());
                        guard.settle(Settlement::Collection(rows));
                        Ok(payload)
                    }
                    Err(err) => {
                        log::warn!("{url}: {err}");
                        guard.settle(Settlement::Failed(err.to_string()));
                        Err(err)
                    }
                },
                Ok(payload) => {
                    guard.settle(Settlement::Succeeded);
                    Ok(payload)
                }
                Err(err) => {
                    log::warn!("{url}: {err}");
                    guard.settle(Settlement::Failed(err.to_string()));
                    Err(err)
                }
            }
        }
    }

    /// Fetch the collection.
    pub fn fetch(&self) -> impl Future<Output = Result<Payload, RequestError>> + Send + 'static {
        self.request(Method::Get, None, None)
    }

    /// Fire-and-forget collection fetch on the platform executor.
    pub fn refresh(&self) {
        let fetch = self.fetch();
        billing_states::spawn(async move {
            let _ = fetch.await;
        });
    }

    /// `true` once the owning client was dropped.
    pub fn is_closed(&self) -> bool {
        self.issuer.is_closed()
    }
}

fn decode_collection<T: DeserializeOwned>(
    method: Method,
    payload: &Payload,
) -> Result<Vec<T>, RequestError> {
    match payload {
        Payload::Json(value) => {
            Vec::<T>::deserialize(value).map_err(|err| RequestError::decode(method, err))
        }
        Payload::Binary(_) | Payload::Empty => Err(RequestError::decode(
            method,
            "expected a JSON collection",
        )),
    }
}

/// Page-owned fetch state for one resource.
pub struct ResourceClient<T> {
    handle: ResourceHandle<T>,
    channel: UpdateChannel<Settlement<T>>,
    state: FetchState<T>,
    settled: u64,
    _record: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &self.handle.resource)
            .field("version", &self.state.version)
            .field("error", &self.state.error)
            .field("settled", &self.settled)
            .finish()
    }
}

impl<T: Record> ResourceClient<T> {
    /// Client for the collection `T` lives in.
    pub fn for_record(config: &BusinessConfig, options: RequestOptions) -> Self {
        Self::new(config, T::RESOURCE, options)
    }
}

impl<T> ResourceClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(config: &BusinessConfig, resource: Resource, options: RequestOptions) -> Self {
        let channel = UpdateChannel::new();
        let handle = ResourceHandle {
            base_url: config.api_base_url.clone(),
            resource,
            issuer: channel.issuer(),
        };
        let client = Self {
            handle,
            channel,
            state: FetchState::default(),
            settled: 0,
            _record: PhantomData,
        };

        if options.immediate {
            let request = client.handle.request(options.method, options.body, None);
            billing_states::spawn(async move {
                let _ = request.await;
            });
        }
        client
    }

    pub fn handle(&self) -> ResourceHandle<T> {
        self.handle.clone()
    }

    pub fn resource(&self) -> Resource {
        self.handle.resource
    }

    /// See [`ResourceHandle::request`].
    pub fn request(
        &self,
        method: Method,
        body: Option<Value>,
        id: Option<i64>,
    ) -> impl Future<Output = Result<Payload, RequestError>> + Send + 'static {
        self.handle.request(method, body, id)
    }

    pub fn refresh(&self) {
        self.handle.refresh();
    }

    /// Apply settled requests. Returns whether anything changed.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        for stamped in self.channel.drain_latest() {
            self.settled = self.settled.max(stamped.task.generation());
            match stamped.value {
                Settlement::Collection(rows) => {
                    self.state.data = Some(rows);
                    self.state.error = None;
                    self.state.version += 1;
                }
                Settlement::Succeeded => self.state.error = None,
                Settlement::Failed(message) => self.state.error = Some(message),
                Settlement::Abandoned => {}
            }
            changed = true;
        }
        changed
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&[T]> {
        self.state.data.as_deref()
    }

    /// Collection or an empty slice before the first load.
    pub fn rows(&self) -> &[T] {
        self.data().unwrap_or_default()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }

    pub fn loading(&self) -> bool {
        self.channel.generations().current() > self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;

    fn client() -> ResourceClient<Plan> {
        ResourceClient::for_record(
            &BusinessConfig::new("http://127.0.0.1:9"),
            RequestOptions::deferred(),
        )
    }

    #[test]
    fn deferred_client_starts_idle() {
        let client = client();
        assert!(!client.loading());
        assert!(client.data().is_none());
        assert!(client.rows().is_empty());
        assert_eq!(client.version(), 0);
    }

    #[test]
    fn urls_include_member_id() {
        let client = client();
        assert_eq!(
            client.handle().url(Some(4)),
            Ustr::from("http://127.0.0.1:9/plans/4")
        );
        assert_eq!(client.handle().url(None), Ustr::from("http://127.0.0.1:9/plans"));
    }

    #[test]
    fn issuing_turns_loading_on_and_dropping_future_releases_it() {
        let mut client = client();
        let request = client.request(Method::Get, None, None);
        assert!(client.loading());

        drop(request);
        assert!(client.sync());
        assert!(!client.loading());
        assert!(client.error().is_none());
    }

    #[test]
    fn dropped_client_closes_handles() {
        let client = client();
        let handle = client.handle();
        drop(client);
        assert!(handle.is_closed());
    }

    #[test]
    fn payload_classification() {
        let json = Response {
            status: 200,
            headers: [("content-type".to_string(), "application/json".to_string())].into(),
            body: br#"[{"id":1}]"#.to_vec(),
        };
        assert!(matches!(
            Payload::from_response(Method::Get, &json),
            Ok(Payload::Json(_))
        ));

        let pdf = Response {
            status: 200,
            headers: [("content-type".to_string(), "application/pdf".to_string())].into(),
            body: b"%PDF-1.4".to_vec(),
        };
        assert_eq!(
            Payload::from_response(Method::Get, &pdf).unwrap().into_bytes(),
            Some(b"%PDF-1.4".to_vec())
        );

        let no_content = Response {
            status: 204,
            ..Default::default()
        };
        assert_eq!(
            Payload::from_response(Method::Delete, &no_content).unwrap(),
            Payload::Empty
        );

        let broken = Response {
            body: b"{not json".to_vec(),
            ..json
        };
        assert!(matches!(
            Payload::from_response(Method::Get, &broken),
            Err(RequestError::Decode { .. })
        ));
    }
}
