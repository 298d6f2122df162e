//! Page-level mutations: mutate, then refresh the collection.
//!
//! The mutation and the refresh are separate requests. A refresh failure after a
//! successful mutation is reported as [`ActionOutcome::SavedButStale`] rather than as a
//! failed save.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::http::Method;
use crate::models::wrap_for_create;
use crate::resource_client::{Payload, ResourceHandle};

/// Notice shown when the save went through but the list could not be reloaded.
pub const STALE_NOTICE: &str = "Salvo, mas a lista pode estar desatualizada";

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Saved,
    /// The mutation succeeded; the follow-up refresh failed with this error.
    SavedButStale(RequestError),
}

impl ActionOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ActionOutcome::Saved => None,
            ActionOutcome::SavedButStale(_) => Some(STALE_NOTICE),
        }
    }
}

/// A single write against a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub id: Option<i64>,
}

impl Mutation {
    /// `POST path` with the body wrapped under the resource key.
    pub fn create<T, B: Serialize>(handle: &ResourceHandle<T>, body: &B) -> Result<Self, RequestError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let body = wrap_for_create(handle.resource(), body)
            .map_err(|err| RequestError::decode(Method::Post, err))?;
        Ok(Self {
            method: Method::Post,
            body: Some(body),
            id: None,
        })
    }

    /// `PUT path/{id}` with the changed fields, unwrapped.
    pub fn update<B: Serialize>(id: i64, changes: &B) -> Result<Self, RequestError> {
        let body =
            serde_json::to_value(changes).map_err(|err| RequestError::decode(Method::Put, err))?;
        Ok(Self {
            method: Method::Put,
            body: Some(body),
            id: Some(id),
        })
    }

    pub fn delete(id: i64) -> Self {
        Self {
            method: Method::Delete,
            body: None,
            id: Some(id),
        }
    }
}

/// Run `mutation`, then refresh the collection.
pub async fn mutate_then_refresh<T>(
    handle: ResourceHandle<T>,
    mutation: Mutation,
) -> Result<ActionOutcome, RequestError>
where
    T: DeserializeOwned + Send + 'static,
{
    handle
        .request(mutation.method, mutation.body, mutation.id)
        .await?;
    Ok(refresh(&handle).await)
}

/// Delete `ids` one at a time, in order, then refresh.
///
/// Stops at the first failed delete without refreshing and returns that failure. The
/// client records it only while no newer request has been issued, so callers surface
/// the returned error themselves.
pub async fn delete_all<T>(
    handle: ResourceHandle<T>,
    ids: Vec<i64>,
) -> Result<ActionOutcome, RequestError>
where
    T: DeserializeOwned + Send + 'static,
{
    for (done, id) in ids.iter().enumerate() {
        if let Err(err) = handle.request(Method::Delete, None, Some(*id)).await {
            log::error!(
                "{}: delete of {id} failed after {done} of {} deletes: {err}",
                handle.resource(),
                ids.len()
            );
            return Err(err);
        }
    }
    log::info!("{}: deleted {:?}", handle.resource(), ids);
    Ok(refresh(&handle).await)
}

async fn refresh<T>(handle: &ResourceHandle<T>) -> ActionOutcome
where
    T: DeserializeOwned + Send + 'static,
{
    match handle.fetch().await {
        Ok(_) => ActionOutcome::Saved,
        Err(err) => {
            log::error!("{}: saved but refresh failed: {err}", handle.resource());
            ActionOutcome::SavedButStale(err)
        }
    }
}

/// Persist an edited row with `PUT`, then refresh.
///
/// Resolves to the row together with the outcome, so a failed refresh after a
/// successful `PUT` is reported as [`ActionOutcome::SavedButStale`].
pub async fn save_row<T, R, B>(
    handle: ResourceHandle<T>,
    row: R,
    changes: B,
) -> Result<(R, ActionOutcome), RequestError>
where
    T: DeserializeOwned + Send + 'static,
    R: crate::table::TableRow,
    B: Serialize + Send,
{
    let mutation = Mutation::update(row.id(), &changes)?;
    match mutate_then_refresh(handle, mutation).await {
        Ok(outcome) => Ok((row, outcome)),
        Err(err) => {
            log::error!("row {}: {err}", row.id());
            Err(err)
        }
    }
}

/// Fetch a member's raw body, such as a PDF booklet.
pub async fn fetch_binary<T>(handle: ResourceHandle<T>, id: i64) -> Result<Option<Vec<u8>>, RequestError>
where
    T: DeserializeOwned + Send + 'static,
{
    Ok(match handle.request(Method::Get, None, Some(id)).await? {
        Payload::Binary(bytes) => Some(bytes),
        Payload::Json(_) | Payload::Empty => None,
    })
}
