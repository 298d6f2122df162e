//! Typed record schemas and request bodies for each resource.
//!
//! Collection responses decode into these types; a body that does not match surfaces as
//! [`crate::RequestError::Decode`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::resource::Resource;

/// A record that lives in one backend collection.
pub trait Record: DeserializeOwned + Clone + Send + 'static {
    const RESOURCE: Resource;

    fn id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "decimal")]
    pub price: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "decimal")]
    pub price: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub plan_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub price: Option<f64>,
    #[serde(default)]
    pub adicional_services: Vec<AdditionalService>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub customer_id: i64,
    #[serde(default)]
    pub plan_id: Option<i64>,
    #[serde(default)]
    pub package_id: Option<i64>,
    #[serde(default)]
    pub adicional_services: Vec<AdditionalService>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Customer {
    const RESOURCE: Resource = Resource::Customers;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Plan {
    const RESOURCE: Resource = Resource::Plans;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for AdditionalService {
    const RESOURCE: Resource = Resource::AdditionalServices;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Package {
    const RESOURCE: Resource = Resource::Packages;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Subscription {
    const RESOURCE: Resource = Resource::Subscriptions;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Package {
    pub fn service_ids(&self) -> Vec<i64> {
        self.adicional_services.iter().map(|s| s.id).collect()
    }
}

/// Comma-joined service names, as shown in the services column.
pub fn service_names(services: &[AdditionalService]) -> String {
    services
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Name of the record with `id`, if present in `records`.
pub fn name_of<'a, T, F>(records: &'a [T], id: i64, name: F) -> Option<&'a str>
where
    T: Record,
    F: Fn(&'a T) -> &'a str,
{
    records.iter().find(|r| r.id() == id).map(name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub age: i64,
}

/// Create body shared by plans and additional services.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPricedItem {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPackage {
    pub name: String,
    pub plan_id: Option<i64>,
    pub adicional_service_ids: Vec<i64>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubscription {
    pub customer_id: i64,
    pub plan_id: Option<i64>,
    pub package_id: Option<i64>,
    pub adicional_service_ids: Vec<i64>,
}

/// PUT body for customers. Sent unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerChanges {
    pub name: String,
    pub age: i64,
}

/// PUT body for plans, additional services and packages. Sent unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedChanges {
    pub name: String,
    pub price: Option<f64>,
}

/// Wrap a create body as `{ "<resource key>": body }`.
pub fn wrap_for_create<B: Serialize>(
    resource: Resource,
    body: &B,
) -> Result<serde_json::Value, serde_json::Error> {
    let inner = serde_json::to_value(body)?;
    Ok(match resource.wrapper_key() {
        Some(key) => serde_json::json!({ key: inner }),
        None => inner,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Decimal::Number(value) => Ok(value),
            Decimal::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid decimal {text:?}"))),
        }
    }
}

// Decimal columns may be rendered as JSON strings.
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Decimal::deserialize(deserializer)?.into_f64()
}

fn optional_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<Decimal>::deserialize(deserializer)?
        .map(Decimal::into_f64)
        .transpose()
}
