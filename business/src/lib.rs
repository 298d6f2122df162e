//! Billing console business layer: talks to the backend and owns everything the pages
//! need that is not drawing.

pub mod actions;
pub mod config;
mod error;
pub mod format;
pub mod http;
pub mod models;
mod resource;
mod resource_client;
mod rows;
pub mod table;
pub mod validation;

pub use actions::{ActionOutcome, Mutation, STALE_NOTICE};
pub use config::{BusinessConfig, ConfigError};
pub use error::RequestError;
pub use http::Method;
pub use models::{AdditionalService, Customer, Package, Plan, Record, Subscription};
pub use resource::Resource;
pub use resource_client::{FetchState, Payload, RequestOptions, ResourceClient, ResourceHandle};
pub use table::{ColumnDef, ColumnKind, EditableTable, FieldError, FieldValue, TableRow};
pub use validation::ValidationError;

pub use billing_states::{Promise, PromiseStatus};
