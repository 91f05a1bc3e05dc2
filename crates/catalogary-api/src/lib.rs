// catalogary-api: Async Rust client for the NINA warning and UBA air-quality APIs
//
// Layered the same way for both services: `rest` is the shared request engine,
// `nina` and `uba` are resource clients built on top of it, and the
// aggregation helpers (`generic_complete`, the measurement matrix) live next
// to the client whose calls they orchestrate.

pub mod auth;
pub mod config;
pub mod error;
pub mod nina;
pub mod resource;
pub mod rest;
pub mod transport;
pub mod uba;

pub use auth::{CredentialSet, Credentials, TokenExchange};
pub use config::{ClientConfig, ResponseMode};
pub use error::Error;
pub use nina::{CompositeWarning, NinaClient, Selection, WarningSource};
pub use resource::Resource;
pub use rest::{Payload, Request, Response, RestClient};
pub use transport::{ProxyConfig, TlsMode, TransportConfig};
pub use uba::{
    Component, ComponentCatalog, ComponentMatrix, MatrixOptions, MeasureQuery, MeasurementMatrix,
    MeasurementRecord, MetaUse, Scope, Station, TimeWindow, UbaClient,
};
