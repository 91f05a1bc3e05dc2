// Umweltbundesamt air-quality API
//
// Endpoints, positional descriptor unpacking, and the measurement matrix
// builds that fan one window out over every component and scope.

pub mod aggregate;
pub mod client;
pub mod descriptor;
pub mod endpoints;
pub mod matrix;
pub mod models;
pub mod query;
pub mod scope;

pub use aggregate::{DEFAULT_DELAY, MatrixOptions};
pub use client::UbaClient;
pub use descriptor::{Component, ComponentCatalog, Station, parse_stations};
pub use endpoints::MetaUse;
pub use matrix::{ComponentMatrix, ComponentReading, MeasurementMatrix, MeasurementRecord};
pub use models::{ComponentsEnvelope, MeasuresEnvelope, MetaEnvelope, StationsEnvelope};
pub use query::{MeasureQuery, TimeWindow};
pub use scope::Scope;
