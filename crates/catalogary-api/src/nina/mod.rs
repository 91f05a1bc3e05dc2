// NINA public-warning API
//
// Provider feeds, per-warning detail and geometry, and the composite join
// that stitches the three together.

pub mod client;
pub mod complete;
pub mod models;
pub mod warnings;

pub use client::NinaClient;
pub use complete::{CompositeWarning, Selection};
pub use models::{WarningDetail, WarningGeo, WarningSummary};
pub use warnings::WarningSource;
