// Shared request engine
//
// URL assembly, session/credential handling, and the error-status policy
// used by both the NINA and UBA resource clients.

pub mod client;
pub mod request;
pub mod response;

pub use client::{RestClient, default_headers};
pub use request::{Body, FilePart, Request};
pub use response::{Payload, Response};
