//! REST client for the CarePoint backend.
//!
//! One `ApiClient` per signed-in app instance. Every request carries the
//! session's bearer token; responses are normalized into `Page`/entity
//! types whatever envelope the route happens to use.

pub mod client;
pub mod resource;
pub mod auth;
pub mod meetings;
pub mod payments;

pub use client::ApiClient;
pub use meetings::MeetingLinks;
pub use resource::Resource;
