//! # coursework-clients
//!
//! Typed REST clients for the two external systems.
//!
//! - [`CanvasClient`] lists courses and assignments from Canvas LMS.
//! - [`NotionClient`] searches, queries and writes the assignment database.
//!
//! Both sit behind the [`CanvasApi`] / [`NotionApi`] traits so the sync
//! driver can be exercised against fakes.

pub mod api;
pub mod canvas;
pub mod error;
mod http;
pub mod notion;

pub use api::{CanvasApi, NotionApi, SearchHit, SearchKind};
pub use canvas::CanvasClient;
pub use error::{ClientError, ClientResult, Service};
pub use notion::NotionClient;
