//! Coursework core library: domain types, database schema, credential store.
//!
//! - [`types`]: Canvas and Notion records, newtype ids, write payloads
//! - [`schema`]: property names and types of the assignment database
//! - [`credentials`]: secret files with interactive fallback
//! - [`error`]: [`CredentialError`]

pub mod credentials;
pub mod error;
pub mod schema;
pub mod types;

pub use credentials::{CredentialStore, Credentials, Secret, SecretPrompt};
pub use error::CredentialError;
pub use types::{
    Assignment, AssignmentId, Course, CourseId, CreatePayload, DatabaseEntry, DatabaseId, PageId,
    UpdatePayload,
};
