//! # coursework-sync
//!
//! Reconciliation engine and sync driver.
//!
//! Call [`pipeline::run`] with a Canvas client, a Notion client and a
//! [`Selection`] to mirror the selected courses' assignments into the chosen
//! database. [`reconcile::reconcile`] is the pure diff underneath it.

pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use error::SyncError;
pub use pipeline::{run, RunOptions, Selection, SyncReport};
pub use reconcile::{reconcile, ReconcilePlan};
