//! Tab reconciliation engine.
//!
//! Takes a raw enumeration of open browser tabs plus a history lookup and
//! classifies each tab as pinned, stale or duplicate, then closes a selected
//! subset against a freshly re-enumerated browser state.
//!
//! The pipeline runs leaves first:
//!
//! | Stage | Module |
//! |-------|--------|
//! | pinned-tab filtering | [`pinned`] |
//! | staleness | [`staleness`] |
//! | duplicate detection | [`duplicates`] |
//! | closing | [`reconcile`] |
//!
//! [`Engine`] wraps the stages behind a single-flight gate so that only one
//! browser-touching operation runs at a time.

pub mod classify;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod pinned;
pub mod provider;
pub mod reconcile;
pub mod selection;
pub mod staleness;
pub mod tab;

#[cfg(test)]
pub(crate) mod test_support;

pub use classify::classify_snapshot;
pub use engine::{CloseTicket, Engine};
pub use error::{Error, Result};
pub use provider::{BrowserAutomation, HistoryStore, NoHistory};
pub use reconcile::{CloseFailure, ClosePlan, CloseReport, CloseRequest, CloseTarget};
pub use selection::Selection;
pub use staleness::StaleThreshold;
pub use tab::{Classification, Tab};
pub use tabsweep_protocol::{RawTab, TabPosition};
