//! Snapshot data types for tabsweep.
//!
//! This crate holds the shapes a browser enumeration produces and the
//! positional addresses close commands are issued against. Engine logic lives
//! in `tabsweep`; provider implementations live in `tabsweep-runtime`.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond ordering and serialization
//! * Position-leased: a [`TabPosition`] is only meaningful for the snapshot
//!   that produced it

pub mod types;

pub use types::*;
