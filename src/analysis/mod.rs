//! Analysis modules.
//!
//! Rollups over a report's issue list and the role-based views built on them.

pub mod aggregator;
pub mod views;

pub use aggregator::*;
pub use views::{default_view, select_view, ViewModel, ViewOptions};
