//! HawkAI - code-analysis agent dashboard.
//!
//! Agents scan repositories and produce reports. This crate holds the data
//! model, an in-memory store seeded with demo data, the issue aggregator,
//! role-based report views and Markdown/JSON rendering.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod models;
pub mod report;
pub mod seed;
pub mod store;
pub mod wizard;
