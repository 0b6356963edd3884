//! notas-service: collection lifecycle and extraction engine for paper
//! invoices ("notas"). Documents are uploaded and a total plus client name
//! are heuristically extracted from their text; delivery starts a 15-day
//! credit clock; payments accrue against each nota; aging status and
//! portfolio KPIs are derived in real time, never stored.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
