//! AEO Report API Library
//!
//! Turns answer-engine-optimization analysis payloads into scored,
//! provenance-tagged reports. Every displayed number says whether it was
//! measured (Live) or is a placeholder (Static). An axum service and an
//! offline CLI wrap the engine.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: The report engine and its building blocks.
//! - `integrations`: External service integrations.
//! - `availability`: Per-module presence checks and field accessors.
//! - `bot_access`: Per-bot accessibility scores.
//! - `scoring`: Category and composite scores.
//! - `provenance`: Live/Static tagging of metrics.
//! - `report`: The report engine and presentation model.
//! - `export`: CSV and archival JSON downloads.
//! - `defaults`: Placeholder values for absent modules.
//! - `analysis_client`: Upstream analysis service client.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Wire models for analysis payloads and run history.

pub mod api;
pub mod core;
pub mod integrations;

pub mod analysis_client;
pub mod availability;
pub mod bot_access;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod provenance;
pub mod report;
pub mod scoring;
