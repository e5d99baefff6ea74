//! LeadFly Deduplication API Library
//!
//! This library provides the core functionality for the lead deduplication
//! service: a deterministic in-process dedup engine (normalizer, matcher,
//! risk scorer, decision engine), Postgres-backed lead storage, and the
//! HTTP handlers that expose it.
//!
//! # Modules
//!
//! - `circuit_breaker`: Circuit breaker guarding lead-store reads.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Postgres lead storage and check receipts.
//! - `decision`: Decision engine (confidence + risk -> action).
//! - `dedup`: Deduplication engine and its injected dependencies.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `matcher`: Exact and fuzzy duplicate matching.
//! - `models`: Core data models.
//! - `normalizer`: Canonicalization of lead identity fields.
//! - `risk`: Heuristic risk scoring.
//! - `scoring`: Lead quality scoring.
//! - `velocity`: In-process submission-velocity counter.
//! - `webhook_handler`: Duplicate-prevention webhook handler.
//! - `webhook_models`: Webhook payload models.

pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod decision;
pub mod dedup;
pub mod errors;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod normalizer;
pub mod risk;
pub mod scoring;
pub mod velocity;
pub mod webhook_handler;
pub mod webhook_models;
