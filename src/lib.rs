//! Messenger Analysis - chat export normalization and statistics
//!
//! A Rust library for turning a Messenger chat export into two canonical
//! tables, one row per contact and one row per text message, and for
//! deriving statistics from them.
//!
//! # Features
//!
//! - Archive staging from the export zip
//! - Fragment discovery and conversation identifiers from the inbox tree
//! - Identity resolution and repair of mis-encoded export text
//! - Canonical contact and message tables, regenerated only when stale
//! - Send/receive statistics per contact

/// Merging partial results into canonical tables
pub mod aggregator;
/// Staleness gate for generated artifacts
pub mod cache;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// CSV output
pub mod file_writer;
/// Contact identity resolution
pub mod identity;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Per-fragment normalization
pub mod normalizer;
/// Pipeline orchestration
pub mod pipeline;
/// Send/receive statistics
pub mod report;
/// Fragment discovery
pub mod scanner;
/// Export zip extraction
pub mod stager;
/// Text repair
pub mod text;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use aggregator::{aggregate, Aggregator};
pub use cache::{ArtifactPaths, GateOutcome, GateState, StalenessGate};
pub use error::{AnalysisError, Result};
pub use identity::IdentityResolver;
pub use models::{CanonicalContact, CanonicalMessageRow, CanonicalTables, RawConversation, RawMessage};
pub use scanner::ConversationScanner;
