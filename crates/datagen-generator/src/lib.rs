//! Node and relationship generator for graph-datagen.
//!
//! This crate turns a loaded [`ConfigBundle`](datagen_core::ConfigBundle)
//! into generated node and relationship records. All randomness comes from
//! one seeded RNG owned by the [`DataGenerator`], so a fixed seed and a
//! pinned reference instant reproduce a run exactly.
//!
//! # Architecture
//!
//! ```text
//! ConfigBundle
//!      │
//!      ▼
//! ┌──────────────────────┐
//! │    DataGenerator     │
//! │  - seed / StdRng     │
//! │  - FallbackPolicy    │
//! └─────────┬────────────┘
//!           │
//!           ├── NodeGenerator ─────────┐
//!           │                          ▼
//!           │                 GenerationContext { id pools, nodes, relationships }
//!           │                          │
//!           └── RelationshipGenerator ◄┘
//!                  │
//!                  └── PropertySynthesizer ── DateResolver
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_generator::DateResolver;
//! use chrono::NaiveDate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let resolver = DateResolver::pinned(now);
//!
//! assert_eq!(
//!     resolver.resolve_date("-1Y"),
//!     NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()
//! );
//! assert_eq!(
//!     resolver.resolve_date("2024-01-31+1M"),
//!     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
//! );
//! ```

pub mod context;
pub mod date_expr;
pub mod generator;
pub mod generators;
pub mod nodes;
pub mod relationships;
pub mod synthesizer;

pub use context::GenerationContext;
pub use date_expr::{DateExprError, DateResolver, Temporal};
pub use generator::{
    DataGenerator, GenerationOutput, GenerationSummary, GeneratorError, GeneratorOptions,
};
pub use nodes::{sequential_id, NodeGenerator};
pub use relationships::{CardinalityBounds, RelationshipGenerator};
pub use synthesizer::{EndpointContext, FallbackPolicy, PropertySynthesizer, SynthesisError};
