//! Derivation engine.
//!
//! This module ties the derivation language to the cluster tables. It is
//! split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! derivation text ── Parser::run            (parser.rs)
//!                      - sections VOWEL -> INITIAL -> FINAL
//!                      - alphabet checks on every name
//!                      - all line errors aggregated
//!                               │
//!                               v
//!                           Derivation
//!                               │
//! base FontTable ───────────────┼─ Resolver::run   (resolve.rs)
//! (glyphs.rs)                   │   - statements in declaration order
//!                               │   - every size class of the slot
//!                               │   - clone + ops + merge, insert-if-absent
//!                               v
//!                        completed FontTable (table.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `parser.rs`: statement/expression types and the line-oriented parser.
//! - `resolve.rs`: evaluation of statements against sub-tables.
//! - `table.rs`: insertion-ordered cluster maps and the per-slot font table.
//! - `metrics.rs`: timings and counts for reports.
//!
//! ## Debugging
//!
//! Set `SILABEX_DEBUG_DERIVE=1` to print section, assignment and skip traces.

#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/table.rs"]
mod table;


pub use metrics::{ParseMetrics, ResolveMetrics};
pub use parser::{Derivation, Expression, Parser, Statement, TransformOp};
pub use resolve::Resolver;
pub use table::{ClusterMap, FontTable, SizedClusters};
