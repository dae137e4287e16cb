//! Cluster resolution.
//!
//! The resolver walks parsed statements in declaration order against a
//! growing [`FontTable`]:
//!
//! ```text
//! for statement in derivation
//!   for (slot, size) in table.targets(statement.slot)
//!     target bound?  -> skip
//!     else           -> clone sources from the same sub-table,
//!                       apply ops, merge, bind target
//! ```
//!
//! Sources are always looked up in the sub-table being filled, so a
//! two-thirds initial cluster is only ever built from two-thirds parts.
//! Forward references are not supported: a source must be a base cluster or
//! the target of an earlier statement.
//!
//! ## Failure policy
//!
//! A source that is missing at evaluation time fails the whole pass with
//! [`ResolveError::MissingCluster`]. Skipping it would leave a hole in the
//! font with no diagnostic.

use super::metrics::ResolveMetrics;
use super::parser::{Derivation, Expression, Statement};
use super::table::{ClusterMap, FontTable};
use crate::error::ResolveError;
use crate::{Cluster, SizeClass, Slot};
use std::time::Instant;

impl Expression {
    /// Clone the source cluster out of `clusters` and apply every op.
    pub fn evaluate(&self, clusters: &ClusterMap) -> Option<Cluster> {
        let mut cluster = clusters.get(&self.source)?.clone();
        for op in &self.ops {
            op.apply(&mut cluster);
        }
        Some(cluster)
    }
}

impl Statement {
    /// Evaluate every expression against one sub-table and merge the results
    /// in order.
    pub fn evaluate(&self, clusters: &ClusterMap, slot: Slot, size: SizeClass) -> Result<Cluster, ResolveError> {
        let parts = self
            .expressions
            .iter()
            .map(|expr| {
                expr.evaluate(clusters).ok_or_else(|| ResolveError::MissingCluster {
                    target: self.target.clone(),
                    source_name: expr.source.clone(),
                    slot,
                    size,
                    line: self.line,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // The parser rejects statements without expressions.
        Ok(Cluster::merge(parts).unwrap_or_else(|| Cluster::new(slot, Vec::new())))
    }
}

/// Executes derivation statements against a base table.
///
/// Usage: `Resolver::new(base).run(&derivation)`.
#[derive(Debug)]
pub struct Resolver {
    table: FontTable,
}

impl Resolver {
    pub fn new(base: FontTable) -> Self {
        Resolver { table: base }
    }

    pub fn run(self, derivation: &Derivation) -> Result<FontTable, ResolveError> {
        self.run_with_metrics(derivation).map(|(table, _)| table)
    }

    /// Resolve every statement in order and hand back the completed table.
    pub fn run_with_metrics(mut self, derivation: &Derivation) -> Result<(FontTable, ResolveMetrics), ResolveError> {
        let start = Instant::now();
        let mut metrics = ResolveMetrics::default();

        for statement in &derivation.statements {
            metrics.statements += 1;
            self.apply(statement, &mut metrics)?;
        }

        metrics.duration = start.elapsed();
        trace!(
            "[resolve:done] statements={} assigned={} skipped={} elapsed={:?}",
            metrics.statements, metrics.assigned, metrics.skipped, metrics.duration
        );
        Ok((self.table, metrics))
    }

    fn apply(&mut self, statement: &Statement, metrics: &mut ResolveMetrics) -> Result<(), ResolveError> {
        for (slot, size) in self.table.targets(statement.slot) {
            let Some(clusters) = self.table.map_mut(slot, size) else {
                continue;
            };

            if clusters.contains(&statement.target) {
                trace!("[resolve:skip] {} {} cluster {} already bound", size, slot, statement.target);
                metrics.skipped += 1;
                continue;
            }

            let cluster = statement.evaluate(clusters, slot, size)?;
            trace!("[resolve:assign] {} {} cluster {} (line {})", size, slot, statement.target, statement.line);
            clusters.insert_if_absent(statement.target.clone(), cluster);
            metrics.assigned += 1;
        }
        Ok(())
    }
}
