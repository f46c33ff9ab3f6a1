// src/reconcile/mod.rs
//
// Inner join of the filtered registry against declared generation, keyed on
// the plant key, byte-exact. Plants missing on either side fall out:
// declarations for other participants are irrelevant, and a target plant
// without a declaration is not reportable.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::parse::{DeclaredGeneration, HOURS};
use crate::registry::MasterRecord;

/// One reconciled plant: registry identity, the declared hourly profile,
/// and the daily total used as the activity threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub visible_agent_name: String,
    pub ofei_agent_code: String,
    pub plant_key: String,
    pub plant_type: String,
    pub hours: [f64; HOURS],
    pub total_hours: f64,
}

/// Join the filtered registry with declared generation and keep plants with
/// strictly positive daily totals. The registry side is unique by plant key;
/// a key declared more than once produces one output row per declaration,
/// in declaration file order, scanning the registry in its own order.
pub fn reconcile(
    registry: &[MasterRecord],
    declared: &[DeclaredGeneration],
) -> Vec<ReconciledRecord> {
    let mut by_key: HashMap<&str, Vec<&DeclaredGeneration>> = HashMap::new();
    for d in declared {
        by_key.entry(d.plant_key.as_str()).or_default().push(d);
    }

    let mut joined = 0usize;
    let mut out = Vec::new();
    for m in registry {
        let Some(matches) = by_key.get(m.plant_key.as_str()) else {
            continue;
        };
        for d in matches {
            joined += 1;
            let total_hours: f64 = d.hours.iter().sum();
            if total_hours > 0.0 {
                out.push(ReconciledRecord {
                    visible_agent_name: m.visible_agent_name.clone(),
                    ofei_agent_code: m.ofei_agent_code.clone(),
                    plant_key: m.plant_key.clone(),
                    plant_type: m.plant_type.clone(),
                    hours: d.hours,
                    total_hours,
                });
            }
        }
    }

    debug!(joined, kept = out.len(), "reconciliation complete");
    out
}
