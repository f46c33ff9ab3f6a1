// src/registry/filter.rs

use std::collections::HashSet;
use tracing::debug;

use crate::registry::MasterRecord;

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Narrow the registry to one participant's plants of the target technology
/// types. A row is kept when its visible name OR its OFEI code matches a
/// target agent and its type matches a target type, comparing trimmed and
/// upper-cased; stored values are left untouched. Kept rows are
/// de-duplicated by exact plant key, first occurrence wins, source order
/// preserved. No match is not an error: an empty result reconciles to an
/// empty table.
pub fn filter_target_plants(
    records: &[MasterRecord],
    target_agents: &[&str],
    target_types: &[&str],
) -> Vec<MasterRecord> {
    let agents: HashSet<String> = target_agents.iter().map(|a| normalize(a)).collect();
    let types: HashSet<String> = target_types.iter().map(|t| normalize(t)).collect();

    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();

    for record in records {
        let agent_ok = agents.contains(&normalize(&record.visible_agent_name))
            || agents.contains(&normalize(&record.ofei_agent_code));
        if !agent_ok || !types.contains(&normalize(&record.plant_type)) {
            continue;
        }
        if !seen_keys.insert(record.plant_key.clone()) {
            continue; // duplicate plant key, first occurrence already kept
        }
        kept.push(record.clone());
    }

    debug!(total = records.len(), kept = kept.len(), "registry filtered");
    kept
}
