//! Back-office reconciliation for XM market files.
//!
//! Ingests the daily OFEI dispatch-offer file and the dDEC declared-generation
//! file, narrows the master plant registry to one participant's hydro/thermal
//! plants, and joins the two to produce the hourly table of plants that
//! actually generated.

pub mod export;
pub mod parse;
pub mod reconcile;
pub mod registry;
