//! Output generation for a run's results.
//!
//! # Submodules
//!
//! - [`digest`]: renders the aggregated jobs as the plain-text digest
//! - [`slack`]: posts the digest to a Slack incoming webhook
//!
//! `--json` output is produced directly from the serializable models with
//! `serde_json`.

pub mod digest;
pub mod slack;
