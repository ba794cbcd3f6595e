//! Core building blocks of the masked-grid-to-point-cloud pipeline: field
//! loading and masking, coordinate meshing, mask reconciliation, compaction
//! and orchestration. These are consumed by the high-level `api` module.
pub mod params;
pub mod processing;
