//! Image writers for rendered maps.
pub mod jpeg;
pub mod png;
