pub mod cloud;
pub mod compact;
pub mod field;
pub mod mesh;
pub mod observer;
pub mod ops;
pub mod pipeline;
pub mod reconcile;
