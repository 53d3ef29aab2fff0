//! Domain layer: models, errors, and ports for the retrace core.

pub mod errors;
pub mod models;
pub mod ports;
