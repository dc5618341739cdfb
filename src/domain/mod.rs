// Domain layer: record shapes, run summaries and the pipeline port. No I/O here.

pub mod model;
pub mod ports;
