// Domain layer: report models, pure formatting services and the ports the pipeline talks through.

pub mod model;
pub mod ports;

pub mod services;
