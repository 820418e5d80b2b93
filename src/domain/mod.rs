// Domain layer: experiment models and the provider port. No hashing here.

pub mod model;
pub mod ports;
