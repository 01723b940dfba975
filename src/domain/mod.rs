// Domain layer: request/response models and the ports to the two external services.

pub mod model;
pub mod ports;
