// Domain layer: booking models and the persistence port.

pub mod model;
pub mod ports;
