// Domain layer: entities and ports. Adapters implement the ports, core uses them.

pub mod model;
pub mod ports;
