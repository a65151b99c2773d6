// Domain layer: value types and ports. Adapters implement the ports; core consumes them.

pub mod model;
pub mod ports;
