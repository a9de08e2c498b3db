// Domain layer: typed rate request schema and the ports the client is built around.

pub mod model;
pub mod ports;
