// Domain layer: shop models and the config seam. No I/O here.

pub mod model;
pub mod ports;
