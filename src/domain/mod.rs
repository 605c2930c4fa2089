// Domain layer: records, rejections and the ports the pipeline talks through.

pub mod model;
pub mod ports;
pub mod upload;
