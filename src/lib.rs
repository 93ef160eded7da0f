pub mod constants;
pub mod error;
pub mod math_utils;
pub mod geo_coordinate;
pub mod sphere_sampler;
pub mod equirectangular;
pub mod land_classifier;
pub mod texture_map;
pub mod nearest_dot;
pub mod hex_cells;
pub mod globe_config;
pub mod globe;

pub use error::{GlobeError, GlobeResult};
pub use geo_coordinate::GeoCoordinate;
pub use globe::Globe;
pub use globe_config::GlobeConfig;
pub use texture_map::{TextureMap, TextureMapCache};
