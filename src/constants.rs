// Reference world image (equirectangular, RGBA8)
pub const REFERENCE_IMAGE_WIDTH: u32 = 2048;
pub const REFERENCE_IMAGE_HEIGHT: u32 = 1024;
pub const RGBA_CHANNELS: usize = 4;

// Pixels whose red, green and blue are all below this are land in the dark earth asset
pub const LAND_THRESHOLD: f64 = 0.03;

// default globe settings:
pub const DEFAULT_DOT_COUNT: usize = 80_000;
pub const DEFAULT_EARTH_RADIUS: f64 = 1.0;
pub const DEFAULT_DOT_SIZE: f64 = 0.005;
pub const FALLBACK_DOT_RADIUS_RATIO: f64 = 0.01; // dot radius per unit of earth radius when dot_size <= 0
pub const DEFAULT_HEX_RESOLUTION: u8 = 1;
pub const DEFAULT_HEX_RING_LEVEL: u32 = 1;

// Camera distances from the globe centre
pub const CAMERA_DISTANCE: f64 = 5.0;
pub const ZOOMED_IN_DISTANCE: f64 = 1.0;
pub const ZOOMED_OUT_DISTANCE: f64 = 5.0;

// Highlight marker geometry, as multiples of the dot radius
pub const HIGHLIGHT_RING_RATIO: f64 = 5.0;
pub const HIGHLIGHT_PIPE_RATIO: f64 = 3.0;
pub const HIGHLIGHT_INNER_RATIO: f64 = 6.0;
pub const HIGHLIGHT_INNER_OFFSET: f64 = 0.01;
pub const HIGHLIGHT_TILT_RAD: f64 = 1.57; // lays the ring flat on the surface
