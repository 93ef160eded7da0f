// Builds the default 80,000 dot globe, lays it out over a synthetic world
// image and walks through the interactions a viewer would trigger.
//
// Run with `RUST_LOG=debug` to see cache hits and builds.
// Pass a JSON config path as the first argument to override the defaults.

use colored::Colorize;
use dot_globe::geo_coordinate::GeoCoordinate;
use dot_globe::globe::{Globe, PlacedDot};
use dot_globe::globe_config::GlobeConfig;
use dot_globe::land_classifier::WorldImage;
use glam::DVec3;
use std::time::Instant;

/// Rough continents: dark blobs on a bright ocean, good enough to see the mask work
fn synthetic_world(width: u32, height: u32) -> Result<WorldImage, Box<dyn std::error::Error>> {
    let blobs = [
        // (lat, lon, radius in degrees)
        (45.0, -100.0, 25.0),
        (-15.0, -60.0, 20.0),
        (50.0, 40.0, 35.0),
        (5.0, 20.0, 22.0),
        (-25.0, 135.0, 15.0),
    ];
    let image = WorldImage::from_fn(width, height, |u, v| {
        let lon = u as f64 / width as f64 * 360.0 - 180.0;
        let lat = 90.0 - v as f64 / height as f64 * 180.0;
        let on_land = blobs
            .iter()
            .any(|(b_lat, b_lon, r)| (lat - b_lat).hypot(lon - b_lon) < *r);
        if on_land { [3, 3, 3, 255] } else { [18, 52, 140, 255] }
    })?;
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("{}", "🌍 Dot Globe Demo".bold());
    println!("=================");

    let config = match std::env::args().nth(1) {
        Some(path) => GlobeConfig::from_json_file(path)?,
        None => GlobeConfig::default(),
    };
    let image = synthetic_world(config.image_width, config.image_height)?;
    let mut globe = Globe::new(config, image)?;

    let started = Instant::now();
    let map = globe.texture_map()?;
    println!(
        "Texture map: {} dots on radius {} in {:?}",
        map.len().to_string().cyan(),
        map.radius(),
        started.elapsed()
    );

    let new_york = GeoCoordinate::new(40.7128, -74.0060)?;
    globe.set_current_location(Some(new_york));

    let layout = globe.dot_layout()?;
    let land = layout.iter().filter(|dot| matches!(dot, PlacedDot::Land(_))).count();
    println!("Layout: {} land dots, {} highlight", land.to_string().green(), layout.len() - land);

    if let Some(PlacedDot::Highlight(marker)) = layout.iter().find(|dot| matches!(dot, PlacedDot::Highlight(_))) {
        println!(
            "{} dot #{} at pixel ({}, {}), ring radius {:.4}",
            "📍 New York".yellow().bold(),
            marker.entry.index,
            marker.entry.pixel.u,
            marker.entry.pixel.v,
            marker.ring_radius
        );
    }

    if let Some(target) = globe.center_on_current_location()? {
        let p = target.camera_position;
        println!("Camera moves to ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
        let zoomed = Globe::<dot_globe::hex_cells::H3Indexer>::zoom_target(p, true)?;
        println!("Zoomed in to ({:.3}, {:.3}, {:.3})", zoomed.x, zoomed.y, zoomed.z);
    }

    // a tap on the front of the globe, slightly north of the equator
    let tap = globe.handle_tap(DVec3::new(0.2, 0.3, 0.93))?;
    println!(
        "Tap at ({:.2}, {:.2}) -> cell {} with {} neighbours, nearest dot #{}",
        tap.coordinate.latitude(),
        tap.coordinate.longitude(),
        tap.cell.magenta(),
        tap.neighbors.len(),
        tap.nearest_dot.index
    );

    // a second request for the same map is served from the cache
    let again = globe.texture_map()?;
    println!("Cache reused: {}", std::sync::Arc::ptr_eq(&map, &again).to_string().green());

    println!("{}", "✅ Done".green().bold());
    Ok(())
}
