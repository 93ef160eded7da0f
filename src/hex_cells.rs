/// Hexagonal cell lookup for tapped locations
///
/// The globe only hands a coordinate to the indexer and forwards the ids it
/// gets back. [`H3Indexer`] backs the trait with `h3o`.

use crate::error::{GlobeError, GlobeResult};
use crate::geo_coordinate::GeoCoordinate;
use h3o::{CellIndex, LatLng, Resolution};

/// Cell id for a coordinate plus the ids of the cells around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexCellLookup {
    pub cell: u64,
    pub neighbors: Vec<u64>,
}

impl HexCellLookup {
    pub fn cell_hex(&self) -> String {
        format_cell_id(self.cell)
    }

    pub fn neighbor_hexes(&self) -> Vec<String> {
        self.neighbors.iter().map(|id| format_cell_id(*id)).collect()
    }
}

/// Uppercase hexadecimal rendering of a cell id, e.g. `81283FFFFFFFFFF`
pub fn format_cell_id(id: u64) -> String {
    format!("{:X}", id)
}

pub trait HexCellIndexer {
    /// Id of the cell containing `coordinate` at `resolution`
    fn cell(&self, coordinate: &GeoCoordinate, resolution: u8) -> GlobeResult<u64>;

    /// Ids of the cells within `ring_level` steps of the containing cell, excluding it
    fn neighbors(&self, coordinate: &GeoCoordinate, resolution: u8, ring_level: u32) -> GlobeResult<Vec<u64>>;

    fn lookup(&self, coordinate: &GeoCoordinate, resolution: u8, ring_level: u32) -> GlobeResult<HexCellLookup> {
        Ok(HexCellLookup {
            cell: self.cell(coordinate, resolution)?,
            neighbors: self.neighbors(coordinate, resolution, ring_level)?,
        })
    }
}

/// H3 hexagonal grid via `h3o`
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Indexer;

impl H3Indexer {
    fn cell_index(coordinate: &GeoCoordinate, resolution: u8) -> GlobeResult<CellIndex> {
        let resolution = Resolution::try_from(resolution).map_err(|e| GlobeError::HexIndex {
            message: format!("resolution {}: {}", resolution, e),
        })?;
        let lat_lng = LatLng::new(coordinate.latitude(), coordinate.longitude()).map_err(|e| {
            GlobeError::HexIndex {
                message: format!("coordinate {:?}: {}", coordinate, e),
            }
        })?;
        Ok(lat_lng.to_cell(resolution))
    }
}

impl HexCellIndexer for H3Indexer {
    fn cell(&self, coordinate: &GeoCoordinate, resolution: u8) -> GlobeResult<u64> {
        Ok(u64::from(Self::cell_index(coordinate, resolution)?))
    }

    fn neighbors(&self, coordinate: &GeoCoordinate, resolution: u8, ring_level: u32) -> GlobeResult<Vec<u64>> {
        let origin = Self::cell_index(coordinate, resolution)?;
        let disk: Vec<CellIndex> = origin.grid_disk(ring_level);
        Ok(disk
            .into_iter()
            .filter(|cell| *cell != origin)
            .map(u64::from)
            .collect())
    }
}
