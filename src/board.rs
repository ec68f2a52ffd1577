//! Ring board generation: an ordered perimeter of tiles, each carrying the
//! action text shown when the player token lands on it.

use std::fs;

use bevy::prelude::*;

use crate::config::{ConfigError, GameConfig};

/// Shown when the turn controller asks for a tile the board does not have.
const FALLBACK_ACTION_TEXT: &str = "tile information unavailable";

/// Per-line action descriptions read from a plain text file. Line `i` belongs
/// to tile `i`. The catalog is allowed to be shorter or longer than the board;
/// the board degrades to placeholder text, never to a startup failure.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    lines: Vec<String>,
}

impl ActionCatalog {
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let lines: Vec<String> = text
                    .lines()
                    .map(|line| line.trim_end_matches('\r').to_string())
                    .collect();
                info!("loaded {} tile actions from {path}", lines.len());
                Self { lines }
            }
            Err(err) => {
                warn!("could not read tile actions from {path}: {err}");
                Self::default()
            }
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One position on the ring. Created once during generation, immutable after.
#[derive(Debug, Clone)]
pub struct TileSlot {
    pub index: usize,
    pub position: Vec2,
    pub action_text: String,
    pub is_corner: bool,
}

/// The perimeter ring in clockwise traversal order, starting at the top-left
/// corner. Tile `i` of the vector always has `index == i`.
#[derive(Resource, Debug, Clone, Default)]
pub struct BoardLayout {
    tiles: Vec<TileSlot>,
}

impl BoardLayout {
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&TileSlot> {
        self.tiles.get(index)
    }

    pub fn tiles(&self) -> &[TileSlot] {
        &self.tiles
    }

    /// Defensive lookup for the presentation layer: out-of-range indices get a
    /// fixed fallback string instead of a panic in the frame schedule.
    pub fn action_text(&self, index: usize) -> &str {
        match self.tiles.get(index) {
            Some(tile) => &tile.action_text,
            None => {
                error!(
                    "tile index {index} out of range (board has {} tiles)",
                    self.tiles.len()
                );
                FALLBACK_ACTION_TEXT
            }
        }
    }
}

/// Walks the rectangle perimeter clockwise and assigns indices in visitation
/// order: top row left to right, right column top to bottom without corners,
/// bottom row right to left, left column bottom to top without corners.
pub fn generate(config: &GameConfig, catalog: &ActionCatalog) -> Result<BoardLayout, ConfigError> {
    config.validate()?;

    let width = config.horizontal_tiles as usize;
    let height = config.vertical_tiles as usize;
    let total = config.tile_count();

    let step_x = config.tile_size + config.horizontal_spacing;
    let step_y = config.tile_size + config.vertical_spacing;
    let start_x = -((width - 1) as f32) * step_x / 2.0;
    let start_y = ((height - 1) as f32) * step_y / 2.0;
    let right_edge_x = start_x + (width - 1) as f32 * step_x;
    let bottom_edge_y = start_y - (height - 1) as f32 * step_y;

    let mut positions = Vec::with_capacity(total);
    for i in 0..width {
        positions.push(Vec2::new(start_x + i as f32 * step_x, start_y));
    }
    for i in 1..height - 1 {
        positions.push(Vec2::new(right_edge_x, start_y - i as f32 * step_y));
    }
    for i in (0..width).rev() {
        positions.push(Vec2::new(start_x + i as f32 * step_x, bottom_edge_y));
    }
    for i in (1..height - 1).rev() {
        positions.push(Vec2::new(start_x, start_y - i as f32 * step_y));
    }

    if catalog.len() != total {
        warn!(
            "action catalog has {} lines but the board has {total} tiles",
            catalog.len()
        );
    }

    let corners = [0, width - 1, width + height - 2, total - 4];
    let tiles = positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| {
            let action_text = match catalog.get(index) {
                Some(line) => line.to_string(),
                None => {
                    warn!("no action entry for tile {index}");
                    format!("no action data (tile {index})")
                }
            };
            TileSlot {
                index,
                position,
                action_text,
                is_corner: corners.contains(&index),
            }
        })
        .collect();

    Ok(BoardLayout { tiles })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> GameConfig {
        GameConfig {
            horizontal_tiles: width,
            vertical_tiles: height,
            ..Default::default()
        }
    }

    fn catalog(len: usize) -> ActionCatalog {
        ActionCatalog::from_lines((0..len).map(|i| format!("action {i}")).collect())
    }

    #[test]
    fn tile_count_matches_perimeter_formula() {
        for (width, height) in [(3, 3), (4, 3), (4, 4), (7, 5), (10, 3)] {
            let expected = (width * 2 + (height - 2) * 2) as usize;
            let layout = generate(&config(width, height), &catalog(expected)).unwrap();
            assert_eq!(layout.tile_count(), expected, "{width}x{height}");
            for (i, tile) in layout.tiles().iter().enumerate() {
                assert_eq!(tile.index, i);
            }
        }
    }

    #[test]
    fn corner_flags_mark_exactly_four_corners() {
        let layout = generate(&config(7, 5), &catalog(20)).unwrap();
        let flagged: Vec<usize> = layout
            .tiles()
            .iter()
            .filter(|tile| tile.is_corner)
            .map(|tile| tile.index)
            .collect();
        // {0, w-1, w+h-2, N-4} for a 7x5 ring
        assert_eq!(flagged, vec![0, 6, 10, 16]);
    }

    #[test]
    fn traversal_starts_at_top_left_and_steps_one_axis_at_a_time() {
        let cfg = config(4, 3);
        let layout = generate(&cfg, &catalog(10)).unwrap();
        let step_x = cfg.tile_size + cfg.horizontal_spacing;
        let step_y = cfg.tile_size + cfg.vertical_spacing;

        let first = layout.tile(0).unwrap().position;
        assert!((first.x - (-1.5 * step_x)).abs() < 1e-3);
        assert!((first.y - step_y).abs() < 1e-3);

        // every cyclic neighbor pair is exactly one grid step apart, along one axis
        let n = layout.tile_count();
        for i in 0..n {
            let a = layout.tile(i).unwrap().position;
            let b = layout.tile((i + 1) % n).unwrap().position;
            let dx = (b.x - a.x).abs();
            let dy = (b.y - a.y).abs();
            let along_x = dx > 1e-3;
            let along_y = dy > 1e-3;
            assert!(along_x != along_y, "tiles {i} and {} move diagonally", (i + 1) % n);
            if along_x {
                assert!((dx - step_x).abs() < 1e-3);
            } else {
                assert!((dy - step_y).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn positions_are_distinct() {
        let layout = generate(&config(7, 5), &catalog(20)).unwrap();
        for a in layout.tiles() {
            for b in layout.tiles() {
                if a.index != b.index {
                    assert!(a.position.distance(b.position) > 1e-3);
                }
            }
        }
    }

    #[test]
    fn short_catalog_degrades_to_placeholders() {
        let layout = generate(&config(4, 3), &catalog(4)).unwrap();
        assert_eq!(layout.tile_count(), 10);
        assert_eq!(layout.tile(3).unwrap().action_text, "action 3");
        assert_eq!(layout.tile(4).unwrap().action_text, "no action data (tile 4)");
        assert_eq!(layout.tile(9).unwrap().action_text, "no action data (tile 9)");
    }

    #[test]
    fn empty_catalog_still_generates() {
        let layout = generate(&config(4, 3), &ActionCatalog::default()).unwrap();
        assert_eq!(layout.tile_count(), 10);
        assert!(layout.tiles().iter().all(|t| t.action_text.starts_with("no action data")));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(generate(&config(2, 5), &catalog(0)).is_err());
        assert!(generate(&config(5, 2), &catalog(0)).is_err());
    }

    #[test]
    fn out_of_range_lookup_returns_fallback() {
        let layout = generate(&config(4, 3), &catalog(10)).unwrap();
        assert_eq!(layout.action_text(2), "action 2");
        assert_eq!(layout.action_text(99), FALLBACK_ACTION_TEXT);
    }

    #[test]
    fn missing_catalog_file_loads_empty() {
        let loaded = ActionCatalog::load("does/not/exist.txt");
        assert!(loaded.is_empty());
    }

    #[test]
    fn catalog_reads_one_action_per_line() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "pass go\r\npay rent\ndraw a card").unwrap();
        let loaded = ActionCatalog::load(file.path().to_str().unwrap());
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get(0), Some("pass go"));
        assert_eq!(loaded.get(1), Some("pay rent"));
        assert_eq!(loaded.get(2), Some("draw a card"));
        assert_eq!(loaded.get(3), None);
    }
}
