use crate::drag::{drag_target, grab_offset, ActiveDrag, DragState};
use crate::error::PuzzleError;
use crate::geometry::{clamp, Point, Size};
use crate::grid::{within_tolerance, GridSpec};
use crate::tile::{build_tiles, Tile, TilePosition};

#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseOutcome {
    pub tile: TilePosition,
    /// The tile landed within tolerance and was snapped onto its slot.
    pub snapped: bool,
    /// Drop position as a fraction of the container, before snapping.
    pub dropped: Point,
    /// Every tile is solved after this release.
    pub puzzle_solved: bool,
}

/// State of one puzzle instance: built once per image load and grid, then
/// mutated by container resizes and drags.
#[derive(Clone, Debug)]
pub struct PuzzleSession {
    grid: GridSpec,
    image_size: Size,
    container: Option<Size>,
    tiles: Vec<Tile>,
    drag: DragState,
}

impl PuzzleSession {
    pub fn new(
        grid: GridSpec,
        image_width: u32,
        image_height: u32,
        seed: u32,
    ) -> Result<Self, PuzzleError> {
        if image_width == 0 || image_height == 0 {
            return Err(PuzzleError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }
        let image_size = Size::new(image_width as f64, image_height as f64);
        Ok(Self {
            grid,
            image_size,
            container: None,
            tiles: build_tiles(grid, image_size, seed),
            drag: DragState::Idle,
        })
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Tiles in render order; the most recently released tile is last.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, position: TilePosition) -> Option<&Tile> {
        self.tiles
            .iter()
            .find(|tile| tile.correct_position == position)
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    pub fn resize(&mut self, container: Size) {
        self.container = Some(container);
    }

    pub fn display_height(&self) -> Option<f64> {
        let container = self.container?;
        Some(container.width / self.image_size.width * self.image_size.height)
    }

    /// Container width paired with the aspect-preserving display height.
    pub fn layout_size(&self) -> Option<Size> {
        let container = self.container?;
        let height = self.display_height()?;
        Some(Size::new(container.width, height))
    }

    pub fn tile_box(&self) -> Option<Size> {
        let layout = self.layout_size()?;
        Some(layout.scale_size(self.grid.tile_fraction()))
    }

    pub fn solved_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.solved).count()
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(|tile| tile.solved)
    }

    /// Starts dragging `position` with the pointer at `pointer` (container
    /// pixels). Solved tiles, unknown tiles and an unmeasured container are
    /// refused, as is a second drag while one is active.
    pub fn begin_drag(&mut self, position: TilePosition, pointer: Point) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        let Some(layout) = self.layout_size().filter(|size| !size.is_empty()) else {
            return false;
        };
        let Some(tile) = self.tile(position) else {
            return false;
        };
        if tile.solved {
            return false;
        }
        let origin = tile.pixel_position(layout);
        self.drag = DragState::Dragging(ActiveDrag {
            tile: position,
            grab_offset: grab_offset(pointer, origin),
            position: origin,
        });
        true
    }

    /// Moves the active drag and returns the box position to draw, or `None`
    /// when nothing is being dragged.
    pub fn drag_move(&mut self, pointer: Point) -> Option<Point> {
        let layout = self.layout_size()?;
        let tile_box = self.tile_box()?;
        let DragState::Dragging(drag) = &mut self.drag else {
            return None;
        };
        drag.position = drag_target(pointer, drag.grab_offset, layout, tile_box);
        Some(drag.position)
    }

    /// Ends the active drag, snapping the tile if it landed close enough to
    /// its slot. Returns `None` when no drag was active.
    pub fn release(&mut self) -> Option<ReleaseOutcome> {
        let DragState::Dragging(drag) = std::mem::take(&mut self.drag) else {
            return None;
        };
        let index = self
            .tiles
            .iter()
            .position(|tile| tile.correct_position == drag.tile)?;
        let previous = self.tiles.remove(index);
        let Some(layout) = self.layout_size().filter(|size| !size.is_empty()) else {
            // Without a measurable container the drop point is unknown; the
            // tile stays where it was.
            let dropped = previous.current;
            self.tiles.push(previous);
            return Some(ReleaseOutcome {
                tile: drag.tile,
                snapped: false,
                dropped,
                puzzle_solved: self.is_solved(),
            });
        };
        let fraction = layout.fraction_of(drag.position);
        let dropped = Point::new(clamp(fraction.x, 0.0, 1.0), clamp(fraction.y, 0.0, 1.0));
        let target = self.grid.target_fraction(drag.tile);
        let snapped = within_tolerance(target, dropped);
        self.tiles.push(Tile {
            current: if snapped { target } else { dropped },
            solved: snapped,
            ..previous
        });
        Some(ReleaseOutcome {
            tile: drag.tile,
            snapped,
            dropped,
            puzzle_solved: self.is_solved(),
        })
    }
}
