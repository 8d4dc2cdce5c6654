use crate::geometry::{clamp, Point, Size};
use crate::tile::TilePosition;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveDrag {
    pub tile: TilePosition,
    /// Pointer position inside the tile box at grab time.
    pub grab_offset: Point,
    /// Live top-left of the dragged box in container pixels.
    pub position: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }
}

pub fn grab_offset(pointer: Point, box_origin: Point) -> Point {
    pointer.offset_from(box_origin)
}

/// Where the dragged box goes for a pointer at `pointer` (container
/// coordinates), kept fully inside the container.
pub fn drag_target(pointer: Point, grab_offset: Point, container: Size, tile_box: Size) -> Point {
    let raw = pointer.offset_from(grab_offset);
    Point::new(
        clamp(raw.x, 0.0, container.width - tile_box.width),
        clamp(raw.y, 0.0, container.height - tile_box.height),
    )
}
