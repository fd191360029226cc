//! Grid port - cell classification provided by the host environment.

use crate::types::Position;

/// Read-only view of the grid an agent navigates.
///
/// Coordinates run from `(0, 0)` to `(width - 1, height - 1)`.
pub trait GridMap: Send + Sync {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Whether `cell` is the evacuation target.
    fn is_exit(&self, cell: Position) -> bool;

    fn is_door(&self, cell: Position) -> bool;

    /// Whether an agent may stand on `cell`.
    fn is_routable(&self, cell: Position) -> bool;

    /// Whether `cell` lies inside the grid.
    fn contains(&self, cell: Position) -> bool {
        (0..self.width()).contains(&cell.x) && (0..self.height()).contains(&cell.y)
    }
}
