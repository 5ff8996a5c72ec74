//! Distance-to-origin reduction.

use contracts::{NearestNeighbor, Position};

use crate::table::NeighborTable;

/// Truncate toward zero at two decimal places.
///
/// 3.149 -> 3.14, 1.005 -> 1.0. Not rounding.
#[inline]
pub fn truncate_hundredths(value: f64) -> f64 {
    (value * 100.0).trunc() / 100.0
}

/// Euclidean distance from `pos` to the origin, truncated to two decimals.
///
/// Components whose squares overflow `f64` give an infinite distance.
pub fn distance_to_origin(pos: Position) -> f64 {
    truncate_hundredths((pos.x * pos.x + pos.y * pos.y).sqrt())
}

/// Vehicle closest to the origin.
///
/// Ties go to the first id in table order (lexicographic), since a later
/// entry only replaces the current best on a strictly smaller distance.
/// `None` for an empty table.
pub fn nearest_neighbor(table: &NeighborTable) -> Option<NearestNeighbor> {
    let mut best: Option<NearestNeighbor> = None;
    for (id, record) in table {
        let dist = distance_to_origin(record.pos);
        match &best {
            Some(current) if current.dist <= dist => {}
            _ => {
                best = Some(NearestNeighbor {
                    id: id.clone(),
                    dist,
                })
            }
        }
    }
    best
}
