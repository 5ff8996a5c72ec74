//! Latest-state table keyed by vehicle id.

use std::collections::btree_map::{self, BTreeMap};

use contracts::{BeaconMessage, NeighborRecord, Position, VehicleId};

/// Vehicle id -> most recently accepted state.
///
/// Writes are last-write-wins by arrival order; the beacon's own `ts` is
/// stored but never compared. Entries are never removed during a window.
/// Iteration is in lexicographic id order, which also fixes the reducer's
/// tie-break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborTable {
    entries: BTreeMap<VehicleId, NeighborRecord>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write or overwrite the record for `id`.
    ///
    /// Returns the record that was replaced, if any.
    pub fn upsert(
        &mut self,
        id: VehicleId,
        pos: Position,
        speed: f64,
        ts: i64,
    ) -> Option<NeighborRecord> {
        self.entries.insert(
            id,
            NeighborRecord {
                pos,
                speed,
                last_ts: ts,
            },
        )
    }

    pub fn upsert_beacon(&mut self, beacon: BeaconMessage) -> Option<NeighborRecord> {
        let record = NeighborRecord::from(&beacon);
        self.entries.insert(beacon.id, record)
    }

    /// Number of distinct vehicles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NeighborRecord> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, VehicleId, NeighborRecord> {
        self.entries.iter()
    }

    /// Owned copy of every entry, in table order.
    pub fn snapshot(&self) -> Vec<(VehicleId, NeighborRecord)> {
        self.entries
            .iter()
            .map(|(id, record)| (id.clone(), *record))
            .collect()
    }
}

impl<'a> IntoIterator for &'a NeighborTable {
    type Item = (&'a VehicleId, &'a NeighborRecord);
    type IntoIter = btree_map::Iter<'a, VehicleId, NeighborRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
