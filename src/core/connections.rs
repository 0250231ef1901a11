//! `Connections` is the connectivity graph of the Temporal Memory.
//!
//! Every internal cell can own any number of dendritic segments, and every segment holds synapses
//! to presynaptic cells. Presynaptic cells are plain flat identifiers: they may be internal cells or
//! reindexed external cells, so the graph never needs to special-case sensorimotor input.
//!
//! Segments and synapses are stored in flat pools and addressed by handles (`Segment`, `Synapse`),
//! which are the index of the element in creation order. A reverse index from presynaptic cell to
//! synapses allows computing segment activity by walking only the active cells.

use super::Cell;
use fxhash::{FxHashMap, FxHashSet};

/// Handle of a dendritic segment. Ordering follows creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment(usize);

impl Segment {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a synapse. Ordering follows creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Synapse(usize);

impl Synapse {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A synapse connecting a segment to a presynaptic cell, holding a permanence value.
#[derive(Clone, Debug, PartialEq)]
pub struct SynapseData {
    pub segment: Segment,
    pub presynaptic_cell: Cell,
    pub permanence: f64,
}

/// A dendritic segment belonging to exactly one cell.
#[derive(Clone, Debug)]
struct SegmentData {
    cell: Cell,
    synapses: Vec<Synapse>,
}

/// The segment/synapse graph over a fixed number of internal cells.
#[derive(Clone, Debug)]
pub struct Connections {
    number_of_cells: usize,
    segments_for_cell: Vec<Vec<Segment>>,
    segments: Vec<SegmentData>,
    synapses: Vec<SynapseData>,
    synapses_for_presynaptic_cell: FxHashMap<Cell, Vec<Synapse>>,
}

impl Connections {
    /// Creates an empty graph for `number_of_cells` internal cells.
    pub fn new(number_of_cells: usize) -> Self {
        Self {
            number_of_cells,
            segments_for_cell: vec![Vec::new(); number_of_cells],
            segments: Vec::new(),
            synapses: Vec::new(),
            synapses_for_presynaptic_cell: FxHashMap::default(),
        }
    }

    /// Grows a new segment on an internal `cell` and returns its handle.
    #[inline]
    pub fn create_segment(&mut self, cell: Cell) -> Segment {
        assert!(
            cell < self.number_of_cells,
            "Attempting to create a segment on cell {} outside of {} internal cells",
            cell,
            self.number_of_cells
        );
        let segment = Segment(self.segments.len());
        self.segments.push(SegmentData {
            cell,
            synapses: Vec::new(),
        });
        self.segments_for_cell[cell].push(segment);
        segment
    }

    /// Connects `segment` to `presynaptic_cell`, which may be internal or external.
    #[inline]
    pub fn create_synapse(
        &mut self,
        segment: Segment,
        presynaptic_cell: Cell,
        permanence: f64,
    ) -> Synapse {
        let synapse = Synapse(self.synapses.len());
        self.synapses.push(SynapseData {
            segment,
            presynaptic_cell,
            permanence,
        });
        self.segments[segment.0].synapses.push(synapse);
        self.synapses_for_presynaptic_cell
            .entry(presynaptic_cell)
            .or_default()
            .push(synapse);
        synapse
    }

    #[inline]
    pub fn update_synapse_permanence(&mut self, synapse: Synapse, permanence: f64) {
        self.synapses[synapse.0].permanence = permanence;
    }

    /// Segments of `cell` in creation order.
    #[inline]
    pub fn segments_for_cell(&self, cell: Cell) -> &[Segment] {
        &self.segments_for_cell[cell]
    }

    /// Synapses of `segment` in creation order.
    #[inline]
    pub fn synapses_for_segment(&self, segment: Segment) -> &[Synapse] {
        &self.segments[segment.0].synapses
    }

    /// Synapses whose presynaptic side is `cell`.
    #[inline]
    pub fn synapses_for_presynaptic_cell(&self, cell: Cell) -> &[Synapse] {
        self.synapses_for_presynaptic_cell
            .get(&cell)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn data_for_synapse(&self, synapse: Synapse) -> &SynapseData {
        &self.synapses[synapse.0]
    }

    #[inline]
    pub fn cell_for_segment(&self, segment: Segment) -> Cell {
        self.segments[segment.0].cell
    }

    /// Presynaptic cells `segment` is already connected to.
    pub fn presynaptic_cells_for_segment(&self, segment: Segment) -> FxHashSet<Cell> {
        self.synapses_for_segment(segment)
            .iter()
            .map(|&syn| self.synapses[syn.0].presynaptic_cell)
            .collect()
    }

    pub fn number_of_cells(&self) -> usize {
        self.number_of_cells
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn num_synapses(&self) -> usize {
        self.synapses.len()
    }

    /// Finds the segment among `cells` with the most synapses onto `active_cells`.
    ///
    /// Synapses count regardless of permanence. A segment only qualifies if its count reaches
    /// `min_threshold`; among equally active segments the one visited last wins, visiting candidate
    /// cells in ascending order and their segments in creation order.
    pub fn most_active_segment_for_cells(
        &self,
        cells: &[Cell],
        active_cells: &FxHashSet<Cell>,
        min_threshold: usize,
    ) -> Option<Segment> {
        let mut candidates = cells.to_vec();
        candidates.sort_unstable();

        let mut max_synapses = min_threshold;
        let mut best = None;

        for cell in candidates {
            for &segment in self.segments_for_cell(cell) {
                let num_active = self.segments[segment.0]
                    .synapses
                    .iter()
                    .filter(|syn| active_cells.contains(&self.synapses[syn.0].presynaptic_cell))
                    .count();

                if num_active >= max_synapses {
                    max_synapses = num_active;
                    best = Some(segment);
                }
            }
        }

        best
    }
}
