//! The `TemporalMemory` module implements a core component of HTM that learns and predicts temporal sequences.
//!
//! At a high level, it models a set of columns, where each column contains multiple cells.
//! Each cell can form multiple dendritic segments, which in turn consist of synapses.
//!
//! Column:
//! - A group of cells that share common input.
//!
//! Cell:
//! - An individual processing unit within a column, addressed by a flat index (see `CellTopology`).
//! - Cells are responsible for representing different contexts of the same input.
//!
//! Dendritic Segment (Segment):
//! - A cluster of synapses on a cell that detects patterns of activity from other cells.
//!
//! Synapse:
//! - A connection from a presynaptic cell to a dendritic segment, with a permanence value.
//! - A synapse is connected once its permanence reaches `connected_permanence`.
//!
//! Bursting:
//! - When a column becomes active but no cell was correctly predicted, all cells in the column are activated.
//!
//! Winner Cells:
//! - Cells selected through correct prediction or through bursting, which then guide the learning process.
//!
//! How It Works:
//! - The Temporal Memory processes input in discrete time steps and receives a set of active columns.
//! - Cells that were predictive in the previous step and sit in an active column become active.
//! - Active columns without such cells burst, and one winner cell per bursting column is picked
//!   from the best matching segment, or from the least used cell, which gets a new segment.
//! - Learning reinforces segments that were active or picked for learning and grows synapses
//!   towards the previous winner cells.
//! - Finally, segments with enough connected active synapses become active and make their cells predictive.
//!
//! Every step replaces the whole `StepState`; nothing is updated incrementally across steps.

use super::{
    connections::{Connections, Segment, Synapse},
    error::{HtmError, Result},
    topology::CellTopology,
    Cell, Column,
};
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, trace};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{mem, ops::Range};

/// Holds the parameters required for the Temporal Memory algorithm's learning and activation.
///
/// Missing fields fall back to `Default` when deserializing, so partial configs are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalMemoryParams {
    /// Shape of the column grid.
    pub column_dimensions: Vec<usize>,
    pub cells_per_column: usize,
    /// Connected active synapses needed for a segment to become active.
    pub activation_threshold: usize,
    pub initial_permanence: f64,
    pub connected_permanence: f64,
    /// Active synapses needed for a segment to be picked while bursting.
    pub min_threshold: usize,
    pub max_new_synapse_count: usize,
    pub permanence_increment: f64,
    pub permanence_decrement: f64,
    pub seed: u64,
}

impl Default for TemporalMemoryParams {
    fn default() -> Self {
        Self {
            column_dimensions: vec![2048],
            cells_per_column: 32,
            activation_threshold: 13,
            initial_permanence: 0.21,
            connected_permanence: 0.5,
            min_threshold: 10,
            max_new_synapse_count: 20,
            permanence_increment: 0.1,
            permanence_decrement: 0.1,
            seed: 42,
        }
    }
}

impl TemporalMemoryParams {
    fn validate(&self) -> Result<()> {
        let permanences = [
            ("initial_permanence", self.initial_permanence),
            ("connected_permanence", self.connected_permanence),
            ("permanence_increment", self.permanence_increment),
            ("permanence_decrement", self.permanence_decrement),
        ];

        for (name, value) in permanences {
            if !(0.0..=1.0).contains(&value) {
                return Err(HtmError::InvalidParameter {
                    name,
                    message: format!("Must be within [0, 1], got {}", value),
                });
            }
        }

        Ok(())
    }
}

/// The full per-step state of a Temporal Memory. Each step produces a fresh record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepState {
    pub active_cells: FxHashSet<Cell>,
    pub winner_cells: FxHashSet<Cell>,
    pub active_segments: FxHashSet<Segment>,
    pub predictive_cells: FxHashSet<Cell>,
}

/// Implements the Temporal Memory algorithm which models the activation and learning of temporal sequences.
///
/// The Temporal Memory owns its topology, its connectivity graph and the state of the latest step.
/// Ties between equally used cells and the sampling of new synapses are resolved with a seeded
/// random generator, so a run is fully reproducible for a given seed.
#[derive(Clone, Debug)]
pub struct TemporalMemory {
    topology: CellTopology,
    connections: Connections,

    // Learning and activation parameters.
    activation_threshold: usize,
    initial_permanence: f64,
    connected_permanence: f64,
    min_threshold: usize,
    max_new_synapse_count: usize,
    permanence_increment: f64,
    permanence_decrement: f64,

    state: StepState,

    rand: StdRng,
}

impl TemporalMemory {
    /// Constructs a new Temporal Memory instance, rejecting invalid topologies and permanence values.
    #[inline]
    pub fn new(params: TemporalMemoryParams) -> Result<Self> {
        params.validate()?;
        let topology = CellTopology::new(&params.column_dimensions, params.cells_per_column)?;
        let connections = Connections::new(topology.number_of_cells());

        debug!(
            "Created temporal memory with {} columns x {} cells",
            topology.number_of_columns(),
            topology.cells_per_column()
        );

        Ok(Self {
            topology,
            connections,
            activation_threshold: params.activation_threshold,
            initial_permanence: params.initial_permanence,
            connected_permanence: params.connected_permanence,
            min_threshold: params.min_threshold,
            max_new_synapse_count: params.max_new_synapse_count,
            permanence_increment: params.permanence_increment,
            permanence_decrement: params.permanence_decrement,
            state: StepState::default(),
            rand: StdRng::seed_from_u64(params.seed),
        })
    }

    /// Executes one time step of the Temporal Memory algorithm.
    ///
    /// All column identifiers are validated before any state changes, so a failing call leaves
    /// the Temporal Memory untouched.
    #[inline]
    pub fn compute(&mut self, active_columns: &[Column], learn: bool) -> Result<()> {
        let active_columns = self.column_set(active_columns)?;

        let prev = mem::take(&mut self.state);
        let (state, predicted_columns) = self.compute_fn(&active_columns, &prev, learn);

        trace!(
            "Step: {} active columns, {} predicted, {} predictive cells",
            active_columns.len(),
            predicted_columns.len(),
            state.predictive_cells.len()
        );

        self.state = state;
        Ok(())
    }

    /// Functional version of `compute`: derives the next state from `prev` without touching `self.state`.
    /// Only the connectivity graph and the random generator are mutated.
    pub fn compute_fn(
        &mut self,
        active_columns: &FxHashSet<Column>,
        prev: &StepState,
        learn: bool,
    ) -> (StepState, FxHashSet<Column>) {
        let (mut active_cells, mut winner_cells, predicted_columns) =
            self.activate_correctly_predictive_cells(&prev.predictive_cells, active_columns);

        let (bursting_cells, bursting_winners, learning_segments) =
            self.burst_columns(active_columns, &predicted_columns, &prev.active_cells);

        active_cells.extend(bursting_cells);
        winner_cells.extend(bursting_winners);

        if learn {
            self.learn_on_segments(
                &prev.active_segments,
                &learning_segments,
                &prev.active_cells,
                &winner_cells,
                &prev.winner_cells,
            );
        }

        let (active_segments, predictive_cells) = self.compute_predictive_cells(&active_cells);

        let state = StepState {
            active_cells,
            winner_cells,
            active_segments,
            predictive_cells,
        };

        (state, predicted_columns)
    }

    /// Activates cells that were predicted in the previous time step and whose column is now active.
    /// Returns the active cells, the winner cells (the same set) and the predicted columns.
    pub fn activate_correctly_predictive_cells(
        &self,
        prev_predictive_cells: &FxHashSet<Cell>,
        active_columns: &FxHashSet<Column>,
    ) -> (FxHashSet<Cell>, FxHashSet<Cell>, FxHashSet<Column>) {
        let mut active_cells = FxHashSet::default();
        let mut winner_cells = FxHashSet::default();
        let mut predicted_columns = FxHashSet::default();

        for &cell in prev_predictive_cells {
            let column = self.topology.column_for_cell(cell);

            if active_columns.contains(&column) {
                active_cells.insert(cell);
                winner_cells.insert(cell);
                predicted_columns.insert(column);
            }
        }

        (active_cells, winner_cells, predicted_columns)
    }

    /// Bursts every active column that was not predicted:
    /// - Marks all cells in the column as active.
    /// - Picks one winner cell per column through `learning_segment_for_cells`.
    ///
    /// Returns the active cells, the winner cells and the segments selected for learning.
    pub fn burst_columns(
        &mut self,
        active_columns: &FxHashSet<Column>,
        predicted_columns: &FxHashSet<Column>,
        prev_active_cells: &FxHashSet<Cell>,
    ) -> (FxHashSet<Cell>, FxHashSet<Cell>, FxHashSet<Segment>) {
        let mut active_cells = FxHashSet::default();
        let mut winner_cells = FxHashSet::default();
        let mut learning_segments = FxHashSet::default();

        for column in sorted_difference(active_columns, predicted_columns) {
            let cells: Vec<Cell> = self.cells_for_column(column).collect();
            active_cells.extend(cells.iter().copied());

            let segment = self.learning_segment_for_cells(&cells, prev_active_cells);
            winner_cells.insert(self.connections.cell_for_segment(segment));
            learning_segments.insert(segment);
        }

        (active_cells, winner_cells, learning_segments)
    }

    /// Selects the segment to learn on among `candidates` of a bursting column.
    ///
    /// Takes the most active segment matched against `prev_active_cells` if one reaches `min_threshold`.
    /// Otherwise the least used candidate grows a brand-new segment. The winner is the segment's cell.
    pub(crate) fn learning_segment_for_cells(
        &mut self,
        candidates: &[Cell],
        prev_active_cells: &FxHashSet<Cell>,
    ) -> Segment {
        debug_assert!(!candidates.is_empty(), "bursting column without candidates");
        if let Some(segment) = self.connections.most_active_segment_for_cells(
            candidates,
            prev_active_cells,
            self.min_threshold,
        ) {
            return segment;
        }

        let cell = self.least_used_cell(candidates);
        let segment = self.connections.create_segment(cell);
        trace!("Grew segment {} on cell {}", segment.index(), cell);
        segment
    }

    /// Reinforces segments and grows new synapses.
    ///
    /// For every segment that was active in the previous step or selected for learning:
    /// - Adjusts its synapses if it is a learning segment or belongs to a current winner cell.
    ///   Synapses from `prev_active_cells` are incremented, all others decremented.
    /// - Grows synapses on learning segments towards `growth_candidates` until the segment has
    ///   `max_new_synapse_count` synapses onto previously active cells.
    pub fn learn_on_segments(
        &mut self,
        prev_active_segments: &FxHashSet<Segment>,
        learning_segments: &FxHashSet<Segment>,
        prev_active_cells: &FxHashSet<Cell>,
        winner_cells: &FxHashSet<Cell>,
        growth_candidates: &FxHashSet<Cell>,
    ) {
        let mut segments: Vec<Segment> = prev_active_segments
            .union(learning_segments)
            .copied()
            .collect();
        segments.sort_unstable();

        for segment in segments {
            let is_learning_segment = learning_segments.contains(&segment);
            let is_from_winner_cell =
                winner_cells.contains(&self.connections.cell_for_segment(segment));

            let active_synapses = self.active_synapses_for_segment(segment, prev_active_cells);

            if is_learning_segment || is_from_winner_cell {
                self.adapt_segment(segment, &active_synapses);
            }

            if is_learning_segment {
                let count = self
                    .max_new_synapse_count
                    .saturating_sub(active_synapses.len());

                for presynaptic_cell in self.pick_cells_to_learn_on(count, segment, growth_candidates)
                {
                    self.connections
                        .create_synapse(segment, presynaptic_cell, self.initial_permanence);
                }
            }
        }
    }

    /// Computes which segments are active given the currently active cells, and the cells they predict.
    /// A segment is active once its connected synapses from active cells reach `activation_threshold`.
    pub fn compute_predictive_cells(
        &self,
        active_cells: &FxHashSet<Cell>,
    ) -> (FxHashSet<Segment>, FxHashSet<Cell>) {
        let mut num_active_connected: FxHashMap<Segment, usize> = FxHashMap::default();
        let mut active_segments = FxHashSet::default();
        let mut predictive_cells = FxHashSet::default();

        for &cell in active_cells {
            for &synapse in self.connections.synapses_for_presynaptic_cell(cell) {
                let data = self.connections.data_for_synapse(synapse);

                if data.permanence >= self.connected_permanence {
                    let count = num_active_connected.entry(data.segment).or_insert(0);
                    *count += 1;

                    if *count >= self.activation_threshold {
                        active_segments.insert(data.segment);
                        predictive_cells.insert(self.connections.cell_for_segment(data.segment));
                    }
                }
            }
        }

        (active_segments, predictive_cells)
    }

    /// Returns the synapses of `segment` whose presynaptic cell is in `active_cells`, regardless of permanence.
    pub fn active_synapses_for_segment(
        &self,
        segment: Segment,
        active_cells: &FxHashSet<Cell>,
    ) -> FxHashSet<Synapse> {
        self.connections
            .synapses_for_segment(segment)
            .iter()
            .copied()
            .filter(|&syn| {
                active_cells.contains(&self.connections.data_for_synapse(syn).presynaptic_cell)
            })
            .collect()
    }

    /// Increments the permanence of `active_synapses` and decrements all other synapses of the segment.
    /// Permanences are clamped to [0, 1].
    pub fn adapt_segment(&mut self, segment: Segment, active_synapses: &FxHashSet<Synapse>) {
        let synapses = self.connections.synapses_for_segment(segment).to_vec();

        for synapse in synapses {
            let mut permanence = self.connections.data_for_synapse(synapse).permanence;

            if active_synapses.contains(&synapse) {
                permanence += self.permanence_increment;
            } else {
                permanence -= self.permanence_decrement;
            }

            self.connections
                .update_synapse_permanence(synapse, permanence.clamp(0.0, 1.0));
        }
    }

    /// Picks up to `count` cells from `candidates` that `segment` is not yet connected to.
    /// The candidates are sorted before shuffling so the sample only depends on the seed.
    pub fn pick_cells_to_learn_on(
        &mut self,
        count: usize,
        segment: Segment,
        candidates: &FxHashSet<Cell>,
    ) -> Vec<Cell> {
        if count == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let existing = self.connections.presynaptic_cells_for_segment(segment);
        let mut cells: Vec<Cell> = candidates
            .iter()
            .copied()
            .filter(|cell| !existing.contains(cell))
            .collect();
        cells.sort_unstable();
        cells.shuffle(&mut self.rand);
        cells.truncate(count);
        cells
    }

    /// Identifies and returns the cell with the fewest segments among `cells`:
    /// - If multiple cells share the minimum count, one of them is chosen at random.
    /// - `cells` must not be empty; the topology guarantees this for every column.
    #[inline]
    pub(crate) fn least_used_cell(&mut self, cells: &[Cell]) -> Cell {
        debug_assert!(!cells.is_empty(), "least used cell of an empty slice");
        let mut min_segments = usize::MAX;
        let mut min_cells = Vec::new();

        for &cell in cells {
            let seg_count = self.connections.segments_for_cell(cell).len();
            if seg_count < min_segments {
                min_segments = seg_count;
                min_cells.clear();
                min_cells.push(cell);
            } else if seg_count == min_segments {
                min_cells.push(cell);
            }
        }

        min_cells.sort_unstable();

        if min_cells.len() > 1 {
            min_cells[self.rand.random_range(0..min_cells.len())]
        } else {
            min_cells[0]
        }
    }

    /// Clears the per-step state. Learned segments and synapses are kept.
    pub fn reset(&mut self) {
        debug!("Resetting temporal memory state");
        self.state = StepState::default();
    }

    /// Validates `columns` against the topology and collects them into a set.
    pub fn column_set(&self, columns: &[Column]) -> Result<FxHashSet<Column>> {
        columns
            .iter()
            .map(|&column| self.topology.validate_column(column).map(|_| column))
            .collect()
    }

    /// Swaps in a new step state and returns the previous one.
    pub fn replace_state(&mut self, state: StepState) -> StepState {
        mem::replace(&mut self.state, state)
    }

    pub fn state(&self) -> &StepState {
        &self.state
    }

    pub fn active_cells(&self) -> &FxHashSet<Cell> {
        &self.state.active_cells
    }

    pub fn winner_cells(&self) -> &FxHashSet<Cell> {
        &self.state.winner_cells
    }

    pub fn active_segments(&self) -> &FxHashSet<Segment> {
        &self.state.active_segments
    }

    pub fn predictive_cells(&self) -> &FxHashSet<Cell> {
        &self.state.predictive_cells
    }

    pub fn topology(&self) -> &CellTopology {
        &self.topology
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    /// Total number of internal cells, the offset applied to external cells.
    pub fn number_of_cells(&self) -> usize {
        self.topology.number_of_cells()
    }

    pub fn number_of_columns(&self) -> usize {
        self.topology.number_of_columns()
    }

    pub fn cells_for_column(&self, column: Column) -> Range<Cell> {
        self.topology.cells_for_column(column)
    }

    pub fn column_for_cell(&self, cell: Cell) -> Column {
        self.topology.column_for_cell(cell)
    }

    pub fn min_threshold(&self) -> usize {
        self.min_threshold
    }
}

/// Columns of `active` missing from `predicted`, in ascending order.
pub(crate) fn sorted_difference(
    active: &FxHashSet<Column>,
    predicted: &FxHashSet<Column>,
) -> Vec<Column> {
    let mut columns: Vec<Column> = active.difference(predicted).copied().collect();
    columns.sort_unstable();
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_params() -> TemporalMemoryParams {
        TemporalMemoryParams {
            column_dimensions: vec![32],
            cells_per_column: 4,
            activation_threshold: 3,
            min_threshold: 2,
            max_new_synapse_count: 5,
            initial_permanence: 0.5,
            connected_permanence: 0.5,
            ..Default::default()
        }
    }

    fn set(items: &[usize]) -> FxHashSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn creates_temporal_memory() {
        let tm = TemporalMemory::new(TemporalMemoryParams {
            column_dimensions: vec![10, 10],
            cells_per_column: 4,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(tm.number_of_columns(), 100);
        assert_eq!(tm.number_of_cells(), 400);
        assert!(tm.active_cells().is_empty());
        assert_eq!(tm.connections().num_segments(), 0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let zero_cells = TemporalMemory::new(TemporalMemoryParams {
            cells_per_column: 0,
            ..Default::default()
        });
        assert!(matches!(
            zero_cells,
            Err(HtmError::InvalidParameter { name: "cells_per_column", .. })
        ));

        let bad_permanence = TemporalMemory::new(TemporalMemoryParams {
            connected_permanence: 1.5,
            ..Default::default()
        });
        assert!(matches!(
            bad_permanence,
            Err(HtmError::InvalidParameter { name: "connected_permanence", .. })
        ));
    }

    #[test]
    fn invalid_column_leaves_state_untouched() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        tm.compute(&[0, 1], true).unwrap();
        let before = tm.state().clone();

        let result = tm.compute(&[3, 32], true);

        assert_eq!(
            result,
            Err(HtmError::InvalidColumn {
                column: 32,
                num_columns: 32
            })
        );
        assert_eq!(tm.state(), &before);
    }

    #[test]
    fn bursts_unpredicted_columns() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();

        tm.compute(&[0, 3], true).unwrap();

        assert_eq!(tm.active_cells(), &set(&[0, 1, 2, 3, 12, 13, 14, 15]));
        assert_eq!(tm.winner_cells().len(), 2);
        for &winner in tm.winner_cells() {
            let column = tm.column_for_cell(winner);
            assert!(column == 0 || column == 3);
        }
        assert_eq!(tm.connections().num_segments(), 2);
        assert!(tm.predictive_cells().is_empty());
    }

    #[test]
    fn least_used_cell_prefers_cells_without_segments() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        tm.connections.create_segment(0);
        tm.connections.create_segment(1);
        tm.connections.create_segment(2);

        assert_eq!(tm.least_used_cell(&[0, 1, 2, 3]), 3);

        let picked = tm.least_used_cell(&[0, 1]);
        assert!(picked == 0 || picked == 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "least used cell of an empty slice")]
    fn least_used_cell_requires_candidates() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        tm.least_used_cell(&[]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "bursting column without candidates")]
    fn learning_segment_requires_candidates() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        tm.learning_segment_for_cells(&[], &FxHashSet::default());
    }

    #[test]
    fn adapt_segment_clamps_permanences() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        let segment = tm.connections.create_segment(0);
        let strong = tm.connections.create_synapse(segment, 5, 0.95);
        let weak = tm.connections.create_synapse(segment, 6, 0.05);

        tm.adapt_segment(segment, &[strong].into_iter().collect());

        assert_eq!(tm.connections().data_for_synapse(strong).permanence, 1.0);
        assert_eq!(tm.connections().data_for_synapse(weak).permanence, 0.0);
    }

    #[test]
    fn pick_cells_skips_existing_synapses() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        let segment = tm.connections.create_segment(0);
        tm.connections.create_synapse(segment, 4, 0.5);

        let mut picked = tm.pick_cells_to_learn_on(10, segment, &set(&[4, 5, 6]));
        picked.sort_unstable();
        assert_eq!(picked, vec![5, 6]);

        let picked = tm.pick_cells_to_learn_on(1, segment, &set(&[4, 5, 6]));
        assert_eq!(picked.len(), 1);
        assert_ne!(picked[0], 4);
    }

    #[test]
    fn compute_predictive_cells_uses_connected_synapses_only() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        let segment = tm.connections.create_segment(20);
        for presynaptic in [0, 1, 2] {
            tm.connections.create_synapse(segment, presynaptic, 0.6);
        }
        tm.connections.create_synapse(segment, 3, 0.2);

        let (segments, cells) = tm.compute_predictive_cells(&set(&[0, 1, 2]));
        let expected: FxHashSet<Segment> = [segment].into_iter().collect();
        assert_eq!(segments, expected);
        assert_eq!(cells, set(&[20]));

        let (segments, cells) = tm.compute_predictive_cells(&set(&[0, 1, 3]));
        assert!(segments.is_empty());
        assert!(cells.is_empty());
    }

    #[test]
    fn learns_a_simple_sequence() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        let pattern_a = [0, 1, 2, 3, 4];
        let pattern_b = [10, 11, 12, 13, 14];

        for _ in 0..5 {
            tm.reset();
            tm.compute(&pattern_a, true).unwrap();
            tm.compute(&pattern_b, true).unwrap();
        }

        tm.reset();
        tm.compute(&pattern_a, false).unwrap();

        assert!(!tm.predictive_cells().is_empty());
        for &cell in tm.predictive_cells() {
            assert!(pattern_b.contains(&tm.column_for_cell(cell)));
        }

        let predictive = tm.predictive_cells().clone();
        let active_columns = tm.column_set(&pattern_b).unwrap();
        let prev = tm.state().clone();
        let (state, predicted_columns) = tm.compute_fn(&active_columns, &prev, false);

        assert_eq!(predicted_columns, active_columns);
        assert_eq!(state.active_cells, predictive);
    }

    #[test]
    fn inference_does_not_grow_synapses() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();

        tm.compute(&[0, 1, 2], false).unwrap();
        tm.compute(&[5, 6, 7], false).unwrap();

        assert_eq!(tm.connections().num_synapses(), 0);
    }

    #[test]
    fn reset_clears_state_but_keeps_connections() {
        let mut tm = TemporalMemory::new(sequence_params()).unwrap();
        tm.compute(&[0, 1, 2], true).unwrap();
        tm.compute(&[5, 6, 7], true).unwrap();
        let synapses = tm.connections().num_synapses();

        tm.reset();

        assert!(tm.active_cells().is_empty());
        assert!(tm.winner_cells().is_empty());
        assert!(tm.active_segments().is_empty());
        assert!(tm.predictive_cells().is_empty());
        assert_eq!(tm.connections().num_synapses(), synapses);
        assert!(synapses > 0);
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: TemporalMemoryParams =
            serde_json::from_str(r#"{ "column_dimensions": [64], "cells_per_column": 8 }"#)
                .unwrap();

        assert_eq!(params.column_dimensions, vec![64]);
        assert_eq!(params.cells_per_column, 8);
        assert_eq!(params.activation_threshold, 13);
        assert_eq!(params.seed, 42);
    }
}
