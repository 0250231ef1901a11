//! The `SensorimotorTemporalMemory` extends the Temporal Memory with external (sensorimotor) input.
//!
//! External cells represent context that is not feed-forward input, e.g. motor commands.
//! They are reindexed past the last internal cell, so the connectivity graph can treat them as
//! ordinary presynaptic cells: they take part in matching segments while bursting, in predicting
//! the next step, and are offered as growth targets for new synapses. They never own segments.
//!
//! With `learn_on_one_cell` enabled, the first winner cell picked for a column is pinned and
//! reused on every later burst of that column until `reset` is called. This keeps one cell per
//! column responsible for an entire episode.
//!
//! The layer composes a base `TemporalMemory` and calls its operations explicitly. Only the
//! bursting phase is specific to this layer.

use super::{
    connections::Segment,
    error::{HtmError, Result},
    temporal_memory::{sorted_difference, StepState, TemporalMemory, TemporalMemoryParams},
    Cell, Column,
};
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, trace};
use std::mem;

/// The pinned winner cell of each column.
pub type ChosenCells = FxHashMap<Column, Cell>;

/// Everything a single step produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutput {
    pub state: StepState,
    pub predicted_columns: FxHashSet<Column>,
    pub chosen_cells: ChosenCells,
}

/// Shifts raw external identifiers past the `number_of_cells` internal cells.
/// Always returns a fresh set; the shift is injective and keeps no state between calls.
///
/// Fails with `InvalidExternalCell` for identifiers whose shifted value does not fit in a `Cell`.
pub fn reindex_external_cells(
    number_of_cells: usize,
    external_cells: &[Cell],
) -> Result<FxHashSet<Cell>> {
    external_cells
        .iter()
        .map(|&cell| {
            cell.checked_add(number_of_cells)
                .ok_or(HtmError::InvalidExternalCell {
                    cell,
                    number_of_cells,
                })
        })
        .collect()
}

/// Temporal Memory that learns from both internal and external cell activity.
#[derive(Clone, Debug)]
pub struct SensorimotorTemporalMemory {
    tm: TemporalMemory,
    learn_on_one_cell: bool,

    active_external_cells: FxHashSet<Cell>,
    chosen_cell_for_column: ChosenCells,

    // Diagnostics of the latest step, never fed back into learning.
    active_columns: FxHashSet<Column>,
    predicted_columns: FxHashSet<Column>,
    unpredicted_active_columns: FxHashSet<Column>,
    predicted_active_cells: FxHashSet<Cell>,
}

impl SensorimotorTemporalMemory {
    /// Creates a new layer on top of a freshly built base Temporal Memory.
    pub fn new(params: TemporalMemoryParams, learn_on_one_cell: bool) -> Result<Self> {
        let tm = TemporalMemory::new(params)?;
        debug!(
            "Created sensorimotor temporal memory (learn_on_one_cell: {}), external cells start at {}",
            learn_on_one_cell,
            tm.number_of_cells()
        );

        Ok(Self::with_temporal_memory(tm, learn_on_one_cell))
    }

    /// Wraps an existing base Temporal Memory.
    pub fn with_temporal_memory(tm: TemporalMemory, learn_on_one_cell: bool) -> Self {
        Self {
            tm,
            learn_on_one_cell,
            active_external_cells: FxHashSet::default(),
            chosen_cell_for_column: ChosenCells::default(),
            active_columns: FxHashSet::default(),
            predicted_columns: FxHashSet::default(),
            unpredicted_active_columns: FxHashSet::default(),
            predicted_active_cells: FxHashSet::default(),
        }
    }

    /// Feeds one time step through the layer, performing inference and (optionally) learning.
    ///
    /// - `active_external_cells` are raw caller identifiers; `None` counts as no external input.
    /// - `form_internal_connections` lets bursting columns grow synapses to the previous internal
    ///   winner cells in addition to the previous external cells.
    ///
    /// Column and external cell identifiers are validated first, so a failing call leaves all
    /// state untouched.
    pub fn compute(
        &mut self,
        active_columns: &[Column],
        active_external_cells: Option<&[Cell]>,
        form_internal_connections: bool,
        learn: bool,
    ) -> Result<()> {
        let active_columns = self.tm.column_set(active_columns)?;
        let active_external_cells =
            self.reindex_active_external_cells(active_external_cells.unwrap_or(&[]))?;
        let learn_on_one_cell = self.learn_on_one_cell;

        let prev = self.tm.replace_state(StepState::default());
        let prev_active_external_cells = mem::take(&mut self.active_external_cells);
        let chosen_cells = mem::take(&mut self.chosen_cell_for_column);

        let output = self.compute_fn(
            &active_columns,
            &active_external_cells,
            &prev_active_external_cells,
            &prev,
            form_internal_connections,
            learn_on_one_cell,
            chosen_cells,
            learn,
        );

        self.unpredicted_active_columns = active_columns
            .difference(&output.predicted_columns)
            .copied()
            .collect();
        self.predicted_active_cells = prev
            .predictive_cells
            .intersection(&output.state.active_cells)
            .copied()
            .collect();

        trace!(
            "Step: {} active columns ({} unpredicted), {} external cells, {} predictive cells",
            active_columns.len(),
            self.unpredicted_active_columns.len(),
            active_external_cells.len(),
            output.state.predictive_cells.len()
        );

        self.tm.replace_state(output.state);
        self.active_external_cells = active_external_cells;
        self.chosen_cell_for_column = output.chosen_cells;
        self.predicted_columns = output.predicted_columns;
        self.active_columns = active_columns;

        Ok(())
    }

    /// Functional version of `compute`: derives the next step from the given previous state.
    ///
    /// Nothing stored on the layer is read or written; only the connectivity graph and the random
    /// generator of the base Temporal Memory are mutated. `chosen_cells` is taken by value and the
    /// updated map is returned in the output.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_fn(
        &mut self,
        active_columns: &FxHashSet<Column>,
        active_external_cells: &FxHashSet<Cell>,
        prev_active_external_cells: &FxHashSet<Cell>,
        prev: &StepState,
        form_internal_connections: bool,
        learn_on_one_cell: bool,
        chosen_cells: ChosenCells,
        learn: bool,
    ) -> StepOutput {
        let (mut active_cells, mut winner_cells, predicted_columns) = self
            .tm
            .activate_correctly_predictive_cells(&prev.predictive_cells, active_columns);

        let prev_active_cells_all: FxHashSet<Cell> = prev
            .active_cells
            .union(prev_active_external_cells)
            .copied()
            .collect();

        let (bursting_cells, bursting_winners, learning_segments, chosen_cells) = self
            .burst_columns(
                active_columns,
                &predicted_columns,
                &prev_active_cells_all,
                learn_on_one_cell,
                chosen_cells,
            );

        active_cells.extend(bursting_cells);
        winner_cells.extend(bursting_winners);

        if learn {
            let mut growth_candidates = prev_active_external_cells.clone();
            if form_internal_connections {
                growth_candidates.extend(prev.winner_cells.iter().copied());
            }

            self.tm.learn_on_segments(
                &prev.active_segments,
                &learning_segments,
                &prev_active_cells_all,
                &winner_cells,
                &growth_candidates,
            );
        }

        let active_cells_all: FxHashSet<Cell> = active_cells
            .union(active_external_cells)
            .copied()
            .collect();
        let (active_segments, predictive_cells) =
            self.tm.compute_predictive_cells(&active_cells_all);

        StepOutput {
            state: StepState {
                active_cells,
                winner_cells,
                active_segments,
                predictive_cells,
            },
            predicted_columns,
            chosen_cells,
        }
    }

    /// Bursts every active column that was not predicted:
    /// - Marks all cells in the column as active.
    /// - If `learn_on_one_cell` and the column already has a chosen cell, only that cell may win.
    /// - Picks the winner from the most active segment, or grows a segment on the least used candidate.
    /// - Records the winner as the column's chosen cell and its segment as a learning segment.
    ///
    /// Returns the active cells, winner cells, learning segments and the updated chosen cells.
    pub fn burst_columns(
        &mut self,
        active_columns: &FxHashSet<Column>,
        predicted_columns: &FxHashSet<Column>,
        prev_active_cells: &FxHashSet<Cell>,
        learn_on_one_cell: bool,
        mut chosen_cells: ChosenCells,
    ) -> (FxHashSet<Cell>, FxHashSet<Cell>, FxHashSet<Segment>, ChosenCells) {
        let mut active_cells = FxHashSet::default();
        let mut winner_cells = FxHashSet::default();
        let mut learning_segments = FxHashSet::default();

        for column in sorted_difference(active_columns, predicted_columns) {
            let cells: Vec<Cell> = self.tm.cells_for_column(column).collect();
            active_cells.extend(cells.iter().copied());

            let candidates = match chosen_cells.get(&column) {
                Some(&chosen) if learn_on_one_cell => vec![chosen],
                _ => cells,
            };

            let segment = self
                .tm
                .learning_segment_for_cells(&candidates, prev_active_cells);
            let winner = self.tm.connections().cell_for_segment(segment);
            trace!("Column {} bursts, winner cell {}", column, winner);

            winner_cells.insert(winner);
            learning_segments.insert(segment);
            chosen_cells.insert(column, winner);
        }

        (active_cells, winner_cells, learning_segments, chosen_cells)
    }

    /// Clears the episode: base state, external cells, chosen cells and diagnostics.
    /// Learned segments and synapses are kept.
    pub fn reset(&mut self) {
        self.tm.reset();
        self.active_external_cells.clear();
        self.chosen_cell_for_column.clear();
        self.active_columns.clear();
        self.predicted_columns.clear();
        self.unpredicted_active_columns.clear();
        self.predicted_active_cells.clear();
    }

    /// Moves raw external identifiers outside the range of internal cells.
    pub fn reindex_active_external_cells(
        &self,
        external_cells: &[Cell],
    ) -> Result<FxHashSet<Cell>> {
        reindex_external_cells(self.tm.number_of_cells(), external_cells)
    }

    /// Fraction of the latest step's active columns that were not predicted; 0.0 without active columns.
    pub fn anomaly_score(&self) -> f64 {
        if self.active_columns.is_empty() {
            return 0.0;
        }
        self.unpredicted_active_columns.len() as f64 / self.active_columns.len() as f64
    }

    pub fn learn_on_one_cell(&self) -> bool {
        self.learn_on_one_cell
    }

    pub fn temporal_memory(&self) -> &TemporalMemory {
        &self.tm
    }

    pub fn active_cells(&self) -> &FxHashSet<Cell> {
        self.tm.active_cells()
    }

    pub fn winner_cells(&self) -> &FxHashSet<Cell> {
        self.tm.winner_cells()
    }

    pub fn active_segments(&self) -> &FxHashSet<Segment> {
        self.tm.active_segments()
    }

    pub fn predictive_cells(&self) -> &FxHashSet<Cell> {
        self.tm.predictive_cells()
    }

    /// Reindexed external cells of the latest step.
    pub fn active_external_cells(&self) -> &FxHashSet<Cell> {
        &self.active_external_cells
    }

    pub fn chosen_cell_for_column(&self) -> &ChosenCells {
        &self.chosen_cell_for_column
    }

    pub fn active_columns(&self) -> &FxHashSet<Column> {
        &self.active_columns
    }

    pub fn predicted_columns(&self) -> &FxHashSet<Column> {
        &self.predicted_columns
    }

    pub fn unpredicted_active_columns(&self) -> &FxHashSet<Column> {
        &self.unpredicted_active_columns
    }

    pub fn predicted_active_cells(&self) -> &FxHashSet<Cell> {
        &self.predicted_active_cells
    }

    pub fn number_of_cells(&self) -> usize {
        self.tm.number_of_cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TemporalMemoryParams {
        TemporalMemoryParams {
            column_dimensions: vec![2],
            cells_per_column: 2,
            ..Default::default()
        }
    }

    #[test]
    fn reindexes_past_internal_cells() {
        let reindexed = reindex_external_cells(4, &[0, 5]).unwrap();
        let expected: FxHashSet<Cell> = [4, 9].into_iter().collect();

        assert_eq!(reindexed, expected);
        assert!(reindex_external_cells(4, &[]).unwrap().is_empty());
    }

    #[test]
    fn reindexing_rejects_ids_that_would_overflow() {
        assert_eq!(
            reindex_external_cells(4, &[1, usize::MAX - 1]),
            Err(HtmError::InvalidExternalCell {
                cell: usize::MAX - 1,
                number_of_cells: 4
            })
        );
        let highest: FxHashSet<Cell> = [usize::MAX].into_iter().collect();
        assert_eq!(reindex_external_cells(4, &[usize::MAX - 4]), Ok(highest));
    }

    #[test]
    fn overflowing_external_cell_leaves_state_untouched() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();
        layer.compute(&[0], Some(&[1]), true, true).unwrap();
        let active = layer.active_cells().clone();
        let winners = layer.winner_cells().clone();
        let chosen = layer.chosen_cell_for_column().clone();
        let external = layer.active_external_cells().clone();
        let segments = layer.temporal_memory().connections().num_segments();

        let result = layer.compute(&[1], Some(&[usize::MAX - 1]), true, true);

        assert_eq!(
            result,
            Err(HtmError::InvalidExternalCell {
                cell: usize::MAX - 1,
                number_of_cells: 4
            })
        );
        assert_eq!(layer.active_cells(), &active);
        assert_eq!(layer.winner_cells(), &winners);
        assert_eq!(layer.chosen_cell_for_column(), &chosen);
        assert_eq!(layer.active_external_cells(), &external);
        assert_eq!(layer.temporal_memory().connections().num_segments(), segments);
    }

    #[test]
    fn none_external_cells_count_as_empty() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();

        layer.compute(&[0], None, true, true).unwrap();

        assert!(layer.active_external_cells().is_empty());
    }

    #[test]
    fn burst_pins_existing_choice() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();
        let active: FxHashSet<Column> = [1].into_iter().collect();
        let mut chosen = ChosenCells::default();
        chosen.insert(1, 3);

        let (active_cells, winners, segments, chosen) = layer.burst_columns(
            &active,
            &FxHashSet::default(),
            &FxHashSet::default(),
            true,
            chosen,
        );

        let expected_active: FxHashSet<Cell> = [2, 3].into_iter().collect();
        assert_eq!(active_cells, expected_active);
        assert_eq!(winners.into_iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!(segments.len(), 1);
        assert_eq!(chosen.get(&1), Some(&3));
    }

    #[test]
    fn burst_ignores_choice_without_learn_on_one_cell() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), false).unwrap();
        let active: FxHashSet<Column> = [1].into_iter().collect();
        let mut chosen = ChosenCells::default();
        chosen.insert(1, 3);
        // Cell 3 already owns a segment, so the least used candidate is cell 2.
        layer.tm.learning_segment_for_cells(&[3], &FxHashSet::default());

        let (_, winners, _, chosen) = layer.burst_columns(
            &active,
            &FxHashSet::default(),
            &FxHashSet::default(),
            false,
            chosen,
        );

        assert!(winners.contains(&2));
        assert_eq!(chosen.get(&1), Some(&2));
    }

    #[test]
    fn predicted_columns_are_not_burst() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();
        let active: FxHashSet<Column> = [0, 1].into_iter().collect();
        let predicted: FxHashSet<Column> = [0].into_iter().collect();

        let (active_cells, winners, _, chosen) = layer.burst_columns(
            &active,
            &predicted,
            &FxHashSet::default(),
            true,
            ChosenCells::default(),
        );

        let expected_active: FxHashSet<Cell> = [2, 3].into_iter().collect();
        assert_eq!(active_cells, expected_active);
        assert_eq!(winners.len(), 1);
        assert!(!chosen.contains_key(&0));
        assert!(chosen.contains_key(&1));
    }

    #[test]
    fn compute_fn_leaves_layer_state_alone() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();
        let active: FxHashSet<Column> = [0].into_iter().collect();
        let external = layer.reindex_active_external_cells(&[1]).unwrap();

        let output = layer.compute_fn(
            &active,
            &external,
            &FxHashSet::default(),
            &StepState::default(),
            true,
            true,
            ChosenCells::default(),
            true,
        );

        assert_eq!(output.state.active_cells.len(), 2);
        assert_eq!(output.chosen_cells.len(), 1);
        assert!(layer.active_cells().is_empty());
        assert!(layer.chosen_cell_for_column().is_empty());
        assert!(layer.active_external_cells().is_empty());
    }

    #[test]
    fn anomaly_score_is_fraction_of_unpredicted_columns() {
        let mut layer = SensorimotorTemporalMemory::new(small_params(), true).unwrap();
        assert_eq!(layer.anomaly_score(), 0.0);

        layer.compute(&[0, 1], None, true, true).unwrap();
        assert_eq!(layer.anomaly_score(), 1.0);

        layer.compute(&[], None, true, true).unwrap();
        assert_eq!(layer.anomaly_score(), 0.0);
    }
}
