//! `CellTopology` describes how cells are laid out in the Temporal Memory.
//!
//! Columns live in an N-dimensional space that is addressed by a single linear column index.
//! Every column holds the same number of cells, and cells are addressed by a single flat index:
//! column `c` owns the contiguous cell range `c * cells_per_column .. (c + 1) * cells_per_column`.
//!
//! The flat cell range `[0, number_of_cells)` is reserved for these internal cells. Anything above it
//! is free for external (sensorimotor) input cells, which is why `number_of_cells` must never change
//! once a topology is built.

use super::{
    error::{HtmError, Result},
    Cell, Column,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The column grid of a Temporal Memory together with its cells per column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTopology {
    dims: Vec<usize>,
    cells_per_column: usize,
}

impl CellTopology {
    /// Creates a new `CellTopology`, rejecting degenerate layouts.
    /// A column without cells has no winner candidate, so it is refused here rather than per step.
    #[inline]
    pub fn new(column_dimensions: &[usize], cells_per_column: usize) -> Result<Self> {
        if column_dimensions.is_empty() {
            return Err(HtmError::InvalidParameter {
                name: "column_dimensions",
                message: "Cannot be empty".to_string(),
            });
        }
        if column_dimensions.contains(&0) {
            return Err(HtmError::InvalidParameter {
                name: "column_dimensions",
                message: format!("Dimensions must be > 0, got {:?}", column_dimensions),
            });
        }
        if cells_per_column == 0 {
            return Err(HtmError::InvalidParameter {
                name: "cells_per_column",
                message: "Must be > 0".to_string(),
            });
        }

        Ok(Self {
            dims: column_dimensions.to_vec(),
            cells_per_column,
        })
    }

    /// The shape of the column grid.
    pub fn column_dimensions(&self) -> &[usize] {
        &self.dims
    }

    pub fn cells_per_column(&self) -> usize {
        self.cells_per_column
    }

    /// Total number of columns across all dimensions.
    #[inline]
    pub fn number_of_columns(&self) -> usize {
        self.dims.iter().product()
    }

    /// Total number of internal cells. External cells are shifted past this value.
    #[inline]
    pub fn number_of_cells(&self) -> usize {
        self.number_of_columns() * self.cells_per_column
    }

    /// Returns the flat range of cells belonging to `column`.
    #[inline]
    pub fn cells_for_column(&self, column: Column) -> Range<Cell> {
        let start = column * self.cells_per_column;
        start..start + self.cells_per_column
    }

    /// Returns the column owning an internal `cell`.
    #[inline]
    pub fn column_for_cell(&self, cell: Cell) -> Column {
        cell / self.cells_per_column
    }

    /// Checks that `column` exists in this topology.
    #[inline]
    pub fn validate_column(&self, column: Column) -> Result<()> {
        let num_columns = self.number_of_columns();
        if column >= num_columns {
            return Err(HtmError::InvalidColumn {
                column,
                num_columns,
            });
        }
        Ok(())
    }
}
