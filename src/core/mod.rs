pub mod connections;
pub mod error;
pub mod monitor;
pub mod sensorimotor;
pub mod temporal_memory;
pub mod topology;

/// Identifier of a cell in the flat cell address space.
///
/// Internal cells occupy `[0, number_of_cells)`, reindexed external cells everything above.
pub type Cell = usize;

/// Identifier of a column.
pub type Column = usize;
