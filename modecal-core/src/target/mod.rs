mod partition;
mod target_row;
mod target_table;

pub use partition::Partition;
pub use target_row::TargetRow;
pub use target_table::TargetTable;
