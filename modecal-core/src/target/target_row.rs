use super::Partition;
use serde::{Deserialize, Serialize};

/// a reference share for one mode within one population partition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TargetRow {
    pub partition: Partition,
    pub main_mode: String,
    pub share: f64,
}

impl TargetRow {
    pub fn new(partition: Partition, main_mode: &str, share: f64) -> TargetRow {
        TargetRow {
            partition,
            main_mode: main_mode.to_string(),
            share,
        }
    }
}
