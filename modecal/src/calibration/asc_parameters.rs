use itertools::Itertools;
use modecal_core::{Mode, Partition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// alternative-specific constants for the modes of one population group
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupAsc {
    pub column: String,
    pub value: String,
    pub modes: BTreeMap<Mode, f64>,
}

impl GroupAsc {
    pub fn partition(&self) -> Partition {
        Partition::new(&[(self.column.as_str(), self.value.as_str())])
    }
}

/// the parameter vector handed to the simulator for one trial. this is also
/// the layout of the per-trial params JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AscParameters {
    pub modes: BTreeMap<Mode, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupAsc>,
}

impl AscParameters {
    pub fn mode(&self, mode: Mode) -> Option<f64> {
        self.modes.get(&mode).copied()
    }

    pub fn group(&self, column: &str, value: &str) -> Option<&GroupAsc> {
        self.groups
            .iter()
            .find(|g| g.column == column && g.value == value)
    }

    /// flattened (name, value) pairs in a stable order, used for reporting
    pub fn entries(&self) -> Vec<(String, f64)> {
        let base = self.modes.iter().map(|(m, v)| (m.to_string(), *v));
        let grouped = self.groups.iter().flat_map(|g| {
            g.modes
                .iter()
                .map(move |(m, v)| (format!("{}={}:{}", g.column, g.value, m), *v))
        });
        base.chain(grouped).collect_vec()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
