use crate::ResidenceError;
use config::Config;
use itertools::Itertools;
use modecal_core::respondent::{canonical_integer, RESIDENCE_COLUMN};
use serde::{Deserialize, Serialize};

/// one calibration target bucket: a single residence zone or several zones
/// merged together. the key of a merged group is its ids joined by commas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResidenceGroup {
    pub ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ResidenceGroupsFile {
    groups: Vec<ResidenceGroup>,
}

impl ResidenceGroup {
    pub fn new(ids: &[&str]) -> Result<ResidenceGroup, ResidenceError> {
        let group = ResidenceGroup {
            ids: ids.iter().map(|s| s.to_string()).collect(),
        };
        group.canonical()
    }

    pub fn is_composite(&self) -> bool {
        self.ids.len() > 1
    }

    pub fn key(&self) -> String {
        self.ids.join(",")
    }

    pub fn contains(&self, residence_msr_id: &str) -> bool {
        self.ids.iter().any(|id| id == residence_msr_id)
    }

    /// validates the group and writes its ids as integers
    fn canonical(&self) -> Result<ResidenceGroup, ResidenceError> {
        if self.ids.is_empty() {
            return Err(ResidenceError::InvalidGroup(String::from(
                "group without residence ids",
            )));
        }
        let ids = self
            .ids
            .iter()
            .map(|id| canonical_integer(RESIDENCE_COLUMN, id))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(dup) = ids.iter().duplicates().next() {
            return Err(ResidenceError::InvalidGroup(format!(
                "residence id {dup} listed twice in group {}",
                ids.join(",")
            )));
        }
        Ok(ResidenceGroup { ids })
    }

    /// reads the hand-curated group list from a TOML file of the form
    ///
    /// ```toml
    /// [[groups]]
    /// ids = ["1"]
    /// [[groups]]
    /// ids = ["2", "3"]
    /// ```
    ///
    /// a residence id may belong to at most one group.
    pub fn read_groups(filepath: &str) -> Result<Vec<ResidenceGroup>, ResidenceError> {
        let config = Config::builder()
            .add_source(config::File::new(filepath, config::FileFormat::Toml))
            .build()
            .map_err(|e| ResidenceError::ConfigReadError {
                msg: format!("failed reading '{filepath}'"),
                source: e,
            })?;
        let file = config
            .try_deserialize::<ResidenceGroupsFile>()
            .map_err(|e| ResidenceError::ConfigReadError {
                msg: format!("failed deserializing residence groups from '{filepath}'"),
                source: e,
            })?;
        let groups = file
            .groups
            .iter()
            .map(|g| g.canonical())
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(dup) = groups.iter().flat_map(|g| g.ids.iter()).duplicates().next() {
            return Err(ResidenceError::InvalidGroup(format!(
                "residence id {dup} appears in more than one group"
            )));
        }
        log::info!("read {} residence groups from {}", groups.len(), filepath);
        Ok(groups)
    }
}
