use crate::respondent::RESIDENCE_COLUMN;
use crate::Respondent;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

/// the population segment a target share applies to, as a set of
/// (column, value) requirements. the empty partition is the whole population.
///
/// a residence value may list several ids separated by commas, in which case
/// a respondent matches when its residence equals any one of them. this is how
/// composite residence groups such as "3,4" are joined. values of other
/// columns match exactly.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition(BTreeMap<String, String>);

impl Partition {
    pub fn overall() -> Partition {
        Partition(BTreeMap::new())
    }

    pub fn new(entries: &[(&str, &str)]) -> Partition {
        Partition(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.0.insert(column.to_string(), value.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn is_overall(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn matches(&self, respondent: &Respondent) -> bool {
        self.0.iter().all(|(column, value)| {
            match respondent.attribute(column) {
                None => false,
                Some(attr) if column == RESIDENCE_COLUMN => {
                    value == attr || value.split(',').any(|id| id.trim() == attr)
                }
                Some(attr) => value == attr,
            }
        })
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "overall")
        } else {
            let s = self.0.iter().map(|(k, v)| format!("{k}={v}")).join("&");
            write!(f, "{s}")
        }
    }
}
