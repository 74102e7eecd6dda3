use crate::{Mode, Partition, Respondent, TargetTable, Trip};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// mode shares measured on a set of trips, per population partition
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ObservedShares(BTreeMap<Partition, BTreeMap<String, f64>>);

impl ObservedShares {
    /// counts trips by mode within each partition. trips are attributed to a
    /// partition through their person; trips of persons missing from
    /// `persons` are ignored. every calibrated mode gets an entry, zero if no
    /// trip uses it.
    pub fn compute(persons: &[Respondent], trips: &[Trip], partitions: &[Partition]) -> Self {
        let by_person: HashMap<&str, &Respondent> =
            persons.iter().map(|p| (p.person.as_str(), p)).collect();
        let mut shares = BTreeMap::new();
        for partition in partitions.iter() {
            let members: HashSet<&str> = by_person
                .iter()
                .filter(|(_, p)| partition.matches(p))
                .map(|(id, _)| *id)
                .collect();
            let mut counts: BTreeMap<String, usize> = Mode::ALL
                .iter()
                .map(|m| (m.to_string(), 0))
                .collect();
            let mut total = 0;
            for trip in trips.iter().filter(|t| members.contains(t.person.as_str())) {
                *counts.entry(trip.main_mode.clone()).or_insert(0) += 1;
                total += 1;
            }
            if total == 0 {
                log::warn!("no trips observed for partition {partition}");
            }
            let partition_shares = counts
                .into_iter()
                .map(|(mode, n)| {
                    let share = if total == 0 {
                        0.0
                    } else {
                        n as f64 / total as f64
                    };
                    (mode, share)
                })
                .collect();
            shares.insert(partition.clone(), partition_shares);
        }
        ObservedShares(shares)
    }

    pub fn insert(&mut self, partition: Partition, mode: &str, share: f64) {
        self.0
            .entry(partition)
            .or_default()
            .insert(mode.to_string(), share);
    }

    pub fn get(&self, partition: &Partition, mode: &str) -> Option<f64> {
        self.0.get(partition).and_then(|m| m.get(mode)).copied()
    }

    /// mean absolute difference between observed and target shares over all
    /// target rows. missing observations count as zero.
    pub fn mean_absolute_error(&self, targets: &TargetTable) -> f64 {
        if targets.rows.is_empty() {
            return 0.0;
        }
        let sum: f64 = targets
            .rows
            .iter()
            .map(|row| {
                let observed = self.get(&row.partition, &row.main_mode).unwrap_or_default();
                (observed - row.share).abs()
            })
            .sum();
        sum / targets.rows.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TargetRow;

    #[test]
    fn test_compute_by_partition() {
        let persons = vec![
            Respondent::new("a", "regular", &[("residence_msr_id", "1")]),
            Respondent::new("b", "regular", &[("residence_msr_id", "2")]),
        ];
        let trips = vec![
            Trip::new("a", "car"),
            Trip::new("a", "walk"),
            Trip::new("b", "pt"),
            Trip::new("b", "pt"),
            Trip::new("ghost", "car"),
        ];
        let zone1 = Partition::new(&[("residence_msr_id", "1")]);
        let both = Partition::new(&[("residence_msr_id", "1,2")]);
        let partitions = vec![Partition::overall(), zone1.clone(), both.clone()];
        let shares = ObservedShares::compute(&persons, &trips, &partitions);

        assert_eq!(shares.get(&zone1, "car"), Some(0.5));
        assert_eq!(shares.get(&zone1, "pt"), Some(0.0));
        assert_eq!(shares.get(&both, "pt"), Some(0.5));
        assert_eq!(shares.get(&Partition::overall(), "car"), Some(0.25));
        assert_eq!(shares.get(&Partition::overall(), "bike"), Some(0.0));
    }

    #[test]
    fn test_mean_absolute_error() {
        let mut observed = ObservedShares::default();
        observed.insert(Partition::overall(), "car", 0.6);
        observed.insert(Partition::overall(), "walk", 0.4);
        let targets = TargetTable::new(
            vec![],
            vec![
                TargetRow::new(Partition::overall(), "car", 0.5),
                TargetRow::new(Partition::overall(), "walk", 0.5),
            ],
        );
        assert!((observed.mean_absolute_error(&targets) - 0.1).abs() < 1e-12);
    }
}
