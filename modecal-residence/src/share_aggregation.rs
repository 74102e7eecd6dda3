//! weighted mode shares per residence group.
use crate::{ResidenceError, ResidenceGroup, SurveyRow};
use itertools::Itertools;
use modecal_core::{respondent::RESIDENCE_COLUMN, Partition, TargetRow, TargetTable};
use std::collections::BTreeMap;

/// computes, for each group and each mode observed in it,
/// `sum(weight of group rows with mode) / sum(weight of group rows)`.
///
/// rows come out in group list order and sorted by mode within a group, keyed
/// by the group key in the `residence_msr_id` column, so the result is a
/// target table the grouped calibrator reads back directly.
pub fn group_shares(
    rows: &[SurveyRow],
    groups: &[ResidenceGroup],
) -> Result<TargetTable, ResidenceError> {
    let mut out_rows = vec![];
    for group in groups.iter() {
        let mut mode_weights: BTreeMap<&str, f64> = BTreeMap::new();
        let mut total = 0.0;
        for row in rows.iter().filter(|r| group.contains(&r.residence_msr_id)) {
            *mode_weights.entry(row.main_mode.as_str()).or_default() += row.weight;
            total += row.weight;
        }
        if total <= 0.0 {
            return Err(ResidenceError::EmptyGroup(group.key()));
        }
        let key = group.key();
        let partition = Partition::new(&[(RESIDENCE_COLUMN, key.as_str())]);
        for (mode, weight) in mode_weights.into_iter() {
            out_rows.push(TargetRow::new(partition.clone(), mode, weight / total));
        }
    }
    Ok(TargetTable::new(
        vec![String::from(RESIDENCE_COLUMN)],
        out_rows,
    ))
}

/// distinct residence ids of the survey, in numeric order
pub fn zones(rows: &[SurveyRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.residence_msr_id.clone())
        .unique()
        .sorted_by_key(|id| (id.parse::<i64>().unwrap_or(i64::MAX), id.clone()))
        .collect_vec()
}

/// per-zone share vectors over all observed modes. returns the zone ids, the
/// mode labels (the vector dimensions) and one share vector per zone.
pub fn zone_share_vectors(
    rows: &[SurveyRow],
) -> Result<(Vec<String>, Vec<String>, Vec<Vec<f64>>), ResidenceError> {
    let zone_ids = zones(rows);
    let modes = rows
        .iter()
        .map(|r| r.main_mode.clone())
        .unique()
        .sorted()
        .collect_vec();
    let singles = zone_ids
        .iter()
        .map(|z| ResidenceGroup::new(&[z.as_str()]))
        .collect::<Result<Vec<_>, _>>()?;
    let table = group_shares(rows, &singles)?;
    let vectors = zone_ids
        .iter()
        .map(|z| {
            let partition = Partition::new(&[(RESIDENCE_COLUMN, z.as_str())]);
            modes
                .iter()
                .map(|m| table.share(&partition, m).unwrap_or_default())
                .collect_vec()
        })
        .collect_vec();
    Ok((zone_ids, modes, vectors))
}
