use super::{AscParameters, CalibrationEngine, CalibrationError, GroupAsc, LearningRate};
use itertools::Itertools;
use modecal_core::{Mode, ObservedShares, Partition, TargetTable};
use std::collections::BTreeMap;

/// iterative ASC calibration. after each trial every free constant moves by
/// `lr * ln(target / observed)`, so under-predicted modes become more
/// attractive and over-predicted modes less so.
///
/// partitions on a column listed in `multi_groups` get their own set of
/// constants; all other partitions (the overall target, car availability, ..)
/// jointly drive the base constants through the mean of their log ratios.
/// the fixed mode is the utility anchor and stays at zero.
pub struct AscCalibrator {
    modes: Vec<Mode>,
    fixed_mode: Mode,
    initial: BTreeMap<Mode, f64>,
    targets: TargetTable,
    multi_groups: Vec<String>,
    learning_rate: LearningRate,
}

impl AscCalibrator {
    pub fn new(
        modes: Vec<Mode>,
        fixed_mode: Mode,
        initial: BTreeMap<Mode, f64>,
        targets: TargetTable,
        multi_groups: Vec<String>,
        learning_rate: LearningRate,
    ) -> Result<AscCalibrator, CalibrationError> {
        if !modes.contains(&fixed_mode) {
            return Err(CalibrationError::InvalidConfiguration(format!(
                "fixed mode '{fixed_mode}' is not one of the calibrated modes"
            )));
        }
        if let Some(mode) = initial
            .keys()
            .find(|m| **m == fixed_mode || !modes.contains(m))
        {
            return Err(CalibrationError::InvalidConfiguration(format!(
                "initial value given for mode '{mode}', which is fixed or not calibrated"
            )));
        }
        if targets.rows.is_empty() {
            return Err(CalibrationError::InvalidConfiguration(String::from(
                "target table is empty",
            )));
        }
        // a group constant is keyed by a single (column, value)
        if let Some(p) = targets.partitions().iter().find(|p| {
            p.columns().count() > 1 && p.columns().any(|c| multi_groups.iter().any(|g| g == c))
        }) {
            return Err(CalibrationError::InvalidConfiguration(format!(
                "target partition '{p}' combines a multi-group column with other columns"
            )));
        }
        Ok(AscCalibrator {
            modes,
            fixed_mode,
            initial,
            targets,
            multi_groups,
            learning_rate,
        })
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    fn free_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(move |m| **m != self.fixed_mode)
    }

    fn is_multi_group(&self, partition: &Partition) -> bool {
        partition
            .columns()
            .any(|c| self.multi_groups.iter().any(|g| g == c))
    }

    /// `ln(target / observed)` or `None` when either share is zero or missing
    fn log_ratio(&self, partition: &Partition, mode: Mode, observed: &ObservedShares) -> Option<f64> {
        let target = self.targets.share(partition, mode.as_str())?;
        let obs = observed.get(partition, mode.as_str())?;
        if target <= 0.0 || obs <= 0.0 {
            return None;
        }
        Some((target / obs).ln())
    }
}

impl CalibrationEngine for AscCalibrator {
    fn initial(&self) -> AscParameters {
        let modes = self
            .modes
            .iter()
            .map(|m| {
                let value = if *m == self.fixed_mode {
                    0.0
                } else {
                    self.initial.get(m).copied().unwrap_or_default()
                };
                (*m, value)
            })
            .collect();
        let groups = self
            .targets
            .partitions()
            .into_iter()
            .filter(|p| self.is_multi_group(p))
            .filter_map(|p| {
                let column = p.columns().exactly_one().ok()?.to_string();
                let value = p.get(&column)?.to_string();
                let modes = self.free_modes().map(|m| (*m, 0.0)).collect();
                Some(GroupAsc {
                    column,
                    value,
                    modes,
                })
            })
            .collect_vec();
        AscParameters { modes, groups }
    }

    fn update(
        &mut self,
        trial_number: usize,
        current: &AscParameters,
        observed: &ObservedShares,
    ) -> Result<AscParameters, CalibrationError> {
        let lr = self.learning_rate.rate(trial_number);
        let base_partitions = self
            .targets
            .partitions()
            .into_iter()
            .filter(|p| !self.is_multi_group(p))
            .collect_vec();

        let mut next = current.clone();
        for mode in self.free_modes() {
            let ratios = base_partitions
                .iter()
                .filter_map(|p| self.log_ratio(p, *mode, observed))
                .collect_vec();
            if ratios.is_empty() {
                log::warn!("trial {trial_number}: no usable target for mode '{mode}', keeping constant");
                continue;
            }
            let step = lr * ratios.iter().sum::<f64>() / ratios.len() as f64;
            *next.modes.entry(*mode).or_default() += step;
        }

        for group in next.groups.iter_mut() {
            let partition = group.partition();
            for (mode, value) in group.modes.iter_mut() {
                if let Some(ratio) = self.log_ratio(&partition, *mode, observed) {
                    *value += lr * ratio;
                }
            }
        }
        log::info!(
            "trial {trial_number}: updated constants with learning rate {lr:.3}: {}",
            next.modes
                .iter()
                .map(|(m, v)| format!("{m}={v:.4}"))
                .join(", ")
        );
        Ok(next)
    }
}
