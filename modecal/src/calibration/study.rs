use super::{AscParameters, CalibrationEngine, CalibrationError, ReportFormat, TrialRecord};
use crate::trial::TrialRunner;
use kdam::tqdm;
use modecal_core::TargetTable;
use std::path::Path;

/// the calibration loop. trials run one after another: the runner simulates
/// the current parameters, the engine proposes the next parameters from the
/// observed shares. the trial history is append-only.
pub struct Study {
    pub name: String,
    history: Vec<TrialRecord>,
    pending: Option<AscParameters>,
}

impl Study {
    pub fn new(name: &str) -> Study {
        Study {
            name: name.to_string(),
            history: vec![],
            pending: None,
        }
    }

    pub fn history(&self) -> &[TrialRecord] {
        &self.history
    }

    /// trial with the smallest mean absolute share error
    pub fn best(&self) -> Option<&TrialRecord> {
        self.history
            .iter()
            .min_by(|a, b| a.mean_absolute_error.total_cmp(&b.mean_absolute_error))
    }

    /// runs `n_trials` more trials. numbering continues after any trials
    /// already recorded by this study.
    pub fn optimize<E, R>(
        &mut self,
        engine: &mut E,
        runner: &R,
        targets: &TargetTable,
        n_trials: usize,
    ) -> Result<(), CalibrationError>
    where
        E: CalibrationEngine,
        R: TrialRunner,
    {
        let first = self.history.len();
        let mut params = self.pending.take().unwrap_or_else(|| engine.initial());
        let trial_iter = tqdm!(first..first + n_trials, desc = format!("study {}", self.name));
        for trial_number in trial_iter {
            let observed = runner.run_trial(trial_number, &params)?;
            let mean_absolute_error = observed.mean_absolute_error(targets);
            log::info!(
                "trial {trial_number} finished with mean absolute share error {mean_absolute_error:.5}"
            );
            let next = engine.update(trial_number, &params, &observed)?;
            self.history.push(TrialRecord {
                trial_number,
                params,
                observed,
                mean_absolute_error,
            });
            params = next;
        }
        eprintln!();
        self.pending = Some(params);
        Ok(())
    }

    pub fn write_report<P: AsRef<Path>>(
        &self,
        path: P,
        targets: &TargetTable,
        format: ReportFormat,
    ) -> Result<(), CalibrationError> {
        super::report::write_report(path.as_ref(), &self.history, targets, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{AscCalibrator, LearningRate};
    use modecal_core::{Mode, ObservedShares, Partition, TargetRow};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// a stand-in simulator where the car share follows a logit of the car
    /// constant against a walk constant of zero.
    struct LogitRunner {
        calls: RefCell<Vec<usize>>,
    }

    impl TrialRunner for LogitRunner {
        fn run_trial(
            &self,
            trial_number: usize,
            params: &AscParameters,
        ) -> Result<ObservedShares, CalibrationError> {
            self.calls.borrow_mut().push(trial_number);
            let car = params.mode(Mode::Car).unwrap_or_default();
            let p_car = car.exp() / (car.exp() + 1.0);
            let mut observed = ObservedShares::default();
            observed.insert(Partition::overall(), "car", p_car);
            observed.insert(Partition::overall(), "walk", 1.0 - p_car);
            Ok(observed)
        }
    }

    #[test]
    fn test_study_converges_and_continues_numbering() {
        let targets = TargetTable::new(
            vec![],
            vec![
                TargetRow::new(Partition::overall(), "car", 0.7),
                TargetRow::new(Partition::overall(), "walk", 0.3),
            ],
        );
        let mut engine = AscCalibrator::new(
            vec![Mode::Walk, Mode::Car],
            Mode::Walk,
            BTreeMap::new(),
            targets.clone(),
            vec![],
            LearningRate::Constant { rate: 1.0 },
        )
        .unwrap();
        let runner = LogitRunner {
            calls: RefCell::new(vec![]),
        };
        let mut study = Study::new("test");
        study.optimize(&mut engine, &runner, &targets, 15).unwrap();
        study.optimize(&mut engine, &runner, &targets, 5).unwrap();

        assert_eq!(study.history().len(), 20);
        assert_eq!(runner.calls.borrow().first(), Some(&0));
        assert_eq!(runner.calls.borrow().last(), Some(&19));
        let first = &study.history()[0];
        let best = study.best().unwrap();
        assert!(best.mean_absolute_error < first.mean_absolute_error);
        assert!(best.mean_absolute_error < 0.01);
        assert_eq!(study.history()[19].params.mode(Mode::Walk), Some(0.0));
    }
}
