use super::{SimulationOutput, TrialRunner};
use crate::calibration::{AscParameters, CalibrationError};
use modecal_core::{
    command::run_id, respondent::PersonFilterPolicy, util::fs, ObservedShares, Partition,
    TrialCommand,
};
use std::{path::PathBuf, process::Command};

/// runs trials by launching the external simulator through the shell and
/// reading its output tables. every trial gets its own run directory
/// `<run_root>/runs/<run id>` and params file `<run_root>/params/run<run id>.json`.
pub struct SimulatorTrialRunner {
    pub command: TrialCommand,
    pub run_root: PathBuf,
    pub output: SimulationOutput,
    pub policy: PersonFilterPolicy,
    pub partitions: Vec<Partition>,
}

impl SimulatorTrialRunner {
    pub fn run_dir(&self, trial_number: usize) -> PathBuf {
        self.run_root.join("runs").join(run_id(trial_number))
    }

    pub fn params_file(&self, trial_number: usize) -> PathBuf {
        self.run_root
            .join("params")
            .join(format!("run{}.json", run_id(trial_number)))
    }

    fn write_params(
        &self,
        trial_number: usize,
        params: &AscParameters,
    ) -> Result<PathBuf, CalibrationError> {
        let path = self.params_file(trial_number);
        if let Some(parent) = path.parent() {
            fs::create_dirs(parent)?;
        }
        let json = params.to_json().map_err(|e| {
            CalibrationError::InternalError(format!("failed encoding parameters as JSON: {e}"))
        })?;
        std::fs::write(&path, json).map_err(|e| CalibrationError::WriteError {
            filepath: path.to_string_lossy().to_string(),
            error: e.to_string(),
        })?;
        Ok(path)
    }
}

impl TrialRunner for SimulatorTrialRunner {
    fn run_trial(
        &self,
        trial_number: usize,
        params: &AscParameters,
    ) -> Result<ObservedShares, CalibrationError> {
        let params_path = self.write_params(trial_number, params)?;
        let run_dir = self.run_dir(trial_number);
        fs::create_dirs(&run_dir)?;
        let cmd = self.command.render(
            &params_path.to_string_lossy(),
            &run_dir.to_string_lossy(),
            trial_number,
        );
        log::debug!("trial {trial_number} command: {cmd}");
        run_shell(trial_number, &cmd)?;
        self.output
            .observe(&run_dir, trial_number, self.policy, &self.partitions)
    }
}

fn run_shell(trial_number: usize, cmd: &str) -> Result<(), CalibrationError> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .status()
        .map_err(|e| CalibrationError::LaunchError {
            trial: trial_number,
            error: e.to_string(),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(CalibrationError::SimulationFailed {
            trial: trial_number,
            status: status.to_string(),
            command: cmd.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modecal_core::Mode;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn runner(run_root: &Path, jvm_args: &str) -> SimulatorTrialRunner {
        SimulatorTrialRunner {
            command: TrialCommand {
                jvm_args: jvm_args.to_string(),
                jar: String::from("sim.jar"),
                config: String::from("config.xml"),
                run_args: String::new(),
            },
            run_root: run_root.to_path_buf(),
            output: SimulationOutput::default(),
            policy: PersonFilterPolicy::RegularOnly,
            partitions: vec![Partition::overall()],
        }
    }

    #[test]
    fn test_paths() {
        let r = runner(Path::new("calib"), "");
        assert_eq!(r.run_dir(3), Path::new("calib/runs/003"));
        assert_eq!(r.params_file(12), Path::new("calib/params/run012.json"));
    }

    #[test]
    fn test_failed_simulation_is_an_error() {
        let root = std::env::temp_dir().join(format!("modecal-runner-{}", std::process::id()));
        // the shell exits with status 3 whether or not a java runtime is installed
        let r = runner(&root, "-version >/dev/null 2>&1; exit 3;");
        let params = AscParameters {
            modes: BTreeMap::from([(Mode::Walk, 0.0)]),
            groups: vec![],
        };
        let result = r.run_trial(1, &params);
        assert!(matches!(
            result,
            Err(CalibrationError::SimulationFailed { trial: 1, .. })
        ));
        let written = std::fs::read_to_string(r.params_file(1)).unwrap();
        assert!(written.contains("\"walk\""));
        std::fs::remove_dir_all(root).unwrap();
    }
}
