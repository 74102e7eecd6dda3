//! the command line contract with the external simulator.
use serde::{Deserialize, Serialize};

/// the simulator run id for a trial: the trial number zero-padded to at
/// least three digits.
pub fn run_id(trial_number: usize) -> String {
    format!("{trial_number:03}")
}

/// renders the shell command line that launches one simulation trial.
///
/// # Arguments
///
/// * `jvm_args` - flags passed to the java runtime
/// * `jar` - simulator jar with dependencies
/// * `config` - base scenario configuration
/// * `params_path` - parameter file written for this trial
/// * `run_dir` - output directory of this trial
/// * `trial_number` - sequential trial index, used as the run id
/// * `run_args` - free-form arguments appended at the end
pub fn build_command(
    jvm_args: &str,
    jar: &str,
    config: &str,
    params_path: &str,
    run_dir: &str,
    trial_number: usize,
    run_args: &str,
) -> String {
    format!(
        "java {} -jar {} {} {} --config:controler.runId {} --params {} {}",
        jvm_args,
        jar,
        config,
        run_dir,
        run_id(trial_number),
        params_path,
        run_args
    )
}

/// the parts of the simulator invocation that stay fixed across trials
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrialCommand {
    pub jvm_args: String,
    pub jar: String,
    pub config: String,
    #[serde(default)]
    pub run_args: String,
}

impl TrialCommand {
    pub fn render(&self, params_path: &str, run_dir: &str, trial_number: usize) -> String {
        build_command(
            &self.jvm_args,
            &self.jar,
            &self.config,
            params_path,
            run_dir,
            trial_number,
            &self.run_args,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let cmd = build_command("-Xmx1G", "x.jar", "c.xml", "p.json", "out/", 7, "--foo");
        assert_eq!(
            cmd,
            "java -Xmx1G -jar x.jar c.xml out/ --config:controler.runId 007 --params p.json --foo"
        );
        assert!(cmd.contains("--config:controler.runId 007"));
        assert!(cmd.contains("--params p.json"));
    }

    #[test]
    fn test_run_id_width_is_a_minimum() {
        assert_eq!(run_id(0), "000");
        assert_eq!(run_id(999), "999");
        assert_eq!(run_id(1000), "1000");
    }

    #[test]
    fn test_render() {
        let command = TrialCommand {
            jvm_args: String::from("-Xmx12G"),
            jar: String::from("sim.jar"),
            config: String::from("config.xml"),
            run_args: String::from("--config:controler.lastIteration 400"),
        };
        let cmd = command.render("params/run012.json", "runs/012", 12);
        assert!(cmd.starts_with("java -Xmx12G -jar sim.jar config.xml runs/012"));
        assert!(cmd.contains("--config:controler.runId 012 --params params/run012.json"));
        assert!(cmd.ends_with("--config:controler.lastIteration 400"));
    }
}
