use crate::calibration::CalibrationError;
use modecal_core::{
    command::run_id,
    respondent::{filter_persons, PersonFilterPolicy},
    trip::filter_modes,
    ObservedShares, Partition, Respondent, Trip,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// naming and format of the simulator output tables read after each trial.
/// files are expected at `<run_dir>/<run id>.<suffix>`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    #[serde(default = "default_persons_suffix")]
    pub persons_suffix: String,
    #[serde(default = "default_trips_suffix")]
    pub trips_suffix: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_persons_suffix() -> String {
    String::from("output_persons.csv.gz")
}

fn default_trips_suffix() -> String {
    String::from("output_trips.csv.gz")
}

fn default_delimiter() -> String {
    String::from(";")
}

impl Default for SimulationOutput {
    fn default() -> Self {
        SimulationOutput {
            persons_suffix: default_persons_suffix(),
            trips_suffix: default_trips_suffix(),
            delimiter: default_delimiter(),
        }
    }
}

impl SimulationOutput {
    pub fn persons_file(&self, run_dir: &Path, trial_number: usize) -> PathBuf {
        run_dir.join(format!("{}.{}", run_id(trial_number), self.persons_suffix))
    }

    pub fn trips_file(&self, run_dir: &Path, trial_number: usize) -> PathBuf {
        run_dir.join(format!("{}.{}", run_id(trial_number), self.trips_suffix))
    }

    fn delimiter_byte(&self) -> Result<u8, CalibrationError> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(CalibrationError::InvalidConfiguration(format!(
                "output delimiter must be a single byte, found '{}'",
                self.delimiter
            ))),
        }
    }

    /// reads the persons and trips of a finished trial, applies the person
    /// and mode filters and measures shares for every target partition
    pub fn observe(
        &self,
        run_dir: &Path,
        trial_number: usize,
        policy: PersonFilterPolicy,
        partitions: &[Partition],
    ) -> Result<ObservedShares, CalibrationError> {
        let delimiter = self.delimiter_byte()?;
        let persons = Respondent::read_file(self.persons_file(run_dir, trial_number), delimiter)?;
        let trips = Trip::read_file(self.trips_file(run_dir, trial_number), delimiter)?;
        let persons = filter_persons(&persons, policy)?;
        let trips = filter_modes(&trips);
        log::info!(
            "trial {trial_number}: {} regular persons, {} calibrated trips",
            persons.len(),
            trips.len()
        );
        Ok(ObservedShares::compute(&persons, &trips, partitions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_observe_plain_files() {
        let run_dir = std::env::temp_dir().join(format!("modecal-output-{}", std::process::id()));
        std::fs::create_dir_all(&run_dir).unwrap();
        let output = SimulationOutput {
            persons_suffix: String::from("output_persons.csv"),
            trips_suffix: String::from("output_trips.csv"),
            delimiter: String::from(";"),
        };
        let mut persons = std::fs::File::create(output.persons_file(&run_dir, 4)).unwrap();
        writeln!(persons, "person;subpopulation;car_available;residence_msr_id").unwrap();
        writeln!(persons, "a;regular;1;1.0").unwrap();
        writeln!(persons, "b;regular;0;2").unwrap();
        writeln!(persons, "c;freight;1;2").unwrap();
        let mut trips = std::fs::File::create(output.trips_file(&run_dir, 4)).unwrap();
        writeln!(trips, "person;trip_number;main_mode").unwrap();
        writeln!(trips, "a;1;car").unwrap();
        writeln!(trips, "a;2;walk_main").unwrap();
        writeln!(trips, "b;1;pt").unwrap();
        writeln!(trips, "b;2;walk").unwrap();
        writeln!(trips, "c;1;car").unwrap();
        writeln!(trips, "c;2;freight").unwrap();

        let no_car = Partition::new(&[("car_available", "0")]);
        let zone = Partition::new(&[("residence_msr_id", "1")]);
        let partitions = vec![Partition::overall(), no_car.clone(), zone.clone()];
        let shares = output
            .observe(&run_dir, 4, PersonFilterPolicy::RegularWithGroupKeys, &partitions)
            .unwrap();

        assert_eq!(shares.get(&Partition::overall(), "car"), Some(0.25));
        assert_eq!(shares.get(&Partition::overall(), "walk"), Some(0.5));
        assert_eq!(shares.get(&no_car, "pt"), Some(0.5));
        assert_eq!(shares.get(&zone, "walk"), Some(0.5));
        std::fs::remove_dir_all(run_dir).unwrap();
    }

    #[test]
    fn test_output_file_names() {
        let output = SimulationOutput::default();
        let path = output.trips_file(Path::new("runs/007"), 7);
        assert_eq!(path, Path::new("runs/007/007.output_trips.csv.gz"));
    }
}
