mod simulation_output;
mod simulator_trial_runner;
mod trial_runner;

pub use simulation_output::SimulationOutput;
pub use simulator_trial_runner::SimulatorTrialRunner;
pub use trial_runner::TrialRunner;
