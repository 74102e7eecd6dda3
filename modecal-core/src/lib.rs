pub mod command;
pub mod mode;
pub mod modecal_error;
pub mod respondent;
pub mod shares;
pub mod target;
pub mod trip;
pub mod util;

pub use command::TrialCommand;
pub use mode::Mode;
pub use modecal_error::ModecalError;
pub use respondent::{PersonFilterPolicy, Respondent};
pub use shares::ObservedShares;
pub use target::{Partition, TargetRow, TargetTable};
pub use trip::Trip;
