pub mod app;
pub mod cluster;
pub mod residence_error;
pub mod residence_group;
pub mod share_aggregation;
pub mod survey_row;

pub use residence_error::ResidenceError;
pub use residence_group::ResidenceGroup;
pub use survey_row::SurveyRow;
