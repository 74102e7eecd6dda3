mod residence_app;

pub use residence_app::ResidenceApp;
