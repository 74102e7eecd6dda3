pub mod app;
pub mod calibration;
pub mod trial;
