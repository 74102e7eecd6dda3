//! derives reference mode shares by residence group for the grouped calibrator.
use clap::Parser;
use modecal_residence::app::ResidenceApp;

fn main() {
    env_logger::init();
    let args = ResidenceApp::parse();
    if let Err(e) = args.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
