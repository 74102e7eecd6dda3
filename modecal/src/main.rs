use clap::Parser;
use modecal::app::CalibrationApp;

fn main() {
    env_logger::init();
    log::info!("starting calibration at {}", chrono::Local::now().to_rfc3339());
    let args = CalibrationApp::parse();
    if let Err(e) = args.op.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
