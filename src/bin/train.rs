use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;

use raptor::training::{run_training, TrainingConfig};

/// Runs until killed; there is no graceful-shutdown UCI `stop` equivalent for training
/// mode (spec §5: workers poll one shared stop flag, but nothing in this binary ever
/// sets it — matches the original, which is run detached and killed externally).
fn main() {
    env_logger::init();
    let config = TrainingConfig::parse();
    let stop = Arc::new(AtomicBool::new(false));

    if let Err(e) = run_training(&config, stop) {
        log::error!("training failed: {e}");
        std::process::exit(1);
    }
}
