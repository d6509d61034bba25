use clap::Parser;

/// CLI surface for `raptor-train` (spec §3 ambient `TrainingConfig`).
#[derive(Parser, Debug, Clone)]
#[command(name = "raptor-train", about = "Self-play training data generator")]
pub struct TrainingConfig {
    /// Number of parallel self-play worker threads.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Transposition table size per worker, in MiB.
    #[arg(long = "hash-mb", default_value_t = 16)]
    pub hash_mb: usize,

    /// Per-move search budget in milliseconds. Defaults to the original's 125ms
    /// (one eighth of a second, spec §4.4).
    #[arg(long = "move-time-ms", default_value_t = 125)]
    pub move_time_ms: u64,

    /// How many completed games between `log::info!` progress counters.
    #[arg(long = "games-per-checkpoint", default_value_t = 100)]
    pub games_per_checkpoint: u64,

    /// Directory the per-worker `training_data<NN>.txt` files and the merged
    /// `training_data.txt` are written to.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: String,
}
