use std::time::Duration;

/// Wall-clock budget for one `iterative_deepen` call. The UCI front end derives this from
/// `go wtime/btime`; the training driver derives it from `TrainingConfig::move_time_ms`
/// (125 ms by default, per spec §4.4).
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    pub budget: Duration,
}

impl Clock {
    pub const fn fixed(budget: Duration) -> Self {
        Self { budget }
    }
}
