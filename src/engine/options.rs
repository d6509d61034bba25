/// UCI `setoption` surface (spec §5 "shared configuration... read-only during a run").
#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub hash_mb: usize,
    pub threads: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { hash_mb: 16, threads: 1 }
    }
}
