use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::board::board::Board;
use crate::board::fen::to_fen;
use crate::engine::transposition::TranspositionTable;
use crate::moves::moves::Move;
use crate::search::{iterative_deepen, SearchThread, DRAW, GUARANTEE_CHECKMATE};
use crate::search::game_time::Clock;
use crate::types::pieces::Color;

use super::config::TrainingConfig;

/// The merge copy buffer size, matching `original_source/training.c`'s
/// `stopTrainingThread` exactly (`char data[2048]`).
const MERGE_CHUNK_BYTES: usize = 2048;

/// Seeds Zobrist-style (see `board::zobrist::SplitMix64`) but kept local: the training
/// driver's RNG has nothing to do with position hashing and doesn't belong in that module.
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

fn is_checkmate(score: i32) -> bool {
    score.abs() >= GUARANTEE_CHECKMATE
}

fn is_stalemate(score: i32, best_move: Move) -> bool {
    score == DRAW && best_move == Move::NULL
}

/// Plays 5-10 random (but legal) plies from the starting position, resolved from
/// `original_source/training.c`'s `playRandomMoves`: `random64BitNumber(&seed) % 6 + 5`
/// plies, sampling a pseudo-legal candidate and swap-shrinking the window past illegal
/// picks rather than filtering legality up front.
fn play_random_opening(board: &mut Board, rng: &mut Rng) {
    let num_moves = (rng.next() % 6 + 5) as usize;
    for _ in 0..num_moves {
        let mut candidates: Vec<Move> = board.pseudo_legal_moves().into_iter().map(|e| e.m).collect();
        let mut window = candidates.len();
        let mut played = false;
        while window > 0 {
            let idx = (rng.next() as usize) % window;
            if let Some(child) = board.make_move(candidates[idx]) {
                *board = child;
                played = true;
                break;
            }
            window -= 1;
            candidates.swap(idx, window);
        }
        if !played {
            break;
        }
    }
}

/// Plays one game to completion from `board`, recording labeled positions as it goes.
/// Mirrors `original_source/training.c`'s `playGame` precisely: the current position is
/// scored and (conditionally) recorded using the *not-yet-played* best move's score
/// before the end-of-game check runs, so the move that actually delivers mate is never
/// itself pushed onto the board.
fn play_game(board: &mut Board, tt: &mut TranspositionTable, move_budget: Duration, records: &mut Vec<(String, i32)>) -> f32 {
    // Real threefold repetition over the actual played-move sequence, not the search's
    // twofold shortcut: this is the game itself ending, not a node being pruned.
    let mut hash_history = vec![board.zobrist_hash];

    loop {
        let stop = AtomicBool::new(false);
        let mut th = SearchThread::new(&stop, Clock::fixed(move_budget), false, hash_history.clone());
        let (best_move, score) = iterative_deepen(&mut th, tt, board);

        if !board.in_check(board.stm) && !is_checkmate(score) && !board.insufficient_material() {
            // `score` is relative to the side to move; recorded labels are white-relative
            // (`original_source/training.c`'s `createGameData`: `board->sideToMove ? -score : score`).
            let rel_score = if board.stm == Color::Black { -score } else { score };
            records.push((to_fen(board), rel_score));
        }

        let threefold = hash_history.iter().filter(|&&h| h == board.zobrist_hash).count() >= 3;
        if is_checkmate(score) || is_stalemate(score, best_move) || board.is_draw() || threefold {
            return if is_checkmate(score) {
                let winner = if score > 0 { board.stm } else { !board.stm };
                if winner == Color::White { 1.0 } else { 0.0 }
            } else {
                0.5
            };
        }

        *board = board.make_move(best_move).expect("iterative_deepen only returns legal moves");
        hash_history.push(board.zobrist_hash);
    }
}

/// One self-play worker: owns its transposition table, RNG stream, and output file.
/// `original_source/training.c` keeps a fixed `TrainingThread[32]` array; spec §9 flags
/// that ceiling for redesign, so this crate sizes a `Vec<TrainingWorker>` from
/// `TrainingConfig::threads` instead (see `run_training`).
pub struct TrainingWorker;

impl TrainingWorker {
    #[allow(clippy::too_many_arguments)]
    fn spawn(
        id: usize,
        seed: u64,
        hash_mb: usize,
        move_budget: Duration,
        games_per_checkpoint: u64,
        out_dir: PathBuf,
        stop: Arc<AtomicBool>,
    ) -> JoinHandle<io::Result<()>> {
        thread::spawn(move || {
            let mut rng = Rng::new(seed);
            let mut tt = TranspositionTable::new(hash_mb);
            let path = out_dir.join(format!("training_data{id:02}.txt"));
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut writer = io::BufWriter::new(file);
            let mut games_played: u64 = 0;

            while !stop.load(Ordering::Relaxed) {
                let mut board = Board::default();
                play_random_opening(&mut board, &mut rng);

                let mut records = Vec::new();
                let outcome = play_game(&mut board, &mut tt, move_budget, &mut records);
                for (fen, score) in &records {
                    writeln!(writer, "{fen} | {score} | {outcome:.1}")?;
                }
                writer.flush()?;

                games_played += 1;
                if games_played % games_per_checkpoint == 0 {
                    log::info!("worker {id}: {games_played} games completed");
                }
            }

            log::info!("worker {id}: stopping after {games_played} games");
            Ok(())
        })
    }
}

/// Copies each worker's `training_data<NN>.txt` into the shared `training_data.txt` in
/// fixed chunks, matching `original_source/training.c`'s merge buffer size exactly, then
/// deletes the per-worker file (`stopTrainingThread`'s `remove(data)`).
fn merge_training_files(out_dir: &Path, threads: usize) -> io::Result<()> {
    let merged_path = out_dir.join("training_data.txt");
    let mut merged = OpenOptions::new().create(true).append(true).open(merged_path)?;
    let mut buf = [0u8; MERGE_CHUNK_BYTES];

    for id in 0..threads {
        let path = out_dir.join(format!("training_data{id:02}.txt"));
        let mut worker_file = File::open(&path)?;
        loop {
            let n = worker_file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            merged.write_all(&buf[..n])?;
        }
        drop(worker_file);
        std::fs::remove_file(&path)?;
    }
    Ok(())
}

/// Drives self-play worker threads until `stop` is set, then merges their output files.
/// Coordination is the single `Arc<AtomicBool>` described in spec §5 — workers poll it
/// only at game boundaries, never mid-search.
pub fn run_training(config: &TrainingConfig, stop: Arc<AtomicBool>) -> io::Result<()> {
    let out_dir = PathBuf::from(&config.out_dir);
    std::fs::create_dir_all(&out_dir)?;
    log::info!("training started with {} threads", config.threads);

    let move_budget = Duration::from_millis(config.move_time_ms);
    let mut seeder = Rng::new(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos() as u64);

    let handles: Vec<_> = (0..config.threads)
        .map(|id| {
            let worker_seed = seeder.next();
            TrainingWorker::spawn(
                id,
                worker_seed,
                config.hash_mb,
                move_budget,
                config.games_per_checkpoint,
                out_dir.clone(),
                Arc::clone(&stop),
            )
        })
        .collect();

    for handle in handles {
        handle.join().expect("training worker panicked")?;
    }

    merge_training_files(&out_dir, config.threads)?;
    log::info!("training stopped, merged output into {}", out_dir.join("training_data.txt").display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::from_fen;

    #[test]
    fn mate_assigns_winner_outcome() {
        let mut board = from_fen("4k3/4Q3/4K3/8/8/8/8/8 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut records = Vec::new();
        let outcome = play_game(&mut board, &mut tt, Duration::from_millis(200), &mut records);
        assert_eq!(outcome, 1.0);
        // The mating position itself is excluded from recording (a forced mate score
        // isn't a useful training label), so a one-move game yields no recorded rows.
        assert!(records.is_empty());
    }

    #[test]
    fn stalemate_assigns_drawn_outcome() {
        let mut board = from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut records = Vec::new();
        let outcome = play_game(&mut board, &mut tt, Duration::from_millis(200), &mut records);
        assert_eq!(outcome, 0.5);
    }

    #[test]
    fn recorded_score_is_white_relative_when_black_to_move() {
        // White is up a rook and to move; recording this position as White-to-move first
        // confirms the sign is untouched, then one further ply flips `board.stm` to Black
        // and the recorded score for that position must flip sign to stay white-relative.
        let mut board = from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut records = Vec::new();
        play_game(&mut board, &mut tt, Duration::from_millis(50), &mut records);

        let mut board = from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut black_to_move_records = Vec::new();
        play_game(&mut board, &mut tt, Duration::from_millis(50), &mut black_to_move_records);

        let (_, white_score) = records[0];
        let (_, black_to_move_score) = black_to_move_records[0];
        assert_eq!(white_score.signum(), black_to_move_score.signum());
    }

    #[test]
    fn random_opening_produces_a_legal_reachable_position() {
        let mut board = Board::default();
        let mut rng = Rng::new(0xC0FF_EE);
        play_random_opening(&mut board, &mut rng);
        assert!(board.full_moves >= 3);
    }
}
