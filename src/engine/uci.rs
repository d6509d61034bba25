use std::io;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use itertools::Itertools;

use crate::board::board::Board;
use crate::board::fen::{self, STARTING_FEN};
use crate::search::game_time::Clock;
use crate::search::{iterative_deepen, SearchThread};

use super::error::SearchError;
use super::options::EngineOptions;
use super::transposition::TranspositionTable;

/// UCI front end (spec §2's "surrounding CLI", explicitly out of scope for the search
/// core itself but required for `raptor` to run end to end — see `SPEC_FULL.md` §2).
/// Shaped after the teacher's `engine::uci::main_loop`: a flat loop over `stdin` lines,
/// dispatched by prefix match rather than a dedicated parser.
pub fn main_loop() -> ! {
    let mut board = fen::from_fen(STARTING_FEN).expect("starting FEN is well-formed");
    let mut options = EngineOptions::default();
    let mut tt = TranspositionTable::new(options.hash_mb);
    let stop = AtomicBool::new(false);
    let mut buffer = String::new();
    let mut hash_history: Vec<u64> = vec![board.zobrist_hash];

    loop {
        buffer.clear();
        if io::stdin().read_line(&mut buffer).unwrap_or(0) == 0 {
            std::process::exit(0);
        }
        let line = buffer.trim();

        if line == "uci" {
            println!("id name raptor");
            println!("id author raptor contributors");
            println!("option name Hash type spin default 16 min 1 max 4096");
            println!("option name Threads type spin default 1 min 1 max 1");
            println!("uciok");
        } else if line == "isready" {
            println!("readyok");
        } else if line == "ucinewgame" {
            board = fen::from_fen(STARTING_FEN).expect("starting FEN is well-formed");
            tt.clear();
            hash_history = vec![board.zobrist_hash];
        } else if let Some(rest) = line.strip_prefix("position") {
            if let Err(e) = apply_position(rest.trim(), &mut board, &mut hash_history) {
                println!("info string {e}");
            }
        } else if let Some(rest) = line.strip_prefix("setoption") {
            apply_setoption(rest.trim(), &mut options, &mut tt);
        } else if let Some(rest) = line.strip_prefix("go") {
            let clock = parse_go(rest.trim());
            let mut th = SearchThread::new(&stop, clock, true, hash_history.clone());
            let (best_move, _) = iterative_deepen(&mut th, &mut tt, &board);
            if let Some(child) = board.make_move(best_move) {
                board = child;
                hash_history.push(board.zobrist_hash);
            }
        } else if line == "stop" || line == "quit" {
            std::process::exit(0);
        } else if line == "d" {
            println!("{}", fen::to_fen(&board));
        } else if !line.is_empty() {
            println!("info string unrecognized command: {line}");
        }
    }
}

fn apply_position(rest: &str, board: &mut Board, hash_history: &mut Vec<u64>) -> Result<(), SearchError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(());
    }

    let moves_at = if tokens[0] == "startpos" {
        *board = fen::from_fen(STARTING_FEN)?;
        1
    } else if tokens[0] == "fen" {
        let end = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
        let fen_str = tokens[1..end].join(" ");
        *board = fen::from_fen(&fen_str)?;
        end
    } else {
        return Err(SearchError::UnknownCommand(rest.to_string()));
    };
    *hash_history = vec![board.zobrist_hash];

    if tokens.get(moves_at) == Some(&"moves") {
        for token in &tokens[moves_at + 1..] {
            let Some(entry) = board.legal_moves().into_iter().find(|e| e.m.to_string() == *token) else {
                return Err(SearchError::UnknownCommand(format!("illegal move in position command: {token}")));
            };
            *board = board.make_move(entry.m).expect("move came from legal_moves");
            hash_history.push(board.zobrist_hash);
        }
    }
    Ok(())
}

fn apply_setoption(rest: &str, options: &mut EngineOptions, tt: &mut TranspositionTable) {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let Some(name_idx) = tokens.iter().position(|&t| t == "name") else { return };
    let Some(value_idx) = tokens.iter().position(|&t| t == "value") else { return };
    let name = tokens[name_idx + 1..value_idx].join(" ");
    let value = tokens[value_idx + 1..].join(" ");

    match name.as_str() {
        "Hash" => {
            if let Ok(mb) = value.parse() {
                options.hash_mb = mb;
                *tt = TranspositionTable::new(mb);
            }
        }
        "Threads" => {
            if let Ok(n) = value.parse() {
                options.threads = n;
            }
        }
        _ => {}
    }
}

/// Derives a per-move time budget from `go` parameters. Only `movetime` and the
/// `wtime`/`btime` clock split are honored; search-driven stopping (`depth`, `nodes`,
/// `infinite`) is out of this spec's scope, so those tokens are accepted but ignored.
fn parse_go(rest: &str) -> Clock {
    let mut wtime = None;
    let mut btime = None;
    let mut winc = 0u64;
    let mut binc = 0u64;
    let mut movetime = None;

    for (key, value) in rest.split_whitespace().tuples::<(_, _)>() {
        let Ok(v) = value.parse::<u64>() else { continue };
        match key {
            "wtime" => wtime = Some(v),
            "btime" => btime = Some(v),
            "winc" => winc = v,
            "binc" => binc = v,
            "movetime" => movetime = Some(v),
            _ => {}
        }
    }

    if let Some(ms) = movetime {
        return Clock::fixed(Duration::from_millis(ms));
    }
    if let Some(time_left) = wtime.or(btime) {
        let inc = if wtime.is_some() { winc } else { binc };
        let budget_ms = (time_left / 20 + inc / 2).max(50);
        return Clock::fixed(Duration::from_millis(budget_ms));
    }
    Clock::fixed(Duration::from_millis(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::to_fen;

    #[test]
    fn applies_startpos_with_trailing_moves() {
        let mut board = fen::from_fen(STARTING_FEN).unwrap();
        let mut hash_history = Vec::new();
        apply_position("startpos moves e2e4 e7e5", &mut board, &mut hash_history).unwrap();
        assert_ne!(to_fen(&board), STARTING_FEN);
        assert_eq!(hash_history.len(), 3);
        assert_eq!(*hash_history.last().unwrap(), board.zobrist_hash);
    }

    #[test]
    fn rejects_an_illegal_move_token() {
        let mut board = fen::from_fen(STARTING_FEN).unwrap();
        let mut hash_history = Vec::new();
        assert!(apply_position("startpos moves e2e5", &mut board, &mut hash_history).is_err());
    }

    #[test]
    fn movetime_takes_priority_over_clock_split() {
        let clock = parse_go("wtime 60000 btime 60000 movetime 250");
        assert_eq!(clock.budget, Duration::from_millis(250));
    }
}
