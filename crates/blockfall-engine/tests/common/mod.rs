#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};

use blockfall_engine::{Board, BoardConfig, PieceKind, PieceSource, SettledCells, TickOutcome};

/// Plays back a fixed list of kinds, then cycles through the catalog
/// avoiding repeats.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    kinds: VecDeque<PieceKind>,
}

impl ScriptedSource {
    pub fn new(kinds: &[PieceKind]) -> Self {
        Self {
            kinds: kinds.iter().copied().collect(),
        }
    }
}

impl PieceSource for ScriptedSource {
    fn next_kind(&mut self, previous: Option<PieceKind>) -> PieceKind {
        self.kinds.pop_front().unwrap_or_else(|| {
            PieceKind::ALL
                .into_iter()
                .find(|&k| Some(k) != previous)
                .unwrap()
        })
    }
}

pub fn scripted_board(gravity: bool, kinds: &[PieceKind], art: &str) -> Board<ScriptedSource> {
    let settled = SettledCells::from_ascii(art).unwrap();
    Board::with_settled_cells(
        BoardConfig::default().with_gravity(gravity),
        ScriptedSource::new(kinds),
        settled,
    )
}

/// Ticks until the active piece locks and returns the number of ticks taken.
pub fn tick_until_lock<S: PieceSource>(board: &mut Board<S>) -> (usize, TickOutcome) {
    for n in 1..=blockfall_engine::BOARD_HEIGHT as usize + 1 {
        let outcome = board.tick();
        if !outcome.is_moved() {
            return (n, outcome);
        }
    }
    panic!("piece did not lock");
}

pub fn triples<S: PieceSource>(board: &Board<S>) -> BTreeSet<(i32, i32, PieceKind)> {
    board
        .all_cells()
        .into_iter()
        .map(|c| (c.x(), c.y(), c.kind()))
        .collect()
}

pub fn settled_triples<S: PieceSource>(board: &Board<S>) -> BTreeSet<(i32, i32, PieceKind)> {
    board
        .settled_cells()
        .iter()
        .map(|c| (c.x(), c.y(), c.kind()))
        .collect()
}

/// Empty rows used to pad fixtures down to a given row.
pub fn blank_rows(count: usize) -> String {
    "..........\n".repeat(count)
}
