//! Session bookkeeping on top of the pure engines: cumulative score, move
//! count, and the active/terminal state machine. The engines themselves
//! stay stateless; a session just feeds each outcome back in as the next
//! input.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::EngineError;
use crate::merge::{Board, Direction, MoveOutcome};
use crate::sliding::Puzzle;

/// Session lifecycle. `Terminal` is only left through an explicit reset,
/// which deals a fresh board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Active,
    Terminal,
}

/// A 2048 session: board, cumulative score, move count. The final score
/// reported to persistence is the sum of all merge deltas.
#[derive(Debug, Clone)]
pub struct MergeGame {
    board: Board,
    score: u64,
    moves: u64,
    status: Status,
}

impl MergeGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        MergeGame {
            board: Board::new_game(rng),
            score: 0,
            moves: 0,
            status: Status::Active,
        }
    }

    /// Play one turn. A shift that does not change the board is not a
    /// turn: no spawn, no move count, no terminal check. After a played
    /// turn the session goes `Terminal` when no further move can change
    /// the board.
    pub fn step<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> MoveOutcome {
        if self.status == Status::Terminal {
            return MoveOutcome {
                board: self.board,
                changed: false,
                score_delta: 0,
            };
        }
        let out = self.board.step(direction, rng);
        if out.changed {
            self.board = out.board;
            self.score += out.score_delta as u64;
            self.moves += 1;
            if !self.board.has_any_move() {
                debug!("merge game over after {} moves, score {}", self.moves, self.score);
                self.status = Status::Terminal;
            }
        }
        out
    }

    /// Discard this game and deal a fresh board.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = MergeGame::new(rng);
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

/// A sliding-puzzle session: puzzle and move count. The final score is
/// the move count; lower is better, the consumer interprets direction.
#[derive(Debug, Clone)]
pub struct SlideGame {
    puzzle: Puzzle,
    moves: u64,
    status: Status,
}

impl SlideGame {
    pub fn new<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Self, EngineError> {
        Ok(SlideGame {
            puzzle: Puzzle::shuffled(dim, rng)?,
            moves: 0,
            status: Status::Active,
        })
    }

    /// Attempt to slide `label`. Only an actual move counts; solving the
    /// puzzle flips the session to `Terminal`.
    pub fn step(&mut self, label: u8) -> Result<bool, EngineError> {
        if self.status == Status::Terminal {
            return Ok(false);
        }
        let out = self.puzzle.slide(label)?;
        if out.changed {
            self.puzzle = out.puzzle;
            self.moves += 1;
            if self.puzzle.is_solved() {
                debug!("puzzle solved in {} moves", self.moves);
                self.status = Status::Terminal;
            }
        }
        Ok(out.changed)
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.puzzle = self.puzzle.shuffle(rng);
        self.moves = 0;
        self.status = Status::Active;
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blocked_merge_move_is_not_a_turn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = MergeGame::new(&mut rng);
        // drive every tile into the left wall, then push left again
        loop {
            let out = game.step(Direction::Left, &mut rng);
            if !out.changed {
                break;
            }
        }
        let moves = game.moves();
        let empties = game.board().count_empty();
        let out = game.step(Direction::Left, &mut rng);
        assert!(!out.changed);
        assert_eq!(out.score_delta, 0);
        assert_eq!(game.moves(), moves);
        assert_eq!(game.board().count_empty(), empties);
    }

    #[test]
    fn merge_session_accumulates_score() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = MergeGame::new(&mut rng);
        let mut expected = 0u64;
        for _ in 0..50 {
            for dir in Direction::ALL {
                let out = game.step(dir, &mut rng);
                expected += out.score_delta as u64;
                if game.status() == Status::Terminal {
                    break;
                }
            }
        }
        assert_eq!(game.score(), expected);
    }

    #[test]
    fn terminal_merge_game_ignores_input_until_reset() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = MergeGame::new(&mut rng);
        // play randomly until the game ends
        while game.status() == Status::Active {
            let dir = Direction::ALL[rng.gen_range(0..4)];
            game.step(dir, &mut rng);
        }
        assert!(!game.board().has_any_move());
        let score = game.score();
        for dir in Direction::ALL {
            let out = game.step(dir, &mut rng);
            assert!(!out.changed);
        }
        assert_eq!(game.score(), score);
        game.reset(&mut rng);
        assert_eq!(game.status(), Status::Active);
        assert_eq!(game.score(), 0);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn slide_session_counts_only_real_moves() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = SlideGame::new(3, &mut rng).unwrap();
        // a tile far from the empty slot cannot move
        let empty = game.puzzle().empty_index();
        let far = game
            .puzzle()
            .cells()
            .iter()
            .enumerate()
            .find(|&(i, &c)| {
                let (er, ec) = (empty / 3, empty % 3);
                let (r, c_) = (i / 3, i % 3);
                c != 0 && er.abs_diff(r) + ec.abs_diff(c_) > 1
            })
            .map(|(_, &c)| c)
            .unwrap();
        assert!(!game.step(far).unwrap());
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn solving_flips_to_terminal() {
        // one move from solved: slide tile 8 back into the corner
        let mut game = SlideGame {
            puzzle: Puzzle::from_cells(3, vec![1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap(),
            moves: 0,
            status: Status::Active,
        };
        assert!(game.step(8).unwrap());
        assert_eq!(game.status(), Status::Terminal);
        assert_eq!(game.moves(), 1);
        // further input is ignored
        assert!(!game.step(8).unwrap());
        assert_eq!(game.moves(), 1);
    }
}
