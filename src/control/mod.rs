// 局の進行と対戦の管理
pub mod common;
pub mod engine;
pub mod game;
pub mod possible_actions;

pub use engine::{RoundEngine, RoundPhase, RoundResult};
pub use game::{calc_rank, GameController, NextRoundInfo};
