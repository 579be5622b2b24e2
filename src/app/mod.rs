// mainから呼び出すサブコマンド(engine, calc)の動作モード

mod calculator;
mod engine;

pub use calculator::{CalculatorApp, Verify};
pub use engine::EngineApp;
