use std::fs::File;
use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{error, info};
use rand::prelude::*;

use crate::actor::{create_actor, Actor};
use crate::control::{calc_rank, GameController};
use crate::listener::{EventBus, EventPrinter, EventRecorder};
use crate::model::*;

// [EngineApp]
// Actor同士の対戦シミュレーション
#[derive(Debug, Clone)]
pub struct EngineApp {
    pub seed: u64,
    pub rule: Rule,
    pub n_game: u32,   // 0: 1局だけ実行してイベントを表示
    pub n_thread: u32, // 複数対戦時の並列数
    pub quiet: bool,
    pub write: Option<String>, // イベントをjsonで書き出すファイル
    pub names: Vec<String>,    // actor names (座席順)
}

impl EngineApp {
    pub fn run(mut self) -> anyhow::Result<()> {
        let n_seat = self.rule.n_seat();
        if self.names.len() < n_seat {
            self.names.resize(n_seat, "Nop".to_string());
        }
        self.names.truncate(n_seat);

        if self.seed == 0 {
            self.seed = unixtime_now();
            info!(
                "Random seed is not specified. Unix timestamp '{}' is used as seed.",
                self.seed
            );
        }
        println!("seed: {}", self.seed);

        let actors = self.create_actors()?;
        for (s, a) in actors.iter().enumerate() {
            println!("actor{}: {:?}", s, a);
        }
        println!();

        let start = Instant::now();
        if self.n_game == 0 {
            self.run_single_game(actors)?;
        } else {
            self.run_multiple_game()?;
        }
        println!(
            "total elapsed time: {:8.3}sec",
            start.elapsed().as_secs_f32()
        );
        Ok(())
    }

    fn create_actors(&self) -> anyhow::Result<Vec<Box<dyn Actor>>> {
        self.names
            .iter()
            .map(|n| create_actor(n).map_err(|e| anyhow!(e)))
            .collect()
    }

    fn run_single_game(&self, actors: Vec<Box<dyn Actor>>) -> anyhow::Result<()> {
        let mut listener = EventBus::new();
        if !self.quiet {
            listener.push(Box::new(EventPrinter::new()));
        }
        let recorder = EventRecorder::new();
        let log = recorder.log();
        if self.write.is_some() {
            listener.push(Box::new(recorder));
        }

        let mut game = GameController::new(self.rule.clone(), self.seed, actors, listener)?;
        let scores = game.run()?;
        for (s, score) in scores.iter().enumerate() {
            println!("ac{}: {:6} ({})", s, score, calc_rank(&scores, s) + 1);
        }

        if let Some(path) = &self.write {
            let events = log.lock().map_err(|e| anyhow!("{}", e))?;
            let mut f = File::create(path).with_context(|| format!("cannot create {}", path))?;
            writeln!(f, "{}", serde_json::to_string_pretty(&*events)?)?;
            info!("{} events are written to {}", events.len(), path);
        }
        Ok(())
    }

    // 席順をシャッフルしながら複数の対戦を並列に実行し,Actor毎の平均順位と平均収支を表示
    fn run_multiple_game(&self) -> anyhow::Result<()> {
        let n_seat = self.rule.n_seat();
        let n_thread = self.n_thread.max(1);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (tx, rx) = mpsc::channel();
        let mut sum_delta_scores = vec![0; n_seat];
        let mut sum_ranks = vec![0; n_seat];

        let mut n_game = 0;
        let mut n_running = 0;
        let mut n_game_end = 0;
        while n_game_end < self.n_game {
            while n_game < self.n_game && n_running < n_thread {
                n_game += 1;
                n_running += 1;

                let seed = rng.next_u64();
                let mut shuffle_table: Vec<usize> = (0..n_seat).collect();
                shuffle_table.shuffle(&mut rng);
                let mut actors = vec![];
                for &i in &shuffle_table {
                    actors.push(create_actor(&self.names[i]).map_err(|e| anyhow!(e))?);
                }

                let rule = self.rule.clone();
                let tx = tx.clone();
                thread::spawn(move || {
                    let start = Instant::now();
                    let res = GameController::new(rule, seed, actors, EventBus::new())
                        .and_then(|mut game| game.run());
                    // 受信側が先に終了した場合は結果を捨てる
                    let _ = tx.send((seed, shuffle_table, res, start.elapsed()));
                });
            }

            let (seed, shuffle, res, elapsed) = rx.recv()?;
            n_running -= 1;
            n_game_end += 1;
            let scores = match res {
                Ok(scores) => scores,
                Err(e) => {
                    error!("game {} aborted: {}", seed, e);
                    continue;
                }
            };

            print!("{:5},{:6}ms,{:20}", n_game_end, millis(elapsed), seed);
            for s in 0..n_seat {
                let rank = calc_rank(&scores, s) + 1;
                let i = shuffle[s];
                sum_delta_scores[i] += scores[s] - self.rule.initial_score;
                sum_ranks[i] += rank;
                print!(", ac{}:{:6}({})", i, scores[s], rank);
            }
            println!();
        }

        for i in 0..n_seat {
            println!(
                "ac{} avg_rank: {:.2}, avg_delta_score: {:6}",
                i,
                sum_ranks[i] as f32 / self.n_game as f32,
                sum_delta_scores[i] / self.n_game as Score,
            );
        }
        Ok(())
    }
}

fn unixtime_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

fn millis(d: Duration) -> u128 {
    d.as_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(n_game: u32, names: &[&str]) -> EngineApp {
        EngineApp {
            seed: 11,
            rule: Rule {
                round: 1,
                ..Default::default()
            },
            n_game,
            n_thread: 2,
            quiet: true,
            write: None,
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn missing_names_are_filled_with_nop() {
        let a = app(0, &["Greedy"]);
        assert!(a.clone().run().is_ok());
    }

    #[test]
    fn multiple_games() {
        let a = app(3, &["Greedy", "RandomDiscard(1)", "Nop", "Greedy(0,false)"]);
        assert!(a.run().is_ok());
    }

    #[test]
    fn unknown_actor_is_an_error() {
        let a = app(0, &["Nobody"]);
        assert!(a.run().is_err());
    }
}
