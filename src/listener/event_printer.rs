use log::{debug, info};

use super::Listener;
use crate::model::*;
use crate::util::misc::vec_to_string;

// [EventPrinter]
// 局の進行をログに出力 (局の開始と終了はinfo, それ以外はdebug)
#[derive(Debug, Default)]
pub struct EventPrinter {}

impl EventPrinter {
    pub fn new() -> Self {
        Self {}
    }

    fn print_score_change(&self, stg: &Stage, delta_scores: &[Point]) {
        for (s, &delta) in delta_scores.iter().enumerate() {
            let new = stg.players[s].score;
            let old = new - delta;
            info!("player {}: {} -> {} ({:+})", s, old, new, delta);
        }
    }
}

impl Listener for EventPrinter {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        use Event::*;
        let pl = &stg.players[stg.turn];
        match event {
            Begin(e) => {
                info!("(step:{}) Begin scores: {:?}", stg.step, e.scores);
            }
            New(e) => {
                info!(
                    "(step:{}) New round: {}, dealer: {}, honba: {}, riichi_sticks: {}",
                    stg.step, e.round, e.dealer, e.honba, e.riichi_sticks
                );
                debug!("{}", stg);
            }
            Deal(e) => {
                debug!(
                    "(step:{}) Deal seat: {}, tile: {}{}",
                    stg.step,
                    e.seat,
                    e.tile,
                    if e.is_rinshan { " (rinshan)" } else { "" }
                );
            }
            Discard(e) => {
                debug!(
                    "(step:{}) Discard seat: {}, tile: {} {}",
                    stg.step,
                    e.seat,
                    e.tile,
                    if e.is_riichi { "riichi" } else { "" }
                );
                debug!("{}", pl);
            }
            Riichi(e) => {
                debug!("(step:{}) Riichi seat: {}, double: {}", stg.step, e.seat, e.is_double);
            }
            Meld(e) => {
                debug!("(step:{}) Meld seat: {}, {:?} [{}]", stg.step, e.seat, e.meld.meld_type, e.meld);
            }
            Dora(e) => {
                debug!("(step:{}) Dora {}", stg.step, e.tile);
            }
            Win(e) => {
                info!("(step:{}) Win ura_dora: {}", stg.step, vec_to_string(&e.ura_doras));
                for ctx in &e.contexts {
                    let sc = &ctx.score_context;
                    info!(
                        "seat: {}, {}符 {}飜 {} {}点 {:?}",
                        ctx.seat, sc.fu, sc.fan, sc.title, sc.score, sc.yakus
                    );
                }
                self.print_score_change(stg, &e.delta_scores);
            }
            Draw(e) => {
                info!("(step:{}) Draw {}", stg.step, e.draw_type);
                self.print_score_change(stg, &e.delta_scores);
            }
            End(e) => {
                info!("(step:{}) End scores: {:?}", stg.step, e.scores);
            }
        }
    }
}
