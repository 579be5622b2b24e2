use std::cmp::Reverse;

use super::*;
use crate::hand::{Shanten, ShantenCache};

pub struct GreedyBuilder;

impl ActorBuilder for GreedyBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Greedy".to_string(),
            args: vec![Arg::int("cache", 1 << 16), Arg::bool("riichi", true)],
        }
    }

    fn create(&self, config: Config) -> Result<Box<dyn Actor>, String> {
        Ok(Box::new(Greedy::from_config(config)))
    }
}

// 向聴数が最小,受け入れ枚数が最大となる打牌を選択
// 鳴きはせず,和了は常に宣言する
pub struct Greedy {
    config: Config,
    cache: ShantenCache,
    riichi: bool,
}

impl Greedy {
    pub fn new() -> Self {
        Self::from_config(GreedyBuilder {}.get_default_config())
    }

    pub fn from_config(config: Config) -> Self {
        let cap = config.arg("cache").and_then(|v| v.as_int()).unwrap_or(0);
        let riichi = config.arg("riichi").and_then(|v| v.as_bool()).unwrap_or(true);
        let cache = if cap > 0 {
            ShantenCache::with_capacity(cap as usize)
        } else {
            ShantenCache::new()
        };
        Self {
            config,
            cache,
            riichi,
        }
    }

    fn select_riichi(&self, acts: &[Action], tenpais: &[Tenpai]) -> Option<Action> {
        acts.iter()
            .filter(|a| a.action_type == ActionType::Riichi)
            .filter_map(|a| {
                let t = a.tiles[0].tile();
                let tp = tenpais.iter().find(|tp| tp.discard_tile == t)?;
                if tp.is_furiten {
                    return None;
                }
                Some((tp.winning_tiles.len(), a))
            })
            .max_by_key(|(n, _)| *n)
            .map(|(_, a)| a.clone())
    }

    fn select_discard(&mut self, stg: &Stage, acts: &[Action]) -> Option<Action> {
        let counts = tile_counts(&stg.players[stg.turn].hand.table());
        let mut best: Option<((Shanten, Reverse<usize>, bool), &Action)> = None;
        for a in acts.iter().filter(|a| a.action_type == ActionType::Discard) {
            let id = a.tiles[0];
            let mut c = counts;
            c[id.tile().index()] -= 1;
            let key = (
                self.cache.shanten(&c),
                Reverse(self.cache.ukeire(&c).len()),
                id.is_red(),
            );
            if best.as_ref().map_or(true, |(k, _)| key < *k) {
                best = Some((key, a));
            }
        }
        best.map(|(_, a)| a.clone())
    }
}

impl Default for Greedy {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Greedy {
    fn request_discard(&mut self, stg: &Stage, acts: &[Action], tenpais: &[Tenpai]) -> Action {
        if let Some(a) = acts.iter().find(|a| a.action_type == ActionType::Kita) {
            return a.clone();
        }
        if self.riichi {
            if let Some(a) = self.select_riichi(acts, tenpais) {
                return a;
            }
        }
        self.select_discard(stg, acts).unwrap_or_else(Action::nop)
    }

    fn request_call_decision(&mut self, _stg: &Stage, _acts: &[Action]) -> Action {
        Action::nop()
    }

    fn request_win_declaration(&mut self, _stg: &Stage, _offer: WinOffer) -> bool {
        true
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Greedy {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::possible_actions::calc_possible_turn_actions;
    use crate::hand::{evaluate_tenpai_discards, ScoreTable};

    fn stage(hand: &str, drawn: &str) -> Stage {
        let mut stg = Stage::new(&Rule::default(), 0, 0, 0, 0, &[25000; 4], Wall::new(0, false));
        let mut used = [false; TILE_ID_MAX];
        stg.players[0].hand = Hand::new(allocate_tile_ids(hand, &mut used).unwrap());
        let d = allocate_tile_ids(drawn, &mut used).unwrap()[0];
        stg.players[0].hand.draw(d);
        stg
    }

    #[test]
    fn discards_the_isolated_honor() {
        let stg = stage("m123456p234s992z1", "s3");
        let acts = calc_possible_turn_actions(&stg, None, ScoreTable::global());
        let mut g = Greedy::from_config(Config {
            name: "Greedy".to_string(),
            args: vec![Arg::int("cache", 0), Arg::bool("riichi", false)],
        });
        let act = g.request_discard(&stg, &acts, &[]);
        assert_eq!(act.action_type, ActionType::Discard);
        assert_eq!(act.tiles[0].tile(), Tile(TZ, WE));
    }

    #[test]
    fn declares_riichi_when_tenpai() {
        let stg = stage("m123456789p23s99", "z1");
        let acts = calc_possible_turn_actions(&stg, None, ScoreTable::global());
        let pl = &stg.players[0];
        let tenpais = evaluate_tenpai_discards(&pl.hand.table(), &pl.furiten);
        let act = Greedy::new().request_discard(&stg, &acts, &tenpais);
        assert_eq!(act.action_type, ActionType::Riichi);
        assert_eq!(act.tiles[0].tile(), Tile(TZ, WE));
    }
}
