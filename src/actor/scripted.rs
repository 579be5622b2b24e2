use std::collections::VecDeque;

use super::*;

pub struct ScriptedBuilder;

impl ActorBuilder for ScriptedBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Scripted".to_string(),
            args: vec![
                Arg::string("turns", ""),
                Arg::string("calls", ""),
                Arg::bool("win", true),
            ],
        }
    }

    fn create(&self, config: Config) -> Result<Box<dyn Actor>, String> {
        Ok(Box::new(Scripted::from_config(config)?))
    }
}

// ツモ番の操作の予定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    Tsumogiri,
    Discard(Tile),
    Riichi(Tile),
    Ankan(Tile),
    Kakan(Tile),
    Kita,
    Kyushukyuhai,
}

// 予定された操作を順番に実行する (牌譜の再生やテスト用)
// turns: "m1 riichi:p3 - ankan:z5 kakan:m2 kita kyushu" ("-"はツモ切り)
// calls: "pon:z5 chi:m2 kan:p1" (チーは小さい方の手牌の牌種) 鳴けない間は保留される
// 予定が尽きた後はツモ切り・スキップ
pub struct Scripted {
    config: Config,
    turns: VecDeque<TurnStep>,
    calls: VecDeque<(ActionType, Tile)>,
    declare_win: bool,
}

impl Scripted {
    pub fn new(turns: &str, calls: &str, declare_win: bool) -> Result<Self, String> {
        Self::from_config(Config {
            name: "Scripted".to_string(),
            args: vec![
                Arg::string("turns", turns),
                Arg::string("calls", calls),
                Arg::bool("win", declare_win),
            ],
        })
    }

    pub fn from_config(config: Config) -> Result<Self, String> {
        let turns = parse_turns(config.arg("turns").and_then(|v| v.as_str()).unwrap_or(""))?;
        let calls = parse_calls(config.arg("calls").and_then(|v| v.as_str()).unwrap_or(""))?;
        let declare_win = config.arg("win").and_then(|v| v.as_bool()).unwrap_or(true);
        Ok(Self {
            config,
            turns,
            calls,
            declare_win,
        })
    }

    pub fn remaining_turns(&self) -> usize {
        self.turns.len()
    }
}

fn tile(s: &str) -> Result<Tile, String> {
    Tile::from_symbol(s)
}

fn parse_turns(exp: &str) -> Result<VecDeque<TurnStep>, String> {
    exp.split_whitespace()
        .map(|tok| {
            Ok(match tok.split_once(':') {
                Some(("riichi", t)) => TurnStep::Riichi(tile(t)?),
                Some(("ankan", t)) => TurnStep::Ankan(tile(t)?),
                Some(("kakan", t)) => TurnStep::Kakan(tile(t)?),
                Some((k, _)) => return Err(format!("unknown turn step: {}", k)),
                None => match tok {
                    "-" => TurnStep::Tsumogiri,
                    "kita" => TurnStep::Kita,
                    "kyushu" => TurnStep::Kyushukyuhai,
                    t => TurnStep::Discard(tile(t)?),
                },
            })
        })
        .collect()
}

fn parse_calls(exp: &str) -> Result<VecDeque<(ActionType, Tile)>, String> {
    exp.split_whitespace()
        .map(|tok| {
            let (k, t) = tok
                .split_once(':')
                .ok_or_else(|| format!("invalid call step: {}", tok))?;
            let tp = match k {
                "chi" => ActionType::Chi,
                "pon" => ActionType::Pon,
                "kan" => ActionType::Minkan,
                _ => return Err(format!("unknown call step: {}", k)),
            };
            Ok((tp, tile(t)?))
        })
        .collect()
}

impl Actor for Scripted {
    fn request_discard(&mut self, stg: &Stage, acts: &[Action], _tenpais: &[Tenpai]) -> Action {
        let h = &stg.players[stg.turn].hand;
        let step = match self.turns.pop_front() {
            Some(s) => s,
            None => return tsumogiri(stg, acts),
        };
        let act = match &step {
            TurnStep::Tsumogiri => return tsumogiri(stg, acts),
            TurnStep::Discard(t) => h.find(*t).map(Action::discard),
            TurnStep::Riichi(t) => h.find(*t).map(Action::riichi),
            TurnStep::Ankan(t) => h.find_n(*t, 4).map(Action::ankan),
            TurnStep::Kakan(t) => h.find(*t).map(Action::kakan),
            TurnStep::Kita => h.find(Tile(TZ, WN)).map(Action::kita),
            TurnStep::Kyushukyuhai => Some(Action::kyushukyuhai()),
        };
        match act {
            Some(a) => a,
            None => {
                log::warn!("scripted step {:?} is not applicable to {}", step, h);
                tsumogiri(stg, acts)
            }
        }
    }

    fn request_call_decision(&mut self, _stg: &Stage, acts: &[Action]) -> Action {
        let (tp, t) = match self.calls.front() {
            Some(&c) => c,
            None => return Action::nop(),
        };
        let found = acts
            .iter()
            .find(|a| a.action_type == tp && a.tiles.first().map(|id| id.tile()) == Some(t));
        match found {
            Some(a) => {
                self.calls.pop_front();
                a.clone()
            }
            None => Action::nop(),
        }
    }

    fn request_win_declaration(&mut self, _stg: &Stage, _offer: WinOffer) -> bool {
        self.declare_win
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Scripted {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script() {
        let turns = parse_turns("m1 riichi:p3 - ankan:z5 kita kyushu").unwrap();
        assert_eq!(
            turns,
            VecDeque::from(vec![
                TurnStep::Discard(Tile(TM, 1)),
                TurnStep::Riichi(Tile(TP, 3)),
                TurnStep::Tsumogiri,
                TurnStep::Ankan(Tile(TZ, DW)),
                TurnStep::Kita,
                TurnStep::Kyushukyuhai,
            ])
        );
        assert!(parse_turns("riichi:x9").is_err());
        assert!(parse_calls("pon").is_err());
        assert_eq!(parse_calls("kan:p1").unwrap()[0], (ActionType::Minkan, Tile(TP, 1)));
    }

    #[test]
    fn call_waits_until_available() {
        let stg = Stage::new(&Rule::default(), 0, 0, 0, 0, &[25000; 4], Wall::new(0, false));
        let mut a = Scripted::new("", "pon:z5", true).unwrap();
        assert_eq!(a.request_call_decision(&stg, &[Action::nop()]), Action::nop());
        let pon = Action::pon(tile_ids_from_string("z55").unwrap());
        assert_eq!(a.request_call_decision(&stg, &[Action::nop(), pon.clone()]), pon);
        assert_eq!(a.request_call_decision(&stg, &[Action::nop(), pon]), Action::nop());
    }
}
