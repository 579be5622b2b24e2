use rand::prelude::*;

use super::*;

pub struct RandomDiscardBuilder;

impl ActorBuilder for RandomDiscardBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "RandomDiscard".to_string(),
            args: vec![Arg::int("seed", 0)],
        }
    }

    fn create(&self, config: Config) -> Result<Box<dyn Actor>, String> {
        Ok(Box::new(RandomDiscard::from_config(config)))
    }
}

// 打牌候補からランダムに選択 鳴きはしない, 和了は宣言する
pub struct RandomDiscard {
    config: Config,
    rng: StdRng,
}

impl RandomDiscard {
    pub fn new(seed: u64) -> Self {
        Self::from_config(Config {
            name: "RandomDiscard".to_string(),
            args: vec![Arg::int("seed", seed as i64)],
        })
    }

    pub fn from_config(config: Config) -> Self {
        let seed = config.arg("seed").and_then(|v| v.as_int()).unwrap_or(0);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed as u64),
        }
    }
}

impl Actor for RandomDiscard {
    fn request_discard(&mut self, _stg: &Stage, acts: &[Action], _tenpais: &[Tenpai]) -> Action {
        let discards: Vec<&Action> = acts
            .iter()
            .filter(|a| a.action_type == ActionType::Discard)
            .collect();
        discards
            .choose(&mut self.rng)
            .map(|&a| a.clone())
            .unwrap_or_else(Action::nop)
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

impl Listener for RandomDiscard {}
