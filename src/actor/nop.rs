use super::*;

pub struct NopBuilder;

impl ActorBuilder for NopBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Nop".to_string(),
            args: vec![],
        }
    }

    fn create(&self, config: Config) -> Result<Box<dyn Actor>, String> {
        Ok(Box::new(Nop::from_config(config)))
    }
}

// 常にツモ切り, 鳴き・和了はすべてスキップ
#[derive(Clone)]
pub struct Nop {
    config: Config,
}

impl Nop {
    pub fn new() -> Self {
        Self::from_config(NopBuilder {}.get_default_config())
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }
}

impl Default for Nop {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Nop {
    fn request_discard(&mut self, _stg: &Stage, _acts: &[Action], _tenpais: &[Tenpai]) -> Action {
        Action::nop()
    }

    fn request_call_decision(&mut self, _stg: &Stage, _acts: &[Action]) -> Action {
        Action::nop()
    }

    fn request_win_declaration(&mut self, _stg: &Stage, _offer: WinOffer) -> bool {
        false
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Nop {}
