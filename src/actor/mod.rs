mod greedy;
mod nop;
mod random;
mod scripted;

use std::fmt;

use crate::listener::Listener;
use crate::model::*;
use crate::util::variant::*;

pub use greedy::Greedy;
pub use nop::Nop;
pub use random::RandomDiscard;
pub use scripted::Scripted;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Config {
    pub fn arg(&self, name: &str) -> Option<&Variant> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

// 意思決定を行うプレイヤー
// エンジンは要求を同期的に行い,返された値の合法性を検証する (不正な場合はフォールバック)
pub trait Actor: Listener {
    // 局開始時の初期化処理
    fn init(&mut self, _seat: Seat) {}

    // ツモ番の操作をactsの中から選択 Nopはツモ切り
    // tenpais: 聴牌になる打牌の一覧 (リーチ宣言の判断用)
    fn request_discard(&mut self, stg: &Stage, acts: &[Action], tenpais: &[Tenpai]) -> Action;

    // 他家の打牌に対する鳴き acts[0]は常にNop(スキップ)
    fn request_call_decision(&mut self, stg: &Stage, acts: &[Action]) -> Action;

    // 和了の宣言 trueを返しても役なし,フリテンの場合は却下される
    fn request_win_declaration(&mut self, stg: &Stage, offer: WinOffer) -> bool;

    // Actorの詳細表示用
    fn get_config(&self) -> &Config;
}

impl fmt::Debug for dyn Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = self.get_config();
        let arg_str = conf
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}({})", conf.name, arg_str)
    }
}

trait ActorBuilder {
    fn get_default_config(&self) -> Config;
    fn create(&self, config: Config) -> Result<Box<dyn Actor>, String>;
}

// "Name(arg0,arg1,...)" 形式の文字列からActorを生成 引数は順番に既定値を上書き (空の場合は既定値)
pub fn create_actor(exp: &str) -> Result<Box<dyn Actor>, String> {
    let builders: Vec<Box<dyn ActorBuilder>> = vec![
        Box::new(nop::NopBuilder {}),
        Box::new(greedy::GreedyBuilder {}),
        Box::new(random::RandomDiscardBuilder {}),
        Box::new(scripted::ScriptedBuilder {}),
    ];

    let name: &str;
    let args: Vec<&str>;
    let paren_left = exp.find('(');
    let paren_right = exp.rfind(')');
    if let (Some(l), Some(r)) = (paren_left, paren_right) {
        if r < l {
            return Err(format!("invalid paren: {}", exp));
        }
        args = exp[l + 1..r].split(',').map(|a| a.trim()).collect();
        name = &exp[..l];
    } else {
        args = vec![];
        name = exp;
    }

    for b in &builders {
        let mut conf = b.get_default_config();
        if name != conf.name {
            continue;
        }
        if conf.args.len() < args.len() {
            return Err(format!(
                "expected {} arguments for {}. but {} arguments are provided.",
                conf.args.len(),
                name,
                args.len(),
            ));
        }
        for (i, &a) in args.iter().enumerate() {
            if !a.is_empty() {
                conf.args[i].value = conf.args[i]
                    .value
                    .parse_like(a)
                    .map_err(|e| format!("{}: {}", e, a))?;
            }
        }
        return b.create(conf);
    }

    Err(format!("unknown actor name: {}", name))
}

// ツモ切り, 打牌候補がない場合は先頭の候補
pub(crate) fn tsumogiri(stg: &Stage, acts: &[Action]) -> Action {
    let h = &stg.players[stg.turn].hand;
    match h.drawn {
        Some(d) if acts.contains(&Action::discard(d)) => Action::discard(d),
        _ => acts
            .iter()
            .find(|a| a.action_type == ActionType::Discard)
            .cloned()
            .unwrap_or_else(Action::nop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_by_name() {
        let a = create_actor("Nop").unwrap();
        assert_eq!(a.get_config().name, "Nop");
        let a = create_actor("RandomDiscard(7)").unwrap();
        assert_eq!(a.get_config().arg("seed"), Some(&Variant::Int(7)));
        let a = create_actor("Greedy(,false)").unwrap();
        assert_eq!(a.get_config().arg("riichi"), Some(&Variant::Bool(false)));
        assert!(create_actor("Unknown").is_err());
        assert!(create_actor("Nop(1)").is_err());
        assert!(create_actor("RandomDiscard(x)").is_err());
    }
}
