// 手牌の向聴数,和了判定,役や点数計算を行うモジュール
mod evaluate;
mod fu;
mod furiten;
mod parse;
mod point;
mod shanten;
mod win;
mod yaku;

pub use self::{
    evaluate::{evaluate_hand, evaluate_ron, evaluate_tenpai_discards, evaluate_tsumo, is_tenpai},
    fu::{classify_waits, Wait},
    furiten::Furiten,
    parse::{decompose, parse_melds, Decomposition, SetPair, SetPairType, Shape},
    point::{ron_payment, tsumo_payment, tsumo_total, ScoreTable},
    shanten::{
        calc_shanten, shanten_chiitoitsu, shanten_kokushimusou, shanten_standard, Shanten,
        ShantenCache,
    },
    win::{calc_discards_to_tenpai, calc_waits, is_chiitoitsu_win, is_kokushimusou_win, is_normal_win, is_win},
    yaku::{Yaku, YakuContext, YakuFlags},
};
