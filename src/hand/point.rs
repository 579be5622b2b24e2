use std::sync::OnceLock;

use crate::model::{Point, Points};

const FU_LIST: [usize; 11] = [20, 25, 30, 40, 50, 60, 70, 80, 90, 100, 110];
const FAN_MAX: usize = 13; // 13翻以上は数え役満

static SCORE_TABLE: OnceLock<ScoreTable> = OnceLock::new();

fn ceil(n: Point) -> Point {
    (n + 99) / 100 * 100
}

fn calc_base_point(fu: usize, fan: usize) -> Point {
    let base = if fan >= 5 {
        2000
    } else {
        fu * 2_usize.pow(fan as u32 + 2)
    };
    (if base >= 2000 {
        match fan {
            ..6 => 2000,    // 満貫
            6..8 => 3000,   // 跳満
            8..11 => 4000,  // 倍満
            11..13 => 6000, // 三倍満
            13.. => 8000,   // 数え役満
        }
    } else {
        base
    }) as Point
}

fn get_score_title(base_point: Point, yakuman: usize) -> String {
    match yakuman {
        0 => match base_point {
            2000 => "満貫",
            3000 => "跳満",
            4000 => "倍満",
            6000 => "三倍満",
            8000 => "数え役満",
            _ => "",
        },
        1 => "役満",
        2 => "二倍役満",
        3 => "三倍役満",
        4 => "四倍役満",
        5 => "五倍役満",
        6 => "六倍役満",
        _ => "N倍役満",
    }
    .to_string()
}

// (翻, 符) -> 基本点 の表 プロセス全体で共有し変更しない
#[derive(Debug)]
pub struct ScoreTable {
    base: [[Point; FU_LIST.len()]; FAN_MAX + 1], // base[fan][fu_index]
}

impl ScoreTable {
    fn build() -> Self {
        let mut base = [[0; FU_LIST.len()]; FAN_MAX + 1];
        for (fan, row) in base.iter_mut().enumerate().skip(1) {
            for (i, &fu) in FU_LIST.iter().enumerate() {
                row[i] = calc_base_point(fu, fan);
            }
        }
        Self { base }
    }

    pub fn global() -> &'static Self {
        SCORE_TABLE.get_or_init(Self::build)
    }

    pub fn base_point(&self, fu: usize, fan: usize, yakuman: usize) -> Point {
        if yakuman > 0 {
            return 8000 * yakuman as Point;
        }
        let fan = fan.min(FAN_MAX);
        match FU_LIST.iter().position(|&f| f == fu) {
            Some(i) => self.base[fan][i],
            None => calc_base_point(fu, fan), // 110符を超える場合
        }
    }

    // (ロン, ツモ・子の支払い, ツモ・親の支払い) と 満貫などの名称
    // 親の和了の場合, ツモ・親の支払いは0
    pub fn points(&self, is_dealer: bool, fu: usize, fan: usize, yakuman: usize) -> (Points, String) {
        let base = self.base_point(fu, fan, yakuman);
        let title = get_score_title(base, yakuman);
        if is_dealer {
            ((ceil(base * 6), ceil(base * 2), 0), title)
        } else {
            ((ceil(base * 4), ceil(base), ceil(base * 2)), title)
        }
    }
}

// ツモ和了の合計 (三麻は北家の支払い分がなくなる)
pub fn tsumo_total(points: &Points, is_dealer: bool, n_seat: usize) -> Point {
    let n_payer = n_seat as Point - 1;
    if is_dealer {
        points.1 * n_payer
    } else {
        points.1 * (n_payer - 1) + points.2
    }
}

// ツモ和了で各プレイヤーが支払う点数 (本場を含む)
pub fn tsumo_payment(points: &Points, payer_is_dealer: bool, honba: usize) -> Point {
    let p = if payer_is_dealer { points.2 } else { points.1 };
    p + 100 * honba as Point
}

// ロン和了の放銃者の支払い (本場を含む)
pub fn ron_payment(points: &Points, honba: usize) -> Point {
    points.0 + 300 * honba as Point
}
