use serde::{Deserialize, Serialize};

use crate::model::*;

use super::parse::{SetPair, SetPairType, Shape};
use super::yaku::{is_pinfu, YakuContext};

use SetPairType::*;

// 和了牌の待ちの形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wait {
    Ryanmen, // 両面
    Kanchan, // 嵌張
    Penchan, // 辺張
    Tanki,   // 単騎
    Shanpon, // 双碰
}

impl Wait {
    // 符が付く待ち
    #[inline]
    pub fn is_bad(&self) -> bool {
        matches!(self, Wait::Kanchan | Wait::Penchan | Wait::Tanki)
    }
}

// 分解に対して和了牌が取り得る待ちの一覧 (同じ分解でも複数解釈できる場合がある)
pub fn classify_waits(sets: &[SetPair], wt: Tile) -> Vec<Wait> {
    let mut res = vec![];
    for SetPair(tp, t) in sets {
        let w = match tp {
            Pair if *t == wt => Wait::Tanki,
            Koutsu if *t == wt => Wait::Shanpon,
            Shuntsu if t.0 == wt.0 && t.1 <= wt.1 && wt.1 <= t.1 + 2 => {
                match (wt.1 - t.1, t.1) {
                    (1, _) => Wait::Kanchan,
                    (0, 7) | (2, 1) => Wait::Penchan,
                    _ => Wait::Ryanmen,
                }
            }
            _ => continue,
        };
        if !res.contains(&w) {
            res.push(w);
        }
    }
    res
}

impl YakuContext {
    // 符計算 (切り上げ済み)
    pub fn calc_fu(&self) -> usize {
        match self.decomposition.shape {
            Shape::SevenPairs => return 25,
            Shape::ThirteenOrphans => return 30,
            Shape::Standard => {}
        }

        let pinfu = !self.is_open && is_pinfu(self);
        if pinfu {
            return if self.is_tsumo { 20 } else { 30 };
        }

        // 副底
        let mut fu = 20;

        // 和了り方
        fu += if self.is_tsumo {
            2 // ツモ
        } else if !self.is_open {
            10 // 門前ロン
        } else {
            0
        };

        // 面子, 雀頭
        for SetPair(tp, t) in self.sets() {
            fu += match tp {
                Pair => {
                    let mut n = 0;
                    if t.is_doragon() {
                        n += 2;
                    }
                    if *t == Tile(TZ, self.prevalent_wind) {
                        n += 2;
                    }
                    if *t == Tile(TZ, self.seat_wind) {
                        n += 2; // 連風牌は4符
                    }
                    n
                }
                Koutsu => {
                    if self.ron_koutsu == Some(*t) {
                        if t.is_end() { 4 } else { 2 } // ロンで完成した刻子は明刻
                    } else if t.is_end() {
                        8
                    } else {
                        4
                    }
                }
                Pon => if t.is_end() { 4 } else { 2 },
                Minkan => if t.is_end() { 16 } else { 8 },
                Ankan => if t.is_end() { 32 } else { 16 },
                Shuntsu | Chi => 0,
            };
        }

        // 待ちの形
        if self.waits.iter().any(|w| w.is_bad()) {
            fu += 2;
        }

        // 喰い平和形
        if self.is_open && fu == 20 {
            return 30;
        }

        (fu + 9) / 10 * 10 // １の位は切り上げ
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::decompose;
    use super::super::yaku::YakuFlags;
    use super::*;

    fn fu_list(hand: &str, wt: &str, is_tsumo: bool) -> Vec<usize> {
        let tt = tile_table_from_tiles(&tiles_from_string(hand).unwrap());
        let wt = Tile::from_symbol(wt).unwrap();
        decompose(&tt, &[])
            .into_iter()
            .map(|d| {
                YakuContext::new(tt, d, wt, WE, WS, is_tsumo, YakuFlags::default(), true).calc_fu()
            })
            .collect()
    }

    #[test]
    fn wait_classification() {
        let t = |s: &str| Tile::from_symbol(s).unwrap();
        let sets = [SetPair(Shuntsu, t("m1")), SetPair(Shuntsu, t("p7")), SetPair(Pair, t("s5"))];
        assert_eq!(classify_waits(&sets, t("m3")), vec![Wait::Penchan]);
        assert_eq!(classify_waits(&sets, t("m1")), vec![Wait::Ryanmen]);
        assert_eq!(classify_waits(&sets, t("m2")), vec![Wait::Kanchan]);
        assert_eq!(classify_waits(&sets, t("p7")), vec![Wait::Penchan]);
        assert_eq!(classify_waits(&sets, t("p9")), vec![Wait::Ryanmen]);
        assert_eq!(classify_waits(&sets, t("s5")), vec![Wait::Tanki]);
    }

    #[test]
    fn pinfu_fixed_fu() {
        assert_eq!(fu_list("m123456p234s678z33", "m4", true), vec![20]);
        assert_eq!(fu_list("m123456p234s678z33", "m4", false), vec![30]);
    }

    #[test]
    fn closed_ron_with_simple_triplet() {
        // 20 + 10(門前ロン) + 4(中張暗刻) = 34 -> 40
        assert_eq!(fu_list("m123p345s456777z33", "p3", false), vec![40]);
    }

    #[test]
    fn ron_completed_triplet_is_open() {
        // 20 + 10 + 8(么九暗刻 p1) + 2(明刻扱い s5) = 40
        assert_eq!(fu_list("m123456p111s55z33s5", "s5", false), vec![40]);
        // ツモなら暗刻: 20 + 2 + 8 + 4 = 34 -> 40
        assert_eq!(fu_list("m123456p111s55z33s5", "s5", true), vec![40]);
    }

    #[test]
    fn seven_pairs_and_double_wind_pair() {
        assert_eq!(fu_list("m1199p2288s3366z77", "z7", true), vec![25]);
        // 東場の東家ではないので z1 は場風のみ: 20 + 10 + 2 + 2(単騎) = 34 -> 40
        assert_eq!(fu_list("m123456p234s678z11", "z1", false), vec![40]);
    }
}
