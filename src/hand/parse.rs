use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::util::misc::cartesian_product;

use super::win::{calc_possible_pairs, is_chiitoitsu_win, is_kokushimusou_win};

use SetPairType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SetPairType {
    Pair,    // 雀頭
    Shuntsu, // 順子
    Koutsu,  // 刻子
    Chi,     // チー
    Pon,     // ポン
    Minkan,  // 明槓 (大明槓 + 加槓)
    Ankan,   // 暗槓
}

// Tileは順子、チーの場合は先頭の牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SetPair(pub SetPairType, pub Tile);

impl SetPair {
    // 牌を含むか (順子は3枚の範囲)
    pub fn contains(&self, t: Tile) -> bool {
        match self.0 {
            Shuntsu | Chi => self.1 .0 == t.0 && self.1 .1 <= t.1 && t.1 <= self.1 .1 + 2,
            _ => self.1 == t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shape {
    Standard,        // 4面子1雀頭
    SevenPairs,      // 七対子
    ThirteenOrphans, // 国士無双 (setsは空)
}

// 和了形の分解 (鳴きを含む)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Decomposition {
    pub shape: Shape,
    pub sets: Vec<SetPair>, // ソート済み
}

impl Decomposition {
    fn new(shape: Shape, mut sets: Vec<SetPair>) -> Self {
        sets.sort();
        Self { shape, sets }
    }

    pub fn pair(&self) -> Option<Tile> {
        self.sets.iter().find(|sp| sp.0 == Pair).map(|sp| sp.1)
    }
}

// 鳴きをSetPairに変換したリストを返却 (北抜きは除く)
pub fn parse_melds(melds: &[Meld]) -> Vec<SetPair> {
    melds
        .iter()
        .filter_map(|m| {
            let t = m.tile();
            match m.meld_type {
                MeldType::Chi => Some(SetPair(Chi, t)),
                MeldType::Pon => Some(SetPair(Pon, t)),
                MeldType::Minkan | MeldType::Kakan => Some(SetPair(Minkan, t)),
                MeldType::Ankan => Some(SetPair(Ankan, t)),
                MeldType::Kita => None,
            }
        })
        .collect()
}

// 牌種の列を順子と刻子に分解するすべてのパターン
// 空の列は[[]]を返却, 分解できない場合は空のリスト
fn parse_row_into_sets(tr: &TileRow, ti: Type) -> Vec<Vec<SetPair>> {
    let mut res = vec![];
    let mut tr = *tr;
    let mut cur = vec![];
    search_row(&mut tr, ti, 1, &mut cur, &mut res);
    res.sort();
    res.dedup();
    res
}

fn search_row(
    tr: &mut TileRow,
    ti: Type,
    ni: Tnum,
    cur: &mut Vec<SetPair>,
    res: &mut Vec<Vec<SetPair>>,
) {
    let ni = match (ni..TNUM).find(|&i| tr[i] > 0) {
        Some(i) => i,
        None => {
            let mut v = cur.clone();
            v.sort();
            res.push(v);
            return;
        }
    };

    // 刻子
    if tr[ni] >= 3 {
        tr[ni] -= 3;
        cur.push(SetPair(Koutsu, Tile(ti, ni)));
        search_row(tr, ti, ni, cur, res);
        cur.pop();
        tr[ni] += 3;
    }

    // 順子
    if ti != TZ && ni <= 7 && tr[ni + 1] > 0 && tr[ni + 2] > 0 {
        for i in ni..ni + 3 {
            tr[i] -= 1;
        }
        cur.push(SetPair(Shuntsu, Tile(ti, ni)));
        search_row(tr, ti, ni, cur, res);
        cur.pop();
        for i in ni..ni + 3 {
            tr[i] += 1;
        }
    }
}

// 手牌が完成形(七対子・国士無双は除く)なら面子+雀頭に分解して返却
fn parse_into_normal_win(hand: &TileTable) -> Vec<Vec<SetPair>> {
    let pairs = calc_possible_pairs(hand);
    if pairs.is_empty() {
        return vec![];
    }

    let mut rows = vec![];

    // 雀頭を含む列
    let pair_ti = pairs[0].0;
    let mut tr = hand[pair_ti];
    let mut with_pair = vec![];
    for pair in pairs {
        tr[pair.1] -= 2;
        for mut sets in parse_row_into_sets(&tr, pair_ti) {
            sets.push(SetPair(Pair, pair));
            with_pair.push(sets);
        }
        tr[pair.1] += 2;
    }
    rows.push(with_pair);

    // 雀頭を含まない列
    for ti in 0..TYPE {
        if ti != pair_ti {
            rows.push(parse_row_into_sets(&hand[ti], ti));
        }
    }

    // それぞれの列の分割のすべての組み合わせ(直積)
    cartesian_product(&rows)
        .into_iter()
        .map(|v| v.into_iter().flatten().copied().collect())
        .collect()
}

// 手牌(和了牌を含む)と鳴きから和了形の分解をすべて列挙
// 和了形でない場合は空のリスト
pub fn decompose(hand: &TileTable, melds: &[Meld]) -> Vec<Decomposition> {
    let meld_sets = parse_melds(melds);
    if count_tiles(hand) + meld_sets.len() * 3 != 14 {
        return vec![];
    }

    let mut res = vec![];
    for mut sets in parse_into_normal_win(hand) {
        sets.extend(meld_sets.iter().copied());
        res.push(Decomposition::new(Shape::Standard, sets));
    }

    if meld_sets.is_empty() {
        if is_chiitoitsu_win(hand) {
            let sets = tiles_from_tile_table(hand)
                .chunks(2)
                .map(|c| SetPair(Pair, c[0]))
                .collect();
            res.push(Decomposition::new(Shape::SevenPairs, sets));
        }
        if is_kokushimusou_win(hand) {
            res.push(Decomposition::new(Shape::ThirteenOrphans, vec![]));
        }
    }

    res.sort();
    res.dedup();
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tt(s: &str) -> TileTable {
        tile_table_from_tiles(&tiles_from_string(s).unwrap())
    }

    #[test]
    fn not_a_win() {
        assert!(decompose(&tt("m123456789p1s789z1"), &[]).is_empty());
    }

    #[test]
    fn sanrenkou_has_two_readings() {
        let ds = decompose(&tt("m111222333p456z11"), &[]);
        assert_eq!(ds.len(), 2);
        assert!(ds.iter().all(|d| d.shape == Shape::Standard));
        assert!(ds.iter().any(|d| d.sets.contains(&SetPair(Koutsu, Tile(TM, 2)))));
        assert!(ds
            .iter()
            .any(|d| d.sets.iter().filter(|sp| sp.0 == Shuntsu).count() == 4));
    }

    #[test]
    fn ryanpeikou_is_also_seven_pairs() {
        let ds = decompose(&tt("m112233p445566z11"), &[]);
        assert!(ds.iter().any(|d| d.shape == Shape::Standard));
        assert!(ds.iter().any(|d| d.shape == Shape::SevenPairs));
    }

    #[test]
    fn thirteen_orphans() {
        let ds = decompose(&tt("m19p19s19z12345677"), &[]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].shape, Shape::ThirteenOrphans);
        assert!(ds[0].sets.is_empty());
    }

    #[test]
    fn melds_are_included() {
        let ids = tile_ids_from_string("p777").unwrap();
        let pon = Meld::new(MeldType::Pon, ids, Some((1, TileId::new(Tile(TP, 7), 0))));
        let ds = decompose(&tt("m123456s789z11"), &[pon]);
        assert_eq!(ds.len(), 1);
        assert!(ds[0].sets.contains(&SetPair(Pon, Tile(TP, 7))));
        assert_eq!(ds[0].pair(), Some(Tile(TZ, 1)));
    }
}
