use crate::model::*;
use crate::util::misc::vec_count;

// ドラ表示牌のリストを受け取ってドラ評価値のテーブルを返却
pub fn create_dora_table(doras: &[Tile], is_sanma: bool) -> TileTable {
    let mut dt = TileTable::default();
    for d in doras {
        let t = d.next_dora(is_sanma);
        dt[t.0][t.1] += 1;
    }
    dt
}

// ドラ表示牌によるのドラの数を勘定 (北抜きの牌を含む)
pub fn count_dora(hand: &[TileId], melds: &[Meld], doras: &[Tile], is_sanma: bool) -> usize {
    let dt = create_dora_table(doras, is_sanma);
    hand.iter()
        .chain(melds.iter().flat_map(|m| m.tiles.iter()))
        .map(|id| {
            let t = id.tile();
            dt[t.0][t.1]
        })
        .sum()
}

// 赤5の数
pub fn count_red5(hand: &[TileId], melds: &[Meld]) -> usize {
    hand.iter()
        .chain(melds.iter().flat_map(|m| m.tiles.iter()))
        .filter(|id| id.is_red())
        .count()
}

// 鳴きの文字列表記をMeldに変換 "m1+23": チー(m1を鳴いた) "z5555": 暗槓 "z4": 北抜き
// '+'は直前の牌を他家から鳴いたことを示す (省略時は先頭の牌)
pub fn meld_from_string(exp: &str, used: &mut [bool; TILE_ID_MAX]) -> Result<Meld, String> {
    let mut called = None;
    let mut n = 0;
    let mut plain = String::new();
    for c in exp.chars() {
        match c {
            '+' => {
                if n == 0 {
                    return Err("invalid '+' suffix".to_string());
                }
                called = Some(n - 1);
            }
            '0'..='9' => {
                n += 1;
                plain.push(c);
            }
            _ => plain.push(c),
        }
    }

    let ids = allocate_tile_ids(&plain, used)?;
    if ids.is_empty() {
        return Err(format!("invalid meld: '{}'", exp));
    }
    let tiles: Vec<Tile> = ids.iter().map(|id| id.tile()).collect();
    let mut nis: Vec<Tnum> = tiles.iter().map(|t| t.1).collect();
    nis.sort();
    let diffs: Vec<usize> = nis.windows(2).map(|w| w[1] - w[0]).collect();
    let same_type = tiles.iter().all(|t| t.0 == tiles[0].0);

    let meld_type = if tiles == [Tile(TZ, WN)] {
        MeldType::Kita
    } else if !same_type {
        return Err(format!("invalid meld: '{}'", exp));
    } else if diffs.len() == 2 && vec_count(&diffs, &1) == 2 && tiles[0].is_suit() {
        MeldType::Chi
    } else if diffs.len() == 2 && vec_count(&diffs, &0) == 2 {
        MeldType::Pon
    } else if diffs.len() == 3 && vec_count(&diffs, &0) == 3 {
        if called.is_none() {
            MeldType::Ankan
        } else {
            MeldType::Minkan
        }
    } else {
        return Err(format!("invalid meld: '{}'", exp));
    };

    let from = match meld_type {
        MeldType::Ankan | MeldType::Kita => None,
        _ => Some((0, ids[called.unwrap_or(0)])), // 点数計算では鳴いた相手は関係ないので0で固定
    };
    Ok(Meld::new(meld_type, ids, from))
}

pub fn wind_from_char(c: char) -> Result<Tnum, String> {
    Ok(match c {
        'E' => WE,
        'S' => WS,
        'W' => WW,
        'N' => WN,
        _ => return Err(format!("invalid wind symbol: {}", c)),
    })
}
