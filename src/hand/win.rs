use crate::model::*;

// [完成形判定 (面子, 雀頭)]

// それぞれの牌種について"枚数を3で割った余り"と"余り数の集計"を返却
fn calc_mods_cnts(hand: &TileTable) -> ([usize; TYPE], [usize; 3]) {
    let mut mods = [0; TYPE];
    for ti in 0..TYPE {
        mods[ti] = hand[ti][1..TNUM].iter().sum::<usize>() % 3;
    }

    let mut cnts = [0; 3];
    for m in mods {
        cnts[m] += 1;
    }

    (mods, cnts)
}

// 面子のみで構成されているかの判定
pub fn is_sets(tr: &TileRow, ti: Type) -> bool {
    let (mut n0, mut n1) = (tr[1], tr[2]);
    for i in 1..8 {
        let n2 = tr[i + 2];
        let n = n0 % 3;
        if (ti == TZ && n != 0) || n1 < n || n2 < n {
            return false;
        }
        n0 = n1 - n;
        n1 = n2 - n;
    }
    n0 % 3 == 0 && n1 % 3 == 0
}

// 牌種が完成面子+雀頭のみで構成されている場合,雀頭のリストを返す
// 基本的に1つだが,3113,3111113のような形の場合2つ
pub fn calc_pair_candidate(tr: &TileRow, ti: Type) -> Vec<Tile> {
    // 面子の数字の和は3で割り切れるので余りによって雀頭候補を[1,4,7],[2,5,8],[3,6,9]に絞り込める
    let sum: usize = (1..TNUM).map(|i| i * tr[i]).sum();
    let mod3 = sum * 2 % 3; // 2x ≡ sum (mod 3)
    let mut tr = *tr;
    let mut res = vec![];
    for ni in (1..TNUM).filter(|ni| ni % 3 == mod3) {
        if tr[ni] < 2 {
            continue;
        }
        tr[ni] -= 2;
        if is_sets(&tr, ti) {
            res.push(Tile(ti, ni));
        }
        tr[ni] += 2;
    }
    res
}

// 3n+2枚の手牌が通常形の和了形である場合,雀頭候補のリストを返却
pub fn calc_possible_pairs(hand: &TileTable) -> Vec<Tile> {
    let (mods, cnts) = calc_mods_cnts(hand);
    if cnts[1] != 0 || cnts[2] != 1 {
        return vec![];
    }

    let mut res = vec![];
    for ti in 0..TYPE {
        if mods[ti] == 2 {
            res = calc_pair_candidate(&hand[ti], ti);
            if res.is_empty() {
                return vec![];
            }
        } else if !is_sets(&hand[ti], ti) {
            return vec![];
        }
    }
    res
}

// [和了形判定]

// 通常形
pub fn is_normal_win(hand: &TileTable) -> bool {
    !calc_possible_pairs(hand).is_empty()
}

// 七対子 (同じ牌4枚は2対子とみなさない)
pub fn is_chiitoitsu_win(hand: &TileTable) -> bool {
    let mut n_pair = 0;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            match hand[ti][ni] {
                0 => {}
                2 => n_pair += 1,
                _ => return false,
            }
        }
    }
    n_pair == 7
}

// 国士無双
pub fn is_kokushimusou_win(hand: &TileTable) -> bool {
    let mut count = 0;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            let n = hand[ti][ni];
            let is_yaochu = if ti == TZ { ni <= DR } else { ni == 1 || ni == 9 };
            if is_yaochu {
                if n == 0 {
                    return false;
                }
            } else if n != 0 {
                return false;
            }
            count += n;
        }
    }
    count == 14
}

pub fn is_win(hand: &TileTable) -> bool {
    is_normal_win(hand) || is_chiitoitsu_win(hand) || is_kokushimusou_win(hand)
}

// [和了牌判定]
// 3n+1枚の手牌に対する和了牌のリスト (聴牌していない場合は空)
// 手牌で4枚使い切っている牌種は含まない
pub fn calc_waits(hand: &TileTable) -> Vec<Tile> {
    let n = count_tiles(hand);
    if n % 3 != 1 {
        return vec![];
    }

    let mut hand = *hand;
    let mut res = vec![];
    for ti in 0..TYPE {
        let max = if ti == TZ { DR } else { 9 };
        for ni in 1..=max {
            if hand[ti][ni] >= TILE {
                continue;
            }
            hand[ti][ni] += 1;
            let ok = is_normal_win(&hand)
                || (n == 13 && (is_chiitoitsu_win(&hand) || is_kokushimusou_win(&hand)));
            hand[ti][ni] -= 1;
            if ok {
                res.push(Tile(ti, ni));
            }
        }
    }
    res
}

// [聴牌打牌判定]
// 3n+2枚の手牌において聴牌となる打牌と待ちの組み合わせの一覧 (リーチ宣言用)
pub fn calc_discards_to_tenpai(hand: &TileTable) -> Vec<(Tile, Vec<Tile>)> {
    let mut res = vec![];
    let mut hand = *hand;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if hand[ti][ni] == 0 {
                continue;
            }
            hand[ti][ni] -= 1;
            let waits = calc_waits(&hand);
            hand[ti][ni] += 1;
            if !waits.is_empty() {
                res.push((Tile(ti, ni), waits));
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tt(s: &str) -> TileTable {
        tile_table_from_tiles(&tiles_from_string(s).unwrap())
    }

    #[test]
    fn pair_candidates() {
        assert_eq!(calc_possible_pairs(&tt("m111234p456s789z11")), vec![Tile(TZ, 1)]);
        // 3113形
        let pairs = calc_possible_pairs(&tt("m11122233p456s789"));
        assert!(pairs.contains(&Tile(TM, 3)));
        assert!(calc_possible_pairs(&tt("m11122234p456s789")).len() >= 1);
        assert!(calc_possible_pairs(&tt("m1234p456s789z1123")).is_empty());
    }

    #[test]
    fn special_shapes() {
        assert!(is_chiitoitsu_win(&tt("m1199p2288s3366z77")));
        assert!(!is_chiitoitsu_win(&tt("m1111p2288s3366z77")));
        assert!(is_kokushimusou_win(&tt("m19p19s19z12345677")));
        assert!(!is_kokushimusou_win(&tt("m19p19s19z12345666")));
    }

    #[test]
    fn waits() {
        assert_eq!(calc_waits(&tt("m123456789p23s99")), tiles_from_string("p14").unwrap());
        assert_eq!(calc_waits(&tt("m1112345678999")), tiles_from_string("m123456789").unwrap());
        assert_eq!(calc_waits(&tt("m19p19s19z1234567")).len(), 13);
        assert_eq!(calc_waits(&tt("m1199p2288s3366z7")), vec![Tile(TZ, 7)]);
        // 4枚使いの牌は待ちにならない
        assert!(calc_waits(&tt("m1111p123s456z111")).is_empty());
    }

    #[test]
    fn riichi_discards() {
        let res = calc_discards_to_tenpai(&tt("m123456789p23s99z1"));
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].0, Tile(TZ, 1));
    }
}
