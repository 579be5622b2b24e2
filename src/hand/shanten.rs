use ahash::AHashMap;

use crate::model::*;

pub type Shanten = i8;

const SHANTEN_MAX: Shanten = 8; // 通常形の最大値
const NOT_APPLICABLE: Shanten = 99; // 副露がある場合の七対子,国士無双
const YAOCHU: [usize; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

// 向聴数のメモ
// キーは牌種毎の枚数 (副露数は枚数の合計から決まる)
#[derive(Debug, Default)]
pub struct ShantenCache {
    memo: AHashMap<[u8; KIND], Shanten>,
    capacity: Option<usize>, // 上限に達したら全消去
}

impl ShantenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            memo: AHashMap::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }

    // 3形(通常,七対子,国士無双)の最小値
    pub fn shanten(&mut self, counts: &[u8; KIND]) -> Shanten {
        if let Some(&s) = self.memo.get(counts) {
            return s;
        }
        let s = calc_shanten(counts);
        if let Some(cap) = self.capacity {
            if self.memo.len() >= cap {
                self.memo.clear();
            }
        }
        self.memo.insert(*counts, s);
        s
    }

    #[inline]
    pub fn shanten_table(&mut self, tt: &TileTable) -> Shanten {
        self.shanten(&tile_counts(tt))
    }

    // 3n+1枚の手牌で向聴数を1つ下げる牌種の一覧 (受け入れ)
    pub fn ukeire(&mut self, counts: &[u8; KIND]) -> Vec<Tile> {
        let current = self.shanten(counts);
        let mut counts = *counts;
        let mut res = vec![];
        for i in 0..KIND {
            if counts[i] >= TILE as u8 {
                continue;
            }
            counts[i] += 1;
            if self.shanten(&counts) < current {
                res.push(Tile::from_index(i));
            }
            counts[i] -= 1;
        }
        res
    }
}

pub fn calc_shanten(counts: &[u8; KIND]) -> Shanten {
    shanten_standard(counts)
        .min(shanten_chiitoitsu(counts))
        .min(shanten_kokushimusou(counts))
}

// 通常形 (4面子1雀頭)
// 向聴数 = (必要面子数 - 面子数) * 2 - 搭子数 - 雀頭
pub fn shanten_standard(counts: &[u8; KIND]) -> Shanten {
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if !(2..=14).contains(&total) {
        return SHANTEN_MAX;
    }
    let needed = (4 - (14 - total) / 3) as Shanten; // 副露を除いた必要面子数

    let mut cnt = *counts;
    let mut best = SHANTEN_MAX;

    // 雀頭を固定
    for i in 0..KIND {
        if cnt[i] >= 2 {
            cnt[i] -= 2;
            let (m, p) = search_sets(&mut cnt, needed);
            best = best.min((needed - m) * 2 - 1 - p);
            cnt[i] += 2;
        }
    }

    // 雀頭なし
    let (m, p) = search_sets(&mut cnt, needed);
    best = best.min((needed - m) * 2 - p);

    best.max(-1)
}

// (面子数, 搭子数) の最良の組み合わせ
fn search_sets(cnt: &mut [u8; KIND], needed: Shanten) -> (Shanten, Shanten) {
    let mut best = (0, 0);
    backtrack(cnt, 0, 0, 0, needed, &mut best);
    best
}

fn backtrack(
    cnt: &mut [u8; KIND],
    i: usize,
    m: Shanten,
    p: Shanten,
    needed: Shanten,
    best: &mut (Shanten, Shanten),
) {
    if i >= KIND {
        if m * 2 + p > best.0 * 2 + best.1 {
            *best = (m, p);
        }
        return;
    }
    if cnt[i] == 0 {
        backtrack(cnt, i + 1, m, p, needed, best);
        return;
    }

    let is_suit = i < 27;
    let ni = i % 9;
    let can_set = m < needed;
    let can_partial = m + p < needed;

    // 刻子
    if cnt[i] >= 3 && can_set {
        cnt[i] -= 3;
        backtrack(cnt, i, m + 1, p, needed, best);
        cnt[i] += 3;
    }

    // 順子
    if is_suit && ni <= 6 && can_set && cnt[i + 1] > 0 && cnt[i + 2] > 0 {
        take(cnt, &[i, i + 1, i + 2]);
        backtrack(cnt, i, m + 1, p, needed, best);
        give(cnt, &[i, i + 1, i + 2]);
    }

    if can_partial {
        // 対子
        if cnt[i] >= 2 {
            cnt[i] -= 2;
            backtrack(cnt, i, m, p + 1, needed, best);
            cnt[i] += 2;
        }
        // 両面,辺張
        if is_suit && ni <= 7 && cnt[i + 1] > 0 {
            take(cnt, &[i, i + 1]);
            backtrack(cnt, i, m, p + 1, needed, best);
            give(cnt, &[i, i + 1]);
        }
        // 嵌張
        if is_suit && ni <= 6 && cnt[i + 2] > 0 {
            take(cnt, &[i, i + 2]);
            backtrack(cnt, i, m, p + 1, needed, best);
            give(cnt, &[i, i + 2]);
        }
    }

    // 孤立牌として扱う
    backtrack(cnt, i + 1, m, p, needed, best);
}

#[inline]
fn take(cnt: &mut [u8; KIND], idxs: &[usize]) {
    for &i in idxs {
        cnt[i] -= 1;
    }
}

#[inline]
fn give(cnt: &mut [u8; KIND], idxs: &[usize]) {
    for &i in idxs {
        cnt[i] += 1;
    }
}

// 七対子 (副露なしのみ)
pub fn shanten_chiitoitsu(counts: &[u8; KIND]) -> Shanten {
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if total != 13 && total != 14 {
        return NOT_APPLICABLE;
    }
    let pairs = counts.iter().filter(|&&c| c >= 2).count() as Shanten;
    let kinds = counts.iter().filter(|&&c| c >= 1).count() as Shanten;
    6 - pairs + (7 - kinds).max(0)
}

// 国士無双 (副露なしのみ)
pub fn shanten_kokushimusou(counts: &[u8; KIND]) -> Shanten {
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if total != 13 && total != 14 {
        return NOT_APPLICABLE;
    }
    let kinds = YAOCHU.iter().filter(|&&i| counts[i] >= 1).count() as Shanten;
    let has_pair = YAOCHU.iter().any(|&i| counts[i] >= 2);
    13 - kinds - has_pair as Shanten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(s: &str) -> [u8; KIND] {
        tile_counts(&tile_table_from_tiles(&tiles_from_string(s).unwrap()))
    }

    #[test]
    fn complete_hand_is_minus_one() {
        assert_eq!(calc_shanten(&counts("m123456789p11s789")), -1);
        assert_eq!(calc_shanten(&counts("m1199p2288s3366z77")), -1);
        assert_eq!(calc_shanten(&counts("m19p19s19z12345677")), -1);
    }

    #[test]
    fn tenpai_is_zero() {
        assert_eq!(calc_shanten(&counts("m123456789p1s789")), 0);
        assert_eq!(shanten_chiitoitsu(&counts("m1199p2288s3366z7")), 0);
        assert_eq!(shanten_kokushimusou(&counts("m19p19s19z1234567")), 0);
    }

    #[test]
    fn melded_hand_uses_fewer_sets() {
        // 2副露後の8枚
        assert_eq!(shanten_standard(&counts("m123p456s1")), 0);
        assert_eq!(shanten_chiitoitsu(&counts("m123p456s1")), NOT_APPLICABLE);
    }

    #[test]
    fn scattered_hand() {
        assert_eq!(shanten_standard(&counts("m147p258s369z1234")), 8);
        assert_eq!(shanten_kokushimusou(&counts("m147p258s369z1234")), 7);
        assert_eq!(calc_shanten(&counts("m147p258s369z1234")), 6);
    }

    #[test]
    fn cache_returns_same_value() {
        let mut cache = ShantenCache::with_capacity(4);
        let c = counts("m123456789p1s789");
        assert_eq!(cache.shanten(&c), 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.shanten(&c), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn ukeire_lists_waits_for_tenpai() {
        let mut cache = ShantenCache::new();
        let waits = cache.ukeire(&counts("m123456789p23s99"));
        assert_eq!(waits, tiles_from_string("p14").unwrap());
    }
}
