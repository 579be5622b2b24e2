use super::*;
use crate::error::{RuleError, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Chi,    // チー
    Pon,    // ポン
    Minkan, // 大明槓
    Kakan,  // 加槓
    Ankan,  // 暗槓
    Kita,   // 北抜き (三麻のみ)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<TileId>,           // 鳴いた牌を含む (ソート済み)
    pub from: Option<(Seat, TileId)>, // 鳴いた相手と牌 (暗槓,北抜きはNone)
}

impl Meld {
    pub fn new(meld_type: MeldType, mut tiles: Vec<TileId>, from: Option<(Seat, TileId)>) -> Self {
        tiles.sort();
        Self {
            meld_type,
            tiles,
            from,
        }
    }

    // 順子の場合は先頭の牌
    pub fn tile(&self) -> Tile {
        self.tiles[0].tile()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(
            self.meld_type,
            MeldType::Chi | MeldType::Pon | MeldType::Minkan | MeldType::Kakan
        )
    }

    #[inline]
    pub fn is_kan(&self) -> bool {
        matches!(
            self.meld_type,
            MeldType::Minkan | MeldType::Kakan | MeldType::Ankan
        )
    }

    // 面子として数えるか (北抜きは面子ではない)
    #[inline]
    pub fn is_set(&self) -> bool {
        self.meld_type != MeldType::Kita
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self
            .tiles
            .iter()
            .map(|t| match self.from {
                Some((seat, c)) if c == *t => format!("{}({})", t, seat),
                _ => t.to_string(),
            })
            .collect();
        write!(f, "{}", s.join("|"))
    }
}

// 手牌 (鳴き以外の牌は個体番号で保持)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    pub tiles: Vec<TileId>,    // 純手牌 (ツモ牌を含む, ソート済み)
    pub melds: Vec<Meld>,      // 鳴き一覧 (北抜きを含む)
    pub drawn: Option<TileId>, // ツモ牌
    pub is_riichi: bool,       // リーチ宣言済み
}

impl Hand {
    pub fn new(mut tiles: Vec<TileId>) -> Self {
        tiles.sort();
        Self {
            tiles,
            ..Default::default()
        }
    }

    pub fn table(&self) -> TileTable {
        tile_table_from_ids(&self.tiles)
    }

    pub fn push(&mut self, id: TileId) {
        let pos = self.tiles.partition_point(|&t| t < id);
        self.tiles.insert(pos, id);
    }

    pub fn draw(&mut self, id: TileId) {
        self.push(id);
        self.drawn = Some(id);
    }

    pub fn remove(&mut self, id: TileId) -> RuleResult {
        match self.tiles.iter().position(|&t| t == id) {
            Some(i) => {
                self.tiles.remove(i);
                if self.drawn == Some(id) {
                    self.drawn = None;
                }
                Ok(())
            }
            None => Err(RuleError::illegal(format!("{} is not in hand", id))),
        }
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains(&id)
    }

    pub fn count(&self, t: Tile) -> usize {
        self.tiles.iter().filter(|id| id.tile() == t).count()
    }

    // 牌種に対応する個体を返却 (赤5は最後に選択)
    pub fn find(&self, t: Tile) -> Option<TileId> {
        let mut it = self.tiles.iter().filter(|id| id.tile() == t);
        let first = it.clone().find(|id| !id.is_red());
        first.or_else(|| it.next()).copied()
    }

    // 牌種に対応する個体をn枚返却 (赤5は最後に選択)
    pub fn find_n(&self, t: Tile, n: usize) -> Option<Vec<TileId>> {
        let mut ids: Vec<TileId> = self.tiles.iter().filter(|id| id.tile() == t).copied().collect();
        ids.sort_by_key(|id| id.is_red());
        if ids.len() < n {
            return None;
        }
        ids.truncate(n);
        Some(ids)
    }

    // 門前 (暗槓と北抜きは門前扱い)
    pub fn is_menzen(&self) -> bool {
        !self.melds.iter().any(|m| m.is_open())
    }

    // 北抜きを除く副露数
    pub fn n_sets(&self) -> usize {
        self.melds.iter().filter(|m| m.is_set()).count()
    }

    pub fn n_kita(&self) -> usize {
        self.melds.len() - self.n_sets()
    }

    // 純手牌 + 3 x 副露 = 13 (打牌待ちは14)
    pub fn check_count(&self, expect_drawn: bool) -> RuleResult {
        let n = self.tiles.len() + self.n_sets() * 3;
        let expected = if expect_drawn { 14 } else { 13 };
        if n != expected {
            return Err(RuleError::invariant(format!(
                "hand size {} (expected {})",
                n, expected
            )));
        }
        Ok(())
    }

    pub fn all_ids(&self) -> Vec<TileId> {
        let mut ids = self.tiles.clone();
        for m in &self.melds {
            ids.extend(m.tiles.iter().copied());
        }
        ids
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.tiles.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", tiles.join(""))?;
        for m in &self.melds {
            write!(f, " [{}]", m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> Hand {
        Hand::new(tile_ids_from_string(s).unwrap())
    }

    #[test]
    fn draw_and_remove_keep_order() {
        let mut h = hand("m123p456s789z1122");
        let id = tile_ids_from_string("z7").unwrap()[0];
        h.draw(id);
        assert_eq!(h.drawn, Some(id));
        assert!(h.check_count(true).is_ok());
        assert!(h.tiles.windows(2).all(|w| w[0] < w[1]));
        h.remove(id).unwrap();
        assert_eq!(h.drawn, None);
        assert!(h.check_count(false).is_ok());
        assert!(h.remove(id).is_err());
    }

    #[test]
    fn find_prefers_plain_five() {
        let h = hand("p05");
        let id = h.find(Tile(TP, 5)).unwrap();
        assert!(!id.is_red());
        let two = h.find_n(Tile(TP, 5), 2).unwrap();
        assert_eq!(two.len(), 2);
        assert!(h.find_n(Tile(TP, 5), 3).is_none());
    }

    #[test]
    fn kita_is_not_a_set() {
        let mut h = hand("m123p456s789z1122");
        let north = TileId::new(Tile(TZ, WN), 0);
        h.melds.push(Meld::new(MeldType::Kita, vec![north], None));
        assert_eq!(h.n_sets(), 0);
        assert_eq!(h.n_kita(), 1);
        assert!(h.is_menzen());
        assert!(h.check_count(false).is_ok());
    }
}
