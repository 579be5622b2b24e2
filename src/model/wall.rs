use rand::prelude::*;

use super::*;
use crate::error::{RuleError, RuleResult};

// 牌山
// 王牌14枚: [0,2,4,6,8]ドラ表示牌, [1,3,5,7,9]裏ドラ表示牌, [13,12,11,10]嶺上牌
#[derive(Debug, Clone, Serialize)]
pub struct Wall {
    live: Vec<TileId>, // ツモ山 (先頭からツモ)
    dead: Vec<TileId>, // 王牌
    n_deal: usize,     // ツモ山から引いた枚数
    n_rinshan: usize,  // 嶺上牌から引いた枚数 (海底がその分前にずれる)
    n_dora: usize,     // 公開済みのドラ表示牌の数
    is_sanma: bool,
}

impl Wall {
    pub fn new(seed: u64, is_sanma: bool) -> Self {
        let mut tiles = TileId::all(is_sanma);
        let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        let dead = tiles.split_off(tiles.len() - DEAD_WALL);
        Self::from_parts(tiles, dead, is_sanma)
    }

    fn from_parts(live: Vec<TileId>, dead: Vec<TileId>, is_sanma: bool) -> Self {
        Self {
            live,
            dead,
            n_deal: 0,
            n_rinshan: 0,
            n_dora: 1,
            is_sanma,
        }
    }

    // 牌譜再生用: 並び順が決まった牌山から生成 (末尾14枚が王牌)
    pub fn from_tiles(mut tiles: Vec<TileId>, is_sanma: bool) -> RuleResult<Self> {
        let mut expected = TileId::all(is_sanma);
        let mut sorted = tiles.clone();
        sorted.sort();
        expected.sort();
        if sorted != expected {
            return Err(RuleError::invariant("wall is not a complete tile set"));
        }
        let dead = tiles.split_off(tiles.len() - DEAD_WALL);
        Ok(Self::from_parts(tiles, dead, is_sanma))
    }

    // 配牌とツモ順を指定した牌山を生成 指定がない場所はシード値に従ってランダムに配置
    // hands: 親から順に配られる手牌, deals: その後のツモ順, dead: 王牌の先頭から
    pub fn arranged(
        hands: &[&str],
        deals: &str,
        dead: &str,
        is_sanma: bool,
        seed: u64,
    ) -> RuleResult<Self> {
        let mut used = [false; TILE_ID_MAX];
        let alloc = |exp: &str, used: &mut [bool; TILE_ID_MAX]| {
            allocate_tile_ids(exp, used).map_err(RuleError::illegal)
        };
        let hands: Vec<Vec<TileId>> = hands
            .iter()
            .map(|h| alloc(*h, &mut used))
            .collect::<RuleResult<_>>()?;
        let deals = alloc(deals, &mut used)?;
        let dead_head = alloc(dead, &mut used)?;
        if hands.iter().any(|h| h.len() > 13) || dead_head.len() > DEAD_WALL {
            return Err(RuleError::illegal("too many arranged tiles"));
        }

        let mut rest: Vec<TileId> = TileId::all(is_sanma)
            .into_iter()
            .filter(|t| !used[t.0 as usize])
            .collect();
        if hands.iter().flatten().chain(&deals).chain(&dead_head).any(|t| {
            is_sanma && t.tile().is_sanma_removed()
        }) {
            return Err(RuleError::illegal("tile not used in sanma"));
        }
        let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(seed);
        rest.shuffle(&mut rng);

        let mut take = |n: usize| -> RuleResult<Vec<TileId>> {
            if rest.len() < n {
                return Err(RuleError::illegal("not enough tiles left"));
            }
            Ok(rest.split_off(rest.len() - n))
        };

        let n_seat = if is_sanma { 3 } else { 4 };
        let mut live = vec![];
        for s in 0..n_seat {
            let h = hands.get(s).cloned().unwrap_or_default();
            live.extend(take(13 - h.len())?);
            let pos = live.len() - (13 - h.len());
            live.splice(pos..pos, h);
        }
        live.extend(deals.iter().copied());
        let mut dead = dead_head.clone();
        dead.extend(take(DEAD_WALL - dead_head.len())?);
        live.append(&mut rest);

        Ok(Self::from_parts(live, dead, is_sanma))
    }

    #[inline]
    pub fn is_sanma(&self) -> bool {
        self.is_sanma
    }

    // ツモ山の残り枚数
    #[inline]
    pub fn remaining(&self) -> usize {
        self.live.len().saturating_sub(self.n_deal + self.n_rinshan)
    }

    pub fn draw(&mut self) -> Option<TileId> {
        if self.remaining() == 0 {
            return None;
        }
        let t = self.live[self.n_deal];
        self.n_deal += 1;
        Some(t)
    }

    pub fn draw_tiles(&mut self, n: usize) -> RuleResult<Vec<TileId>> {
        (0..n)
            .map(|_| self.draw().ok_or_else(|| RuleError::invariant("wall exhausted while dealing")))
            .collect()
    }

    // 嶺上牌 (最大4枚)
    pub fn draw_rinshan(&mut self) -> Option<TileId> {
        if self.n_rinshan >= 4 || self.remaining() == 0 {
            return None;
        }
        let t = self.dead[DEAD_WALL - 1 - self.n_rinshan];
        self.n_rinshan += 1;
        Some(t)
    }

    #[inline]
    pub fn n_rinshan(&self) -> usize {
        self.n_rinshan
    }

    // 新ドラ表示牌をめくる (最大5枚)
    pub fn reveal_dora(&mut self) -> Option<TileId> {
        if self.n_dora >= 5 {
            return None;
        }
        self.n_dora += 1;
        Some(self.dead[(self.n_dora - 1) * 2])
    }

    pub fn dora_indicators(&self) -> Vec<TileId> {
        (0..self.n_dora).map(|i| self.dead[i * 2]).collect()
    }

    pub fn ura_indicators(&self) -> Vec<TileId> {
        (0..self.n_dora).map(|i| self.dead[i * 2 + 1]).collect()
    }

    // まだ牌山に残っている牌 (牌の保存則の検証用)
    pub fn unseen(&self) -> Vec<TileId> {
        let mut v = self.live[self.n_deal..].to_vec();
        v.extend(self.dead[..DEAD_WALL - self.n_rinshan].iter().copied());
        v
    }

    pub fn total(&self) -> usize {
        self.live.len() + self.dead.len()
    }
}
