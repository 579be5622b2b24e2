use serde::{de, ser};

use super::*;

// 牌種 (type index, number index)
// 数牌の数字は1~9, 字牌は東南西北白發中=1~7
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(pub Type, pub Tnum);

impl Tile {
    // 0~33の牌種番号から変換
    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self(i / 9, i % 9 + 1)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 * 9 + self.1 - 1
    }

    pub fn from_symbol(s: &str) -> Result<Self, String> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(format!("invalid tile symbol: '{}'", s));
        }
        let ti = tile_type_from_char(chars[0])?;
        let ni = tile_number_from_char(chars[1])?;
        if ti == TZ && !(1..=DR).contains(&ni) {
            return Err(format!("invalid honor tile: '{}'", s));
        }
        Ok(Self(ti, if ni == 0 { 5 } else { ni }))
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_honor(&self) -> bool {
        self.0 == TZ
    }

    // 1,9牌
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.0 != TZ && (self.1 == 1 || self.1 == 9)
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 中張牌
    #[inline]
    pub fn is_simple(&self) -> bool {
        !self.is_end()
    }

    // 風牌
    #[inline]
    pub fn is_wind(&self) -> bool {
        self.0 == TZ && self.1 <= WN
    }

    // 三元牌
    #[inline]
    pub fn is_doragon(&self) -> bool {
        self.0 == TZ && DW <= self.1 && self.1 <= DR
    }

    // 緑一色の構成牌 (s23468, 發)
    pub fn is_green(&self) -> bool {
        match self.0 {
            TS => matches!(self.1, 2 | 3 | 4 | 6 | 8),
            TZ => self.1 == DG,
            _ => false,
        }
    }

    // 三麻で抜かれる牌 (m2~m8)
    #[inline]
    pub fn is_sanma_removed(&self) -> bool {
        self.0 == TM && (2..=8).contains(&self.1)
    }

    // ドラ表示牌に対するドラ
    pub fn next_dora(self, is_sanma: bool) -> Self {
        let Tile(ti, ni) = self;
        if ti == TZ {
            return match ni {
                WN => Tile(TZ, WE),
                DR => Tile(TZ, DW),
                _ => Tile(TZ, ni + 1),
            };
        }
        if is_sanma && ti == TM {
            // 三麻の萬子は1と9のみ
            return if ni == 1 { Tile(TM, 9) } else { Tile(TM, 1) };
        }
        Tile(ti, if ni == 9 { 1 } else { ni + 1 })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ['m', 'p', 's', 'z'][self.0], self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

pub fn tile_type_from_char(c: char) -> Result<Type, String> {
    Ok(match c {
        'm' => TM,
        'p' => TP,
        's' => TS,
        'z' => TZ,
        _ => return Err(format!("invalid tile type: '{}'", c)),
    })
}

pub fn tile_number_from_char(c: char) -> Result<Tnum, String> {
    c.to_digit(10)
        .map(|n| n as Tnum)
        .ok_or_else(|| format!("invalid tile number: '{}'", c))
}

// [TileId]
// 牌の個体番号 (0~135). 牌種 = id / 4
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    #[inline]
    pub fn new(tile: Tile, copy: usize) -> Self {
        Self((tile.index() * TILE + copy) as u8)
    }

    #[inline]
    pub fn tile(self) -> Tile {
        Tile::from_index(self.0 as usize / TILE)
    }

    #[inline]
    pub fn copy(self) -> usize {
        self.0 as usize % TILE
    }

    #[inline]
    pub fn is_red(self) -> bool {
        RED5_IDS.contains(&self.0)
    }

    // 卓で使用する牌の一覧 (三麻はm2~m8を除く108枚)
    pub fn all(is_sanma: bool) -> Vec<TileId> {
        (0..TILE_ID_MAX as u8)
            .map(TileId)
            .filter(|t| !(is_sanma && t.tile().is_sanma_removed()))
            .collect()
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.tile();
        if self.is_red() {
            write!(f, "{}0", ['m', 'p', 's', 'z'][t.0])
        } else {
            write!(f, "{}", t)
        }
    }
}

impl fmt::Debug for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self, self.0)
    }
}

// "m123p406z11" 形式の文字列を牌種のリストに変換 (0は赤5として5と同じ牌種)
pub fn tiles_from_string(exp: &str) -> Result<Vec<Tile>, String> {
    Ok(tile_symbols(exp)?.into_iter().map(|(t, _)| t).collect())
}

// 文字列を個体番号のリストに変換
pub fn tile_ids_from_string(exp: &str) -> Result<Vec<TileId>, String> {
    let mut used = [false; TILE_ID_MAX];
    allocate_tile_ids(exp, &mut used)
}

// 0は赤5の個体, それ以外は未使用の個体を若い番号から割り当てる (赤5の個体は避ける)
pub fn allocate_tile_ids(exp: &str, used: &mut [bool; TILE_ID_MAX]) -> Result<Vec<TileId>, String> {
    let mut ids = vec![];
    for (t, red) in tile_symbols(exp)? {
        let id = if red {
            let id = TileId::new(t, 0);
            if used[id.0 as usize] {
                return Err(format!("red five used twice: {}", t));
            }
            id
        } else {
            (0..TILE)
                .map(|c| TileId::new(t, c))
                .find(|id| !used[id.0 as usize] && !id.is_red())
                .ok_or_else(|| format!("too many copies of {}", t))?
        };
        used[id.0 as usize] = true;
        ids.push(id);
    }
    Ok(ids)
}

fn tile_symbols(exp: &str) -> Result<Vec<(Tile, bool)>, String> {
    let mut res = vec![];
    let mut ti = None;
    for c in exp.chars() {
        match c {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(c)?),
            '0'..='9' => {
                let ti = ti.ok_or_else(|| "tile number before tile type".to_string())?;
                let ni = tile_number_from_char(c)?;
                if ti == TZ && (ni == 0 || ni > DR) {
                    return Err(format!("invalid honor tile: z{}", ni));
                }
                res.push((Tile(ti, if ni == 0 { 5 } else { ni }), ni == 0));
            }
            ' ' => {}
            _ => return Err(format!("invalid char: '{}'", c)),
        }
    }
    Ok(res)
}

// [TileTable]
// 牌種毎の枚数 table[type][number] (number=0は未使用)
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

pub fn tile_table_from_tiles(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for t in tiles {
        tt[t.0][t.1] += 1;
    }
    tt
}

pub fn tile_table_from_ids(ids: &[TileId]) -> TileTable {
    let mut tt = TileTable::default();
    for id in ids {
        let t = id.tile();
        tt[t.0][t.1] += 1;
    }
    tt
}

pub fn tiles_from_tile_table(tt: &TileTable) -> Vec<Tile> {
    let mut tiles = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            for _ in 0..tt[ti][ni] {
                tiles.push(Tile(ti, ni));
            }
        }
    }
    tiles
}

// シャンテン数のメモ化キー用の34要素配列
pub fn tile_counts(tt: &TileTable) -> [u8; KIND] {
    let mut cnt = [0; KIND];
    for (i, c) in cnt.iter_mut().enumerate() {
        let t = Tile::from_index(i);
        *c = tt[t.0][t.1] as u8;
    }
    cnt
}

pub fn count_tiles(tt: &TileTable) -> usize {
    tt.iter().map(|r| r.iter().sum::<usize>()).sum()
}
