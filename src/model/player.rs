use super::*;
use crate::hand::Furiten;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Player {
    pub seat: Seat,             // 座席番号(場・局が変わってもゲーム終了まで不変)
    pub score: Score,           // 得点
    pub hand: Hand,             // 手牌 + 鳴き
    pub discards: Vec<Discard>, // 捨て牌一覧 (鳴かれた牌は除く)
    pub riichi: Option<Index>,  // リーチ宣言牌のdiscardsにおけるindex
    pub n_kan: usize,           // 槓の回数 (四槓散了判定用)

    // 聴牌
    pub win_tiles: Vec<Tile>, // 聴牌時の和了牌
    pub furiten: Furiten,     // フリテン状態

    // 条件役用のフラグ 天和,地和,海底など和了のタイミングで発生する役はここに含まない
    pub is_riichi: bool,  // リーチ (ダブルリーチを含む)
    pub is_daburii: bool, // ダブルリーチ
    pub is_ippatsu: bool, // 一発 立直後にセットして次の打牌または鳴きでfalseをセット
    pub is_rinshan: bool, // 槓の操作中にtrueをセット 打牌でfalseをセット
    pub is_nagashi: bool, // 流し満貫の権利 (么九牌以外の打牌または鳴かれた時点でfalse)
}

impl Player {
    pub fn new(seat: Seat, score: Score, tiles: Vec<TileId>) -> Self {
        Self {
            seat,
            score,
            hand: Hand::new(tiles),
            is_nagashi: true,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_menzen(&self) -> bool {
        self.hand.is_menzen()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let drawn = match self.hand.drawn {
            Some(d) => d.to_string(),
            None => "None".to_string(),
        };
        let discards: Vec<String> = self.discards.iter().map(|d| d.to_string()).collect();
        writeln!(
            f,
            "seat: {}, score: {}, riichi: {:?}, drawn: {}",
            self.seat, self.score, self.riichi, drawn,
        )?;
        writeln!(
            f,
            "furiten: {:?}, rinshan: {}, win_tiles: {:?}",
            self.furiten.kind(&self.win_tiles),
            self.is_rinshan,
            self.win_tiles,
        )?;
        writeln!(f, "hand: {}", self.hand)?;
        write!(f, "discards: {}", discards.join(" "))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Discard {
    pub step: usize,
    pub tile: TileId,
    pub is_drawn: bool,  // ツモ切り
    pub is_riichi: bool, // リーチ宣言牌
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tile)?;
        if self.is_riichi {
            write!(f, "*")?;
        }
        Ok(())
    }
}
