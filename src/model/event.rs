use super::*;

// 確定した状態遷移の通知 (Listenerには不変参照で渡される)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Begin(EventBegin),     // ゲーム開始
    New(EventNew),         // 局開始
    Deal(EventDeal),       // ツモ
    Discard(EventDiscard), // 打牌
    Riichi(EventRiichi),   // リーチ宣言
    Meld(EventMeld),       // 鳴き (北抜きを含む)
    Dora(EventDora),       // 新ドラ
    Win(EventWin),         // 局終了 (和了)
    Draw(EventDraw),       // 局終了 (流局)
    End(EventEnd),         // ゲーム終了
}

impl Event {
    #[inline]
    pub fn begin(rule: &Rule, scores: Vec<Score>) -> Self {
        Self::Begin(EventBegin {
            rule: rule.clone(),
            scores,
        })
    }

    #[inline]
    pub fn new(stg: &Stage) -> Self {
        Self::New(EventNew {
            round: stg.round,
            dealer: stg.dealer,
            honba: stg.honba,
            riichi_sticks: stg.riichi_sticks,
            doras: stg.dora_indicators(),
            scores: stg.get_scores(),
            hands: stg.players.iter().map(|p| p.hand.tiles.clone()).collect(),
            wall_count: stg.wall.remaining(),
        })
    }

    #[inline]
    pub fn deal(seat: Seat, tile: TileId, is_rinshan: bool) -> Self {
        Self::Deal(EventDeal {
            seat,
            tile,
            is_rinshan,
        })
    }

    #[inline]
    pub fn discard(seat: Seat, tile: TileId, is_drawn: bool, is_riichi: bool) -> Self {
        Self::Discard(EventDiscard {
            seat,
            tile,
            is_drawn,
            is_riichi,
        })
    }

    #[inline]
    pub fn riichi(seat: Seat, is_double: bool) -> Self {
        Self::Riichi(EventRiichi { seat, is_double })
    }

    #[inline]
    pub fn meld(seat: Seat, meld: Meld) -> Self {
        Self::Meld(EventMeld { seat, meld })
    }

    #[inline]
    pub fn dora(tile: Tile) -> Self {
        Self::Dora(EventDora { tile })
    }

    #[inline]
    pub fn win(
        contexts: Vec<WinContext>,
        doras: Vec<Tile>,
        ura_doras: Vec<Tile>,
        scores: Vec<Score>,
        delta_scores: Vec<Point>,
    ) -> Self {
        Self::Win(EventWin {
            contexts,
            doras,
            ura_doras,
            scores,
            delta_scores,
        })
    }

    #[inline]
    pub fn draw(
        draw_type: DrawType,
        hands: Vec<Vec<TileId>>,
        delta_scores: Vec<Point>,
        nagashimangan_scores: Vec<Point>,
    ) -> Self {
        Self::Draw(EventDraw {
            draw_type,
            hands,
            delta_scores,
            nagashimangan_scores,
        })
    }

    #[inline]
    pub fn end(scores: Vec<Score>) -> Self {
        Self::End(EventEnd { scores })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBegin {
    pub rule: Rule,
    pub scores: Vec<Score>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNew {
    pub round: usize,            // 場風
    pub dealer: Seat,            // 局
    pub honba: usize,            // 本場
    pub riichi_sticks: usize,    // 供託(リーチ棒)
    pub doras: Vec<Tile>,        // ドラ表示牌
    pub scores: Vec<Score>,      // 各プレイヤーの所持点
    pub hands: Vec<Vec<TileId>>, // 各プレイヤーの配牌(13枚)
    pub wall_count: usize,       // 牌山残り枚数
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDeal {
    pub seat: Seat,
    pub tile: TileId,     // ツモ牌
    pub is_rinshan: bool, // 嶺上牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiscard {
    pub seat: Seat,
    pub tile: TileId,
    pub is_drawn: bool,  // ツモ切り
    pub is_riichi: bool, // リーチ宣言牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRiichi {
    pub seat: Seat,
    pub is_double: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeld {
    pub seat: Seat,
    pub meld: Meld,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDora {
    pub tile: Tile, // 新ドラ表示牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWin {
    pub contexts: Vec<WinContext>,
    pub doras: Vec<Tile>,         // ドラ表示牌
    pub ura_doras: Vec<Tile>,     // 裏ドラ表示牌
    pub scores: Vec<Score>,       // 変化前のスコア
    pub delta_scores: Vec<Point>, // scores + delta_scores = new_scores
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraw {
    pub draw_type: DrawType,
    pub hands: Vec<Vec<TileId>>,          // 公開された手牌 (聴牌者, 九種九牌の宣言者など)
    pub delta_scores: Vec<Point>,         // 聴牌,流し満貫による点数変動
    pub nagashimangan_scores: Vec<Point>, // 流し満貫のスコア (該当者がいない場合すべて0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnd {
    pub scores: Vec<Score>,
}

// [DrawType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawType {
    Kyushukyuhai,   // 九種九牌
    Suufuurenda,    // 四風連打
    Suukansanra,    // 四槓散了
    Suuchariichi,   // 四家立直
    Sanchaho,       // 三家和
    Kouhaiheikyoku, // 荒廃平局
}

impl DrawType {
    #[inline]
    pub fn is_abortive(&self) -> bool {
        *self != DrawType::Kouhaiheikyoku
    }
}

impl fmt::Display for DrawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DrawType::Kyushukyuhai => "九種九牌",
                DrawType::Suufuurenda => "四風連打",
                DrawType::Suukansanra => "四槓散了",
                DrawType::Suuchariichi => "四家立直",
                DrawType::Sanchaho => "三家和",
                DrawType::Kouhaiheikyoku => "荒廃平局",
            }
        )
    }
}
