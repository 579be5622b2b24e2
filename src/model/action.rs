use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Nop, // Turn: ツモ切り, Call: 鳴き,ロンのスキップ

    // Turn Actions
    Discard,      // 打牌
    Riichi,       // リーチ
    Ankan,        // 暗槓
    Kakan,        // 加槓
    Tsumo,        // ツモ
    Kyushukyuhai, // 九種九牌
    Kita,         // 北抜き

    // Call Actions (配列は鳴きにより手牌から消失する牌のリスト)
    Chi,    // チー
    Pon,    // ポン
    Minkan, // 明槓
    Ron,    // ロン
}

// tilesは操作により手牌からなくなる牌
// Chi, Ponなどの標的の牌はstage.last_tileを参照する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    pub tiles: Vec<TileId>,
}

impl Action {
    #[inline]
    pub fn new(action_type: ActionType, mut tiles: Vec<TileId>) -> Self {
        tiles.sort();
        Self { action_type, tiles }
    }

    #[inline]
    pub fn nop() -> Self {
        Self::new(ActionType::Nop, vec![])
    }

    #[inline]
    pub fn discard(t: TileId) -> Self {
        Self::new(ActionType::Discard, vec![t])
    }

    #[inline]
    pub fn riichi(t: TileId) -> Self {
        Self::new(ActionType::Riichi, vec![t])
    }

    #[inline]
    pub fn ankan(v: Vec<TileId>) -> Self {
        Self::new(ActionType::Ankan, v)
    }

    #[inline]
    pub fn kakan(t: TileId) -> Self {
        Self::new(ActionType::Kakan, vec![t])
    }

    #[inline]
    pub fn tsumo() -> Self {
        Self::new(ActionType::Tsumo, vec![])
    }

    #[inline]
    pub fn kyushukyuhai() -> Self {
        Self::new(ActionType::Kyushukyuhai, vec![])
    }

    #[inline]
    pub fn kita(t: TileId) -> Self {
        Self::new(ActionType::Kita, vec![t])
    }

    #[inline]
    pub fn chi(v: Vec<TileId>) -> Self {
        Self::new(ActionType::Chi, v)
    }

    #[inline]
    pub fn pon(v: Vec<TileId>) -> Self {
        Self::new(ActionType::Pon, v)
    }

    #[inline]
    pub fn minkan(v: Vec<TileId>) -> Self {
        Self::new(ActionType::Minkan, v)
    }

    #[inline]
    pub fn ron() -> Self {
        Self::new(ActionType::Ron, vec![])
    }

    // ロン > ポン・明槓 > チー > スキップ
    pub fn call_priority(&self) -> usize {
        match self.action_type {
            ActionType::Ron => 3,
            ActionType::Pon | ActionType::Minkan => 2,
            ActionType::Chi => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.tiles.iter().map(|t| t.to_string()).collect();
        write!(f, "{:?}[{}]", self.action_type, tiles.join(","))
    }
}

// 和了宣言の機会
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinOffer {
    Tsumo(TileId),               // ツモ和了
    Ron(Seat, TileId),           // 捨て牌へのロン (放銃者, 和了牌)
    Chankan(Seat, TileId),       // 加槓への槍槓 (加槓したプレイヤー, 和了牌)
}

impl WinOffer {
    pub fn tile(&self) -> TileId {
        match *self {
            WinOffer::Tsumo(t) | WinOffer::Ron(_, t) | WinOffer::Chankan(_, t) => t,
        }
    }

    pub fn is_tsumo(&self) -> bool {
        matches!(self, WinOffer::Tsumo(_))
    }
}

// 聴牌になる打牌の情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenpai {
    pub discard_tile: Tile,     // 聴牌になる打牌
    pub winning_tiles: Vec<Tile>, // 和了牌のリスト
    pub is_furiten: bool,       // フリテンの有無
}
