use super::*;
use crate::hand::Decomposition;

pub type Points = (Point, Point, Point); // (ロンの支払い, ツモ・子の支払い, ツモ・親の支払い)

// 和了手の評価結果 (本場・供託は含まない)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreContext {
    pub yakus: Vec<(String, usize)>, // 役一覧(ドラを含む), Vec<(name, fan)> 役満の場合は倍率
    pub fu: usize,                   // 符数
    pub fan: usize,                  // 飜数(ドラを含む), 役満の場合は0
    pub yakuman: usize,              // 役満倍率 (0: 通常役, 1: 役満, 2: 二倍役満, ...)
    pub score: Point,                // 和了得点
    pub points: Points,              // 支払い得点の内訳
    pub title: String,               // 満貫, 跳満, ...
    pub decomposition: Decomposition, // 採用した和了形の分解
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinContext {
    pub seat: Seat,
    pub hand: Vec<TileId>,      // 和了手牌(鳴きと和了牌は含まない)
    pub winning_tile: TileId,   // 和了牌
    pub melds: Vec<Meld>,       // 鳴き
    pub from: Option<Seat>,     // 放銃者 (ツモの場合はNone)
    pub is_dealer: bool,
    pub is_riichi: bool,
    pub delta_scores: Vec<Point>, // この和了による点数変動 (本場・供託を含む)
    pub score_context: ScoreContext,
}
