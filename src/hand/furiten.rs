use serde::{Deserialize, Serialize};

use crate::error::{FuritenKind, RuleError, RuleResult};
use crate::model::*;

// フリテン状態 (局ごとにリセット)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Furiten {
    discarded: TileTable, // 自分が捨てた牌種 (鳴かれた牌を含む)
    is_temporary: bool,   // 同巡内フリテン 次の自分のツモで解除
    is_riichi: bool,      // リーチ後の見逃し 局終了まで解除されない
}

impl Furiten {
    #[inline]
    pub fn on_discard(&mut self, t: Tile) {
        self.discarded[t.0][t.1] += 1;
    }

    // ロン可能な牌を見逃した
    pub fn on_missed_win(&mut self, is_riichi: bool) {
        if is_riichi {
            self.is_riichi = true;
        } else {
            self.is_temporary = true;
        }
    }

    // 自分のツモ番 (ツモまたは鳴き)
    #[inline]
    pub fn on_turn(&mut self) {
        self.is_temporary = false;
    }

    pub fn has_discarded(&self, t: Tile) -> bool {
        self.discarded[t.0][t.1] > 0
    }

    // 現在の待ちに対するフリテンの種類 (複数該当する場合は解除されにくいものを優先)
    pub fn kind(&self, waits: &[Tile]) -> Option<FuritenKind> {
        if waits.iter().any(|&t| self.has_discarded(t)) {
            Some(FuritenKind::Permanent)
        } else if self.is_riichi {
            Some(FuritenKind::Riichi)
        } else if self.is_temporary {
            Some(FuritenKind::Temporary)
        } else {
            None
        }
    }

    // ロンの可否 ツモ和了はフリテンの影響を受けない
    pub fn check_ron(&self, waits: &[Tile]) -> RuleResult {
        match self.kind(waits) {
            Some(k) => Err(RuleError::FuritenViolation(k)),
            None => Ok(()),
        }
    }
}
