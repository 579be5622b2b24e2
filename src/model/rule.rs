use super::*;

// 卓のルール設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub sanma: bool,              // 三人麻雀
    pub red5: bool,               // 赤5 (m5, p5, s5 各1枚)
    pub round: usize,             // 1: 東風戦, 2: 半荘戦
    pub initial_score: Score,     // 配給原点
    pub settlement_score: Score,  // 1位がこの点数未満の場合は延長
    pub kuitan: bool,             // 喰いタン
    pub nagashi_mangan: bool,     // 流し満貫
    pub abort_order: Vec<DrawType>, // 有効な途中流局 (同時に成立した場合は先頭を優先)
    pub triple_ron_abort: bool,   // 三家和 (四麻のみ)
    pub bust_ends_game: bool,     // 飛び終了
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            sanma: false,
            red5: true,
            round: 2,
            initial_score: 25000,
            settlement_score: 30000,
            kuitan: true,
            nagashi_mangan: true,
            abort_order: vec![
                DrawType::Kyushukyuhai,
                DrawType::Suufuurenda,
                DrawType::Suukansanra,
                DrawType::Suuchariichi,
                DrawType::Sanchaho,
            ],
            triple_ron_abort: true,
            bust_ends_game: true,
        }
    }
}

impl Rule {
    pub fn sanma() -> Self {
        Self {
            sanma: true,
            ..Default::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    #[inline]
    pub fn n_seat(&self) -> usize {
        if self.sanma {
            3
        } else {
            4
        }
    }

    pub fn is_abort_enabled(&self, draw_type: DrawType) -> bool {
        if draw_type == DrawType::Sanchaho && (self.sanma || !self.triple_ron_abort) {
            return false;
        }
        self.abort_order.contains(&draw_type)
    }

    // 同時に成立した途中流局から優先されるものを選択
    pub fn pick_abort(&self, triggered: &[DrawType]) -> Option<DrawType> {
        self.abort_order
            .iter()
            .copied()
            .find(|d| triggered.contains(d) && self.is_abort_enabled(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fields_are_optional() {
        let rule = Rule::from_json(r#"{"sanma": true, "round": 1}"#).unwrap();
        assert!(rule.sanma);
        assert_eq!(rule.round, 1);
        assert_eq!(rule.initial_score, 25000);
        assert_eq!(rule.n_seat(), 3);
    }

    #[test]
    fn abort_precedence_follows_order() {
        let mut rule = Rule::default();
        let both = [DrawType::Suuchariichi, DrawType::Suufuurenda];
        assert_eq!(rule.pick_abort(&both), Some(DrawType::Suufuurenda));

        rule.abort_order = vec![DrawType::Suuchariichi, DrawType::Suufuurenda];
        assert_eq!(rule.pick_abort(&both), Some(DrawType::Suuchariichi));

        rule.abort_order = vec![];
        assert_eq!(rule.pick_abort(&both), None);
    }

    #[test]
    fn no_triple_ron_abort_in_sanma() {
        assert!(Rule::default().is_abort_enabled(DrawType::Sanchaho));
        assert!(!Rule::sanma().is_abort_enabled(DrawType::Sanchaho));
    }
}
