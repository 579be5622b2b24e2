use super::*;

// 局の状態
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub rule: Rule,                                  // 卓のルール
    pub round: usize,                                // 場 (東:0, 南:1, 西:2, 北:3)
    pub dealer: Seat,                                // 局 (親のseat)
    pub honba: usize,                                // 本場
    pub riichi_sticks: usize,                        // リーチ棒の供託
    pub turn: Seat,                                  // ツモ番のプレイヤーの座席
    pub step: usize,                                 // イベント毎に+1する
    pub wall: Wall,                                  // 牌山
    pub players: Vec<Player>,                        // 各プレイヤー情報
    pub n_kan: usize,                                // 卓全体の槓の回数
    pub n_call: usize,                               // 卓全体の鳴き(暗槓を含む)の回数 (一巡目判定用)
    pub last_tile: Option<(Seat, ActionType, TileId)>, // 他家にロンされる可能性のある牌(捨て牌,槍槓)
    pub last_riichi: Option<Seat>,                   // リーチがロンされずに成立した場合の供託更新用
}

impl Stage {
    pub fn new(
        rule: &Rule,
        round: usize,
        dealer: Seat,
        honba: usize,
        riichi_sticks: usize,
        scores: &[Score],
        wall: Wall,
    ) -> Self {
        let players = scores
            .iter()
            .enumerate()
            .map(|(s, &score)| Player::new(s, score, vec![]))
            .collect();
        Self {
            rule: rule.clone(),
            round,
            dealer,
            honba,
            riichi_sticks,
            turn: dealer,
            step: 0,
            wall,
            players,
            n_kan: 0,
            n_call: 0,
            last_tile: None,
            last_riichi: None,
        }
    }

    #[inline]
    pub fn n_seat(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_dealer(&self, seat: Seat) -> bool {
        seat == self.dealer
    }

    #[inline]
    pub fn is_sanma(&self) -> bool {
        self.rule.sanma
    }

    #[inline]
    pub fn next_seat(&self, seat: Seat) -> Seat {
        (seat + 1) % self.n_seat()
    }

    #[inline]
    pub fn get_prevalent_wind(&self) -> Tnum {
        self.round % SEAT + 1 // WE | WS | WW | WN
    }

    #[inline]
    pub fn get_seat_wind(&self, seat: Seat) -> Tnum {
        let n = self.n_seat();
        (seat + n - self.dealer) % n + 1 // WE | WS | WW | WN
    }

    pub fn get_scores(&self) -> Vec<Score> {
        self.players.iter().map(|p| p.score).collect()
    }

    pub fn dora_indicators(&self) -> Vec<Tile> {
        self.wall.dora_indicators().iter().map(|t| t.tile()).collect()
    }

    // 鳴きが入っておらず, 対象のプレイヤーがまだ打牌していない (ダブルリーチ,九種九牌,天和,地和)
    pub fn is_first_turn(&self, seat: Seat) -> bool {
        self.n_call == 0 && self.players[seat].discards.is_empty()
    }

    // 牌山,手牌,鳴き,河にあるすべての牌
    pub fn all_tile_ids(&self) -> Vec<TileId> {
        let mut ids = self.wall.unseen();
        for p in &self.players {
            ids.extend(p.hand.all_ids());
            ids.extend(p.discards.iter().map(|d| d.tile));
        }
        ids
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doras: Vec<String> = self.dora_indicators().iter().map(|t| t.to_string()).collect();
        writeln!(
            f,
            "round: {}, dealer: {}, honba: {}, riichi_sticks: {}",
            self.round, self.dealer, self.honba, self.riichi_sticks,
        )?;
        writeln!(
            f,
            "turn: {}, wall_count: {}, doras: [{}], last_tile: {:?}",
            self.turn,
            self.wall.remaining(),
            doras.join(", "),
            self.last_tile,
        )?;

        let boader = "-".repeat(80);
        write!(f, "{}", boader)?;
        for p in &self.players {
            writeln!(f)?;
            writeln!(f, "{}", p)?;
            write!(f, "{}", boader)?;
        }
        Ok(())
    }
}
