use log::info;
use rand::prelude::*;

use super::engine::{RoundEngine, RoundResult};
use crate::actor::Actor;
use crate::error::{RuleError, RuleResult};
use crate::hand::ScoreTable;
use crate::listener::{EventBus, Listener};
use crate::model::*;

// 次局の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRoundInfo {
    pub round: usize,
    pub dealer: Seat,
    pub honba: usize,
    pub riichi_sticks: usize,
    pub scores: Vec<Score>,
}

impl NextRoundInfo {
    fn change_dealer(&mut self) {
        self.dealer += 1;
        if self.dealer == self.scores.len() {
            self.dealer = 0;
            self.round += 1;
        }
    }
}

// 持ち点の順位 同点の場合は起家に近い方が上位
pub fn calc_rank(scores: &[Score], seat: Seat) -> usize {
    scores
        .iter()
        .enumerate()
        .filter(|&(s, &sc)| sc > scores[seat] || (sc == scores[seat] && s < seat))
        .count()
}

// [GameController]
// 局を繰り返し実行し,親の移動,本場,供託,終了判定を管理する
pub struct GameController {
    rule: Rule,
    rng: StdRng,
    actors: Vec<Box<dyn Actor>>,
    listener: EventBus,
    table: &'static ScoreTable,
    next: NextRoundInfo,
    played: Option<(usize, Seat)>, // 直前に行った局 (場, 親)
    last_stage: Option<Stage>,
    results: Vec<RoundResult>,
}

impl GameController {
    pub fn new(
        rule: Rule,
        seed: u64,
        actors: Vec<Box<dyn Actor>>,
        listener: EventBus,
    ) -> RuleResult<Self> {
        let n = rule.n_seat();
        if actors.len() != n {
            return Err(RuleError::invariant(format!(
                "{} actors for {} seats",
                actors.len(),
                n
            )));
        }
        let next = NextRoundInfo {
            round: 0,
            dealer: 0,
            honba: 0,
            riichi_sticks: 0,
            scores: vec![rule.initial_score; n],
        };
        Ok(Self {
            rule,
            rng: StdRng::seed_from_u64(seed),
            actors,
            listener,
            table: ScoreTable::global(),
            next,
            played: None,
            last_stage: None,
            results: vec![],
        })
    }

    #[inline]
    pub fn next_round(&self) -> &NextRoundInfo {
        &self.next
    }

    #[inline]
    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn get_scores(&self) -> &[Score] {
        &self.next.scores
    }

    fn notify(&mut self, stg: &Stage, event: &Event) {
        self.listener.notify_event(stg, event);
        for a in self.actors.iter_mut() {
            a.notify_event(stg, event);
        }
    }

    // 対戦終了まで局を繰り返す 最終的な持ち点を返却
    pub fn run(&mut self) -> RuleResult<Vec<Score>> {
        let stg = self.empty_stage();
        let ev = Event::begin(&self.rule, self.next.scores.clone());
        self.notify(&stg, &ev);

        loop {
            let wall = Wall::new(self.rng.gen(), self.rule.sanma);
            self.run_round(wall)?;
            if self.is_game_end() {
                break;
            }
        }

        // 残った供託は1位が受け取る
        if self.next.riichi_sticks != 0 {
            let top = (0..self.next.scores.len())
                .find(|&s| calc_rank(&self.next.scores, s) == 0)
                .unwrap_or(0);
            self.next.scores[top] += 1000 * self.next.riichi_sticks as Score;
            self.next.riichi_sticks = 0;
        }

        let stg = self.last_stage.take().unwrap_or_else(|| self.empty_stage());
        let ev = Event::end(self.next.scores.clone());
        self.notify(&stg, &ev);
        info!("game end: {:?}", self.next.scores);
        Ok(self.next.scores.clone())
    }

    // 牌山を指定して1局を実行
    pub fn run_round(&mut self, wall: Wall) -> RuleResult<RoundResult> {
        let n = &self.next;
        let stg = Stage::new(
            &self.rule,
            n.round,
            n.dealer,
            n.honba,
            n.riichi_sticks,
            &n.scores,
            wall,
        );
        let mut engine = RoundEngine::new(stg, &mut self.actors, &mut self.listener, self.table)?;
        let res = engine.run()?;
        let stg = engine.stage().clone();

        self.played = Some((stg.round, stg.dealer));
        self.next.scores = res.scores.clone();
        self.next.honba = res.honba;
        self.next.riichi_sticks = res.riichi_sticks;
        if !res.dealer_continues {
            self.next.change_dealer();
        }
        self.last_stage = Some(stg);
        self.results.push(res.clone());
        Ok(res)
    }

    pub fn is_game_end(&self) -> bool {
        let rule = &self.rule;
        let scores = &self.next.scores;

        // 飛びによる対戦終了
        if rule.bust_ends_game && scores.iter().any(|&s| s < 0) {
            return true;
        }

        // オーラスで親が所定の点数以上かつ1位の場合はゲーム終了
        if let Some((round, dealer)) = self.played {
            if round + 1 == rule.round
                && dealer == rule.n_seat() - 1
                && calc_rank(scores, dealer) == 0
                && scores[dealer] >= rule.settlement_score
            {
                return true;
            }
        }

        // 延長時の対戦終了判定 (親が1位以外でオーラスが終了した場合も含む)
        if self.next.round == rule.round && scores.iter().any(|&s| s >= rule.settlement_score) {
            return true;
        }

        // 延長(南入,西入)しても点差がつかない場合は強制終了
        self.next.round > rule.round
    }

    fn empty_stage(&self) -> Stage {
        Stage::new(
            &self.rule,
            self.next.round,
            self.next.dealer,
            self.next.honba,
            self.next.riichi_sticks,
            &self.next.scores,
            Wall::new(0, self.rule.sanma),
        )
    }
}
