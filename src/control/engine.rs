use log::{debug, info, warn};

use super::possible_actions::*;
use crate::actor::{tsumogiri, Actor};
use crate::error::{RuleError, RuleResult};
use crate::hand::*;
use crate::listener::{EventBus, Listener};
use crate::model::*;

// 局の進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingDraw,    // ツモ (鳴き・槓の後は嶺上牌)
    AwaitingDiscard, // ツモ番のプレイヤーの操作待ち
    AwaitingCalls,   // 打牌に対するロン・鳴き待ち
    RoundEnd,
}

#[derive(Debug, Clone)]
enum Outcome {
    Tsumo(Seat, ScoreContext),
    Ron(Seat, Vec<(Seat, ScoreContext)>), // (放銃者, 放銃者から近い順の和了者)
    Draw(DrawType, Vec<Seat>),            // (流局の種類, 手牌を公開するプレイヤー)
}

// 局の結果と次局の情報
#[derive(Debug, Clone)]
pub struct RoundResult {
    pub wins: Vec<WinContext>,      // 和了 (流局の場合は空)
    pub draw_type: Option<DrawType>, // 流局
    pub delta_scores: Vec<Point>,   // 本場,供託を含む点数変動
    pub scores: Vec<Score>,         // 精算後の持ち点
    pub dealer_continues: bool,     // 連荘
    pub honba: usize,               // 次局の本場
    pub riichi_sticks: usize,       // 次局に持ち越す供託
}

impl RoundResult {
    pub fn is_draw(&self) -> bool {
        self.draw_type.is_some()
    }
}

// [RoundEngine]
// 1局分の状態遷移を管理する
// 状態はエンジンだけが変更し,遷移が確定するたびにListenerとActorへイベントを通知する
// Actorの不正な要求は警告を出して代替の操作に置き換え,InvariantViolationのみをエラーとして返す
pub struct RoundEngine<'a> {
    stg: Stage,
    actors: &'a mut [Box<dyn Actor>],
    listener: &'a mut EventBus,
    table: &'a ScoreTable,
    phase: RoundPhase,
    melding: Option<Action>, // 直前の鳴き・槓・北抜き (喰い替え,嶺上牌の判定用)
    outcome: Option<Outcome>,
    rejected: Vec<(Seat, RuleError)>,
}

impl<'a> RoundEngine<'a> {
    // stgは配牌前の状態 (Stage::newで生成したもの)
    pub fn new(
        stg: Stage,
        actors: &'a mut [Box<dyn Actor>],
        listener: &'a mut EventBus,
        table: &'a ScoreTable,
    ) -> RuleResult<Self> {
        if actors.len() != stg.n_seat() {
            return Err(RuleError::invariant(format!(
                "{} actors for {} seats",
                actors.len(),
                stg.n_seat()
            )));
        }
        Ok(Self {
            stg,
            actors,
            listener,
            table,
            phase: RoundPhase::AwaitingDraw,
            melding: None,
            outcome: None,
            rejected: vec![],
        })
    }

    #[inline]
    pub fn stage(&self) -> &Stage {
        &self.stg
    }

    #[inline]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    // 却下された要求の一覧 (InvariantViolation以外)
    #[inline]
    pub fn rejected(&self) -> &[(Seat, RuleError)] {
        &self.rejected
    }

    pub fn run(&mut self) -> RuleResult<RoundResult> {
        self.deal()?;
        while self.phase != RoundPhase::RoundEnd {
            match self.phase {
                RoundPhase::AwaitingDraw => self.do_draw()?,
                RoundPhase::AwaitingDiscard => self.do_turn()?,
                RoundPhase::AwaitingCalls => self.do_calls()?,
                RoundPhase::RoundEnd => {}
            }
            self.check_invariants()?;
        }
        self.settle()
    }

    fn emit(&mut self, event: Event) {
        self.stg.step += 1;
        self.listener.notify_event(&self.stg, &event);
        for a in self.actors.iter_mut() {
            a.notify_event(&self.stg, &event);
        }
    }

    fn reject(&mut self, seat: Seat, e: RuleError) -> RuleResult {
        if e.is_fatal() {
            return Err(e);
        }
        warn!("seat {}: {}", seat, e);
        self.rejected.push((seat, e));
        Ok(())
    }

    fn end_round(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = RoundPhase::RoundEnd;
    }

    // 牌の保存則と手牌の枚数
    fn check_invariants(&self) -> RuleResult {
        let mut ids = self.stg.all_tile_ids();
        ids.sort();
        if ids != TileId::all(self.stg.is_sanma()) {
            return Err(RuleError::invariant("tile conservation is broken"));
        }
        if self.phase == RoundPhase::RoundEnd {
            return Ok(());
        }
        for (s, p) in self.stg.players.iter().enumerate() {
            let expect_drawn = s == self.stg.turn && self.phase == RoundPhase::AwaitingDiscard;
            p.hand.check_count(expect_drawn)?;
        }
        Ok(())
    }

    // [Deal]
    fn deal(&mut self) -> RuleResult {
        let n = self.stg.n_seat();
        for i in 0..n {
            let s = (self.stg.dealer + i) % n;
            let tiles = self.stg.wall.draw_tiles(13)?;
            self.stg.players[s].hand = Hand::new(tiles);
        }
        for (s, a) in self.actors.iter_mut().enumerate() {
            a.init(s);
        }
        self.stg.turn = self.stg.dealer;
        self.phase = RoundPhase::AwaitingDraw;
        let ev = Event::new(&self.stg);
        self.emit(ev);
        self.check_invariants()
    }

    // [Draw]
    fn do_draw(&mut self) -> RuleResult {
        let seat = self.stg.turn;
        let is_rinshan = matches!(
            self.melding.as_ref().map(|a| a.action_type),
            Some(ActionType::Ankan | ActionType::Kakan | ActionType::Minkan | ActionType::Kita)
        );
        let t = if is_rinshan {
            self.stg
                .wall
                .draw_rinshan()
                .ok_or_else(|| RuleError::invariant("no rinshan tile left"))?
        } else {
            match self.stg.wall.draw() {
                Some(t) => t,
                None => {
                    self.end_round(Outcome::Draw(DrawType::Kouhaiheikyoku, vec![]));
                    return Ok(());
                }
            }
        };

        let pl = &mut self.stg.players[seat];
        pl.hand.draw(t);
        pl.is_rinshan = is_rinshan;
        pl.furiten.on_turn();
        self.phase = RoundPhase::AwaitingDiscard;
        self.emit(Event::deal(seat, t, is_rinshan));
        Ok(())
    }

    // [Turn]
    fn do_turn(&mut self) -> RuleResult {
        let seat = self.stg.turn;

        if let Some(d) = self.stg.players[seat].hand.drawn {
            if is_win(&self.stg.players[seat].hand.table())
                && self.actors[seat].request_win_declaration(&self.stg, WinOffer::Tsumo(d))
            {
                match evaluate_tsumo(&self.stg, seat, self.table) {
                    Ok(sc) => {
                        self.end_round(Outcome::Tsumo(seat, sc));
                        return Ok(());
                    }
                    Err(e) => self.reject(seat, e)?,
                }
            }
        }

        let acts: Vec<Action> =
            calc_possible_turn_actions(&self.stg, self.melding.as_ref(), self.table)
                .into_iter()
                .filter(|a| a.action_type != ActionType::Tsumo)
                .collect();
        let pl = &self.stg.players[seat];
        let tenpais = if pl.hand.is_riichi {
            vec![]
        } else {
            evaluate_tenpai_discards(&pl.hand.table(), &pl.furiten)
        };

        let act = self.actors[seat].request_discard(&self.stg, &acts, &tenpais);
        let act = if act.action_type == ActionType::Nop {
            tsumogiri(&self.stg, &acts)
        } else if is_legal_action(&acts, &act, &self.stg.players[seat].hand) {
            act
        } else {
            self.reject(seat, RuleError::illegal(format!("{} is not allowed", act)))?;
            tsumogiri(&self.stg, &acts)
        };
        debug!("seat {}: {}", seat, act);

        self.melding = None;
        match act.action_type {
            ActionType::Discard => self.discard(seat, act.tiles[0], false),
            ActionType::Riichi => self.discard(seat, act.tiles[0], true),
            ActionType::Ankan => self.ankan(seat, act),
            ActionType::Kakan => self.kakan(seat, act),
            ActionType::Kita => self.kita(seat, act),
            ActionType::Kyushukyuhai => {
                self.end_round(Outcome::Draw(DrawType::Kyushukyuhai, vec![seat]));
                Ok(())
            }
            _ => Err(RuleError::invariant(format!("no discard available for seat {}", seat))),
        }
    }

    fn discard(&mut self, seat: Seat, id: TileId, is_riichi: bool) -> RuleResult {
        let is_double = is_riichi && self.stg.is_first_turn(seat);
        let step = self.stg.step;
        let pl = &mut self.stg.players[seat];
        let is_drawn = pl.hand.drawn == Some(id);
        take_tiles(&mut pl.hand, &[id])?;
        pl.hand.drawn = None;
        if pl.is_riichi {
            pl.is_ippatsu = false;
        }
        if is_riichi {
            pl.hand.is_riichi = true;
            pl.is_riichi = true;
            pl.is_daburii = is_double;
            pl.is_ippatsu = true;
            pl.riichi = Some(pl.discards.len());
        }
        pl.discards.push(Discard {
            step,
            tile: id,
            is_drawn,
            is_riichi,
        });
        pl.furiten.on_discard(id.tile());
        if !id.tile().is_end() {
            pl.is_nagashi = false;
        }
        pl.is_rinshan = false;
        pl.win_tiles = calc_waits(&pl.hand.table());

        if is_riichi {
            self.stg.last_riichi = Some(seat);
        }
        let tp = if is_riichi {
            ActionType::Riichi
        } else {
            ActionType::Discard
        };
        self.stg.last_tile = Some((seat, tp, id));
        self.phase = RoundPhase::AwaitingCalls;
        self.emit(Event::discard(seat, id, is_drawn, is_riichi));
        Ok(())
    }

    fn ankan(&mut self, seat: Seat, act: Action) -> RuleResult {
        let pl = &mut self.stg.players[seat];
        take_tiles(&mut pl.hand, &act.tiles)?;
        pl.hand.drawn = None;
        let meld = Meld::new(MeldType::Ankan, act.tiles.clone(), None);
        pl.hand.melds.push(meld.clone());
        pl.n_kan += 1;
        self.stg.n_kan += 1;
        self.on_call();
        self.emit(Event::meld(seat, meld));

        // 暗槓は国士無双のみ槍槓が可能
        if self.offer_chankan(seat, ActionType::Ankan, act.tiles[0])? {
            return Ok(());
        }
        self.reveal_dora(); // 4回目の槓でもめくる
        self.melding = Some(act);
        self.phase = RoundPhase::AwaitingDraw;
        Ok(())
    }

    fn kakan(&mut self, seat: Seat, act: Action) -> RuleResult {
        let id = act.tiles[0];
        let pl = &mut self.stg.players[seat];
        let idx = pl
            .hand
            .melds
            .iter()
            .position(|m| m.meld_type == MeldType::Pon && m.tile() == id.tile())
            .ok_or_else(|| RuleError::invariant(format!("no pon to extend with {}", id)))?;
        take_tiles(&mut pl.hand, &[id])?;
        pl.hand.drawn = None;
        let m = &mut pl.hand.melds[idx];
        let mut tiles = m.tiles.clone();
        tiles.push(id);
        *m = Meld::new(MeldType::Kakan, tiles, m.from);
        let meld = m.clone();
        pl.n_kan += 1;
        self.stg.n_kan += 1;
        self.on_call();
        self.emit(Event::meld(seat, meld));

        if self.offer_chankan(seat, ActionType::Kakan, id)? {
            return Ok(());
        }
        self.reveal_dora();
        self.melding = Some(act);
        self.phase = RoundPhase::AwaitingDraw;
        Ok(())
    }

    fn kita(&mut self, seat: Seat, act: Action) -> RuleResult {
        let pl = &mut self.stg.players[seat];
        take_tiles(&mut pl.hand, &act.tiles)?;
        pl.hand.drawn = None;
        let meld = Meld::new(MeldType::Kita, act.tiles.clone(), None);
        pl.hand.melds.push(meld.clone());
        // 北抜きは鳴きとして数えないが一発は消える
        for p in &mut self.stg.players {
            p.is_ippatsu = false;
        }
        self.emit(Event::meld(seat, meld));
        self.melding = Some(act);
        self.phase = RoundPhase::AwaitingDraw;
        Ok(())
    }

    // 鳴き,槓による一巡の中断
    fn on_call(&mut self) {
        self.stg.n_call += 1;
        for p in &mut self.stg.players {
            p.is_ippatsu = false;
        }
    }

    // 槓ドラは槓の成立直後にめくる (四槓目を含め槓のたびに1枚)
    fn reveal_dora(&mut self) {
        if let Some(id) = self.stg.wall.reveal_dora() {
            self.emit(Event::dora(id.tile()));
        }
    }

    fn offer_chankan(&mut self, seat: Seat, tp: ActionType, id: TileId) -> RuleResult<bool> {
        self.stg.last_tile = Some((seat, tp, id));
        let winners = self.collect_rons(seat, tp, id)?;
        if winners.is_empty() {
            self.stg.last_tile = None;
            return Ok(false);
        }
        self.finish_ron(seat, winners);
        Ok(true)
    }

    // [Call]
    // 放銃者から近い順にロンの宣言を確認 (和了しなかった場合はフリテン)
    fn collect_rons(
        &mut self,
        from: Seat,
        tp: ActionType,
        id: TileId,
    ) -> RuleResult<Vec<(Seat, ScoreContext)>> {
        let n = self.stg.n_seat();
        let t = id.tile();
        let mut winners = vec![];
        for i in 1..n {
            let s = (from + i) % n;
            let mut tt = self.stg.players[s].hand.table();
            if !calc_waits(&tt).contains(&t) {
                continue;
            }
            if tp == ActionType::Ankan {
                tt[t.0][t.1] += 1;
                if !is_kokushimusou_win(&tt) {
                    continue;
                }
            }

            let offer = match tp {
                ActionType::Ankan | ActionType::Kakan => WinOffer::Chankan(from, id),
                _ => WinOffer::Ron(from, id),
            };
            let mut is_won = false;
            if self.actors[s].request_win_declaration(&self.stg, offer) {
                match evaluate_ron(&self.stg, s, self.table) {
                    Ok(sc) => {
                        winners.push((s, sc));
                        is_won = true;
                    }
                    Err(e) => self.reject(s, e)?,
                }
            }
            // 役なし・フリテンで却下された場合も見逃しと同じ扱い
            if !is_won {
                let pl = &mut self.stg.players[s];
                let is_riichi = pl.is_riichi;
                pl.furiten.on_missed_win(is_riichi);
            }
        }
        Ok(winners)
    }

    fn finish_ron(&mut self, from: Seat, winners: Vec<(Seat, ScoreContext)>) {
        if winners.len() == 3 && self.stg.rule.is_abort_enabled(DrawType::Sanchaho) {
            let seats = winners.iter().map(|(s, _)| *s).collect();
            self.end_round(Outcome::Draw(DrawType::Sanchaho, seats));
        } else {
            self.end_round(Outcome::Ron(from, winners));
        }
    }

    fn do_calls(&mut self) -> RuleResult {
        let (from, tp, id) = self
            .stg
            .last_tile
            .ok_or_else(|| RuleError::invariant("no discard to respond to"))?;

        let winners = self.collect_rons(from, tp, id)?;
        if !winners.is_empty() {
            self.finish_ron(from, winners);
            return Ok(());
        }

        // ロンされなかったのでリーチ成立
        if let Some(s) = self.stg.last_riichi.take() {
            let pl = &mut self.stg.players[s];
            pl.score -= 1000;
            let is_double = pl.is_daburii;
            self.stg.riichi_sticks += 1;
            self.emit(Event::riichi(s, is_double));
        }

        // ポン・槓 > チー 同じ優先度の場合は放銃者から近い方
        let acts_list = calc_possible_call_actions(&self.stg, self.table);
        let n = self.stg.n_seat();
        let mut best: Option<(Seat, Action)> = None;
        for i in 1..n {
            let s = (from + i) % n;
            let acts: Vec<Action> = acts_list[s]
                .iter()
                .filter(|a| a.action_type != ActionType::Ron)
                .cloned()
                .collect();
            if acts.len() <= 1 {
                continue;
            }
            let act = self.actors[s].request_call_decision(&self.stg, &acts);
            let act = if acts.contains(&act) {
                act
            } else {
                self.reject(s, RuleError::illegal(format!("{} is not allowed", act)))?;
                Action::nop()
            };
            if act.action_type == ActionType::Nop {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |(_, b)| act.call_priority() > b.call_priority())
            {
                best = Some((s, act));
            }
        }
        if let Some((s, act)) = best {
            return self.call(s, from, id, act);
        }

        let triggered = self.check_abortive_draws();
        if let Some(d) = self.stg.rule.pick_abort(&triggered) {
            let seats = if d == DrawType::Suuchariichi {
                (0..n).collect()
            } else {
                vec![]
            };
            self.end_round(Outcome::Draw(d, seats));
            return Ok(());
        }

        self.stg.last_tile = None;
        self.stg.turn = self.stg.next_seat(from);
        self.phase = RoundPhase::AwaitingDraw;
        Ok(())
    }

    fn call(&mut self, seat: Seat, from: Seat, id: TileId, act: Action) -> RuleResult {
        let meld_type = match act.action_type {
            ActionType::Chi => MeldType::Chi,
            ActionType::Pon => MeldType::Pon,
            ActionType::Minkan => MeldType::Minkan,
            _ => return Err(RuleError::invariant(format!("{} is not a call", act))),
        };

        // 鳴かれた牌は河から取り除く
        let discarder = &mut self.stg.players[from];
        match discarder.discards.pop() {
            Some(d) if d.tile == id => {}
            _ => return Err(RuleError::invariant("called tile is not the last discard")),
        }
        discarder.is_nagashi = false;

        let pl = &mut self.stg.players[seat];
        take_tiles(&mut pl.hand, &act.tiles)?;
        let mut tiles = act.tiles.clone();
        tiles.push(id);
        let meld = Meld::new(meld_type, tiles, Some((from, id)));
        pl.hand.melds.push(meld.clone());
        pl.furiten.on_turn();
        if meld_type == MeldType::Minkan {
            pl.n_kan += 1;
            self.stg.n_kan += 1;
        }
        self.on_call();
        self.stg.last_tile = None;
        self.stg.turn = seat;
        self.emit(Event::meld(seat, meld));

        if meld_type == MeldType::Minkan {
            self.reveal_dora();
            self.phase = RoundPhase::AwaitingDraw;
        } else {
            self.phase = RoundPhase::AwaitingDiscard;
        }
        self.melding = Some(act);
        Ok(())
    }

    // 打牌がロン・鳴きなしで通過した時点で成立した途中流局
    fn check_abortive_draws(&self) -> Vec<DrawType> {
        let stg = &self.stg;
        let pls = &stg.players;
        let mut res = vec![];

        if stg.n_seat() == 4 && stg.n_call == 0 && pls.iter().all(|p| p.discards.len() == 1) {
            let t = pls[0].discards[0].tile.tile();
            if t.is_wind() && pls.iter().all(|p| p.discards[0].tile.tile() == t) {
                res.push(DrawType::Suufuurenda);
            }
        }
        if stg.n_kan == 4 && !pls.iter().any(|p| p.n_kan == 4) {
            res.push(DrawType::Suukansanra);
        }
        if stg.n_seat() == 4 && pls.iter().all(|p| p.is_riichi) {
            res.push(DrawType::Suuchariichi);
        }
        res
    }

    // [Settlement]
    fn settle(&mut self) -> RuleResult<RoundResult> {
        let outcome = self
            .outcome
            .take()
            .ok_or_else(|| RuleError::invariant("round ended without a result"))?;
        let n = self.stg.n_seat();
        let honba = self.stg.honba;
        let sticks = self.stg.riichi_sticks;
        let scores = self.stg.get_scores();

        let mut wins = vec![];
        let mut draw = None; // (流局の種類, 公開する手牌, 流し満貫の点数)
        let mut deltas = vec![0; n];
        let dealer_continues;
        match outcome {
            Outcome::Tsumo(seat, sc) => {
                for s in 0..n {
                    if s != seat {
                        let p = tsumo_payment(&sc.points, self.stg.is_dealer(s), honba);
                        deltas[s] -= p;
                        deltas[seat] += p;
                    }
                }
                deltas[seat] += 1000 * sticks as Point;
                let wt = self.stg.players[seat]
                    .hand
                    .drawn
                    .ok_or_else(|| RuleError::invariant("tsumo without a drawn tile"))?;
                wins.push(self.win_context(seat, wt, None, deltas.clone(), sc));
                dealer_continues = self.stg.is_dealer(seat);
            }
            Outcome::Ron(from, winners) => {
                let (_, _, wt) = self
                    .stg
                    .last_tile
                    .ok_or_else(|| RuleError::invariant("ron without a target tile"))?;
                let mut dealer_wins = false;
                for (i, (seat, sc)) in winners.into_iter().enumerate() {
                    let mut d = vec![0; n];
                    // 本場と供託は放銃者から最も近い和了者が受け取る
                    let p = if i == 0 {
                        ron_payment(&sc.points, honba)
                    } else {
                        sc.points.0
                    };
                    d[from] -= p;
                    d[seat] += p;
                    if i == 0 {
                        d[seat] += 1000 * sticks as Point;
                    }
                    for s in 0..n {
                        deltas[s] += d[s];
                    }
                    dealer_wins |= self.stg.is_dealer(seat);
                    wins.push(self.win_context(seat, wt, Some(from), d, sc));
                }
                dealer_continues = dealer_wins;
            }
            Outcome::Draw(DrawType::Kouhaiheikyoku, _) => {
                let (d, nagashi, tenpai) = self.exhaustive_draw_payments();
                let hands = self
                    .stg
                    .players
                    .iter()
                    .zip(&tenpai)
                    .map(|(p, &t)| if t { p.hand.tiles.clone() } else { vec![] })
                    .collect();
                deltas = d;
                dealer_continues = tenpai[self.stg.dealer];
                draw = Some((DrawType::Kouhaiheikyoku, hands, nagashi));
            }
            Outcome::Draw(draw_type, seats) => {
                let hands = self
                    .stg
                    .players
                    .iter()
                    .enumerate()
                    .map(|(s, p)| {
                        if seats.contains(&s) {
                            p.hand.tiles.clone()
                        } else {
                            vec![]
                        }
                    })
                    .collect();
                dealer_continues = true;
                draw = Some((draw_type, hands, vec![0; n]));
            }
        }

        for (p, d) in self.stg.players.iter_mut().zip(&deltas) {
            p.score += d;
        }

        let draw_type = draw.as_ref().map(|(d, _, _)| *d);
        let riichi_sticks = match draw {
            Some((draw_type, hands, nagashi)) => {
                info!("draw: {}, deltas: {:?}", draw_type, deltas);
                self.emit(Event::draw(draw_type, hands, deltas.clone(), nagashi));
                sticks
            }
            None => {
                info!(
                    "win: {:?}, deltas: {:?}",
                    wins.iter().map(|w| w.seat).collect::<Vec<_>>(),
                    deltas
                );
                self.stg.riichi_sticks = 0;
                let ura_doras = if wins.iter().any(|w| w.is_riichi) {
                    self.stg.wall.ura_indicators().iter().map(|t| t.tile()).collect()
                } else {
                    vec![]
                };
                let ev = Event::win(
                    wins.clone(),
                    self.stg.dora_indicators(),
                    ura_doras,
                    scores,
                    deltas.clone(),
                );
                self.emit(ev);
                0
            }
        };

        let honba = if dealer_continues || draw_type.is_some() {
            honba + 1
        } else {
            0
        };
        Ok(RoundResult {
            wins,
            draw_type,
            delta_scores: deltas,
            scores: self.stg.get_scores(),
            dealer_continues,
            honba,
            riichi_sticks,
        })
    }

    // 荒廃平局の精算 (点数変動, 流し満貫の点数, 聴牌)
    fn exhaustive_draw_payments(&self) -> (Vec<Point>, Vec<Point>, Vec<bool>) {
        let stg = &self.stg;
        let n = stg.n_seat();
        let tenpai: Vec<bool> = stg.players.iter().map(|p| is_tenpai(&p.hand)).collect();

        let mut nagashi = vec![0; n];
        if stg.rule.nagashi_mangan {
            for s in 0..n {
                if !stg.players[s].is_nagashi {
                    continue;
                }
                for p in 0..n {
                    if p == s {
                        continue;
                    }
                    let pay = if stg.is_dealer(s) || stg.is_dealer(p) {
                        4000
                    } else {
                        2000
                    };
                    nagashi[p] -= pay;
                    nagashi[s] += pay;
                }
            }
        }
        if nagashi.iter().any(|&d| d != 0) {
            return (nagashi.clone(), nagashi, tenpai);
        }

        // 聴牌料 (場に3000点)
        let mut d = vec![0; n];
        let n_tenpai = tenpai.iter().filter(|&&t| t).count();
        if n_tenpai != 0 && n_tenpai != n {
            let recv = 3000 / n_tenpai as Point;
            let pay = 3000 / (n - n_tenpai) as Point;
            for s in 0..n {
                d[s] = if tenpai[s] { recv } else { -pay };
            }
        }
        (d, nagashi, tenpai)
    }

    fn win_context(
        &self,
        seat: Seat,
        winning_tile: TileId,
        from: Option<Seat>,
        delta_scores: Vec<Point>,
        score_context: ScoreContext,
    ) -> WinContext {
        let pl = &self.stg.players[seat];
        let mut hand = pl.hand.tiles.clone();
        if from.is_none() {
            hand.retain(|&t| t != winning_tile);
        }
        WinContext {
            seat,
            hand,
            winning_tile,
            melds: pl.hand.melds.clone(),
            from,
            is_dealer: self.stg.is_dealer(seat),
            is_riichi: pl.is_riichi,
            delta_scores,
            score_context,
        }
    }
}

// 検証済みの操作で手牌から牌を取り除く 失敗した場合は状態の不整合
fn take_tiles(hand: &mut Hand, ids: &[TileId]) -> RuleResult {
    for &id in ids {
        hand.remove(id)
            .map_err(|e| RuleError::invariant(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Config, Greedy, Nop, Scripted};

    fn run_round(
        wall: Wall,
        rule: &Rule,
        actors: &mut [Box<dyn Actor>],
    ) -> RuleResult<(RoundResult, Stage)> {
        let scores = vec![rule.initial_score; rule.n_seat()];
        let stg = Stage::new(rule, 0, 0, 0, 0, &scores, wall);
        let mut bus = EventBus::new();
        let mut engine = RoundEngine::new(stg, actors, &mut bus, ScoreTable::global())?;
        let res = engine.run()?;
        Ok((res, engine.stage().clone()))
    }

    fn nops(n: usize) -> Vec<Box<dyn Actor>> {
        (0..n).map(|_| Box::new(Nop::new()) as Box<dyn Actor>).collect()
    }

    #[test]
    fn actor_count_must_match_seats() {
        let rule = Rule::default();
        let stg = Stage::new(&rule, 0, 0, 0, 0, &[25000; 4], Wall::new(0, false));
        let mut actors = nops(3);
        let mut bus = EventBus::new();
        let r = RoundEngine::new(stg, &mut actors, &mut bus, ScoreTable::global());
        assert!(matches!(r, Err(RuleError::InvariantViolation(_))));
    }

    #[test]
    fn nop_players_reach_exhaustive_draw() {
        let rule = Rule {
            nagashi_mangan: false,
            ..Default::default()
        };
        let mut actors = nops(4);
        let (res, stg) = run_round(Wall::new(11, false), &rule, &mut actors).unwrap();
        assert_eq!(res.draw_type, Some(DrawType::Kouhaiheikyoku));
        assert_eq!(stg.wall.remaining(), 0);
        assert_eq!(res.delta_scores.iter().sum::<Point>(), 0);
        assert_eq!(res.honba, 1);
    }

    #[test]
    fn greedy_players_finish_rounds() {
        for seed in 0..8 {
            let rule = Rule::default();
            let mut actors: Vec<Box<dyn Actor>> =
                (0..4).map(|_| Box::new(Greedy::new()) as Box<dyn Actor>).collect();
            let (res, stg) = run_round(Wall::new(seed, false), &rule, &mut actors).unwrap();
            // 供託分を除いて点数は保存される
            let total: Score = res.scores.iter().sum::<Score>() + 1000 * res.riichi_sticks as Score;
            assert_eq!(total, 100000, "seed {}", seed);
            assert!(stg.step > 0);
        }
    }

    #[test]
    fn sanma_round_with_kita() {
        let rule = Rule::sanma();
        let mut actors: Vec<Box<dyn Actor>> =
            (0..3).map(|_| Box::new(Greedy::new()) as Box<dyn Actor>).collect();
        let (res, _) = run_round(Wall::new(5, true), &rule, &mut actors).unwrap();
        let total: Score = res.scores.iter().sum::<Score>() + 1000 * res.riichi_sticks as Score;
        assert_eq!(total, 75000);
    }

    // 合法手にない操作を要求し続ける
    struct Stubborn {
        config: Config,
    }

    impl Listener for Stubborn {}

    impl Actor for Stubborn {
        fn request_discard(&mut self, _stg: &Stage, _acts: &[Action], _tenpais: &[Tenpai]) -> Action {
            Action::pon(vec![TileId(0), TileId(1)])
        }

        fn request_call_decision(&mut self, _stg: &Stage, _acts: &[Action]) -> Action {
            Action::ron()
        }

        fn request_win_declaration(&mut self, _stg: &Stage, _offer: WinOffer) -> bool {
            false
        }

        fn get_config(&self) -> &Config {
            &self.config
        }
    }

    #[test]
    fn illegal_action_falls_back_to_tsumogiri() {
        let wall = Wall::arranged(&["m123456789p1199"], "z7", "", false, 0).unwrap();
        let mut actors = nops(4);
        actors[0] = Box::new(Stubborn {
            config: Config {
                name: "Stubborn".to_string(),
                args: vec![],
            },
        });
        let stg = Stage::new(&Rule::default(), 0, 0, 0, 0, &[25000; 4], wall);
        let mut bus = EventBus::new();
        let mut engine = RoundEngine::new(stg, &mut actors, &mut bus, ScoreTable::global()).unwrap();
        engine.run().unwrap();

        assert!(!engine.rejected().is_empty());
        assert!(engine
            .rejected()
            .iter()
            .all(|(s, e)| *s == 0 && matches!(e, RuleError::IllegalAction(_))));
        let first = &engine.stage().players[0].discards[0];
        assert_eq!(first.tile.tile(), Tile(TZ, DR));
        assert!(first.is_drawn);
    }

    #[test]
    fn scripted_tile_not_in_hand_is_tsumogiri() {
        let wall = Wall::arranged(&["m123456789p1199"], "z7", "", false, 0).unwrap();
        let mut actors = nops(4);
        actors[0] = Box::new(Scripted::new("z6", "", false).unwrap());
        let (_, stg) = run_round(wall, &Rule::default(), &mut actors).unwrap();
        assert_eq!(stg.players[0].discards[0].tile.tile(), Tile(TZ, DR));
    }
}
