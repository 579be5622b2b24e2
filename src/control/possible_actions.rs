use crate::hand::*;
use crate::model::*;

// [Turn Action Check]
// プレイヤーのツモ番に可能な操作をチェックする
// melding: 直前に行ったチー,ポン (この場合は打牌のみ可能)

pub fn calc_possible_turn_actions(
    stg: &Stage,
    melding: Option<&Action>,
    table: &ScoreTable,
) -> Vec<Action> {
    if let Some(act) = melding {
        match act.action_type {
            ActionType::Chi | ActionType::Pon => {
                // チー,ポンのあとは打牌のみ
                let restricted = calc_restricted_discards(stg, act);
                return check_discard(stg, &restricted);
            }
            _ => {}
        }
    }

    let mut acts = check_discard(stg, &[]);
    acts.append(&mut check_riichi(stg));
    if can_kan(stg) {
        acts.append(&mut check_ankan(stg));
        acts.append(&mut check_kakan(stg));
    }
    acts.append(&mut check_kita(stg));
    acts.append(&mut check_tsumo(stg, table));
    acts.append(&mut check_kyushukyuhai(stg));

    acts
}

fn can_kan(stg: &Stage) -> bool {
    stg.n_kan < 4 && stg.wall.remaining() != 0 && stg.wall.n_rinshan() < 4
}

// 同じ牌種の打牌は1つにまとめる (赤5とツモ牌は別扱い)
fn check_discard(stg: &Stage, restricted: &[Tile]) -> Vec<Action> {
    let h = &stg.players[stg.turn].hand;
    if h.is_riichi {
        // リーチ後はツモ切りのみ
        return h.drawn.map(Action::discard).into_iter().collect();
    }

    let ids = h.tiles.iter().filter(|id| !restricted.contains(&id.tile()));
    unique_by_kind(ids, h.drawn)
        .into_iter()
        .map(Action::discard)
        .collect()
}

fn unique_by_kind<'a>(ids: impl Iterator<Item = &'a TileId>, drawn: Option<TileId>) -> Vec<TileId> {
    let mut seen: Vec<(Tile, bool)> = vec![];
    let mut res = vec![];
    let mut has_drawn = false;
    for &id in ids {
        if Some(id) == drawn {
            has_drawn = true;
            continue;
        }
        let key = (id.tile(), id.is_red());
        if !seen.contains(&key) {
            seen.push(key);
            res.push(id);
        }
    }
    if has_drawn {
        res.extend(drawn);
    }
    res
}

// 要求された操作が候補に含まれるか
// 打牌とリーチは同じ牌種(赤5は区別)であれば個体が異なっていても許可
pub fn is_legal_action(acts: &[Action], act: &Action, hand: &Hand) -> bool {
    if acts.contains(act) {
        return true;
    }
    match act.action_type {
        ActionType::Discard | ActionType::Riichi if !hand.is_riichi => {
            let id = match act.tiles.as_slice() {
                [id] if hand.contains(*id) => *id,
                _ => return false,
            };
            acts.iter().any(|a| {
                a.action_type == act.action_type
                    && a.tiles.first().map_or(false, |t| {
                        t.tile() == id.tile() && t.is_red() == id.is_red()
                    })
            })
        }
        _ => false,
    }
}

fn check_riichi(stg: &Stage) -> Vec<Action> {
    let pl = &stg.players[stg.turn];
    if pl.hand.is_riichi || !pl.is_menzen() || pl.score < 1000 {
        return vec![];
    }
    if stg.wall.remaining() < stg.n_seat() {
        return vec![];
    }

    let tenpais = evaluate_tenpai_discards(&pl.hand.table(), &pl.furiten);
    let ids = pl
        .hand
        .tiles
        .iter()
        .filter(|id| tenpais.iter().any(|tp| tp.discard_tile == id.tile()));
    unique_by_kind(ids, pl.hand.drawn)
        .into_iter()
        .map(Action::riichi)
        .collect()
}

fn check_tsumo(stg: &Stage, table: &ScoreTable) -> Vec<Action> {
    if evaluate_tsumo(stg, stg.turn, table).is_ok() {
        vec![Action::tsumo()]
    } else {
        vec![]
    }
}

fn check_ankan(stg: &Stage) -> Vec<Action> {
    let pl = &stg.players[stg.turn];
    let h = &pl.hand;
    let mut acts = vec![];
    if h.is_riichi {
        // リーチ中でも待ちが変わらない暗槓は可能
        if let Some(d) = h.drawn {
            let t = d.tile();
            if let Some(ids) = h.find_n(t, 4) {
                let mut tt = h.table();
                tt[t.0][t.1] -= 1;
                let v1 = calc_waits(&tt);
                tt[t.0][t.1] -= 3;
                let v2 = calc_waits(&tt);
                if !v1.is_empty() && v1 == v2 {
                    acts.push(Action::ankan(ids));
                }
            }
        }
    } else {
        let tt = h.table();
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                if tt[ti][ni] == 4 {
                    if let Some(ids) = h.find_n(Tile(ti, ni), 4) {
                        acts.push(Action::ankan(ids));
                    }
                }
            }
        }
    }

    acts
}

fn check_kakan(stg: &Stage) -> Vec<Action> {
    let pl = &stg.players[stg.turn];
    if pl.hand.is_riichi {
        return vec![];
    }

    let mut acts = vec![];
    for m in &pl.hand.melds {
        if m.meld_type == MeldType::Pon {
            if let Some(id) = pl.hand.find(m.tile()) {
                acts.push(Action::kakan(id));
            }
        }
    }

    acts
}

fn check_kyushukyuhai(stg: &Stage) -> Vec<Action> {
    if !stg.is_first_turn(stg.turn) || !stg.rule.is_abort_enabled(DrawType::Kyushukyuhai) {
        return vec![];
    }

    let tt = stg.players[stg.turn].hand.table();
    let mut c = 0;
    for ti in 0..TZ {
        if tt[ti][1] != 0 {
            c += 1;
        }
        if tt[ti][9] != 0 {
            c += 1;
        }
    }
    for ni in WE..=DR {
        if tt[TZ][ni] != 0 {
            c += 1;
        }
    }
    if c < 9 {
        return vec![];
    }

    vec![Action::kyushukyuhai()]
}

fn check_kita(stg: &Stage) -> Vec<Action> {
    if !stg.rule.sanma || stg.wall.remaining() == 0 || stg.wall.n_rinshan() >= 4 {
        return vec![];
    }

    let pl = &stg.players[stg.turn];
    if pl.hand.is_riichi {
        // リーチ後はツモった北のみ
        return match pl.hand.drawn {
            Some(d) if d.tile() == Tile(TZ, WN) => vec![Action::kita(d)],
            _ => vec![],
        };
    }
    pl.hand.find(Tile(TZ, WN)).map(Action::kita).into_iter().collect()
}

// [Call Action Check]
// ツモ番のプレイヤーが打牌を行ったあとに,他のプレイヤーが可能な操作をチェックする
// 各座席の先頭は常にNop (スキップ)

pub fn calc_possible_call_actions(stg: &Stage, table: &ScoreTable) -> Vec<Vec<Action>> {
    let mut acts_list: Vec<Vec<Action>> = vec![vec![Action::nop()]; stg.n_seat()];
    let (from, tp, _) = match stg.last_tile {
        Some(lt) => lt,
        None => return acts_list,
    };

    // 打牌以外(槍槓), 牌山なしの場合は鳴き操作不可
    let is_discard = matches!(tp, ActionType::Discard | ActionType::Riichi);
    if is_discard && stg.wall.remaining() != 0 {
        for (s, act) in check_chi(stg) {
            acts_list[s].push(act);
        }
        for (s, act) in check_pon(stg) {
            acts_list[s].push(act);
        }
        if can_kan(stg) {
            for (s, act) in check_minkan(stg) {
                acts_list[s].push(act);
            }
        }
    }
    for s in 0..stg.n_seat() {
        if s != from && evaluate_ron(stg, s, table).is_ok() {
            acts_list[s].push(Action::ron());
        }
    }
    acts_list
}

// 手牌から牌種tの個体を通常5と赤5を区別して返却
fn ids_with_red5(h: &Hand, t: Tile) -> Vec<TileId> {
    let mut ids = vec![];
    if let Some(id) = h.tiles.iter().find(|id| id.tile() == t && !id.is_red()) {
        ids.push(*id);
    }
    if let Some(id) = h.tiles.iter().find(|id| id.tile() == t && id.is_red()) {
        ids.push(*id);
    }
    ids
}

fn last_discard(stg: &Stage) -> Option<(Seat, TileId)> {
    stg.last_tile.map(|(s, _, t)| (s, t))
}

fn check_chi(stg: &Stage) -> Vec<(Seat, Action)> {
    let (from, d) = match last_discard(stg) {
        Some(x) => x,
        None => return vec![],
    };
    let Tile(ti, ni) = d.tile();
    if stg.is_sanma() || ti == TZ {
        return vec![];
    }

    let s = stg.next_seat(from);
    let h = &stg.players[s].hand;
    if h.is_riichi {
        return vec![];
    }

    let mut check: Vec<(Tnum, Tnum)> = vec![];
    if 3 <= ni {
        check.push((ni - 2, ni - 1)); // 右端をチー
    }
    if (2..=8).contains(&ni) {
        check.push((ni - 1, ni + 1)); // 嵌張をチー
    }
    if ni <= 7 {
        check.push((ni + 1, ni + 2)); // 左端をチー
    }

    let mut acts = vec![];
    for (ni0, ni1) in check {
        for &t0 in &ids_with_red5(h, Tile(ti, ni0)) {
            for &t1 in &ids_with_red5(h, Tile(ti, ni1)) {
                let act = Action::chi(vec![t0, t1]);
                if has_discard_after_call(stg, s, &act, d) {
                    acts.push((s, act));
                }
            }
        }
    }

    acts
}

fn check_pon(stg: &Stage) -> Vec<(Seat, Action)> {
    let (from, d) = match last_discard(stg) {
        Some(x) => x,
        None => return vec![],
    };
    let t = d.tile();
    let mut acts = vec![];
    for s in 0..stg.n_seat() {
        let h = &stg.players[s].hand;
        if s == from || h.is_riichi || h.count(t) < 2 {
            continue;
        }

        let plain: Vec<TileId> = h.tiles.iter().filter(|id| id.tile() == t && !id.is_red()).copied().collect();
        let red = h.tiles.iter().find(|id| id.tile() == t && id.is_red()).copied();
        let mut cands = vec![];
        if plain.len() >= 2 {
            cands.push(Action::pon(vec![plain[0], plain[1]]));
        }
        if let (Some(r), Some(&p)) = (red, plain.first()) {
            cands.push(Action::pon(vec![r, p])); // 手牌の赤5を含むPon
        }
        for act in cands {
            if has_discard_after_call(stg, s, &act, d) {
                acts.push((s, act));
            }
        }
    }
    acts
}

fn check_minkan(stg: &Stage) -> Vec<(Seat, Action)> {
    let (from, d) = match last_discard(stg) {
        Some(x) => x,
        None => return vec![],
    };
    let t = d.tile();
    let mut acts = vec![];
    for s in 0..stg.n_seat() {
        let h = &stg.players[s].hand;
        if s == from || h.is_riichi || h.count(t) != 3 {
            continue;
        }
        if let Some(ids) = h.find_n(t, 3) {
            acts.push((s, Action::minkan(ids)));
        }
    }
    acts
}

// 鳴き後の組み換え禁止の牌種 (喰い替え)
// 鳴いた牌と同じ牌種, チーの場合は筋の反対側
fn calc_restricted_discards(stg: &Stage, act: &Action) -> Vec<Tile> {
    let called = stg
        .players[stg.turn]
        .hand
        .melds
        .last()
        .and_then(|m| m.from)
        .map(|(_, t)| t.tile());
    match called {
        Some(c) => restricted_tiles(act, c),
        None => vec![],
    }
}

fn restricted_tiles(act: &Action, called: Tile) -> Vec<Tile> {
    let mut v = vec![called];
    if act.action_type == ActionType::Chi {
        let (t0, t1) = (act.tiles[0].tile(), act.tiles[1].tile());
        let (s, b) = (t0.1.min(t1.1), t0.1.max(t1.1));
        if s + 1 == b {
            // 両面: 鳴いた牌の筋の反対側
            if called.1 + 1 == s && b < 9 {
                v.push(Tile(called.0, b + 1));
            } else if called.1 == b + 1 && s > 1 {
                v.push(Tile(called.0, s - 1));
            }
        }
    }
    v
}

// 鳴いた後に打牌できる牌が残るか
fn has_discard_after_call(stg: &Stage, seat: Seat, act: &Action, called: TileId) -> bool {
    let restricted = restricted_tiles(act, called.tile());
    stg.players[seat]
        .hand
        .tiles
        .iter()
        .filter(|id| !act.tiles.contains(id))
        .any(|id| !restricted.contains(&id.tile()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_with_hand(hand: &str, drawn: Option<&str>) -> Stage {
        let rule = Rule::default();
        let wall = Wall::new(0, false);
        let mut stg = Stage::new(&rule, 0, 0, 0, 0, &[25000; 4], wall);
        let mut used = [false; TILE_ID_MAX];
        let ids = allocate_tile_ids(hand, &mut used).unwrap();
        stg.players[0].hand = Hand::new(ids);
        if let Some(d) = drawn {
            let id = allocate_tile_ids(d, &mut used).unwrap()[0];
            stg.players[0].hand.draw(id);
        }
        stg
    }

    #[test]
    fn kuikae_tiles() {
        let t = |s: &str| Tile::from_symbol(s).unwrap();
        let ids = tile_ids_from_string("m23").unwrap();
        let chi = Action::chi(ids);
        let mut r = restricted_tiles(&chi, t("m1"));
        r.sort();
        assert_eq!(r, vec![t("m1"), t("m4")]);
        let mut r = restricted_tiles(&chi, t("m4"));
        r.sort();
        assert_eq!(r, vec![t("m1"), t("m4")]);
        // 嵌張は鳴いた牌のみ
        let ids = tile_ids_from_string("m24").unwrap();
        assert_eq!(restricted_tiles(&Action::chi(ids), t("m3")), vec![t("m3")]);
        // 辺張
        let ids = tile_ids_from_string("m12").unwrap();
        assert_eq!(restricted_tiles(&Action::chi(ids), t("m3")), vec![t("m3")]);
    }

    #[test]
    fn riichi_and_tsumo_options() {
        let stg = stage_with_hand("m123456789p23s99", Some("p4"));
        let acts = calc_possible_turn_actions(&stg, None, ScoreTable::global());
        assert!(acts.contains(&Action::tsumo()));
        assert!(acts.iter().any(|a| a.action_type == ActionType::Riichi));
        assert!(!acts.iter().any(|a| a.action_type == ActionType::Kyushukyuhai));
    }

    #[test]
    fn nine_terminals() {
        let stg = stage_with_hand("m19p19s19z12345m23", Some("m4"));
        let acts = calc_possible_turn_actions(&stg, None, ScoreTable::global());
        assert!(acts.contains(&Action::kyushukyuhai()));
    }

    #[test]
    fn ankan_is_listed() {
        let stg = stage_with_hand("m1111p123s456z123", Some("z5"));
        let acts = calc_possible_turn_actions(&stg, None, ScoreTable::global());
        assert!(acts.iter().any(|a| a.action_type == ActionType::Ankan && a.tiles.len() == 4));
    }

    #[test]
    fn calls_on_discard() {
        let mut stg = stage_with_hand("m123456789p23s99", None);
        let mut used = [false; TILE_ID_MAX];
        for id in &stg.players[0].hand.tiles {
            used[id.0 as usize] = true;
        }
        stg.players[1].hand = Hand::new(allocate_tile_ids("p1133s123456z123", &mut used).unwrap());
        let d = allocate_tile_ids("p1", &mut used).unwrap()[0];
        stg.turn = 3;
        stg.last_tile = Some((3, ActionType::Discard, d));
        let acts = calc_possible_call_actions(&stg, ScoreTable::global());
        assert!(acts[0].contains(&Action::ron()));
        assert!(acts[1].iter().any(|a| a.action_type == ActionType::Pon));
        assert!(acts[2] == vec![Action::nop()]);
        // 上家の打牌ではないのでチー不可
        assert!(!acts[1].iter().any(|a| a.action_type == ActionType::Chi));
    }
}
