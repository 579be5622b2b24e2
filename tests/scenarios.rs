// 牌山と打牌を指定した局の再現テスト

use mahjong_rules::actor::{Actor, Config, Nop, Scripted};
use mahjong_rules::control::{RoundEngine, RoundResult};
use mahjong_rules::error::{FuritenKind, RuleError};
use mahjong_rules::hand::ScoreTable;
use mahjong_rules::listener::{EventBus, EventRecorder, Listener};
use mahjong_rules::model::*;

struct Played {
    result: RoundResult,
    rejected: Vec<(Seat, RuleError)>,
    stage: Stage,
}

fn play(wall: Wall, rule: &Rule, actors: Vec<Box<dyn Actor>>) -> Played {
    play_with(wall, rule, actors, 0, 0)
}

// 本場と供託を指定して東1局を進める
fn play_with(
    wall: Wall,
    rule: &Rule,
    mut actors: Vec<Box<dyn Actor>>,
    honba: usize,
    riichi_sticks: usize,
) -> Played {
    let scores = vec![rule.initial_score; rule.n_seat()];
    let stg = Stage::new(rule, 0, 0, honba, riichi_sticks, &scores, wall);
    let mut bus = EventBus::new();
    let mut engine = RoundEngine::new(stg, &mut actors, &mut bus, ScoreTable::global()).unwrap();
    let result = engine.run().unwrap();
    Played {
        result,
        rejected: engine.rejected().to_vec(),
        stage: engine.stage().clone(),
    }
}

fn nop() -> Box<dyn Actor> {
    Box::new(Nop::new())
}

fn scripted(turns: &str, calls: &str, win: bool) -> Box<dyn Actor> {
    Box::new(Scripted::new(turns, calls, win).unwrap())
}

// 最初のn回の和了の機会を見逃し,以降はScriptedに従う
struct Hesitant {
    inner: Scripted,
    n_pass: usize,
}

impl Listener for Hesitant {}

impl Actor for Hesitant {
    fn request_discard(&mut self, stg: &Stage, acts: &[Action], tenpais: &[Tenpai]) -> Action {
        self.inner.request_discard(stg, acts, tenpais)
    }

    fn request_call_decision(&mut self, stg: &Stage, acts: &[Action]) -> Action {
        self.inner.request_call_decision(stg, acts)
    }

    fn request_win_declaration(&mut self, stg: &Stage, offer: WinOffer) -> bool {
        if self.n_pass > 0 {
            self.n_pass -= 1;
            return false;
        }
        self.inner.request_win_declaration(stg, offer)
    }

    fn get_config(&self) -> &Config {
        self.inner.get_config()
    }
}

#[test]
fn riichi_only_ron() {
    // 南家: 2巡目にz3を引いてz1でリーチ, 一発が消えた後に西家のp3でロン
    let wall = Wall::arranged(
        &["", "m123p45s456777z3z1"],
        "m9z7s1p9m8z3z2z2z6s9p3",
        "z1z1",
        false,
        1,
    )
    .unwrap();
    let actors = vec![nop(), scripted("- riichi:z1", "", true), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (1, Some(2)));
    assert!(win.is_riichi);
    assert_eq!(win.winning_tile.tile(), Tile(TP, 3));
    let sc = &win.score_context;
    assert_eq!(sc.yakus, vec![("立直".to_string(), 1)]);
    assert_eq!((sc.fu, sc.fan, sc.score), (40, 1, 1300));

    // 供託1本は和了者が回収
    assert_eq!(res.delta_scores, vec![0, 2300, -1300, 0]);
    assert_eq!(res.scores, vec![25000, 26300, 23700, 25000]);
    assert_eq!(res.riichi_sticks, 0);
    assert_eq!(res.honba, 0);
    assert!(!res.dealer_continues);
    assert!(p.rejected.is_empty());
}

#[test]
fn chiitoitsu_tsumo() {
    // 南家: 1巡目はツモ切り, 2巡目にz1を引いて七対子ツモ
    let wall = Wall::arranged(
        &["", "m1133p2277s5599z1"],
        "m9z7s1p9m8z1",
        "z5",
        false,
        2,
    )
    .unwrap();
    let actors = vec![nop(), scripted("", "", true), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (1, None));
    let sc = &win.score_context;
    assert!(sc.yakus.contains(&("七対子".to_string(), 2)));
    assert!(sc.yakus.contains(&("門前清自摸和".to_string(), 1)));
    assert_eq!((sc.fu, sc.fan), (25, 3));
    assert_eq!(sc.points, (3200, 800, 1600));
    assert_eq!(sc.score, 3200);

    // 親は倍払い
    assert_eq!(res.delta_scores, vec![-1600, 3200, -800, -800]);
    assert_eq!(res.delta_scores.iter().sum::<Point>(), 0);
    assert_eq!(win.hand.len(), 13);
}

#[test]
fn kokushi_dealer_ron() {
    let wall = Wall::arranged(&["m19p19s19z1234567"], "m5z7", "", false, 3).unwrap();
    let actors = vec![scripted("", "", true), nop(), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (0, Some(1)));
    assert!(win.is_dealer);
    let sc = &win.score_context;
    assert_eq!(sc.yakuman, 1);
    assert_eq!(sc.yakus, vec![("国士無双".to_string(), 1)]);
    assert_eq!(sc.score, 48000);
    assert_eq!(res.delta_scores, vec![48000, -48000, 0, 0]);
    assert!(res.dealer_continues);
    assert_eq!(res.honba, 1);
}

#[test]
fn ron_on_own_discarded_tile_is_furiten() {
    // 南家: p2を捨てた後にp34の両面待ちになる 西家のp5はフリテンで却下
    let wall = Wall::arranged(
        &["", "m123456789p34s9z1"],
        "s1p2s2p9m8s9p5",
        "",
        false,
        4,
    )
    .unwrap();
    let actors = vec![nop(), scripted("p2 z1", "", true), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    assert!(p
        .rejected
        .contains(&(1, RuleError::FuritenViolation(FuritenKind::Permanent))));
    // 却下されたロンの後も局は続く
    assert!(p.stage.players[2].discards.iter().any(|d| d.tile.tile() == Tile(TP, 5)));
    // 待ちが変わらないので以降もロンはできない
    assert!(p.result.wins.iter().all(|w| w.seat != 1 || w.from.is_none()));
}

#[test]
fn four_kans_by_two_players_abort() {
    let wall = Wall::arranged(
        &["m1111p1111s123z12", "m2222p2222s456z34"],
        "m9m8",
        "",
        false,
        5,
    )
    .unwrap();
    let actors = vec![
        scripted("ankan:m1 ankan:p1 -", "", false),
        scripted("ankan:m2 ankan:p2 -", "", false),
        nop(),
        nop(),
    ];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Suukansanra));
    assert!(res.wins.is_empty());
    assert!(res.delta_scores.iter().all(|&d| d == 0));
    assert!(res.dealer_continues);
    assert_eq!(res.honba, 1);
    assert_eq!(p.stage.n_kan, 4);
    assert_eq!(p.stage.players[0].n_kan, 2);
    assert_eq!(p.stage.players[1].n_kan, 2);
    // 槓ドラは槓の度にめくられる
    assert_eq!(p.stage.wall.dora_indicators().len(), 5);
    assert!(p.rejected.is_empty());
}

#[test]
fn kyushukyuhai_declared_by_dealer() {
    let wall = Wall::arranged(&["m19p19s19z1234m23p4"], "m5", "", false, 6).unwrap();
    let actors = vec![scripted("kyushu", "", false), nop(), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Kyushukyuhai));
    assert!(res.dealer_continues);
    assert_eq!(res.scores, vec![25000; 4]);
}

#[test]
fn kyushukyuhai_can_be_disabled() {
    let wall = Wall::arranged(&["m19p19s19z1234m23p4"], "m5", "", false, 6).unwrap();
    let rule = Rule {
        abort_order: vec![],
        nagashi_mangan: false,
        ..Default::default()
    };
    let actors = vec![scripted("kyushu", "", false), nop(), nop(), nop()];
    let p = play(wall, &rule, actors);

    // 宣言は不正な操作として却下されツモ切りになる
    assert!(matches!(p.rejected[0], (0, RuleError::IllegalAction(_))));
    assert_ne!(p.result.draw_type, Some(DrawType::Kyushukyuhai));
    assert_eq!(p.stage.players[0].discards[0].tile.tile(), Tile(TM, 5));
}

#[test]
fn events_are_recorded_in_order() {
    let wall = Wall::arranged(&["m19p19s19z1234567"], "m5z7", "", false, 3).unwrap();
    let mut actors: Vec<Box<dyn Actor>> = vec![scripted("", "", true), nop(), nop(), nop()];
    let recorder = EventRecorder::new();
    let log = recorder.log();
    let mut bus = EventBus::with(vec![Box::new(recorder)]);
    let stg = Stage::new(&Rule::default(), 0, 0, 0, 0, &[25000; 4], wall);
    let mut engine = RoundEngine::new(stg, &mut actors, &mut bus, ScoreTable::global()).unwrap();
    engine.run().unwrap();

    let events = log.lock().unwrap();
    // 配牌, 親のツモと打牌, 南家のツモと打牌, 和了
    assert_eq!(events.len(), 6);
    let steps: Vec<u64> = events.iter().map(|e| e["step"].as_u64().unwrap()).collect();
    assert!(steps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn rejected_yakuless_ron_sets_temporary_furiten() {
    // 南家: s2とz5のシャンポン待ち 西家のs2は役なし,北家のz5は同巡内フリテン
    // 自分のツモで解除され,次の西家のz5はロンできる
    let wall = Wall::arranged(
        &["", "m123p456s789s22z55"],
        "m9p9s2z5m9p9z5",
        "z1",
        false,
        7,
    )
    .unwrap();
    let actors = vec![nop(), scripted("", "", true), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    assert_eq!(
        p.rejected,
        vec![
            (1, RuleError::NoApplicableYaku),
            (1, RuleError::FuritenViolation(FuritenKind::Temporary)),
        ]
    );
    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (1, Some(2)));
    assert_eq!(win.winning_tile.tile(), Tile(TZ, DW));
    let sc = &win.score_context;
    assert_eq!(sc.yakus, vec![("白".to_string(), 1)]);
    assert_eq!((sc.fu, sc.fan, sc.score), (40, 1, 1300));
    assert_eq!(res.delta_scores, vec![0, 1300, -1300, 0]);
}

#[test]
fn missed_win_after_riichi_stays_furiten() {
    // 南家: ダブル立直の後に西家のs2を見逃す 以降のz5もロンできない
    let wall = Wall::arranged(
        &["", "m123p456s789s22z55"],
        "m9z1s2m9p9p9z5",
        "z3z3",
        false,
        8,
    )
    .unwrap();
    let hesitant = Hesitant {
        inner: Scripted::new("riichi:z1", "", true).unwrap(),
        n_pass: 1,
    };
    let actors: Vec<Box<dyn Actor>> = vec![nop(), Box::new(hesitant), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    assert!(p
        .rejected
        .contains(&(1, RuleError::FuritenViolation(FuritenKind::Riichi))));
    assert!(p.result.wins.iter().all(|w| w.seat != 1 || w.from.is_none()));
    assert!(p.stage.players[1].is_riichi);
    // ツモを挟んでも解除されない
    assert_eq!(
        p.stage.players[1].furiten.kind(&[Tile(TZ, DW)]),
        Some(FuritenKind::Riichi)
    );
}

#[test]
fn double_ron_gives_honba_and_sticks_to_nearest_winner() {
    // 親のs3に南家(単騎)と西家(嵌張)がロン いずれも断幺九 40符1飜
    let wall = Wall::arranged(
        &["", "m234m678p234s456s3", "m345p678s678s24m88"],
        "s3",
        "z1",
        false,
        9,
    )
    .unwrap();
    let actors = vec![
        nop(),
        scripted("", "", true),
        scripted("", "", true),
        nop(),
    ];
    let p = play_with(wall, &Rule::default(), actors, 2, 1);

    let res = &p.result;
    assert_eq!(res.wins.len(), 2);
    assert_eq!((res.wins[0].seat, res.wins[0].from), (1, Some(0)));
    assert_eq!((res.wins[1].seat, res.wins[1].from), (2, Some(0)));
    for w in &res.wins {
        assert_eq!(w.score_context.yakus, vec![("断幺九".to_string(), 1)]);
        assert_eq!(w.score_context.score, 1300);
    }
    // 2本場の600点と供託1000点は上家側の南家のみ
    assert_eq!(res.wins[0].delta_scores, vec![-1900, 2900, 0, 0]);
    assert_eq!(res.wins[1].delta_scores, vec![-1300, 0, 1300, 0]);
    assert_eq!(res.delta_scores, vec![-3200, 2900, 1300, 0]);
    assert_eq!(res.scores, vec![21800, 27900, 26300, 25000]);
    assert_eq!((res.honba, res.riichi_sticks), (0, 0));
    assert!(!res.dealer_continues);
}

fn triple_ron_wall() -> Wall {
    Wall::arranged(
        &[
            "",
            "m234m678p234s456s3",
            "m345p678s678s24m88",
            "p234p567m567s45m22",
        ],
        "s3",
        "z1",
        false,
        10,
    )
    .unwrap()
}

#[test]
fn triple_ron_aborts_the_round() {
    let actors = vec![
        nop(),
        scripted("", "", true),
        scripted("", "", true),
        scripted("", "", true),
    ];
    let p = play(triple_ron_wall(), &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Sanchaho));
    assert!(res.wins.is_empty());
    assert!(res.delta_scores.iter().all(|&d| d == 0));
    assert!(res.dealer_continues);
    assert_eq!(res.honba, 1);
}

#[test]
fn triple_ron_pays_out_when_abort_is_disabled() {
    let rule = Rule {
        triple_ron_abort: false,
        ..Default::default()
    };
    let actors = vec![
        nop(),
        scripted("", "", true),
        scripted("", "", true),
        scripted("", "", true),
    ];
    let p = play(triple_ron_wall(), &rule, actors);

    let res = &p.result;
    assert_eq!(res.draw_type, None);
    let seats: Vec<Seat> = res.wins.iter().map(|w| w.seat).collect();
    assert_eq!(seats, vec![1, 2, 3]);
    // 北家は平和断幺九 30符2飜
    assert_eq!(res.wins[2].score_context.score, 2000);
    assert_eq!(res.delta_scores, vec![-4600, 1300, 1300, 2000]);
}

#[test]
fn chankan_on_kakan() {
    // 南家: 親のp7をポンしてz4を切り,2巡目に引いたp7で加槓 西家がp7の嵌張待ち
    let wall = Wall::arranged(
        &["", "p77m123s789z1234m5", "m234m567s234p68s9z1"],
        "p7s9m9s1p7",
        "z1",
        false,
        11,
    )
    .unwrap();
    let actors = vec![
        nop(),
        scripted("z4 kakan:p7", "pon:p7", false),
        scripted("z1", "", true),
        nop(),
    ];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (2, Some(1)));
    assert_eq!(win.winning_tile.tile(), Tile(TP, 7));
    let sc = &win.score_context;
    assert_eq!(sc.yakus, vec![("槍槓".to_string(), 1)]);
    assert_eq!((sc.fu, sc.fan, sc.score), (40, 1, 1300));
    assert_eq!(res.delta_scores, vec![0, -1300, 1300, 0]);
    // 槍槓された槓の槓ドラはめくられない
    assert_eq!(p.stage.wall.dora_indicators().len(), 1);
}

#[test]
fn only_kokushi_can_ron_on_ankan() {
    // 南家のm9暗槓 西家はm6m9待ちだが国士無双ではないので和了の機会がない
    let wall = Wall::arranged(
        &[
            "",
            "m9999p147s147z66z1",
            "m78z555p234s234s55",
            "m1p19s19z1234567m1",
        ],
        "s7s8",
        "",
        false,
        12,
    )
    .unwrap();
    let actors = vec![
        nop(),
        scripted("ankan:m9", "", false),
        scripted("", "", true),
        scripted("", "", true),
    ];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (3, Some(1)));
    assert_eq!(win.score_context.yakus, vec![("国士無双".to_string(), 1)]);
    assert_eq!(win.score_context.score, 32000);
    assert_eq!(res.delta_scores, vec![0, -32000, 0, 32000]);
    assert!(p.rejected.is_empty());
}

#[test]
fn four_same_winds_abort() {
    let wall = Wall::arranged(&[], "z1z1z1z1", "", false, 13).unwrap();
    let actors = vec![nop(), nop(), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Suufuurenda));
    assert!(res.delta_scores.iter().all(|&d| d == 0));
    assert!(res.dealer_continues);
    assert_eq!(res.honba, 1);
    assert!(p.stage.players.iter().all(|pl| pl.discards.len() == 1));
}

#[test]
fn four_riichi_abort() {
    let wall = Wall::arranged(
        &[
            "m123456789p11s23",
            "p123456789z44s67",
            "s123456789m99p78",
            "m111p999s999z222z3",
        ],
        "z7z7z7z7",
        "",
        false,
        14,
    )
    .unwrap();
    let actors = (0..4).map(|_| scripted("riichi:z7", "", true)).collect();
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Suuchariichi));
    assert!(res.wins.is_empty());
    // 4本目のリーチも成立してから流局 供託は次局へ
    assert_eq!(res.scores, vec![24000; 4]);
    assert_eq!(res.riichi_sticks, 4);
    assert_eq!(res.honba, 1);
    assert!(res.dealer_continues);
}

#[test]
fn nagashi_mangan_at_exhaustive_draw() {
    // 南家のツモ(4巡ごと)は全て么九牌 他家のツモは全て中張牌
    let ends: Vec<&str> = ["z1", "z2", "z3", "z4"]
        .iter()
        .flat_map(|t| [*t; 4])
        .chain(["z5"; 2])
        .collect();
    let simples: Vec<&str> = [
        "m2", "m3", "m4", "m6", "m7", "m8", "p2", "p3", "p4", "p6", "p7", "p8", "s2",
    ]
    .iter()
    .flat_map(|t| [*t; 4])
    .collect();
    let (mut e, mut m) = (ends.into_iter(), simples.into_iter());
    let deals: String = (0..70)
        .map(|i| if i % 4 == 1 { e.next() } else { m.next() })
        .map(|t| t.unwrap())
        .collect();

    let wall = Wall::arranged(&[], &deals, "", false, 15).unwrap();
    let actors = vec![nop(), nop(), nop(), nop()];
    let p = play(wall, &Rule::default(), actors);

    let res = &p.result;
    assert_eq!(res.draw_type, Some(DrawType::Kouhaiheikyoku));
    assert_eq!(p.stage.wall.remaining(), 0);
    assert!(p.stage.players[1].is_nagashi);
    // 子の満貫ツモと同じ支払い 聴牌料はなし
    assert_eq!(res.delta_scores, vec![-4000, 8000, -2000, -2000]);
    assert_eq!(res.honba, 1);
}

#[test]
fn honba_and_sticks_in_tsumo_settlement() {
    // chiitoitsu_tsumoと同じ牌山で3本場,供託2本
    let wall = Wall::arranged(
        &["", "m1133p2277s5599z1"],
        "m9z7s1p9m8z1",
        "z5",
        false,
        2,
    )
    .unwrap();
    let actors = vec![nop(), scripted("", "", true), nop(), nop()];
    let p = play_with(wall, &Rule::default(), actors, 3, 2);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    assert_eq!(res.wins[0].score_context.points, (3200, 800, 1600));
    // 1本場につき各自100点
    assert_eq!(res.delta_scores, vec![-1900, 6100, -1100, -1100]);
    assert_eq!((res.honba, res.riichi_sticks), (0, 0));
}

#[test]
fn kita_cancels_ippatsu() {
    // 親: ダブル立直 南家が北抜きの後にs1を切る
    let wall = Wall::arranged(
        &["m111p123456s789s1", "z4s1"],
        "z7p9",
        "",
        true,
        16,
    )
    .unwrap();
    let actors = vec![
        scripted("riichi:z7", "", true),
        scripted("kita s1", "", false),
        nop(),
    ];
    let p = play(wall, &Rule::sanma(), actors);

    let res = &p.result;
    assert_eq!(res.wins.len(), 1);
    let win = &res.wins[0];
    assert_eq!((win.seat, win.from), (0, Some(1)));
    let names: Vec<&str> = win.score_context.yakus.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"ダブル立直"));
    assert!(!names.contains(&"一発"));
    assert_eq!(p.stage.players[1].hand.melds.len(), 1);
}
