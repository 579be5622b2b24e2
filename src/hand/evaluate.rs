use crate::control::common::{count_dora, count_red5};
use crate::error::{RuleError, RuleResult};
use crate::model::*;

use super::furiten::Furiten;
use super::parse::decompose;
use super::point::{tsumo_total, ScoreTable};
use super::win::{calc_discards_to_tenpai, calc_waits};
use super::yaku::{YakuContext, YakuFlags};

// 和了形である場合,最も高得点となるような役の組み合わせを返却
// 和了形でない場合はIllegalAction, 無役の場合はNoApplicableYaku
// 本場・供託は含まない
pub fn evaluate_hand(
    hand: &[TileId],        // 純手牌(鳴き以外, ロンの場合でも和了牌を含む)
    melds: &[Meld],         // 鳴き (北抜きを含む)
    doras: &[Tile],         // ドラ表示牌 (注:ドラそのものではない)
    ura_doras: &[Tile],     // 裏ドラ表示牌 リーチしていない場合は空
    winning_tile: Tile,     // 和了牌
    is_tsumo: bool,         // ツモ和了
    is_dealer: bool,        // 親番
    prevalent_wind: Tnum,   // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    seat_wind: Tnum,        // 自風 (同上)
    yaku_flags: &YakuFlags, // 和了形だった場合に自動的に付与される役(特殊条件役)のフラグ
    rule: &Rule,
    table: &ScoreTable,
) -> RuleResult<ScoreContext> {
    let tt = tile_table_from_ids(hand);
    let decompositions = decompose(&tt, melds);
    if decompositions.is_empty() {
        return Err(RuleError::illegal(format!(
            "not a winning hand: {}",
            tiles_from_tile_table(&tt)
                .iter()
                .map(|t| t.to_string())
                .collect::<String>()
        )));
    }

    let n_dora = count_dora(hand, melds, doras, rule.sanma);
    let n_red_dora = if rule.red5 { count_red5(hand, melds) } else { 0 };
    let n_ura_dora = if yaku_flags.riichi || yaku_flags.dabururiichi {
        count_dora(hand, melds, ura_doras, rule.sanma)
    } else {
        0
    };
    let n_kita = melds.iter().filter(|m| m.meld_type == MeldType::Kita).count();

    let mut best: Option<((usize, usize, usize), ScoreContext)> = None;
    for d in decompositions {
        let ctx = YakuContext::new(
            tt,
            d,
            winning_tile,
            prevalent_wind,
            seat_wind,
            is_tsumo,
            *yaku_flags,
            rule.kuitan,
        );
        let (yakus, mut fan, yakuman) = ctx.calc_yaku();
        if yakus.is_empty() {
            continue; // 無役
        }
        let fu = ctx.calc_fu();

        let mut yakus: Vec<(String, usize)> = yakus
            .iter()
            .map(|y| {
                let n = if y.yakuman() > 0 { y.yakuman() } else { ctx.fan_of(y) };
                (y.name.to_string(), n)
            })
            .collect();
        if yakuman == 0 {
            fan += n_dora + n_red_dora + n_ura_dora + n_kita;
            for (name, n) in [
                ("ドラ", n_dora),
                ("赤ドラ", n_red_dora),
                ("裏ドラ", n_ura_dora),
                ("抜きドラ", n_kita),
            ] {
                if n != 0 {
                    yakus.push((name.to_string(), n));
                }
            }
        }

        let (points, title) = table.points(is_dealer, fu, fan, yakuman);
        let score = if is_tsumo {
            tsumo_total(&points, is_dealer, rule.n_seat())
        } else {
            points.0
        };

        // 和了形に複数の解釈が可能な場合,(役満, 翻, 符)が最大のものを採用
        let key = (yakuman, fan, fu);
        if best.as_ref().map_or(true, |(k, _)| key > *k) {
            best = Some((
                key,
                ScoreContext {
                    yakus,
                    fu,
                    fan,
                    yakuman,
                    score,
                    points,
                    title,
                    decomposition: ctx.decomposition().clone(),
                },
            ));
        }
    }

    best.map(|(_, sc)| sc).ok_or(RuleError::NoApplicableYaku)
}

fn riichi_flags(pl: &Player) -> YakuFlags {
    YakuFlags {
        riichi: pl.is_riichi && !pl.is_daburii,
        dabururiichi: pl.is_daburii,
        ippatsu: pl.is_ippatsu,
        ..Default::default()
    }
}

fn ura_doras(stg: &Stage, pl: &Player) -> Vec<Tile> {
    if pl.is_riichi {
        stg.wall.ura_indicators().iter().map(|t| t.tile()).collect()
    } else {
        vec![]
    }
}

// ツモ和了の評価 (フリテンの影響は受けない)
pub fn evaluate_tsumo(stg: &Stage, seat: Seat, table: &ScoreTable) -> RuleResult<ScoreContext> {
    let pl = &stg.players[seat];
    let drawn = pl
        .hand
        .drawn
        .ok_or_else(|| RuleError::illegal("tsumo without a drawn tile"))?;

    let mut yf = riichi_flags(pl);
    yf.menzentsumo = pl.is_menzen();
    yf.rinshankaihou = pl.is_rinshan;
    yf.haiteiraoyue = stg.wall.remaining() == 0 && !pl.is_rinshan;
    if stg.is_first_turn(seat) {
        if stg.is_dealer(seat) {
            yf.tenhou = true;
        } else {
            yf.tiihou = true;
        }
    }

    evaluate_hand(
        &pl.hand.tiles,
        &pl.hand.melds,
        &stg.dora_indicators(),
        &ura_doras(stg, pl),
        drawn.tile(),
        true,
        stg.is_dealer(seat),
        stg.get_prevalent_wind(),
        stg.get_seat_wind(seat),
        &yf,
        &stg.rule,
        table,
    )
}

// stg.last_tile に対するロン和了の評価 (フリテン判定を含む)
pub fn evaluate_ron(stg: &Stage, seat: Seat, table: &ScoreTable) -> RuleResult<ScoreContext> {
    let (from, tp, t) = stg
        .last_tile
        .ok_or_else(|| RuleError::illegal("no tile to ron"))?;
    if from == seat {
        return Err(RuleError::illegal("ron on own tile"));
    }

    let pl = &stg.players[seat];
    let waits = calc_waits(&pl.hand.table());
    if !waits.contains(&t.tile()) {
        return Err(RuleError::illegal(format!("{} is not a winning tile", t)));
    }
    pl.furiten.check_ron(&waits)?;

    let mut hand = pl.hand.tiles.clone();
    hand.push(t);
    hand.sort();

    let mut yf = riichi_flags(pl);
    match tp {
        ActionType::Discard | ActionType::Riichi => yf.houteiraoyui = stg.wall.remaining() == 0,
        ActionType::Kakan => yf.chankan = true,
        ActionType::Ankan => {
            // 暗槓のロンは国士無双のみ
            let tt = tile_table_from_ids(&hand);
            if !super::win::is_kokushimusou_win(&tt) {
                return Err(RuleError::illegal("ron on ankan requires kokushimusou"));
            }
            yf.chankan = true;
        }
        _ => return Err(RuleError::illegal(format!("cannot ron on {:?}", tp))),
    }

    evaluate_hand(
        &hand,
        &pl.hand.melds,
        &stg.dora_indicators(),
        &ura_doras(stg, pl),
        t.tile(),
        false,
        stg.is_dealer(seat),
        stg.get_prevalent_wind(),
        stg.get_seat_wind(seat),
        &yf,
        &stg.rule,
        table,
    )
}

// 聴牌になる打牌をフリテンの情報を添えて返却 (リーチ宣言用)
pub fn evaluate_tenpai_discards(hand: &TileTable, furiten: &Furiten) -> Vec<Tenpai> {
    calc_discards_to_tenpai(hand)
        .into_iter()
        .map(|(discard_tile, winning_tiles)| {
            // 打牌した牌は河に入るのでフリテン判定に含める
            let is_furiten = winning_tiles
                .iter()
                .any(|&t| t == discard_tile || furiten.has_discarded(t));
            Tenpai {
                discard_tile,
                winning_tiles,
                is_furiten,
            }
        })
        .collect()
}

// 聴牌判定 (流局時)
pub fn is_tenpai(hand: &Hand) -> bool {
    !calc_waits(&hand.table()).is_empty()
}
