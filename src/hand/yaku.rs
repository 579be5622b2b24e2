use std::fmt;

use crate::model::*;

use super::fu::{classify_waits, Wait};
use super::parse::{Decomposition, SetPair, SetPairType, Shape};

use SetPairType::*;

#[derive(Debug)]
pub struct YakuContext {
    pub(super) hand: TileTable,          // 和了牌を含む純手牌(鳴きは含まない) 九蓮宝燈の判定などに使用
    pub(super) decomposition: Decomposition, // 鳴きを含むすべての面子
    pub(super) pair_tile: Option<Tile>,  // 雀頭の牌 (国士無双はNone)
    pub(super) winning_tile: Tile,       // 和了牌
    pub(super) is_tsumo: bool,           // ツモ和了
    pub(super) is_open: bool,            // 鳴きの有無
    pub(super) prevalent_wind: Tnum,     // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    pub(super) seat_wind: Tnum,          // 自風 (同上)
    pub(super) yaku_flags: YakuFlags,    // 組み合わせ以外による役 外部から設定を行う
    pub(super) waits: Vec<Wait>,         // 和了牌の取り方の候補
    pub(super) ron_koutsu: Option<Tile>, // ロンで完成した刻子 (明刻扱い)
    counts: Counts,                      // 面子や牌種別のカウント
    iipeikou_count: usize,               // 一盃口, 二盃口用
    yakuhai_check: TileRow,              // 役牌面子のカウント(雀頭は含まない)
    kuitan: bool,                        // 喰いタンあり
}

impl YakuContext {
    pub fn new(
        hand: TileTable,
        decomposition: Decomposition,
        winning_tile: Tile,
        prevalent_wind: Tnum,
        seat_wind: Tnum,
        is_tsumo: bool,
        yaku_flags: YakuFlags,
        kuitan: bool,
    ) -> Self {
        let sets = &decomposition.sets;
        let pair_tile = decomposition.pair();
        let waits = classify_waits(sets, winning_tile);
        let win_in_shuntsu = sets
            .iter()
            .any(|sp| sp.0 == Shuntsu && sp.contains(winning_tile));
        let ron_koutsu = if !is_tsumo && !win_in_shuntsu && waits.contains(&Wait::Shanpon) {
            Some(winning_tile)
        } else {
            None
        };
        let mut counts = count_type(sets);
        if ron_koutsu.is_some() {
            counts.ankou_total -= 1;
        }
        let iipeikou_count = count_iipeikou(sets);
        let yakuhai_check = check_yakuhai(sets);
        let is_open = counts.chi + counts.pon + counts.minkan != 0;

        Self {
            hand,
            decomposition,
            pair_tile,
            winning_tile,
            is_tsumo,
            is_open,
            prevalent_wind,
            seat_wind,
            yaku_flags,
            waits,
            ron_koutsu,
            counts,
            iipeikou_count,
            yakuhai_check,
            kuitan,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    #[inline]
    pub(super) fn sets(&self) -> &[SetPair] {
        &self.decomposition.sets
    }

    // (役一覧, 翻数, 役満倍率)を返却
    // 役満が含まれている場合は役満のみを返却し翻数は0
    pub fn calc_yaku(&self) -> (Vec<&'static Yaku>, usize, usize) {
        let mut yakus: Vec<&'static Yaku> = YAKU_LIST
            .iter()
            .filter(|y| (y.func)(self))
            .filter(|y| !self.is_open || y.fan_open != 0)
            .collect();

        // 包含関係にある役は上位のみ残す
        let names: Vec<&str> = yakus.iter().map(|y| y.name).collect();
        yakus.retain(|y| {
            !YAKU_EXCLUSIONS
                .iter()
                .any(|&(lower, upper)| y.name == lower && names.contains(&upper))
        });

        let yakuman: usize = yakus.iter().map(|y| y.yakuman()).sum();
        if yakuman > 0 {
            yakus.retain(|y| y.yakuman() > 0);
            return (yakus, 0, yakuman);
        }

        let fan = yakus.iter().map(|y| self.fan_of(y)).sum();
        (yakus, fan, 0)
    }

    // 鳴きの有無による翻数
    pub fn fan_of(&self, y: &Yaku) -> usize {
        if self.is_open {
            y.fan_open
        } else {
            y.fan_close
        }
    }
}

#[derive(Debug, Default)]
struct Counts {
    shuntsu: usize,
    koutsu: usize,
    chi: usize,
    pon: usize,
    minkan: usize,
    ankan: usize,
    shuntsu_total: usize, // shuntsu + chi
    koutsu_total: usize,  // koutsu + pon + minkan + ankan
    ankou_total: usize,   // koutsu + ankan (ロンで完成した刻子を除く)
    kantsu_total: usize,  // minkan + ankan
    tis: [usize; TYPE],   // tile Type Indices counts
}

// 特殊形&特殊条件の役
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct YakuFlags {
    pub menzentsumo: bool,
    pub riichi: bool,
    pub dabururiichi: bool,
    pub ippatsu: bool,
    pub haiteiraoyue: bool,
    pub houteiraoyui: bool,
    pub rinshankaihou: bool,
    pub chankan: bool,
    pub tenhou: bool,
    pub tiihou: bool,
}

fn count_type(sets: &[SetPair]) -> Counts {
    let mut cnt = Counts::default();
    for SetPair(tp, t) in sets {
        match tp {
            Pair => {}
            Shuntsu => cnt.shuntsu += 1,
            Koutsu => cnt.koutsu += 1,
            Chi => cnt.chi += 1,
            Pon => cnt.pon += 1,
            Minkan => cnt.minkan += 1,
            Ankan => cnt.ankan += 1,
        }

        cnt.tis[t.0] += 1;
    }
    cnt.shuntsu_total = cnt.shuntsu + cnt.chi;
    cnt.koutsu_total = cnt.koutsu + cnt.pon + cnt.minkan + cnt.ankan;
    cnt.ankou_total = cnt.koutsu + cnt.ankan;
    cnt.kantsu_total = cnt.minkan + cnt.ankan;

    cnt
}

fn count_iipeikou(sets: &[SetPair]) -> usize {
    let mut n = 0;
    let mut shuntsu = TileTable::default();
    for SetPair(tp, t) in sets {
        if let Shuntsu = tp {
            shuntsu[t.0][t.1] += 1;
            if shuntsu[t.0][t.1] % 2 == 0 {
                n += 1;
            }
        }
    }
    n
}

fn check_yakuhai(sets: &[SetPair]) -> TileRow {
    let mut tr = TileRow::default();
    for SetPair(tp, t) in sets {
        match tp {
            Koutsu | Pon | Minkan | Ankan => {
                if t.is_honor() {
                    tr[t.1] += 1;
                }
            }
            _ => {}
        }
    }
    tr
}

pub struct Yaku {
    pub name: &'static str,
    pub func: fn(&YakuContext) -> bool,
    pub fan_close: usize, // 鳴きなしの翻 (13以上は役満)
    pub fan_open: usize,  // 鳴きありの翻(食い下がり) 0は門前限定
}

impl Yaku {
    // 役満倍率 (通常役は0)
    #[inline]
    pub fn yakuman(&self) -> usize {
        if self.fan_close >= 13 {
            self.fan_close - 12
        } else {
            0
        }
    }
}

impl fmt::Debug for Yaku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.name, self.fan_close, self.fan_open)
    }
}

macro_rules! yaku {
    ($n: expr, $f: expr, $c: expr, $o: expr) => {
        Yaku {
            name: $n,
            func: $f,
            fan_close: $c,
            fan_open: $o,
        }
    };
}

static YAKU_LIST: &[Yaku] = &[
    // 特殊条件
    yaku!("立直", is_riichi, 1, 0),
    yaku!("ダブル立直", is_dabururiichi, 2, 0),
    yaku!("一発", is_ippatsu, 1, 0),
    yaku!("門前清自摸和", is_menzentsumo, 1, 0),
    yaku!("海底摸月", is_haiteiraoyue, 1, 1),
    yaku!("河底撈魚", is_houteiraoyui, 1, 1),
    yaku!("嶺上開花", is_rinshankaihou, 1, 1),
    yaku!("槍槓", is_chankan, 1, 1),
    // 組み合わせ
    yaku!("断幺九", is_tanyaochuu, 1, 1),
    yaku!("平和", is_pinfu, 1, 0),
    yaku!("一盃口", is_iipeikou, 1, 0),
    yaku!("二盃口", is_ryanpeikou, 3, 0),
    yaku!("場風", is_bakaze, 1, 1),
    yaku!("自風", is_jikaze, 1, 1),
    yaku!("白", is_haku, 1, 1),
    yaku!("發", is_hatsu, 1, 1),
    yaku!("中", is_chun, 1, 1),
    yaku!("混全帯幺九", is_chanta, 2, 1),
    yaku!("純全帯幺九", is_junchan, 3, 2),
    yaku!("一気通貫", is_ikkitsuukan, 2, 1),
    yaku!("三色同順", is_sanshokudoujun, 2, 1),
    yaku!("三色同刻", is_sanshokudoukou, 2, 2),
    yaku!("対々和", is_toitoihou, 2, 2),
    yaku!("三暗刻", is_sanankou, 2, 2),
    yaku!("三槓子", is_sankantsu, 2, 2),
    yaku!("混老頭", is_honroutou, 2, 2),
    yaku!("小三元", is_shousangen, 2, 2),
    yaku!("七対子", is_chiitoitsu, 2, 0),
    yaku!("混一色", is_honiisou, 3, 2),
    yaku!("清一色", is_chiniisou, 6, 5),
    // 役満
    yaku!("天和", is_tenhou, 13, 0),
    yaku!("地和", is_tiihou, 13, 0),
    yaku!("国士無双", is_kokushimusou, 13, 0),
    yaku!("四暗刻", is_suuankou, 13, 0),
    yaku!("大三元", is_daisangen, 13, 13),
    yaku!("小四喜", is_shousuushii, 13, 13),
    yaku!("大四喜", is_daisuushii, 13, 13),
    yaku!("字一色", is_tuuiisou, 13, 13),
    yaku!("清老頭", is_chinroutou, 13, 13),
    yaku!("緑一色", is_ryuuiisou, 13, 13),
    yaku!("九蓮宝燈", is_chuurenpoutou, 13, 0),
    yaku!("四槓子", is_suukantsu, 13, 13),
];

// 役の優先順位 =================================================================
// * 役満が存在する場合は役満以外の役は削除
// * 以下の役は排他的(包含関係)であり右側を優先
static YAKU_EXCLUSIONS: &[(&str, &str)] = &[
    ("立直", "ダブル立直"),
    ("一盃口", "二盃口"),
    ("混全帯幺九", "純全帯幺九"),
    ("混全帯幺九", "混老頭"),
    ("混一色", "清一色"),
    ("小四喜", "大四喜"),
];

// 場風
fn is_bakaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.prevalent_wind] == 1
}

// 自風
fn is_jikaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.seat_wind] == 1
}

// 白
fn is_haku(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DW] == 1
}

// 發
fn is_hatsu(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DG] == 1
}

// 中
fn is_chun(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DR] == 1
}

// 断幺九
fn is_tanyaochuu(ctx: &YakuContext) -> bool {
    if ctx.sets().is_empty() {
        return false; // 国士対策
    }
    if ctx.is_open && !ctx.kuitan {
        return false;
    }

    ctx.sets().iter().all(|SetPair(tp, t)| match tp {
        Chi | Shuntsu => t.1 != 1 && t.1 != 7,
        _ => !t.is_end(),
    })
}

// 平和
pub(super) fn is_pinfu(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu != 4 {
        return false;
    }

    if let Some(pt) = ctx.pair_tile {
        if pt.is_doragon() || pt == Tile(TZ, ctx.prevalent_wind) || pt == Tile(TZ, ctx.seat_wind)
        {
            return false;
        }
    }

    ctx.waits.contains(&Wait::Ryanmen)
}

// 一盃口
fn is_iipeikou(ctx: &YakuContext) -> bool {
    !ctx.is_open && ctx.iipeikou_count >= 1
}

// 二盃口
fn is_ryanpeikou(ctx: &YakuContext) -> bool {
    !ctx.is_open && ctx.iipeikou_count == 2
}

// 一気通貫
fn is_ikkitsuukan(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }

    for ti in 0..TZ {
        let mut f147 = [false; 3];
        for SetPair(tp, t) in ctx.sets() {
            if matches!(tp, Shuntsu | Chi) && t.0 == ti && t.1 % 3 == 1 {
                f147[t.1 / 3] = true;
            }
        }
        if f147.iter().all(|&f| f) {
            return true;
        }
    }

    false
}

// 三色同順
fn is_sanshokudoujun(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }

    let mut mps = [[false; TNUM]; 3];
    for SetPair(tp, t) in ctx.sets() {
        if matches!(tp, Shuntsu | Chi) {
            mps[t.0][t.1] = true;
        }
    }

    (1..TNUM).any(|ni| mps[TM][ni] && mps[TP][ni] && mps[TS][ni])
}

// 三色同刻
fn is_sanshokudoukou(ctx: &YakuContext) -> bool {
    if ctx.counts.koutsu_total < 3 {
        return false;
    }

    let mut mps = [[false; TNUM]; 3];
    for SetPair(tp, t) in ctx.sets() {
        if matches!(tp, Koutsu | Pon | Minkan | Ankan) && t.is_suit() {
            mps[t.0][t.1] = true;
        }
    }

    (1..TNUM).any(|ni| mps[TM][ni] && mps[TP][ni] && mps[TS][ni])
}

// 混全帯幺九 (すべての面子と雀頭に么九牌を含む)
fn is_chanta(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total == 0 || ctx.decomposition.shape != Shape::Standard {
        return false;
    }

    ctx.sets().iter().all(|SetPair(tp, t)| match tp {
        Shuntsu | Chi => t.1 == 1 || t.1 == 7,
        _ => t.is_end(),
    })
}

// 純全帯幺九
fn is_junchan(ctx: &YakuContext) -> bool {
    is_chanta(ctx) && ctx.counts.tis[TZ] == 0
}

// 混老頭
fn is_honroutou(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total != 0 || ctx.sets().is_empty() {
        return false;
    }

    let mut has_honor = false;
    let mut has_terminal = false;
    for SetPair(_, t) in ctx.sets() {
        if t.is_honor() {
            has_honor = true;
        } else if t.is_terminal() {
            has_terminal = true;
        } else {
            return false;
        }
    }

    has_honor && has_terminal
}

// 清老頭
fn is_chinroutou(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total != 0 || ctx.sets().is_empty() {
        return false;
    }
    ctx.sets().iter().all(|SetPair(_, t)| t.is_terminal())
}

// 対々和
fn is_toitoihou(ctx: &YakuContext) -> bool {
    ctx.counts.koutsu_total == 4
}

// 三暗刻
fn is_sanankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 3
}

// 四暗刻 (ロンの双碰待ちは明刻扱いになるので自然に除外される)
fn is_suuankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 4
}

// 三槓子
fn is_sankantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 3
}

// 四槓子
fn is_suukantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 4
}

fn n_suit_types(ctx: &YakuContext) -> usize {
    let tis = &ctx.counts.tis;
    (TM..=TS).filter(|&ti| tis[ti] > 0).count()
}

// 混一色
fn is_honiisou(ctx: &YakuContext) -> bool {
    n_suit_types(ctx) == 1 && ctx.counts.tis[TZ] > 0
}

// 清一色
fn is_chiniisou(ctx: &YakuContext) -> bool {
    n_suit_types(ctx) == 1 && ctx.counts.tis[TZ] == 0
}

// 小三元
fn is_shousangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 2 && ctx.pair_tile.map_or(false, |t| t.is_doragon())
}

// 大三元
fn is_daisangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 3
}

// 小四喜
fn is_shousuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 3 && ctx.pair_tile.map_or(false, |t| t.is_wind())
}

// 大四喜
fn is_daisuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 4
}

// 緑一色
fn is_ryuuiisou(ctx: &YakuContext) -> bool {
    if ctx.sets().is_empty() {
        return false;
    }

    ctx.sets().iter().all(|SetPair(tp, t)| match tp {
        Shuntsu | Chi => *t == Tile(TS, 2), // 順子は234のみ
        _ => t.is_green(),
    })
}

// 字一色
fn is_tuuiisou(ctx: &YakuContext) -> bool {
    !ctx.sets().is_empty() && ctx.sets().iter().all(|SetPair(_, t)| t.is_honor())
}

// 九蓮宝燈
fn is_chuurenpoutou(ctx: &YakuContext) -> bool {
    if ctx.is_open || ctx.counts.kantsu_total != 0 {
        return false;
    }

    let h = &ctx.hand;
    let ti = match (TM..=TS).find(|&ti| h[ti][1..TNUM].iter().sum::<usize>() == 14) {
        Some(ti) => ti,
        None => return false,
    };

    h[ti][1] >= 3 && h[ti][9] >= 3 && (2..9).all(|ni| h[ti][ni] > 0)
}

// 国士無双
fn is_kokushimusou(ctx: &YakuContext) -> bool {
    ctx.decomposition.shape == Shape::ThirteenOrphans
}

// 七対子
fn is_chiitoitsu(ctx: &YakuContext) -> bool {
    ctx.decomposition.shape == Shape::SevenPairs
}

// 門前清自摸和
fn is_menzentsumo(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.menzentsumo
}

// 立直
fn is_riichi(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.riichi
}

// ダブル立直
fn is_dabururiichi(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.dabururiichi
}

// 一発
fn is_ippatsu(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.ippatsu
}

// 海底摸月
fn is_haiteiraoyue(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.haiteiraoyue
}

// 河底撈魚
fn is_houteiraoyui(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.houteiraoyui
}

// 嶺上開花
fn is_rinshankaihou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.rinshankaihou
}

// 槍槓
fn is_chankan(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.chankan
}

// 天和
fn is_tenhou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.tenhou
}

// 地和
fn is_tiihou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.tiihou
}
