use std::fs::File;
use std::io::{self, BufRead};

use anyhow::{anyhow, bail, Context};
use log::{debug, error};

use crate::control::common::{meld_from_string, wind_from_char};
use crate::hand::{evaluate_hand, ScoreTable, YakuFlags};
use crate::model::*;

// [CalculatorApp]
// 手牌の式を評価して役,符,点数を表示する
// 式の形式: 手牌[+],副露,副露/場風自風,ドラ表示牌,裏ドラ表示牌/特殊役,.../符,翻,点数
//   手牌の末尾が和了牌, '+'はロン和了 (省略時はツモ)
//   例: m123p45s456777z33p3+/ES,z1/立直/40,1,1300
#[derive(Debug)]
pub struct CalculatorApp {
    rule: Rule,
    detail: bool,
}

impl CalculatorApp {
    pub fn new(rule: Rule, detail: bool) -> Self {
        Self { rule, detail }
    }

    pub fn run_expression(&self, exp: &str) -> anyhow::Result<Verify> {
        let mut calculator = Calculator::new(self.detail);
        calculator.parse(exp)?;
        Ok(calculator.run(&self.rule))
    }

    // 1行1式のファイルを評価 (空行と'#'で始まる行はスキップ) 検証に失敗した式の数を返却
    pub fn run_file(&self, file_path: &str) -> anyhow::Result<usize> {
        let file = File::open(file_path).with_context(|| format!("cannot open {}", file_path))?;
        let mut n_error = 0;
        for (i, line) in io::BufReader::new(file).lines().enumerate() {
            let exp = line?;
            let e = exp.replace(' ', "");
            if e.is_empty() || e.starts_with('#') {
                println!("> {}", exp);
                continue;
            }
            match self.run_expression(&exp) {
                Ok(Verify::Error) => n_error += 1,
                Ok(_) => {}
                Err(err) => {
                    error!("{}:{}: {}", file_path, i + 1, err);
                    n_error += 1;
                }
            }
            println!();
        }
        Ok(n_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Debug)]
struct Calculator {
    detail: bool,
    // evaluate_hand params
    hand: Vec<TileId>,
    melds: Vec<Meld>,
    doras: Vec<Tile>,
    ura_doras: Vec<Tile>,
    winning_tile: Option<Tile>,
    is_drawn: bool,
    is_dealer: bool,
    prevalent_wind: Tnum,
    seat_wind: Tnum,
    yaku_flags: YakuFlags,
    // score verify (符, 翻, 点数)
    expected: Option<(usize, usize, Point)>,
}

impl Calculator {
    fn new(detail: bool) -> Self {
        Self {
            detail,
            hand: vec![],
            melds: vec![],
            doras: vec![],
            ura_doras: vec![],
            winning_tile: None,
            is_drawn: true,
            is_dealer: true,
            prevalent_wind: WE,
            seat_wind: WE,
            yaku_flags: YakuFlags::default(),
            expected: None,
        }
    }

    fn parse(&mut self, input: &str) -> anyhow::Result<()> {
        println!("> {}", input);

        let input = input.replace(' ', "");
        let input = input.split('#').next().unwrap_or(""); // コメント削除
        let exps: Vec<&str> = input.split('/').collect();
        if let Some(exp) = exps.get(1) {
            self.parse_stage_info(exp)?;
        }
        self.parse_hand_meld(exps[0])?;
        if let Some(exp) = exps.get(2) {
            self.parse_yaku_flags(exp)?;
        }
        if let Some(exp) = exps.get(3) {
            self.parse_score_verify(exp)?;
        }

        if self.detail {
            debug!("{:?}", self);
        }
        Ok(())
    }

    fn run(&self, rule: &Rule) -> Verify {
        let Some(winning_tile) = self.winning_tile else {
            println!("empty hand");
            return Verify::Error;
        };
        let res = evaluate_hand(
            &self.hand,
            &self.melds,
            &self.doras,
            &self.ura_doras,
            winning_tile,
            self.is_drawn,
            self.is_dealer,
            self.prevalent_wind,
            self.seat_wind,
            &self.yaku_flags,
            rule,
            ScoreTable::global(),
        );

        let verify = match res {
            Ok(ctx) => {
                if self.detail {
                    debug!("{:?}", ctx);
                }
                let yakus: Vec<String> =
                    ctx.yakus.iter().map(|(n, f)| format!("{}({})", n, f)).collect();
                println!("yakus: {}", yakus.join(", "));
                println!(
                    "fu: {}, fan: {}, yakuman: {}, score: {}, {}",
                    ctx.fu, ctx.fan, ctx.yakuman, ctx.score, ctx.title
                );
                match self.expected {
                    // 役満は得点のみをチェック
                    Some((_, _, score)) if ctx.yakuman > 0 => verify_if(ctx.score == score),
                    Some((fu, fan, score)) => {
                        verify_if(ctx.fu == fu && ctx.fan == fan && ctx.score == score)
                    }
                    None => Verify::Skip,
                }
            }
            Err(e) => {
                println!("not win hand: {}", e);
                match self.expected {
                    Some((_, _, score)) => verify_if(score == 0),
                    None => Verify::Skip,
                }
            }
        };
        println!("verify: {:?}", verify);
        verify
    }

    fn parse_stage_info(&mut self, input: &str) -> anyhow::Result<()> {
        let exps: Vec<&str> = input.split(',').collect();
        let chars: Vec<char> = exps[0].chars().collect();
        if chars.len() != 2 {
            bail!("stage info len is not 2: {}", exps[0]);
        }
        self.prevalent_wind = wind_from_char(chars[0]).map_err(|e| anyhow!(e))?;
        self.seat_wind = wind_from_char(chars[1]).map_err(|e| anyhow!(e))?;
        self.is_dealer = self.seat_wind == WE;

        if let Some(exp) = exps.get(1) {
            self.doras = tiles_from_string(exp).map_err(|e| anyhow!(e))?;
        }
        if let Some(exp) = exps.get(2) {
            self.ura_doras = tiles_from_string(exp).map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }

    fn parse_hand_meld(&mut self, input: &str) -> anyhow::Result<()> {
        let mut used = [false; TILE_ID_MAX];
        let mut it = input.split(',');
        let exp_hand = it.next().unwrap_or("");
        if exp_hand.ends_with('+') {
            self.is_drawn = false;
        }
        self.hand = allocate_tile_ids(&exp_hand.replace('+', ""), &mut used)
            .map_err(|e| anyhow!(e))?;
        self.winning_tile = self.hand.last().map(|t| t.tile());

        for exp_meld in it {
            self.melds
                .push(meld_from_string(exp_meld, &mut used).map_err(|e| anyhow!(e))?);
        }
        self.yaku_flags.menzentsumo =
            self.is_drawn && self.melds.iter().all(|m| m.meld_type == MeldType::Ankan);
        Ok(())
    }

    fn parse_yaku_flags(&mut self, input: &str) -> anyhow::Result<()> {
        for y in input.split(',') {
            match y {
                "立直" => self.yaku_flags.riichi = true,
                "両立直" => self.yaku_flags.dabururiichi = true,
                "一発" => self.yaku_flags.ippatsu = true,
                "海底摸月" => self.yaku_flags.haiteiraoyue = true,
                "河底撈魚" => self.yaku_flags.houteiraoyui = true,
                "嶺上開花" => self.yaku_flags.rinshankaihou = true,
                "槍槓" => self.yaku_flags.chankan = true,
                "天和" => self.yaku_flags.tenhou = true,
                "地和" => self.yaku_flags.tiihou = true,
                "" => {}
                _ => bail!("invalid conditional yaku: {}", y),
            }
        }
        Ok(())
    }

    fn parse_score_verify(&mut self, input: &str) -> anyhow::Result<()> {
        let exps: Vec<&str> = input.split(',').collect();
        if exps.len() != 3 {
            bail!("invalid score verify info: {}", input);
        }
        self.expected = Some((exps[0].parse()?, exps[1].parse()?, exps[2].parse()?));
        Ok(())
    }
}

fn verify_if(ok: bool) -> Verify {
    if ok {
        Verify::Ok
    } else {
        Verify::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_fields() {
        let mut c = Calculator::new(false);
        c.parse("m123p45s456777z33p3+/ES,z1/立直/40,1,1300").unwrap();
        assert!(!c.is_drawn);
        assert!(!c.is_dealer);
        assert_eq!(c.winning_tile, Some(Tile(TP, 3)));
        assert_eq!(c.doras, vec![Tile(TZ, WE)]);
        assert!(c.yaku_flags.riichi);
        assert!(!c.yaku_flags.menzentsumo);
        assert_eq!(c.expected, Some((40, 1, 1300)));
        assert_eq!(c.run(&Rule::default()), Verify::Ok);
    }

    #[test]
    fn invalid_expressions() {
        let app = CalculatorApp::new(Rule::default(), false);
        assert!(app.run_expression("m123x/ES").is_err());
        assert!(app.run_expression("m123/E").is_err());
        assert!(app.run_expression("m123/ES/ドラ").is_err());
        assert!(app.run_expression("m123/ES//30,1").is_err());
    }

    #[test]
    fn hands_in_file_verify() {
        let app = CalculatorApp::new(Rule::default(), false);
        assert_eq!(app.run_file("tests/win_hands.txt").unwrap(), 0);
    }
}
