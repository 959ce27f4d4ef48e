//! Interactive calculation session

use arkcalc_core::report::rank_line;
use arkcalc_core::{
    load_skills, CalcReport, CharacterStats, Config, DamageKind, Lookup, Rank, Roster, Scenario,
    TranscriptLog,
};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Characters of effect text shown before truncating
const EFFECT_PREVIEW_CHARS: usize = 80;

const DEFAULT_ENEMY_DEF: i64 = 300;
const DEFAULT_ENEMY_RES: i64 = 0;
const DEFAULT_TARGETS: u32 = 1;

/// Line-oriented prompt over any reader and writer
///
/// Every read returns `Ok(None)` once input is exhausted, which ends the
/// session quietly.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> arkcalc_core::Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Show `prompt` and read one trimmed line
    pub fn ask(&mut self, prompt: &str) -> arkcalc_core::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a number, re-asking until it parses; blank input gives `default`
    pub fn ask_number<T>(&mut self, prompt: &str, default: T) -> arkcalc_core::Result<Option<T>>
    where
        T: FromStr + Display + Copy,
    {
        loop {
            let Some(answer) = self.ask(&format!("{} [デフォルト: {}]: ", prompt, default))? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("  整数を入力してください。")?,
            }
        }
    }

    /// Pick one of `items` by 1-based number; returns the 0-based index
    pub fn select<T>(
        &mut self,
        items: &[T],
        prompt: &str,
        label: impl Fn(&T) -> String,
    ) -> arkcalc_core::Result<Option<usize>> {
        for (i, item) in items.iter().enumerate() {
            self.say(format!("  {:3}. {}", i + 1, label(item)))?;
        }
        loop {
            let Some(answer) = self.ask(&format!("{}: ", prompt))? else {
                return Ok(None);
            };
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=items.len()).contains(&n) {
                    return Ok(Some(n - 1));
                }
            }
            self.say(format!("  1〜{} の番号を入力してください。", items.len()))?;
        }
    }
}

pub fn character_label(c: &CharacterStats) -> String {
    format!(
        "{:16}  {:4} / {:10}  ATK:{:4}  速度:{}",
        c.name, c.class, c.subclass, c.attack, c.attack_speed_label
    )
}

/// Run calculations until the user declines another one or input ends
pub fn run_interactive<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    roster: &Roster,
    config: &Config,
) -> arkcalc_core::Result<()> {
    let log = TranscriptLog::new(&config.log_file);

    loop {
        if calc_session(prompter, roster, config, &log)?.is_none() {
            prompter.say("\n\n終了します。")?;
            return Ok(());
        }

        let again = prompter.ask("\n別の計算をしますか？ (y/N): ")?;
        if !again.is_some_and(|a| a.eq_ignore_ascii_case("y")) {
            prompter.say("終了します。")?;
            return Ok(());
        }
    }
}

/// One calculation; `Ok(None)` when input ran out midway
pub fn calc_session<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    roster: &Roster,
    config: &Config,
    log: &TranscriptLog,
) -> arkcalc_core::Result<Option<()>> {
    p.say("\n【キャラクター選択】")?;
    let Some(character) = choose_character(p, roster)? else {
        return Ok(None);
    };

    p.say(format!("\n  選択: {}", character.name))?;
    p.say(format!("  職業: {} / {}", character.class, character.subclass))?;
    p.say(format!(
        "  攻撃力: {}  攻撃速度: {}s  HP: {}",
        character.attack, character.attack_speed, character.hp
    ))?;

    p.say("\nスキルデータを読み込み中...")?;
    let skills = match load_skills(&config.sheets_dir, &character.name) {
        Some(skills) if !skills.is_empty() => skills,
        _ => {
            p.say("  スキルデータが見つかりません。")?;
            return Ok(Some(()));
        }
    };
    p.say(format!("  {} スキル読み込み完了\n", skills.len()))?;

    p.say("【スキル選択】")?;
    for skill in &skills {
        p.say(format!("  {}. {}", skill.number, skill.name))?;
    }
    let skill = loop {
        let Some(answer) = p.ask("スキル番号を入力 (1〜3): ")? else {
            return Ok(None);
        };
        let found = answer
            .parse::<u32>()
            .ok()
            .and_then(|n| skills.iter().find(|s| s.number == n));
        match found {
            Some(skill) => break skill,
            None => p.say("  有効なスキル番号を入力してください。")?,
        }
    };
    p.say(format!("\n  選択: スキル{} {}", skill.number, skill.name))?;

    p.say("\n【ランク選択】")?;
    if skill.sheet.is_empty() {
        p.say("  ランクデータがありません。")?;
        return Ok(Some(()));
    }
    for (rank, record) in skill.sheet.iter() {
        p.say(rank_line(rank, record))?;
    }
    let (rank, record) = loop {
        let Some(answer) = p.ask("\nランクを入力 (例: 7 / 特化I / 特化II / 特化III): ")? else {
            return Ok(None);
        };
        let found = Rank::from_input(&answer).and_then(|r| skill.sheet.get(r).map(|rec| (r, rec)));
        match found {
            Some(found) => break found,
            None => {
                let labels: Vec<&str> = skill.sheet.available().iter().map(|r| r.label()).collect();
                p.say(format!("  有効なランクを入力してください。({})", labels.join(" / ")))?
            }
        }
    };

    p.say(format!("\n  選択ランク: {}", rank))?;
    if let Some(effect) = &record.effect {
        let preview: String = effect.chars().take(EFFECT_PREVIEW_CHARS).collect();
        p.say(format!("  効果: {}...", preview))?;
    }
    if record.needs_review {
        p.say("  [注意] このランクの数値は推定です。シートを確認してください。")?;
    }

    p.say("\n【ダメージ種別】")?;
    let inferred = DamageKind::infer(&character.class, record.effect.as_deref());
    let mark = |kind: DamageKind| if kind == inferred { "  ← 推定" } else { "" };
    p.say(format!("  1. 物理ダメージ{}", mark(DamageKind::Physical)))?;
    p.say(format!("  2. 術ダメージ{}", mark(DamageKind::Arts)))?;
    let default_choice = if inferred.is_arts() { "2" } else { "1" };
    let kind = loop {
        let Some(answer) = p.ask(&format!("ダメージ種別を選択 [デフォルト: {}]: ", default_choice))? else {
            return Ok(None);
        };
        match answer.as_str() {
            "" => break inferred,
            "1" => break DamageKind::Physical,
            "2" => break DamageKind::Arts,
            _ => p.say("  1 または 2 を入力してください。")?,
        }
    };

    p.say("\n【敵ステータス】")?;
    let (enemy_def, enemy_res) = if kind.is_arts() {
        let Some(res) = p.ask_number("敵の術耐性 (0〜100)", DEFAULT_ENEMY_RES)? else {
            return Ok(None);
        };
        (0, res)
    } else {
        let Some(def) = p.ask_number("敵の防御力", DEFAULT_ENEMY_DEF)? else {
            return Ok(None);
        };
        (def, 0)
    };

    let Some(targets) = p.ask_number("攻撃対象数 (スキル中の同時攻撃数)", DEFAULT_TARGETS)? else {
        return Ok(None);
    };

    let multiplier = match record.multiplier {
        Some(m) => m,
        None => {
            p.say("\n  [注意] 攻撃倍率を効果テキストから自動解析できませんでした。")?;
            if let Some(effect) = &record.effect {
                p.say(format!("  効果テキスト: {}", effect))?;
            }
            loop {
                let Some(answer) = p.ask("  攻撃倍率を手動で入力 (例: 3.30 = 330%): ")? else {
                    return Ok(None);
                };
                match answer.parse::<f64>() {
                    Ok(m) if m.is_finite() => break m,
                    _ => p.say("  数値を入力してください (例: 3.30)")?,
                }
            }
        }
    };

    let mut duration = record.duration.seconds();
    if duration.is_none() {
        p.say("\n  [情報] 持続時間がデータにありません (持続:'-' またはデータ不足)")?;
        let Some(answer) = p.ask("  持続時間を手動で入力 (例: 40  / スキップはEnter): ")? else {
            return Ok(None);
        };
        if !answer.is_empty() {
            duration = answer.parse::<f64>().ok().filter(|d| d.is_finite());
        }
    }

    let scenario = Scenario {
        kind,
        enemy_def,
        enemy_res,
        targets,
    };
    let report = CalcReport::calculate(
        character,
        skill.number,
        &skill.name,
        rank,
        record,
        scenario,
        multiplier,
        duration,
    );

    let lines = report.lines();
    for line in &lines {
        p.say(line)?;
    }

    match log.append(&lines) {
        Ok(()) => p.say(format!("  [ログ保存] {}", log.path().display()))?,
        Err(e) => {
            tracing::warn!(error = %e, "failed to append transcript");
            p.say(format!("  [警告] ログ保存に失敗しました: {}", e))?;
        }
    }

    Ok(Some(()))
}

fn choose_character<'a, R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    roster: &'a Roster,
) -> arkcalc_core::Result<Option<&'a CharacterStats>> {
    loop {
        let Some(query) = p.ask("\nキャラ名または番号を入力 (一覧は 'list'): ")? else {
            return Ok(None);
        };

        if query.eq_ignore_ascii_case("list") {
            for (i, c) in roster.characters.iter().enumerate() {
                p.say(format!("  {:3}. {}", i + 1, character_label(c)))?;
            }
            continue;
        }

        match roster.lookup(&query) {
            Lookup::Found(c) => return Ok(Some(c)),
            Lookup::Ambiguous(matches) => {
                p.say(format!("  {} 件ヒットしました:", matches.len()))?;
                let Some(idx) = p.select(&matches, "番号を選択", |c| c.name.clone())? else {
                    return Ok(None);
                };
                return Ok(Some(matches[idx]));
            }
            Lookup::NotFound => {
                p.say("  キャラが見つかりませんでした。もう一度入力してください。")?;
            }
        }
    }
}
