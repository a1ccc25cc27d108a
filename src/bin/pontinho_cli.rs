use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use dialoguer::{Confirm, Input, Select};
use tracing::{debug, Level};

use pontinho_engine::api::{build_history, build_settlement, table_view, ScoreZone, TableViewDto};
use pontinho_engine::domain::{GameConfig, GamePhase, Money, PlayerId};
use pontinho_engine::engine::{EngineError, GameSession, RoundInput};
use pontinho_engine::infra::{ConfirmationPrompter, JsonFileStore, Notifier, Severity};

type CliSession = GameSession<JsonFileStore, ConsoleNotifier>;

/// Счёт, долги и вылеты для стола Понтинью.
#[derive(Parser, Debug)]
#[command(name = "pontinho_cli")]
struct Args {
    /// Файл, где хранится стол между запусками.
    #[arg(long, default_value = "pontinho-state.json")]
    state_file: PathBuf,

    /// Вход для нового стола на деньги (например, 10 или 10,50).
    #[arg(long, requires = "rebuy")]
    entry: Option<String>,

    /// Перекупка для нового стола на деньги.
    #[arg(long, requires = "entry")]
    rebuy: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

/// Уведомления в терминал.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        let mark = match severity {
            Severity::Info => "·",
            Severity::Success => "✔",
            Severity::Warning => "!",
            Severity::Error => "✖",
        };
        println!("{mark} {message}");
    }
}

/// Вопрос «да/нет» через dialoguer. Esc / закрытие – это «нет».
struct DialoguerPrompter;

impl ConfirmationPrompter for DialoguerPrompter {
    fn ask(&mut self, title: &str, message: &str) -> bool {
        self.ask_or_dismiss(title, message).unwrap_or(false)
    }

    fn ask_or_dismiss(&mut self, title: &str, message: &str) -> Option<bool> {
        println!();
        println!("=== {title} ===");
        // Esc / q в dialoguer – `Ok(None)`, ошибка терминала – тоже без ответа.
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()
            .ok()
            .flatten()
    }
}

#[derive(Clone, Copy, Debug)]
enum MenuAction {
    EnterRound,
    AddPlayer,
    RemovePlayer,
    MovePlayer,
    StartGame,
    History,
    Settlement,
    Undo,
    Restart,
    NewTable,
    Quit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut session = open_session(&args)?;
    let mut prompter = DialoguerPrompter;

    loop {
        let view = table_view(&session);
        render_table(&view, &session);

        let menu = menu_for(&session);
        let labels: Vec<&str> = menu.iter().map(|(label, _)| *label).collect();
        let choice = Select::new()
            .with_prompt("Действие")
            .items(&labels)
            .default(0)
            .interact()?;

        match menu[choice].1 {
            MenuAction::EnterRound => enter_round(&mut session, &mut prompter)?,
            MenuAction::AddPlayer => {
                let name: String = Input::new()
                    .with_prompt("Имя игрока")
                    .allow_empty(true)
                    .interact_text()?;
                report(session.add_player(&name));
            }
            MenuAction::RemovePlayer => {
                if let Some(id) = pick_player(&session, "Кого убрать?", |_| true)? {
                    report(session.remove_player(id));
                }
            }
            MenuAction::MovePlayer => {
                if let Some(src) = pick_player(&session, "Кого пересадить?", |_| true)? {
                    if let Some(target) = pick_player(&session, "На чьё место?", |id| id != src)? {
                        report(session.move_player(src, target));
                    }
                }
            }
            MenuAction::StartGame => report(session.start_game()),
            MenuAction::History => render_history(&session),
            MenuAction::Settlement => settlement_screen(&mut session)?,
            MenuAction::Undo => report(session.undo()),
            MenuAction::Restart => report(session.restart_match(&mut prompter)),
            MenuAction::NewTable => {
                let config = choose_config()?;
                report(session.new_game(config, &mut prompter));
            }
            MenuAction::Quit => break,
        }
    }

    println!("До встречи!");
    Ok(())
}

/// Ошибки уже показаны пользователю через уведомления.
fn report<T>(res: Result<T, EngineError>) {
    if let Err(err) = res {
        debug!(%err, "command rejected");
    }
}

fn open_session(args: &Args) -> Result<CliSession, Box<dyn Error>> {
    let store = JsonFileStore::new(&args.state_file);

    let (store, notifier) = match GameSession::resume(store, ConsoleNotifier) {
        Ok(session) => {
            let resume = Confirm::new()
                .with_prompt(format!(
                    "Найдена сохранённая игра (раунд {}). Продолжить?",
                    session.state().current_round
                ))
                .default(true)
                .interact()?;
            if resume {
                return Ok(session);
            }
            // Старое сохранение перезапишется новым столом.
            let store = JsonFileStore::new(&args.state_file);
            (store, ConsoleNotifier)
        }
        Err(parts) => parts,
    };

    let config = match (&args.entry, &args.rebuy) {
        (Some(entry), Some(rebuy)) => {
            let entry = Money::parse(entry).ok_or_else(|| EngineError::InvalidAmount(entry.clone()))?;
            let rebuy = Money::parse(rebuy).ok_or_else(|| EngineError::InvalidAmount(rebuy.clone()))?;
            GameConfig::staked(entry, rebuy)?
        }
        _ => choose_config()?,
    };

    Ok(GameSession::new(store, notifier, config))
}

fn choose_config() -> Result<GameConfig, Box<dyn Error>> {
    let mode = Select::new()
        .with_prompt("Режим стола")
        .items(&["Дружеская игра", "Игра на деньги"])
        .default(0)
        .interact()?;
    if mode == 0 {
        return Ok(GameConfig::friendly());
    }

    let entry = ask_amount("Вход")?;
    let rebuy = ask_amount("Перекупка")?;
    Ok(GameConfig::staked(entry, rebuy)?)
}

fn ask_amount(prompt: &str) -> Result<Money, Box<dyn Error>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|s: &String| -> Result<(), &str> {
            match Money::parse(s) {
                Some(m) if !m.is_zero() => Ok(()),
                _ => Err("Введите сумму больше нуля"),
            }
        })
        .interact_text()?;
    Ok(Money::parse(&raw).ok_or(EngineError::InvalidAmount(raw))?)
}

fn menu_for(session: &CliSession) -> Vec<(&'static str, MenuAction)> {
    let mut menu = Vec::new();
    match session.phase() {
        GamePhase::Setup => {
            menu.push(("Добавить игрока", MenuAction::AddPlayer));
            menu.push(("Удалить игрока", MenuAction::RemovePlayer));
            menu.push(("Пересадить игрока", MenuAction::MovePlayer));
            menu.push(("Начать партию", MenuAction::StartGame));
        }
        GamePhase::Active => {
            menu.push(("Ввести раунд", MenuAction::EnterRound));
            menu.push(("Добавить игрока", MenuAction::AddPlayer));
            menu.push(("История", MenuAction::History));
            menu.push(("Расчёт", MenuAction::Settlement));
            menu.push(("Перезапустить партию", MenuAction::Restart));
        }
        GamePhase::Finished => {
            menu.push(("Расчёт / оплата", MenuAction::Settlement));
            menu.push(("История", MenuAction::History));
            menu.push(("Перезапустить партию", MenuAction::Restart));
        }
    }
    if session.can_undo() {
        menu.push(("Отменить последнее действие", MenuAction::Undo));
    }
    menu.push(("Новый стол", MenuAction::NewTable));
    menu.push(("Выход", MenuAction::Quit));
    menu
}

fn pick_player(
    session: &CliSession,
    prompt: &str,
    allow: impl Fn(PlayerId) -> bool,
) -> Result<Option<PlayerId>, Box<dyn Error>> {
    let candidates: Vec<(PlayerId, String)> = session
        .state()
        .players
        .iter()
        .filter(|p| allow(p.id))
        .map(|p| (p.id, p.name.clone()))
        .collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    let labels: Vec<&str> = candidates.iter().map(|(_, n)| n.as_str()).collect();
    let choice = Select::new().with_prompt(prompt).items(&labels).interact_opt()?;
    Ok(choice.map(|i| candidates[i].0))
}

fn enter_round(session: &mut CliSession, prompter: &mut DialoguerPrompter) -> Result<(), Box<dyn Error>> {
    println!("Раунд {} – потери игроков:", session.state().current_round);

    let active: Vec<(PlayerId, String, i32)> = session
        .state()
        .active_players()
        .map(|p| (p.id, p.name.clone(), p.score))
        .collect();

    let mut input = RoundInput::new();
    for (id, name, score) in active {
        let loss: i64 = Input::new()
            .with_prompt(format!("{name} ({score})"))
            .default(0)
            .interact_text()?;
        input.insert(id, loss);
    }

    match session.play_round(&input, prompter) {
        Ok(Some(summary)) => debug!(round = summary.round, "round closed"),
        Ok(None) => println!("Раунд не записан."),
        Err(err) => debug!(%err, "round rejected"),
    }
    Ok(())
}

fn settlement_screen(session: &mut CliSession) -> Result<(), Box<dyn Error>> {
    loop {
        let s = build_settlement(session.state());

        println!();
        println!("=========== РАСЧЁТ ===========");
        if let Some(w) = &s.winner {
            println!("Победитель: {}", w.name);
            if !s.friendly {
                println!("Банк: {}  Чистая прибыль: {}", w.total_pot, w.net_profit);
            }
        } else {
            println!("Банк: {}", s.total_pot);
        }
        if s.friendly {
            println!("Дружеская игра – денег нет.");
            println!("==============================");
            return Ok(());
        }
        for l in &s.losers {
            let mark = if l.has_paid { "оплачено" } else { "должен" };
            println!("  {:<20} {:>10}  {}", l.name, l.debt.to_string(), mark);
        }
        println!("Оплачено: {}  Ожидается: {}", s.paid, s.pending);
        println!("==============================");

        if s.losers.is_empty() {
            return Ok(());
        }

        let mut labels: Vec<String> = s
            .losers
            .iter()
            .map(|l| format!("Отметить оплату: {}", l.name))
            .collect();
        labels.push("Назад".to_string());

        let choice = Select::new().items(&labels).default(labels.len() - 1).interact()?;
        match s.losers.get(choice) {
            Some(l) => report(session.toggle_payment(l.player_id)),
            None => return Ok(()),
        }
    }
}

fn zone_mark(zone: ScoreZone) -> &'static str {
    match zone {
        ScoreZone::Safe => "  ",
        ScoreZone::Warning => "! ",
        ScoreZone::Danger => "!!",
        ScoreZone::Out => "✖ ",
    }
}

fn render_table(view: &TableViewDto, session: &CliSession) {
    println!();
    if view.current_round == 0 {
        println!("=========== СТОЛ (подготовка, {} игроков) ===========", view.total_count);
    } else {
        println!(
            "=========== РАУНД {} | в игре {}/{} ===========",
            view.current_round, view.active_count, view.total_count
        );
    }
    if !view.friendly {
        println!("Вход {}  Перекупка {}  Банк {}", view.entry, view.rebuy, view.total_pot);
    }

    for p in &view.players {
        let dealer = if p.is_dealer { "[Д]" } else { "   " };
        let last = match p.last_round_loss {
            Some(0) => "★".to_string(),
            Some(loss) => format!("▼{loss}"),
            None => String::new(),
        };
        let status = if p.eliminated { " (выбыл)" } else { "" };
        let money = if view.friendly {
            String::new()
        } else {
            format!("  долг {}{}", p.debt, if p.has_paid { " ✔" } else { "" })
        };
        println!(
            "{} {} {:<20} {:>4} {:<5}{}{}",
            dealer,
            zone_mark(p.zone),
            p.name,
            p.score,
            last,
            money,
            status
        );
    }

    if let Some(w) = session.winner_info() {
        println!();
        println!("🏆 {} – ПОБЕДИТЕЛЬ!", w.name);
    }
    println!("==================================================");
}

fn render_history(session: &CliSession) {
    let history = build_history(session.state());
    println!();
    println!("=========== ИСТОРИЯ ===========");
    if history.rounds.is_empty() {
        println!("Пока ни одного раунда.");
    }
    for round in &history.rounds {
        let line: Vec<String> = round
            .entries
            .iter()
            .map(|e| format!("{} −{}", e.name, e.loss))
            .collect();
        println!("Раунд {}: {}", round.round, line.join(", "));
    }
    println!("===============================");
}
