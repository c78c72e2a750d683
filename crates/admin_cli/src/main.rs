use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CreditCmd, Engine, EngineError, PrizeCash, Token, TxnCategory};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "prizecash_admin")]
#[command(about = "Admin utilities for the prizecash service (bootstrap users, seed balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./prizecash.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Cash(Cash),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Cash {
    #[command(subcommand)]
    command: CashCommand,
}

#[derive(Subcommand, Debug)]
enum CashCommand {
    /// Credit a user through the ledger.
    Credit(CreditArgs),
    /// Show cash balance and redeemable prizecash.
    Balance(BalanceArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CreditKind {
    /// Redeemable market winnings (requires --contract).
    Payout,
    /// Locked promotional cash.
    Bonus,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TokenArg {
    Cash,
    Mana,
}

#[derive(Args, Debug)]
struct CreditArgs {
    #[arg(long)]
    user: String,
    /// Amount, e.g. `12.50`.
    #[arg(long)]
    amount: String,
    #[arg(long, value_enum, default_value = "payout")]
    kind: CreditKind,
    /// Paying contract id, for payouts.
    #[arg(long)]
    contract: Option<String>,
    #[arg(long, value_enum, default_value = "cash")]
    token: TokenArg,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[arg(long)]
    user: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn clear_line_and_print(out: &mut std::io::Stderr, text: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(text)
    )?;
    out.flush()?;
    Ok(())
}

fn prompt_password(prompt: &str) -> CliResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    clear_line_and_print(&mut out, prompt)?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Ok(buf);
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }
}

fn prompt_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            clear_line_and_print(&mut out, "Password must not be empty.\r\n")?;
            continue;
        }

        if prompt_password("Confirm password: ")? == first {
            return Ok(first);
        }
        clear_line_and_print(&mut out, "Passwords do not match. Try again.\r\n")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn credit_cmd(args: CreditArgs) -> CliResult<CreditCmd> {
    let amount: PrizeCash = args.amount.parse()?;
    let category = match args.kind {
        CreditKind::Payout => TxnCategory::ContractResolutionPayout,
        CreditKind::Bonus => TxnCategory::CashBonus,
    };
    let token = match args.token {
        TokenArg::Cash => Token::Cash,
        TokenArg::Mana => Token::Mana,
    };

    let mut cmd = CreditCmd::new(args.user, amount, category).token(token);
    if let Some(contract) = args.contract {
        cmd = cmd.source(contract);
    }
    Ok(cmd)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password()?;
            match engine.create_user(&args.username, &password).await {
                Ok(()) => println!("created user: {}", args.username),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Cash(Cash {
            command: CashCommand::Credit(args),
        }) => {
            let txn = engine.credit(credit_cmd(args)?).await?;
            println!(
                "credited {} {} to {} ({}, txn {})",
                txn.amount,
                txn.token.as_str(),
                txn.to_id,
                txn.category.as_str(),
                txn.id
            );
        }
        Command::Cash(Cash {
            command: CashCommand::Balance(args),
        }) => {
            let balance = engine.prize_cash_balance(&args.user).await?;
            println!("cash balance: {}", balance.cash_balance);
            println!("redeemable:   {}", balance.redeemable);
        }
    }

    Ok(())
}
