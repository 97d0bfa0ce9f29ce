//! Interactive text dashboard: reads commands from stdin and re-renders after each one.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use heatpump_counter::{default_catalog_path, Dashboard, DashboardConfig, UnitSystem};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(
    name = "heatpump-dashboard",
    version,
    about = "How many nights did a city spend below a temperature?"
)]
struct Cli {
    #[arg(long, default_value_os_t = default_catalog_path())]
    catalog: PathBuf,

    /// Where archive answers are cached; defaults to the system cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Starting city, as "City, State"
    #[arg(long)]
    city: Option<String>,
}

const HELP: &str = "\
commands:
  city <City, State>
  dates <YYYY-MM-DD> <YYYY-MM-DD>
  units metric|imperial
  threshold <n>
  weekly on|off
  monthly on|off
  table <low> <high>
  show
  quit";

#[derive(Debug, PartialEq)]
enum Command {
    City(String),
    Dates(NaiveDate, NaiveDate),
    Units(UnitSystem),
    Threshold(i32),
    Weekly(bool),
    Monthly(bool),
    Table(i32, i32),
    Show,
    Help,
    Quit,
}

fn parse_switch(word: &str) -> Result<bool, String> {
    match word {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected on or off, got '{}'", other)),
    }
}

fn parse_number(word: &str) -> Result<i32, String> {
    word.parse()
        .map_err(|_| format!("'{}' is not a whole number", word))
}

fn parse_date(word: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(word, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", word))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        match (verb, args.as_slice()) {
            ("city", [_, ..]) => Ok(Command::City(rest.to_string())),
            ("dates", [start, end]) => Ok(Command::Dates(parse_date(start)?, parse_date(end)?)),
            ("units", [units]) => Ok(Command::Units(units.parse()?)),
            ("threshold", [value]) => Ok(Command::Threshold(parse_number(value)?)),
            ("weekly", [switch]) => Ok(Command::Weekly(parse_switch(switch)?)),
            ("monthly", [switch]) => Ok(Command::Monthly(parse_switch(switch)?)),
            ("table", [low, high]) => Ok(Command::Table(parse_number(low)?, parse_number(high)?)),
            ("show", []) => Ok(Command::Show),
            ("help", []) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            _ => Err(format!("unrecognised command '{}'", line)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = DashboardConfig::builder()
        .catalog_path(cli.catalog)
        .maybe_cache_folder(cli.cache_dir)
        .build();
    let mut dashboard = Dashboard::open(&config)
        .await
        .context("starting the dashboard")?;
    if let Some(city) = cli.city {
        dashboard.set_city(city);
    }

    println!("{}", dashboard.render().await);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::City(city) => dashboard.set_city(city),
            Command::Dates(start, end) => {
                if let Err(e) = dashboard.set_dates(start, end) {
                    eprintln!("{}", e);
                    continue;
                }
            }
            Command::Units(units) => dashboard.set_units(units),
            Command::Threshold(value) => dashboard.set_plot_threshold(value),
            Command::Weekly(enabled) => dashboard.set_weekly(enabled),
            Command::Monthly(enabled) => dashboard.set_monthly(enabled),
            Command::Table(low, high) => dashboard.set_table_range(low, high),
            Command::Show => {}
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        }
        println!("{}", dashboard.render().await);
    }
    Ok(())
}
