use poke_types::i18n::Language;
use poke_types::{run, CliOptions, Command, Type};
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: poke-types <command> [--lang en|fr] [--json] [--no-color]\n\
Commands:\n  \
matchup <type1> [type2]   weaknesses and resistances of a typing\n  \
pokemon <name|id>         look up a pokemon's types, then its matchup\n  \
suggest <query>           localized names containing <query> (3+ letters)\n  \
chart                     single-type chart\n  \
matrix [--output FILE]    every typing as CSV (default matrix.csv)"
    );
    std::process::exit(1);
}

fn parse_type(raw: &str) -> anyhow::Result<Type> {
    raw.parse::<Type>().map_err(anyhow::Error::from)
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut lang = Language::En;
    let mut json = false;
    let mut color = std::io::stdout().is_terminal();
    let mut output = PathBuf::from("matrix.csv");
    let mut positional: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--lang requires en or fr"))?;
                lang = val.parse()?;
            }
            "--json" => json = true,
            "--no-color" => color = false,
            "--output" => {
                output = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--help" | "-h" => usage(),
            other if other.starts_with("--") => anyhow::bail!("Unknown argument {other}"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("matchup") => {
            let first = positional
                .next()
                .ok_or_else(|| anyhow::anyhow!("matchup requires at least one type"))?;
            let first = parse_type(&first)?;
            let second = positional.next().map(|t| parse_type(&t)).transpose()?;
            Command::Matchup { first, second }
        }
        Some("pokemon") => {
            let rest: Vec<String> = positional.by_ref().collect();
            if rest.is_empty() {
                anyhow::bail!("pokemon requires a name or id");
            }
            Command::Pokemon(rest.join(" "))
        }
        Some("suggest") => {
            let rest: Vec<String> = positional.by_ref().collect();
            if rest.is_empty() {
                anyhow::bail!("suggest requires a query");
            }
            Command::Suggest(rest.join(" "))
        }
        Some("chart") => Command::Chart,
        Some("matrix") => Command::Matrix { output },
        Some(other) => anyhow::bail!("Unknown command '{other}'"),
        None => usage(),
    };
    if let Some(extra) = positional.next() {
        anyhow::bail!("Unexpected argument '{extra}'");
    }

    Ok(CliOptions {
        command,
        lang,
        json,
        color: color && !json,
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let opts = parse_args()?;
    debug!("Running {:?}", opts.command);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    run(opts, cancel).await
}
