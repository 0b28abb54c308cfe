pub mod config;
pub mod effectiveness;
pub mod i18n;
pub mod index;
pub mod matrix;
pub mod model;
pub mod normalize;
pub mod pokeapi;
pub mod resolver;
pub mod types;
pub mod ui;

pub use crate::effectiveness::{
    classify, compute_multipliers, matchup, DefenderProfile, EffectivenessTier, MultiplierVector,
    ProfileError, Tiers,
};
pub use crate::types::{Multiplier, Type, ALL_TYPES};

use crate::config::LookupConfig;
use crate::i18n::Language;
use crate::pokeapi::PokeApi;
use crate::resolver::{Resolution, Resolver};
use crate::ui::RenderOptions;
use anyhow::Context;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Matchup {
        first: Type,
        second: Option<Type>,
    },
    Pokemon(String),
    Suggest(String),
    Chart,
    Matrix {
        output: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub command: Command,
    pub lang: Language,
    pub json: bool,
    pub color: bool,
}

impl CliOptions {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            lang: self.lang,
            color: self.color,
        }
    }
}

fn print_matchup(profile: &DefenderProfile, opts: &CliOptions) -> anyhow::Result<()> {
    let (vector, tiers) = matchup(profile);
    if opts.json {
        let report = ui::matchup_json(profile, &vector, &tiers);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ui::render_matchup(profile, &tiers, opts.render_options()));
    }
    Ok(())
}

fn remote_resolver(cancel: CancellationToken) -> anyhow::Result<Resolver<PokeApi>> {
    let config = LookupConfig::from_env().context("Invalid lookup configuration")?;
    let source = PokeApi::new(&config).context("Failed to build HTTP client")?;
    Ok(Resolver::with_cancellation(source, config, cancel))
}

pub async fn run(opts: CliOptions, cancel: CancellationToken) -> anyhow::Result<()> {
    match &opts.command {
        Command::Matchup { first, second } => {
            let profile = DefenderProfile::from_selection(Some(*first), *second);
            print_matchup(&profile, &opts)
        }
        Command::Pokemon(query) => {
            let resolver = remote_resolver(cancel)?;
            match resolver.resolve(query).await {
                Resolution::Resolved {
                    name,
                    id,
                    types,
                    profile,
                } => {
                    info!("Resolved '{}' to {} (#{})", query, name, id);
                    if !opts.json {
                        println!("{} (#{})", name, id);
                        println!("{}", ui::render_detected(&types, opts.render_options()));
                        println!();
                    }
                    print_matchup(&profile, &opts)
                }
                Resolution::Unresolved(reason) => {
                    warn!("Could not resolve '{}': {}", query, reason);
                    anyhow::bail!("{}", ui::render_unresolved(&reason, opts.render_options()))
                }
            }
        }
        Command::Suggest(query) => {
            let resolver = remote_resolver(cancel)?;
            let entries = resolver
                .suggest(query)
                .await
                .with_context(|| format!("Failed to load suggestions for '{query}'"))?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", ui::render_suggestions(&entries, opts.render_options()));
            }
            Ok(())
        }
        Command::Chart => {
            print!("{}", ui::render_chart(opts.render_options()));
            Ok(())
        }
        Command::Matrix { output } => {
            let rows = matrix::compute_matrix();
            matrix::write_csv(&rows, output)
                .with_context(|| format!("Failed to write matrix to {}", output.display()))?;
            println!(
                "Wrote {}x{} matrix to {}",
                rows.len(),
                ALL_TYPES.len(),
                output.display()
            );
            let histogram = matrix::tier_histogram(&rows);
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&histogram)?);
            } else {
                print!("{}", ui::render_histogram(&histogram, opts.render_options()));
            }
            Ok(())
        }
    }
}
