mod display;
mod import;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use megasena_core::models::{ComboSize, DrawHistory, Selection};
use megasena_core::validate::{into_history, parse_draw_date, validate};
use megasena_stats::analysis::analyze;
use megasena_stats::config::EngineConfig;
use megasena_stats::filter::filter_by_date_range;
use megasena_stats::frequency::{count_frequencies, most_least_frequent, tag_frequencies};
use megasena_stats::sampler::{generate_bets, generate_from_combos, make_rng};
use megasena_stats::tally::{build_all_tallies, build_tally};

use crate::display::{
    display_analysis, display_bets, display_combinations, display_draws, display_frequencies,
    display_import_summary, display_most_least, display_validation_errors,
};
use crate::import::ImportResult;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum Strategy {
    /// Mistura de dezenas quentes e frias
    #[default]
    HotCold,
    /// Sorteio uniforme, sem histórico
    Random,
    /// A partir das combinações mais frequentes
    Combos,
}

#[derive(Parser)]
#[command(name = "megasena", about = "Estatísticas históricas da Mega-Sena")]
struct Cli {
    /// Configuração do motor (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Separador de colunas do CSV
    #[arg(short, long, global = true, default_value = ";")]
    delimiter: char,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct DateRange {
    /// Data inicial (DD/MM/AAAA)
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Data final (DD/MM/AAAA)
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Command {
    /// Validar um arquivo de sorteios
    Validate {
        /// Arquivo CSV
        file: PathBuf,
    },

    /// Listar os últimos sorteios
    List {
        file: PathBuf,

        /// Número de sorteios a exibir
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Frequência de cada dezena
    Stats {
        file: PathBuf,

        #[command(flatten)]
        range: DateRange,

        /// Tamanho dos rankings de mais/menos frequentes
        #[arg(short, long, default_value = "6")]
        top: usize,
    },

    /// Combinações mais frequentes (duplas a quinas)
    Combos {
        file: PathBuf,

        /// Tamanho da combinação (todas se omitido)
        #[arg(short, long)]
        size: Option<ComboSize>,

        #[command(flatten)]
        range: DateRange,

        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Analisar uma seleção de 6 a 8 dezenas
    Analyze {
        file: PathBuf,

        /// Dezenas selecionadas
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<u8>,

        #[command(flatten)]
        range: DateRange,

        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Gerar apostas
    Generate {
        /// Arquivo CSV (sem arquivo, apostas uniformes)
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "hot-cold")]
        strategy: Strategy,

        /// Número de apostas
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed para reprodutibilidade (padrão: data de hoje, AAAAMMDD)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Modo interativo
    Interactive {
        file: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_draw_date(s)
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| format!("data inválida '{}': use DD/MM/AAAA", s))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let delimiter = u8::try_from(cli.delimiter).context("O separador deve ser um caractere ASCII")?;

    match cli.command {
        Command::Validate { file } => cmd_validate(&file, delimiter),
        Command::List { file, last } => cmd_list(&file, delimiter, last),
        Command::Stats { file, range, top } => cmd_stats(&file, delimiter, &range, top, &config),
        Command::Combos { file, size, range, top } => cmd_combos(&file, delimiter, size, &range, top),
        Command::Analyze { file, numbers, range, top } => {
            cmd_analyze(&file, delimiter, &numbers, &range, top)
        }
        Command::Generate {
            file,
            strategy,
            count,
            seed,
        } => cmd_generate(file.as_deref(), delimiter, strategy, count, seed, &config),
        Command::Interactive { file, seed } => {
            let history = load_history(&file, delimiter)?;
            let mut rng = make_rng(seed);
            interactive::run_interactive(&history, &config, &mut rng)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Não foi possível ler {:?}", path))?;
            serde_json::from_str(&json).with_context(|| format!("JSON inválido em {:?}", path))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("Configuração inválida")?;
    Ok(config)
}

fn ensure_readable(imported: &ImportResult, file: &Path) -> Result<()> {
    if imported.is_complete() {
        return Ok(());
    }
    let lines: Vec<String> = imported.unreadable_lines.iter().map(|l| l.to_string()).collect();
    tracing::warn!(lines = lines.len(), file = %file.display(), "dataset rejected");
    bail!(
        "Conjunto de dados rejeitado: linha(s) ilegível(is) {}",
        lines.join(", ")
    );
}

fn load_history(file: &Path, delimiter: u8) -> Result<DrawHistory> {
    let imported = import::import_csv(file, delimiter)?;
    ensure_readable(&imported, file)?;
    match into_history(&imported.records) {
        Ok(history) => {
            tracing::info!(draws = history.len(), file = %file.display(), "dataset loaded");
            Ok(history)
        }
        Err(errors) => {
            tracing::warn!(errors = errors.len(), file = %file.display(), "dataset rejected");
            display_validation_errors(&errors);
            bail!("Conjunto de dados rejeitado: corrija o arquivo e tente novamente");
        }
    }
}

fn load_history_in_range(file: &Path, delimiter: u8, range: &DateRange) -> Result<DrawHistory> {
    let history = load_history(file, delimiter)?;
    if range.from.is_none() && range.to.is_none() {
        return Ok(history);
    }
    let filtered = filter_by_date_range(&history, range.from, range.to);
    tracing::info!(kept = filtered.len(), total = history.len(), "date range applied");
    Ok(filtered)
}

fn cmd_validate(file: &Path, delimiter: u8) -> Result<()> {
    let imported = import::import_csv(file, delimiter)?;
    display_import_summary(&imported);

    let errors = validate(&imported.records);
    if errors.is_empty() && imported.is_complete() {
        println!("\n✅ {} sorteios válidos.", imported.records.len());
        return Ok(());
    }
    if !errors.is_empty() {
        display_validation_errors(&errors);
    }
    ensure_readable(&imported, file)?;
    bail!("{} erro(s) de validação", errors.len());
}

fn cmd_list(file: &Path, delimiter: u8, last: usize) -> Result<()> {
    let history = load_history(file, delimiter)?;
    let start = history.len().saturating_sub(last);
    display_draws(&history[start..]);
    Ok(())
}

fn cmd_stats(file: &Path, delimiter: u8, range: &DateRange, top: usize, config: &EngineConfig) -> Result<()> {
    let history = load_history_in_range(file, delimiter, range)?;
    if history.is_empty() {
        println!("Nenhum sorteio no período.");
        return Ok(());
    }

    let table = count_frequencies(&history);
    let stats = tag_frequencies(&table, config.hot_threshold);
    display_frequencies(&stats, history.len());

    let (most, least) = most_least_frequent(&table, top);
    display_most_least(&most, &least);
    Ok(())
}

fn cmd_combos(
    file: &Path,
    delimiter: u8,
    size: Option<ComboSize>,
    range: &DateRange,
    top: usize,
) -> Result<()> {
    let history = load_history_in_range(file, delimiter, range)?;
    let tables = match size {
        Some(size) => vec![build_tally(&history, size)],
        None => build_all_tallies(&history),
    };
    for table in &tables {
        display_combinations(table, top);
    }
    Ok(())
}

fn cmd_analyze(file: &Path, delimiter: u8, numbers: &[u8], range: &DateRange, top: usize) -> Result<()> {
    let selection = Selection::from_numbers(numbers)?;
    let history = load_history_in_range(file, delimiter, range)?;
    match analyze(&selection, &history) {
        Some(analysis) => display_analysis(&analysis, top),
        None if !selection.is_ready() => {
            bail!("Selecione ao menos 6 dezenas ({} informadas)", selection.len())
        }
        None => println!("Nenhum sorteio para analisar."),
    }
    Ok(())
}

fn cmd_generate(
    file: Option<&Path>,
    delimiter: u8,
    strategy: Strategy,
    count: usize,
    seed: Option<u64>,
    config: &EngineConfig,
) -> Result<()> {
    let mut rng = make_rng(seed);
    let history = file.map(|f| load_history(f, delimiter)).transpose()?;

    let bets = match (strategy, history.as_ref()) {
        (Strategy::Random, _) | (_, None) => generate_bets(None, &config.bet, count, &mut rng)?,
        (Strategy::HotCold, Some(history)) => {
            let table = count_frequencies(history);
            generate_bets(Some(&table), &config.bet, count, &mut rng)?
        }
        (Strategy::Combos, Some(history)) => (0..count)
            .filter_map(|_| generate_from_combos(history, &config.combo_bet, &mut rng))
            .collect(),
    };

    let title = match (strategy, history.is_some()) {
        (Strategy::Random, _) | (_, false) => "Apostas aleatórias",
        (Strategy::HotCold, true) => "Apostas quentes/frias",
        (Strategy::Combos, true) => "Apostas por combinações",
    };
    display_bets(&bets, title);
    Ok(())
}
