use std::io::{self, Write};

use anyhow::{Context, Result};
use rand::rngs::StdRng;

use megasena_core::models::{DrawHistory, Selection, ToggleOutcome, MAX_SELECTION, MIN_SELECTION};
use megasena_stats::analysis::analyze;
use megasena_stats::config::EngineConfig;
use megasena_stats::frequency::count_frequencies;
use megasena_stats::sampler::generate_bet;

use crate::display::{display_analysis, display_bets, display_selection};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Toggle(Vec<u8>),
    Analyze,
    Generate,
    Show,
    Clear,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    let input = input.trim().to_lowercase();
    let mut words = input.split_whitespace();
    let head = words.next()?;

    if let Ok(first) = head.parse::<u8>() {
        let mut numbers = vec![first];
        for word in words {
            numbers.push(word.parse().ok()?);
        }
        return Some(InteractiveCommand::Toggle(numbers));
    }

    match head {
        "a" | "analisar" | "analyze" => Some(InteractiveCommand::Analyze),
        "g" | "gerar" | "generate" => Some(InteractiveCommand::Generate),
        "m" | "mostrar" | "show" => Some(InteractiveCommand::Show),
        "l" | "limpar" | "clear" => Some(InteractiveCommand::Clear),
        "q" | "sair" | "quit" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Modo interativo ──");
    println!("  <números>   Marcar/desmarcar dezenas (ex: 5 12 33)");
    println!("  analisar    Analisar a seleção ({}-{} dezenas)", MIN_SELECTION, MAX_SELECTION);
    println!("  gerar       Gerar uma aposta quente/fria");
    println!("  mostrar     Mostrar a seleção");
    println!("  limpar      Limpar a seleção");
    println!("  sair        Sair");
    println!();
}

fn prompt(msg: &str) -> Result<Option<String>> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn toggle_all(selection: &mut Selection, numbers: &[u8]) {
    for &n in numbers {
        match selection.toggle(n) {
            Ok(ToggleOutcome::Added) => {}
            Ok(ToggleOutcome::Removed) => {}
            Ok(ToggleOutcome::Full) => {
                println!("Seleção cheia ({} dezenas): {} ignorado.", MAX_SELECTION, n);
            }
            Err(e) => println!("{}", e),
        }
    }
}

pub fn run_interactive(history: &DrawHistory, config: &EngineConfig, rng: &mut StdRng) -> Result<()> {
    let frequencies = count_frequencies(history);
    let mut selection = Selection::new();

    display_menu();
    loop {
        let Some(input) = prompt("> ")? else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Toggle(numbers)) => {
                toggle_all(&mut selection, &numbers);
                display_selection(&selection);
            }
            Some(InteractiveCommand::Analyze) => match analyze(&selection, history) {
                Some(analysis) => display_analysis(&analysis, 10),
                None => println!(
                    "Selecione ao menos {} dezenas ({} marcadas).",
                    MIN_SELECTION,
                    selection.len()
                ),
            },
            Some(InteractiveCommand::Generate) => {
                let bet = generate_bet(Some(&frequencies), &config.bet, rng)?;
                display_bets(&[bet], "Aposta gerada");
            }
            Some(InteractiveCommand::Show) => display_selection(&selection),
            Some(InteractiveCommand::Clear) => {
                selection.clear();
                println!("Seleção limpa.");
            }
            Some(InteractiveCommand::Quit) => break,
            None => {
                println!("Comando desconhecido.");
                display_menu();
            }
        }
    }

    Ok(())
}
