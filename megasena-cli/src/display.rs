use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use megasena_core::models::{Bet, DrawRecord, FrequencyTag, NumberStats, Selection};
use megasena_core::validate::ValidationError;
use megasena_stats::analysis::SelectionAnalysis;
use megasena_stats::tally::CombinationTable;

use crate::import::ImportResult;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importação concluída :");
    println!("  Linhas lidas     : {}", result.total_rows);
    println!("  Registros        : {}", result.records.len());
    if !result.is_complete() {
        let lines: Vec<String> = result.unreadable_lines.iter().map(|l| l.to_string()).collect();
        println!("  Linhas ilegíveis : {} ({})", lines.len(), lines.join(", "));
    }
}

pub fn display_validation_errors(errors: &[ValidationError]) {
    println!("\n❌ {} problema(s) encontrado(s) no conjunto de dados\n", errors.len());
    for error in errors {
        println!("  • {}", error);
    }
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Nenhum sorteio para exibir.");
        return;
    }

    let mut table = new_table(vec!["Concurso", "Data", "Dezenas"]);
    for draw in draws {
        table.add_row(vec![
            draw.draw_id.to_string(),
            draw.date.format("%d/%m/%Y").to_string(),
            format_numbers(draw.numbers()),
        ]);
    }
    println!("{table}");
}

pub fn display_frequencies(stats: &[NumberStats], draws: usize) {
    println!("\n📊 Frequências em {} sorteios\n", draws);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    let mut table = new_table(vec!["Número", "Frequência", "Tag"]);
    for stat in &sorted {
        let color = match stat.tag {
            FrequencyTag::Hot => Color::Red,
            FrequencyTag::Cold => Color::Blue,
            FrequencyTag::Normal => Color::White,
        };
        table.add_row(vec![
            Cell::new(format!("{:02}", stat.number)),
            Cell::new(stat.frequency),
            Cell::new(stat.tag.to_string()).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_most_least(most: &[(u8, u32)], least: &[(u8, u32)]) {
    let mut table = new_table(vec!["Mais frequentes", "Freq.", "Menos frequentes", "Freq."]);
    for ((m, mf), (l, lf)) in most.iter().zip(least) {
        table.add_row(vec![
            format!("{:02}", m),
            mf.to_string(),
            format!("{:02}", l),
            lf.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_combinations(table: &CombinationTable, top: usize) {
    println!(
        "\n🔗 {} mais frequentes ({} distintas)\n",
        table.size(),
        table.len()
    );

    let mut out = new_table(vec!["#", "Combinação", "Ocorrências"]);
    for (i, (combo, count)) in table.top(top).iter().enumerate() {
        out.add_row(vec![
            (i + 1).to_string(),
            format_numbers(combo.as_slice()),
            count.to_string(),
        ]);
    }
    println!("{out}");
}

pub fn display_selection(selection: &Selection) {
    if selection.is_empty() {
        println!("Seleção vazia.");
    } else {
        println!("Seleção ({}) : {}", selection.len(), format_numbers(&selection.numbers()));
    }
}

pub fn display_analysis(analysis: &SelectionAnalysis, top: usize) {
    println!(
        "\n🔎 Análise de {} em {} sorteios\n",
        format_numbers(&analysis.selection),
        analysis.draws_analyzed
    );

    let mut table = new_table(vec!["Número", "Sorteios"]);
    for (n, count) in &analysis.individual {
        table.add_row(vec![format!("{:02}", n), count.to_string()]);
    }
    println!("{table}");

    for (size, subsets) in &analysis.subsets {
        let mut ranked: Vec<_> = subsets.iter().filter(|(_, c)| **c > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        println!("\n── {} ({} com ocorrência de {}) ──", size, ranked.len(), subsets.len());
        if ranked.is_empty() {
            continue;
        }
        let mut table = new_table(vec!["Combinação", "Sorteios"]);
        for (combo, count) in ranked.into_iter().take(top) {
            table.add_row(vec![format_numbers(combo.as_slice()), count.to_string()]);
        }
        println!("{table}");
    }

    println!("\n── Acertos por sorteio ──");
    let mut table = new_table(vec!["Acertos", "Sorteios"]);
    for (hits, count) in analysis.hit_distribution.iter().enumerate().rev() {
        table.add_row(vec![hits.to_string(), count.to_string()]);
    }
    println!("{table}");

    match analysis.exact_matches {
        Some(0) => println!("\nNenhum sorteio idêntico à seleção."),
        Some(n) => {
            let ids: Vec<String> = analysis.exact_match_ids.iter().map(|id| id.to_string()).collect();
            println!("\n🎯 {} sorteio(s) idêntico(s) : concurso {}", n, ids.join(", "));
        }
        None => {}
    }
}

pub fn display_bets(bets: &[Bet], title: &str) {
    println!("\n🎲 {}\n", title);

    let mut table = new_table(vec!["#", "Dezenas"]);
    for (i, bet) in bets.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), format_numbers(bet.numbers())]);
    }
    println!("{table}");
    println!("Heurística descritiva: frequências passadas não preveem sorteios futuros.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[1, 12, 60]), "01 - 12 - 60");
        assert_eq!(format_numbers(&[]), "");
    }
}
