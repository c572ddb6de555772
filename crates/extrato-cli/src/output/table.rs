use extrato_core::model::{Extraction, RecordSet};
use rust_decimal::Decimal;

/// Columns that repeat the document header on every row; shown once above
/// the table instead.
const HEADER_COLUMNS: &[&str] = &[
    "titular",
    "documento_origem",
    "arquivo_origem",
    "tipo_extracao",
    "data_pagamento",
    "periodo_inicial",
    "periodo_final",
    "valor_bruto",
    "valor_liquido",
];

const MAX_CELL_WIDTH: usize = 32;

pub fn print(extraction: &Extraction) {
    let ctx = &extraction.context;

    println!("=== {} ({}) ===\n", extraction.layout, extraction.source_filename);
    if let Some(ref titular) = ctx.titular {
        println!("  Titular:  {titular}");
    }
    if let Some(ref periodo) = ctx.periodo_distribuicao {
        println!("  Período:  {periodo}");
    }
    if let Some(ref total) = ctx.valor_total {
        println!("  Total:    {total}");
    }
    println!();

    let set = &extraction.records;
    if set.is_empty() {
        println!("  No records extracted.");
        return;
    }

    let columns = visible_columns(set);
    let cells: Vec<Vec<String>> = set
        .records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| r.get(c).map(|v| truncate(&v.to_string())).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(c, w)| format!("{c:<w$}"))
        .collect();
    println!("  {}", header.join("  "));
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(v, w)| format!("{v:<w$}"))
            .collect();
        println!("  {}", line.join("  ").trim_end());
    }

    println!();
    println!("  {} record(s)", set.len());
    for column in ["rendimento", "valor_rateio"] {
        if set.columns.iter().any(|c| c == column) {
            let total: Decimal = set.records.iter().filter_map(|r| r.amount(column)).sum();
            println!("  Sum of {column}: {total}");
        }
    }
}

/// Columns with at least one value, minus the header columns.
fn visible_columns(set: &RecordSet) -> Vec<&str> {
    set.columns
        .iter()
        .map(String::as_str)
        .filter(|c| !HEADER_COLUMNS.contains(c))
        .filter(|c| set.records.iter().any(|r| r.get(c).is_some()))
        .collect()
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
    out.push('…');
    out
}
