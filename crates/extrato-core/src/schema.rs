//! Projection of per-layout rows onto the master schema.

use crate::model::{Cell, ExtractedRow, MasterRecord, RecordSet};
use crate::parsing::period::split_period;
use indexmap::{IndexMap, IndexSet};

/// Output columns shared by every layout, in order. Layout-specific columns
/// follow them.
pub const MASTER_SCHEMA_COLUMNS: [&str; 20] = [
    "titular",
    "documento_origem",
    "arquivo_origem",
    "obra_referencia",
    "rubrica",
    "periodo",
    "periodo_inicial",
    "periodo_final",
    "rendimento",
    "percentual_rateio",
    "valor_rateio",
    "correcao",
    "execucoes",
    "categoria",
    "caracteristica",
    "isrc_iswc",
    "data_pagamento",
    "valor_bruto",
    "valor_liquido",
    "tipo_extracao",
];

/// A record set with the master columns and no records.
pub fn empty_record_set() -> RecordSet {
    RecordSet {
        columns: MASTER_SCHEMA_COLUMNS.iter().map(|c| c.to_string()).collect(),
        records: Vec::new(),
    }
}

/// Project extracted rows onto the master schema.
///
/// Columns missing from every row are filled in: `tipo_extracao` with the
/// layout name, `titular` and `documento_origem` with the given values when
/// present, `arquivo_origem` with null. `periodo` is split into
/// `periodo_inicial` and `periodo_final`.
pub fn project(
    rows: &[ExtractedRow],
    tipo_extracao: &str,
    titular: Option<&str>,
    documento_origem: Option<&str>,
) -> RecordSet {
    project_cells(
        rows.iter().map(ExtractedRow::cells).collect(),
        tipo_extracao,
        titular,
        documento_origem,
    )
}

pub(crate) fn project_cells(
    rows: Vec<Vec<(&str, Option<Cell>)>>,
    tipo_extracao: &str,
    titular: Option<&str>,
    documento_origem: Option<&str>,
) -> RecordSet {
    if rows.is_empty() {
        tracing::warn!(layout = tipo_extracao, "no rows to project");
        return empty_record_set();
    }

    let mut seen: IndexSet<&str> = IndexSet::new();
    for row in &rows {
        seen.extend(row.iter().map(|(name, _)| *name));
    }

    let mut defaults: Vec<(&str, Option<Cell>)> = Vec::new();
    if !seen.contains("tipo_extracao") {
        defaults.push(("tipo_extracao", Some(Cell::Text(tipo_extracao.to_string()))));
    }
    if let Some(t) = titular.filter(|_| !seen.contains("titular")) {
        defaults.push(("titular", Some(Cell::Text(t.to_string()))));
    }
    if let Some(d) = documento_origem.filter(|_| !seen.contains("documento_origem")) {
        defaults.push(("documento_origem", Some(Cell::Text(d.to_string()))));
    }
    if !seen.contains("arquivo_origem") {
        defaults.push(("arquivo_origem", None));
    }
    let has_period = seen.contains("periodo");

    let extras: Vec<&str> = seen
        .iter()
        .copied()
        .filter(|c| !MASTER_SCHEMA_COLUMNS.contains(c))
        .collect();

    let columns: Vec<String> = MASTER_SCHEMA_COLUMNS
        .iter()
        .chain(extras.iter())
        .map(|c| c.to_string())
        .collect();

    let records: Vec<MasterRecord> = rows
        .into_iter()
        .map(|row| {
            let mut values: IndexMap<&str, Option<Cell>> = row.into_iter().collect();
            for (name, value) in &defaults {
                values.insert(*name, value.clone());
            }

            let (inicial, final_) = if has_period {
                let periodo = values
                    .get("periodo")
                    .and_then(Option::as_ref)
                    .and_then(Cell::as_text);
                split_period(periodo)
            } else {
                (None, None)
            };
            values.insert("periodo_inicial", inicial.map(Cell::Text));
            values.insert("periodo_final", final_.map(Cell::Text));

            let ordered = columns
                .iter()
                .map(|c| (c.clone(), values.swap_remove(c.as_str()).flatten()))
                .collect();
            MasterRecord::new(ordered)
        })
        .collect();

    tracing::debug!(
        layout = tipo_extracao,
        records = records.len(),
        columns = columns.len(),
        "rows projected"
    );

    RecordSet { columns, records }
}

/// Merge record sets from several documents into one. Columns are the
/// master schema followed by every extra column in encounter order; records
/// missing a column get null.
pub fn consolidate(sets: &[RecordSet]) -> RecordSet {
    let mut columns: IndexSet<&str> = MASTER_SCHEMA_COLUMNS.iter().copied().collect();
    for set in sets {
        columns.extend(set.columns.iter().map(String::as_str));
    }

    let records = sets
        .iter()
        .flat_map(|set| set.records.iter())
        .map(|record| {
            let ordered = columns
                .iter()
                .map(|c| (c.to_string(), record.get(c).cloned()))
                .collect();
            MasterRecord::new(ordered)
        })
        .collect();

    RecordSet {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        records,
    }
}
