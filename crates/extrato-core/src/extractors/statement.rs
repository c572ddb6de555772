//! Standard statements: DEMONSTRATIVO_TITULAR, DEMONSTRATIVO_SERVICOS_DIGITAIS,
//! DEMONSTRATIVO_ANTECIPACAO_PRESCRITOS and DISTRIBUICAO_PRESCRITIVEIS.
//!
//! A page opens with a header band that ends at the column header line
//! ("OBRA ... RUBRICA ... PERÍODO ..."). After it, a line starting with a
//! long numeric code opens a work; the financial lines below it belong to
//! that work until the next one.

use super::{ForwardFillState, LineGrammar, RowContext, Step};
use crate::model::{ExtractedRow, StatementRow};
use crate::parsing::codes::{extract_isrc, isrc_from_window, strip_isrc_label};
use crate::parsing::period::format_period;
use crate::parsing::values::{clean_text, parse_amount};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// "00012345 SOME WORK TITLE 150,00 --- 10"
static WORK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5,})\s+(.+?)(?:\s+[\d.,]+\s*---|\s*$)").unwrap());
static TITLE_TRAILER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[\d.,]+\s*%?\s*[\d.,]*\s*---.*$").unwrap());

static LOOSE_WORK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5,})\s+(.+)").unwrap());
static DATA_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AP-|SPOTIFY|TIKTOK|YOUTUBE|DEEZER").unwrap());
/// "TITLE 150,00 --- 10"
static TITLE_AND_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+([\d.,]+)\s*---\s*(.*)").unwrap());
/// "50 % 150,00 ---"
static SHARE_AND_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+%\s+([\d.,]+)\s*---").unwrap());

static CHAPTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^CAP[IÍ]TULO:\s*(.+)").unwrap());
static CHAPTER_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.,]+)\s+([\d.,]+)\s+([\d.,]+)\s+(---)\s+(\d+)\s+([A-Z])\s+([A-Z]{2})").unwrap()
});

/// A financial detail line grammar. Groups 1 to 10 are, in order: artist,
/// rubric, period, income, share %, share amount, correction, executions,
/// category and characteristic.
struct DataPattern {
    name: &'static str,
    regex: Regex,
    /// Group holding the optional "OR.E/PESO" column, if the pattern has one.
    or_e_peso: Option<usize>,
}

/// Tried in order; the first match wins.
static DATA_PATTERNS: LazyLock<Vec<DataPattern>> = LazyLock::new(|| {
    vec![
        DataPattern {
            name: "standard",
            regex: Regex::new(
                r"^(.+?)\s+([A-Z]{2,}(?:\s+[A-Z0-9\-/]+)*?)\s+(\d{2}/\d{4}(?:\s+A\s+\d{2}/\d{4})?)\s+([\d.,\-]+)\s+([\d.,\-]+)\s+([\d.,\-]+)\s+(---)\s+(.+?)\s+([A-Z])\s+([A-Z]{2})\s*([^\s]+)?\s*([A-Z]{2})?$",
            )
            .unwrap(),
            or_e_peso: Some(11),
        },
        DataPattern {
            name: "digital",
            regex: Regex::new(
                r"^(.+?)\s+(SPOTIFY|TIKTOK|YOUTUBE|DEEZER|APPLE MUSIC|AMAZON|META|KWAI|CLARO MUSICA|TIM MUSIC|NAPSTER|TIDAL|FACEBOOK|INSTAGRAM|GOOGLE|RESSO|PALCO MP3|GLOBO).*?\s+(\d{2}/\d{4}(?:\s+A\s+\d{2}/\d{4})?)\s+([\d.,\-]+)\s+([\d.,\-]+)\s+([\d.,\-]+)\s+(---)\s+([\d\s.,\-]+)\s+([A-Z])\s+([A-Z]{2})",
            )
            .unwrap(),
            or_e_peso: None,
        },
    ]
});

/// Repeated page furniture between data blocks.
const PAGE_FURNITURE: &[&str] = &[
    "EXEC. - NÚM.",
    "AS INFORMAÇÕES REFERENTES",
    "ECAD.Tec",
    "DEMONSTRATIVO DO TITULAR",
    "DISTRIBUIÇÃO DE PRESCRITÍVEIS",
    "ANTECIPAÇÃO DE PRESCRITOS",
    "CNPJ/CPF:",
    "CAE/IPI:",
    "COD ECAD:",
    "OR.E",
    "TP.",
];

/// Banner that restarts the header band mid-page.
const SECTION_BANNER: &str = "DISTRIBUIÇÃO DE DIREITOS";

/// Shortest remainder, after removing a labelled ISRC, that still makes a
/// line worth parsing further.
const MIN_CONTENT_AFTER_CODE: usize = 5;

#[derive(Debug, Default)]
pub struct StatementState {
    pub fill: ForwardFillState,
    pub in_header_band: bool,
}

pub struct StatementGrammar;

impl LineGrammar for StatementGrammar {
    type State = StatementState;

    fn begin_page(&self, state: &mut StatementState) {
        state.in_header_band = true;
    }

    fn step(
        &self,
        state: &mut StatementState,
        lines: &[String],
        idx: usize,
        ctx: &RowContext<'_>,
    ) -> Step {
        let line = lines[idx].trim();
        if line.is_empty() {
            return Step::Skipped;
        }

        if state.in_header_band {
            if is_column_header(line) {
                tracing::trace!(line, "header band ends");
                state.in_header_band = false;
            }
            return Step::Skipped;
        }

        if line.contains(SECTION_BANNER) {
            state.in_header_band = true;
            return Step::Skipped;
        }
        if PAGE_FURNITURE.iter().any(|kw| line.contains(kw)) {
            return Step::Skipped;
        }

        if let Some(isrc) = extract_isrc(line) {
            state.fill.code = Some(isrc);
            if strip_isrc_label(line).chars().count() < MIN_CONTENT_AFTER_CODE {
                return Step::Code;
            }
        }

        if let Some(caps) = WORK_HEADER.captures(line) {
            let title = TITLE_TRAILER.replace(caps[2].trim(), "");
            state.fill.start(&caps[1], clean_text(&title));
            return Step::Header;
        }

        if loose_work_header(line, &mut state.fill) {
            return Step::Header;
        }

        for pattern in DATA_PATTERNS.iter() {
            if let Some(caps) = pattern.regex.captures(line) {
                tracing::trace!(pattern = pattern.name, line, "data line");
                if state.fill.code.is_none() {
                    state.fill.code = isrc_from_window(lines, idx, ctx.code_window);
                }
                return Step::Row(data_row(&caps, pattern, &mut state.fill, ctx));
            }
        }

        if let Some(row) = chapter_row(line, &mut state.fill, ctx) {
            return Step::Row(row);
        }

        Step::Unmatched
    }
}

fn is_column_header(line: &str) -> bool {
    line.contains("OBRA")
        && (line.contains("RUBRICA") || line.contains("RENDIMENTO") || line.contains("PERÍODO"))
}

/// Work headers the primary pattern missed: "CODE TITLE TOTAL --- ..." or
/// "CODE SHARE % TOTAL ---". Lines that look like data are left alone.
///
/// `WORK_HEADER` accepts every line this accepts, so `step` only gets here
/// if that pattern is narrowed. A share line also passes the title check
/// first and keeps "SHARE %" as its title.
fn loose_work_header(line: &str, fill: &mut ForwardFillState) -> bool {
    let Some(caps) = LOOSE_WORK_HEADER.captures(line) else {
        return false;
    };
    let code = &caps[1];
    let rest = caps[2].trim();

    if DATA_HINT.is_match(rest) {
        return false;
    }

    if let Some(t) = TITLE_AND_TOTAL.captures(rest) {
        fill.start(code, clean_text(&t[1]));
        return true;
    }

    if SHARE_AND_TOTAL.is_match(rest) {
        fill.start(code, None);
        return true;
    }

    false
}

fn group<'h>(caps: &Captures<'h>, i: usize) -> &'h str {
    caps.get(i).map_or("", |m| m.as_str())
}

fn data_row(
    caps: &Captures<'_>,
    pattern: &DataPattern,
    fill: &mut ForwardFillState,
    ctx: &RowContext<'_>,
) -> ExtractedRow {
    let rendimento = parse_amount(group(caps, 4));
    let valor_rateio = parse_amount(group(caps, 6));

    ExtractedRow::Statement(StatementRow {
        titular: ctx.titular(),
        documento_origem: ctx.tipo(),
        arquivo_origem: ctx.filename(),
        obra_referencia: fill.reference(),
        obra_codigo: fill.work_code.clone(),
        rubrica: clean_text(group(caps, 2)),
        periodo: format_period(group(caps, 3)),
        rendimento,
        percentual_rateio: parse_amount(group(caps, 5)),
        valor_rateio,
        correcao: Some(group(caps, 7).trim().to_string()),
        execucoes: clean_text(group(caps, 8)),
        categoria: Some(group(caps, 9).trim().to_string()),
        caracteristica: Some(group(caps, 10).trim().to_string()),
        isrc_iswc: fill.code.take(),
        data_pagamento: ctx.periodo_distribuicao.map(str::to_string),
        valor_bruto: rendimento,
        valor_liquido: valor_rateio,
        tipo_extracao: ctx.tipo(),
        artista_gravacao: clean_text(group(caps, 1)),
        or_e_peso: pattern
            .or_e_peso
            .and_then(|i| caps.get(i))
            .and_then(|m| clean_text(m.as_str())),
    })
}

/// "CAPÍTULO: 12 1.000,00 10,00 100,00 --- 3 A NA" (television chapters):
/// a partial row with amounts but no period or artist.
fn chapter_row(
    line: &str,
    fill: &mut ForwardFillState,
    ctx: &RowContext<'_>,
) -> Option<ExtractedRow> {
    let chapter = CHAPTER.captures(line)?;
    let rest = group(&chapter, 1);
    let caps = CHAPTER_VALUES.captures(rest)?;

    let rendimento = parse_amount(group(&caps, 1));
    let valor_rateio = parse_amount(group(&caps, 3));

    Some(ExtractedRow::Statement(StatementRow {
        titular: ctx.titular(),
        documento_origem: ctx.tipo(),
        arquivo_origem: ctx.filename(),
        obra_referencia: fill.reference(),
        obra_codigo: fill.work_code.clone(),
        rubrica: rest
            .split_whitespace()
            .next()
            .map(|token| format!("CAPITULO:{token}")),
        periodo: None,
        rendimento,
        percentual_rateio: parse_amount(group(&caps, 2)),
        valor_rateio,
        correcao: Some(group(&caps, 4).to_string()),
        execucoes: clean_text(group(&caps, 5)),
        categoria: Some(group(&caps, 6).to_string()),
        caracteristica: Some(group(&caps, 7).to_string()),
        isrc_iswc: fill.code.take(),
        data_pagamento: ctx.periodo_distribuicao.map(str::to_string),
        valor_bruto: rendimento,
        valor_liquido: valor_rateio,
        tipo_extracao: ctx.tipo(),
        artista_gravacao: None,
        or_e_peso: None,
    }))
}
