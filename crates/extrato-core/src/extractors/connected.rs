//! RELATORIO_ANALITICO_CONEXO: a titleholder's recordings, each followed by
//! the performers and producers sharing its connected rights.

use super::{ForwardFillState, LineGrammar, RowContext, Step};
use crate::model::{ExtractedRow, RecordingParticipantRow};
use crate::parsing::values::{clean_text, parse_amount};
use regex::Regex;
use std::sync::LazyLock;

/// CODE ISRC STATUS TITLE NATIONAL [CLASSIFICATION]
static RECORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{5,})\s+([A-Z]{2}-[\w-]+)\s+(LIBERADO|BLOQUEADO|PENDENTE)\s+(.+?)\s+(SIM|NÃO|NAO)\s*([X\s]*)$",
    )
    .unwrap()
});

/// CODE NAME  PSEUDONYM CATEGORY SUBCATEGORY SOCIETY SHARE
///
/// Name and pseudonym are told apart by a run of two or more spaces.
static PARTICIPANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4,})\s+(.+?)\s{2,}([A-Z][A-Z\s.]*?)\s+([A-Z]{1,2})\s+([A-Z]{1,2})\s+(ABRAMUS|UBC|SBACEM|SOCINPRO|AMAR|SADEMBRA|ASSIM)\s+([\d.,]+)",
    )
    .unwrap()
});

static LONG_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5,}").unwrap());
static ISRC_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}-[\w-]+$").unwrap());
static STATUS_AND_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(LIBERADO|BLOQUEADO|PENDENTE)\s+(.+?)(?:\s+(SIM|NÃO|NAO))?\s*([X\s]*)$").unwrap()
});
static LEADING_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d").unwrap());

const REPEATED_HEADERS: &[&str] = &[
    "RELATÓRIO ANALÍTICO",
    "ASSOCIAÇÃO:",
    "TITULAR:",
    "CÓD. ECAD",
    "CLASSIFICAÇÃO",
    "PSEUDÔNIMO",
    "CAT.",
    "SUBCAT.",
    "PART. (%)",
    "Pag ",
    "ECAD.Tec",
    "SUBCATEGORIA:",
    "ISRC/GRA",
    "SITUACAO",
    "RÓTULO",
];

/// Longest line, in words, still read as a complementary title.
const MAX_COMPLEMENT_WORDS: usize = 5;

pub struct ConnectedGrammar;

impl LineGrammar for ConnectedGrammar {
    type State = ForwardFillState;

    fn step(
        &self,
        state: &mut ForwardFillState,
        lines: &[String],
        idx: usize,
        ctx: &RowContext<'_>,
    ) -> Step {
        let line = lines[idx].trim();
        if line.is_empty() || REPEATED_HEADERS.iter().any(|kw| line.contains(kw)) {
            return Step::Skipped;
        }

        if let Some(caps) = RECORDING.captures(line) {
            state.start(&caps[1], clean_text(&caps[4]));
            state.code = Some(caps[2].to_string());
            state.status = Some(caps[3].to_string());
            state.complement = None;
            return Step::Header;
        }

        if LONG_CODE.is_match(line) {
            if let Some(step) = loose_line(line, state, ctx) {
                return step;
            }
        }

        if state.work_code.is_some()
            && !LEADING_DIGIT.is_match(line)
            && line.split_whitespace().count() <= MAX_COMPLEMENT_WORDS
            && !PARTICIPANT.is_match(line)
        {
            state.complement = clean_text(line);
            return Step::Continuation;
        }

        match participant_row(line, state, ctx) {
            Some(row) => Step::Row(row),
            None => Step::Unmatched,
        }
    }
}

/// A line starting with a long code that the recording pattern missed:
/// either "CODE ISRC ..." with a looser tail, or a participant with a long
/// code. `None` lets the caller keep trying.
fn loose_line(line: &str, state: &mut ForwardFillState, ctx: &RowContext<'_>) -> Option<Step> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    if ISRC_TOKEN.is_match(parts[1]) {
        let rest = parts[2..].join(" ");
        let (status, title) = match STATUS_AND_TITLE.captures(&rest) {
            Some(caps) => (Some(caps[1].to_string()), clean_text(&caps[2])),
            // Without a status column the previous recording's status stays.
            None => (state.status.take(), clean_text(&rest)),
        };
        state.start(parts[0], title);
        state.code = Some(parts[1].to_string());
        state.status = status;
        state.complement = None;
        return Some(Step::Header);
    }

    participant_row(line, state, ctx).map(Step::Row)
}

fn participant_row(
    line: &str,
    state: &ForwardFillState,
    ctx: &RowContext<'_>,
) -> Option<ExtractedRow> {
    let caps = PARTICIPANT.captures(line)?;

    Some(ExtractedRow::RecordingParticipant(RecordingParticipantRow {
        titular: ctx.titular(),
        documento_origem: ctx.tipo(),
        arquivo_origem: ctx.filename(),
        obra_referencia: state.work_title.clone(),
        obra_codigo: state.work_code.clone(),
        isrc_iswc: state.code.clone(),
        situacao: state.status.clone(),
        complemento_titulo: state.complement.clone(),
        cod_ecad_participante: Some(caps[1].to_string()),
        nome_participante: clean_text(&caps[2]),
        pseudonimo_participante: clean_text(&caps[3]),
        categoria: Some(caps[4].to_string()),
        subcategoria: Some(caps[5].to_string()),
        associacao_participante: Some(caps[6].to_string()),
        percentual_rateio: parse_amount(&caps[7]),
        tipo_extracao: ctx.tipo(),
    }))
}
