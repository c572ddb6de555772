//! RELATORIO_ANALITICO_AUTORAL: a titleholder's works, each followed by the
//! rights holders registered on it.

use super::{ForwardFillState, LineGrammar, RowContext, Step};
use crate::model::{AuthorParticipantRow, ExtractedRow};
use crate::parsing::values::{clean_text, parse_amount};
use regex::Regex;
use std::sync::LazyLock;

/// A work header pattern and where its ISWC and title live.
struct WorkPattern {
    regex: Regex,
    iswc: Option<usize>,
    title: usize,
}

/// Tried in order; the first match wins.
static WORK_PATTERNS: LazyLock<Vec<WorkPattern>> = LazyLock::new(|| {
    vec![
        // CODE [ISWC] TITLE SOCIETY STATUS [TYPE] [NATIONAL] [DATE]
        WorkPattern {
            regex: Regex::new(
                r"^(\d{5,})\s+(T-[\d.\-]+)?\s*(.+?)\s+(ABRAMUS|UBC|SBACEM|SOCINPRO|AMAR|SADEMBRA|ASSIM)\s+(\w+(?:/\w+)?)\s+(ORIGINAL|VERSAO|ARRANJO|COMPILACAO|TRILHA|PARODIA|MEDLEY)?\s*(SIM|NÃO|NAO)?\s*(\d{2}/\d{2}/\d{4})?",
            )
            .unwrap(),
            iswc: Some(2),
            title: 3,
        },
        // CODE ISWC TITLE ...
        WorkPattern {
            regex: Regex::new(
                r"^(\d{5,})\s+(T-[\d.\-]+)\s+(.+?)(?:\s+(ABRAMUS|UBC|SBACEM|SOCINPRO|AMAR|SADEMBRA|ASSIM))?(?:\s+(\w+/?\w*))?(?:\s+(ORIGINAL|VERSAO))?\s*(SIM|NÃO|NAO)?\s*(\d{2}/\d{2}/\d{4})?\s*$",
            )
            .unwrap(),
            iswc: Some(2),
            title: 3,
        },
        // CODE TITLE [SOCIETY] STATUS ...
        WorkPattern {
            regex: Regex::new(
                r"^(\d{5,})\s+(.+?)(?:\s+(ABRAMUS|UBC|SBACEM|SOCINPRO|AMAR|SADEMBRA|ASSIM))?\s+(LB|BL|BL/DU|DU|LB/DU)\s+(ORIGINAL|VERSAO|ARRANJO|COMPILACAO|TRILHA|PARODIA|MEDLEY)?\s*(SIM|NÃO|NAO)?\s*(\d{2}/\d{2}/\d{4})?\s*$",
            )
            .unwrap(),
            iswc: None,
            title: 2,
        },
    ]
});

/// CODE NAME PSEUDONYM CAE SOCIETY CATEGORY SHARE
static PARTICIPANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4,})\s+(.+?)\s+([A-Z][A-Z\s.]+?)\s+(\d{5}\.\d{2}\.\d{2}\.\d{2})\s+(ABRAMUS|UBC|SBACEM|SOCINPRO|AMAR|SADEMBRA|ASSIM)\s+([A-Z]{1,2})\s+([\d.,]+)",
    )
    .unwrap()
});

static LONG_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5,}").unwrap());
static LEADING_ISWC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(T-[\d.\-]+)\s+(.*)").unwrap());

const REPEATED_HEADERS: &[&str] = &[
    "RELATÓRIO ANALÍTICO",
    "ASSOCIAÇÃO:",
    "TITULAR:",
    "CÓD. OBRA",
    "CONTRATO",
    "CÓD. ECAD",
    "CÓDIGO",
    "NOME DO TITULAR",
    "* SITUAÇÃO",
    "CLASSIFICAÇÃO DA OBRA",
    "Pag ",
    "ECAD.Tec",
];

/// Societies that end a title in the ISWC fallback.
const TITLE_END_SOCIETIES: &[&str] = &["ABRAMUS", "UBC", "SBACEM", "SOCINPRO"];

/// Tokens that end a title in the no-ISWC fallback.
const TITLE_STOPWORDS: &[&str] = &[
    "ABRAMUS", "UBC", "SBACEM", "SOCINPRO", "LB", "BL", "DU", "ORIGINAL", "VERSAO", "SIM", "NÃO",
    "NAO",
];

pub struct AuthorialGrammar;

impl LineGrammar for AuthorialGrammar {
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

        for pattern in WORK_PATTERNS.iter() {
            if let Some(caps) = pattern.regex.captures(line) {
                let iswc = pattern
                    .iswc
                    .and_then(|i| caps.get(i))
                    .map(|m| m.as_str().to_string());
                let title = caps.get(pattern.title).and_then(|m| clean_text(m.as_str()));
                state.start(&caps[1], title);
                state.code = iswc;
                return Step::Header;
            }
        }

        if LONG_CODE.is_match(line) {
            return loose_line(line, state, ctx);
        }

        match participant_row(line, state, ctx) {
            Some(row) => Step::Row(row),
            None => Step::Unmatched,
        }
    }
}

/// A line starting with a long code that no work pattern accepted. It is
/// an ISWC work, a participant with a long code, or a work without ISWC,
/// tried in that order. The line is always consumed.
fn loose_line(line: &str, state: &mut ForwardFillState, ctx: &RowContext<'_>) -> Step {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [code, rest @ ..] = parts.as_slice() else {
        return Step::Skipped;
    };
    if rest.is_empty() {
        return Step::Skipped;
    }
    let rest = rest.join(" ");

    if let Some(caps) = LEADING_ISWC.captures(&rest) {
        let mut title = &caps[2];
        for society in TITLE_END_SOCIETIES {
            title = title.split(*society).next().unwrap_or(title);
        }
        state.start(code, clean_text(title));
        state.code = Some(caps[1].to_string());
        return Step::Header;
    }

    if let Some(row) = participant_row(line, state, ctx) {
        return Step::Row(row);
    }

    let title: Vec<&str> = rest
        .split_whitespace()
        .take_while(|t| !TITLE_STOPWORDS.contains(t))
        .collect();
    state.start(code, clean_text(&title.join(" ")));
    Step::Header
}

fn participant_row(
    line: &str,
    state: &ForwardFillState,
    ctx: &RowContext<'_>,
) -> Option<ExtractedRow> {
    let caps = PARTICIPANT.captures(line)?;

    Some(ExtractedRow::AuthorParticipant(AuthorParticipantRow {
        titular: ctx.titular(),
        documento_origem: ctx.tipo(),
        arquivo_origem: ctx.filename(),
        obra_referencia: state.work_title.clone(),
        obra_codigo: state.work_code.clone(),
        isrc_iswc: state.code.clone(),
        cod_ecad_participante: Some(caps[1].to_string()),
        nome_participante: clean_text(&caps[2]),
        pseudonimo_participante: clean_text(&caps[3]),
        cae_participante: Some(caps[4].to_string()),
        associacao_participante: Some(caps[5].to_string()),
        categoria: Some(caps[6].to_string()),
        percentual_rateio: parse_amount(&caps[7]),
        tipo_extracao: ctx.tipo(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::run;
    use crate::extractors::test_support::{ctx, page};
    use rust_decimal_macros::dec;

    fn authorial_rows(lines: &[&str]) -> Vec<AuthorParticipantRow> {
        let pages = vec![page(1, lines)];
        run(&AuthorialGrammar, &pages, &ctx("RELATORIO_ANALITICO_AUTORAL"))
            .into_iter()
            .map(|row| match row {
                ExtractedRow::AuthorParticipant(r) => r,
                other => panic!("unexpected row shape: {other:?}"),
            })
            .collect()
    }

    fn step_one(state: &mut ForwardFillState, line: &str) -> Step {
        let lines = vec![line.to_string()];
        AuthorialGrammar.step(state, &lines, 0, &ctx("RELATORIO_ANALITICO_AUTORAL"))
    }

    #[test]
    fn test_work_with_iswc_and_participants() {
        let rows = authorial_rows(&[
            "RELATÓRIO ANALÍTICO DE TITULAR AUTORAL E SUAS OBRAS",
            "CÓD. OBRA   ISWC   TÍTULO",
            "12345 T-123.456.789-0 MINHA CANCAO ABRAMUS LB ORIGINAL SIM 01/02/2020",
            "1234 MARIA MARIAZINHA 00123.45.67.89 ABRAMUS CA 50,00",
            "5678 JOAO JOTA 00987.65.43.21 UBC A 50,00",
        ]);

        assert_eq!(rows.len(), 2);
        for r in &rows {
            assert_eq!(r.obra_referencia.as_deref(), Some("MINHA CANCAO"));
            assert_eq!(r.obra_codigo.as_deref(), Some("12345"));
            assert_eq!(r.isrc_iswc.as_deref(), Some("T-123.456.789-0"));
            assert_eq!(r.tipo_extracao.as_deref(), Some("RELATORIO_ANALITICO_AUTORAL"));
            assert_eq!(r.arquivo_origem.as_deref(), Some("extrato.pdf"));
        }

        let first = &rows[0];
        assert_eq!(first.cod_ecad_participante.as_deref(), Some("1234"));
        assert_eq!(first.nome_participante.as_deref(), Some("MARIA"));
        assert_eq!(first.pseudonimo_participante.as_deref(), Some("MARIAZINHA"));
        assert_eq!(first.cae_participante.as_deref(), Some("00123.45.67.89"));
        assert_eq!(first.associacao_participante.as_deref(), Some("ABRAMUS"));
        assert_eq!(first.categoria.as_deref(), Some("CA"));
        assert_eq!(first.percentual_rateio, Some(dec!(50.00)));
        assert_eq!(rows[1].associacao_participante.as_deref(), Some("UBC"));
    }

    #[test]
    fn test_work_without_iswc_maps_title() {
        let mut state = ForwardFillState::default();
        let step = step_one(&mut state, "54321 OUTRA OBRA UBC BL/DU VERSAO NAO");
        assert_eq!(step, Step::Header);
        assert_eq!(state.work_code.as_deref(), Some("54321"));
        assert_eq!(state.work_title.as_deref(), Some("OUTRA OBRA"));
        assert_eq!(state.code, None);
    }

    #[test]
    fn test_status_only_work_line() {
        let mut state = ForwardFillState::default();
        let step = step_one(&mut state, "54321 SEM SOCIEDADE LB ORIGINAL SIM");
        assert_eq!(step, Step::Header);
        assert_eq!(state.work_title.as_deref(), Some("SEM SOCIEDADE"));
        assert_eq!(state.code, None);
    }

    #[test]
    fn test_new_work_resets_iswc() {
        let rows = authorial_rows(&[
            "12345 T-123.456.789-0 PRIMEIRA ABRAMUS LB ORIGINAL SIM 01/02/2020",
            "54321 SEGUNDA UBC BL VERSAO NAO",
            "1234 MARIA MARIAZINHA 00123.45.67.89 ABRAMUS CA 100,00",
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].obra_referencia.as_deref(), Some("SEGUNDA"));
        assert_eq!(rows[0].isrc_iswc, None);
    }

    #[test]
    fn test_loose_iswc_work_line() {
        let mut state = ForwardFillState::default();
        let step = loose_line(
            "99999 T-111.222.333-4 TITULO LIVRE ABRAMUS ???",
            &mut state,
            &ctx("RELATORIO_ANALITICO_AUTORAL"),
        );
        assert_eq!(step, Step::Header);
        assert_eq!(state.work_code.as_deref(), Some("99999"));
        assert_eq!(state.code.as_deref(), Some("T-111.222.333-4"));
        assert_eq!(state.work_title.as_deref(), Some("TITULO LIVRE"));
    }

    #[test]
    fn test_loose_work_without_iswc_stops_at_keyword() {
        let mut state = ForwardFillState {
            code: Some("T-000.000.000-0".into()),
            ..Default::default()
        };
        let step = loose_line(
            "88888 OBRA SOLTA LB ???",
            &mut state,
            &ctx("RELATORIO_ANALITICO_AUTORAL"),
        );
        assert_eq!(step, Step::Header);
        assert_eq!(state.work_title.as_deref(), Some("OBRA SOLTA"));
        assert_eq!(state.code, None);
    }

    #[test]
    fn test_participant_before_any_work() {
        let rows = authorial_rows(&["1234 MARIA MARIAZINHA 00123.45.67.89 ABRAMUS CA 50,00"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].obra_referencia, None);
        assert_eq!(rows[0].obra_codigo, None);
    }

    #[test]
    fn test_repeated_headers_and_noise_are_skipped() {
        let rows = authorial_rows(&[
            "TITULAR: 12345 JOAO PEREIRA",
            "Pag 2 de 10",
            "NOME DO TITULAR   PSEUDÔNIMO   CAE",
            "linha sem padrao",
        ]);
        assert!(rows.is_empty());
    }
}
