use crate::model::ParseContext;
use regex::Regex;
use std::sync::LazyLock;

static DISTRIBUTION_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:DIREITOS AUTORAIS|TOTAL[:\s]*)\s*([A-ZÇ]+/\d{4})").unwrap()
});
static PERIOD_ONLY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-ZÇ]+/\d{4}$").unwrap());
static TOTAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)TOTAL[:\s]*([\d.,]+)").unwrap());
static TITLEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z\s]+?)\s+(?:CNPJ/CPF:|CAE/IPI:)\s*([\d.\-/]+)").unwrap()
});
static STATEMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)DEMONSTRATIVO\s+N[ºo]?:\s*([\d\s/]+)").unwrap());
static CAE_IPI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"CAE/IPI:\s*(\d+)").unwrap());
static PSEUDONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z\s]+?)\s+COD ECAD:\s*(\d+)").unwrap());
static ASSOCIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ASSOCIA[CÇ][AÃ]O\s*:\s*(.+)").unwrap());
static REPORT_TITLEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)TITULAR:\s*(\d+)\s+(.+?)(?:\s+CATEGORIA:|\s+PSEUD[OÔ]NIMO:|$)").unwrap()
});

/// Extract statement header metadata from the first page's text.
///
/// Later lines may overwrite the titleholder, statement number, CAE/IPI,
/// ECAD code and association; the period and total keep their first hit.
pub fn parse_context(first_page_text: &str) -> ParseContext {
    let mut ctx = ParseContext::default();

    for line in first_page_text.lines() {
        let line = line.trim();

        if ctx.periodo_distribuicao.is_none() {
            if let Some(caps) = DISTRIBUTION_PERIOD.captures(line) {
                ctx.periodo_distribuicao = Some(caps[1].trim().to_string());
            } else if PERIOD_ONLY_LINE.is_match(line) {
                ctx.periodo_distribuicao = Some(line.to_string());
            }
        }

        if ctx.valor_total.is_none() {
            if let Some(caps) = TOTAL.captures(line) {
                ctx.valor_total = Some(caps[1].trim().to_string());
            }
        }

        // "NAME   CNPJ/CPF: 000.000.000-00" or "NAME   CAE/IPI: 123"
        if let Some(caps) = TITLEHOLDER.captures(line) {
            ctx.titular = Some(caps[1].trim().to_string());
            if line.contains("CNPJ/CPF:") {
                ctx.cnpj_cpf = Some(caps[2].trim().to_string());
            }
        }

        if let Some(caps) = STATEMENT_NUMBER.captures(line) {
            ctx.demonstrativo_numero = Some(caps[1].trim().to_string());
        }

        if let Some(caps) = CAE_IPI.captures(line) {
            ctx.cae_ipi = Some(caps[1].trim().to_string());
        }

        if let Some(caps) = PSEUDONYM.captures(line) {
            if ctx.titular.is_none() {
                ctx.pseudonimo = Some(caps[1].trim().to_string());
            }
            ctx.cod_ecad = Some(caps[2].trim().to_string());
        }

        if let Some(caps) = ASSOCIATION.captures(line) {
            ctx.associacao = Some(caps[1].trim().to_string());
        }

        // Analytical reports: "TITULAR: 12345 NAME   CATEGORIA: ..."
        if ctx.titular.is_none() {
            if let Some(caps) = REPORT_TITLEHOLDER.captures(line) {
                ctx.titular = Some(caps[2].trim().to_string());
            }
        }
    }

    ctx
}
