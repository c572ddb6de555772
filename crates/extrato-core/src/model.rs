use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single output value. Missing values are represented as `None` by the
/// containers, never as an empty `Cell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Amount(Decimal),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Amount(_) => None,
        }
    }

    pub fn as_amount(&self) -> Option<Decimal> {
        match self {
            Cell::Amount(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Amount(v) => write!(f, "{v}"),
        }
    }
}

/// Statement header metadata, read once from the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseContext {
    /// Titleholder name.
    pub titular: Option<String>,
    pub cnpj_cpf: Option<String>,
    pub demonstrativo_numero: Option<String>,
    pub cae_ipi: Option<String>,
    pub pseudonimo: Option<String>,
    pub cod_ecad: Option<String>,
    /// Distribution period, e.g. "NOVEMBRO/2024".
    pub periodo_distribuicao: Option<String>,
    /// Declared total, kept as printed.
    pub valor_total: Option<String>,
    /// Associated entity (analytical reports).
    pub associacao: Option<String>,
}

/// A financial detail line of a standard statement, or a chapter line
/// standing in for one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    pub titular: Option<String>,
    pub documento_origem: Option<String>,
    pub arquivo_origem: Option<String>,
    pub obra_referencia: Option<String>,
    pub obra_codigo: Option<String>,
    pub rubrica: Option<String>,
    pub periodo: Option<String>,
    pub rendimento: Option<Decimal>,
    pub percentual_rateio: Option<Decimal>,
    pub valor_rateio: Option<Decimal>,
    pub correcao: Option<String>,
    pub execucoes: Option<String>,
    pub categoria: Option<String>,
    pub caracteristica: Option<String>,
    pub isrc_iswc: Option<String>,
    pub data_pagamento: Option<String>,
    pub valor_bruto: Option<Decimal>,
    pub valor_liquido: Option<Decimal>,
    pub tipo_extracao: Option<String>,
    pub artista_gravacao: Option<String>,
    pub or_e_peso: Option<String>,
}

/// A rights holder listed under a work in the authorial analytical report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorParticipantRow {
    pub titular: Option<String>,
    pub documento_origem: Option<String>,
    pub arquivo_origem: Option<String>,
    pub obra_referencia: Option<String>,
    pub obra_codigo: Option<String>,
    pub isrc_iswc: Option<String>,
    pub cod_ecad_participante: Option<String>,
    pub nome_participante: Option<String>,
    pub pseudonimo_participante: Option<String>,
    pub cae_participante: Option<String>,
    pub associacao_participante: Option<String>,
    pub categoria: Option<String>,
    pub percentual_rateio: Option<Decimal>,
    pub tipo_extracao: Option<String>,
}

/// A rights holder listed under a recording in the connected-rights report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingParticipantRow {
    pub titular: Option<String>,
    pub documento_origem: Option<String>,
    pub arquivo_origem: Option<String>,
    pub obra_referencia: Option<String>,
    pub obra_codigo: Option<String>,
    pub isrc_iswc: Option<String>,
    pub situacao: Option<String>,
    pub complemento_titulo: Option<String>,
    pub cod_ecad_participante: Option<String>,
    pub nome_participante: Option<String>,
    pub pseudonimo_participante: Option<String>,
    pub categoria: Option<String>,
    pub subcategoria: Option<String>,
    pub associacao_participante: Option<String>,
    pub percentual_rateio: Option<Decimal>,
    pub tipo_extracao: Option<String>,
}

/// One row emitted by a layout extractor, before projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ExtractedRow {
    Statement(StatementRow),
    AuthorParticipant(AuthorParticipantRow),
    RecordingParticipant(RecordingParticipantRow),
}

fn text(v: &Option<String>) -> Option<Cell> {
    v.clone().map(Cell::Text)
}

fn amount(v: &Option<Decimal>) -> Option<Cell> {
    v.map(Cell::Amount)
}

impl ExtractedRow {
    /// The row's columns in encounter order. Every column of the shape is
    /// listed, populated or not.
    pub fn cells(&self) -> Vec<(&'static str, Option<Cell>)> {
        match self {
            ExtractedRow::Statement(r) => vec![
                ("titular", text(&r.titular)),
                ("documento_origem", text(&r.documento_origem)),
                ("arquivo_origem", text(&r.arquivo_origem)),
                ("obra_referencia", text(&r.obra_referencia)),
                ("obra_codigo", text(&r.obra_codigo)),
                ("rubrica", text(&r.rubrica)),
                ("periodo", text(&r.periodo)),
                ("rendimento", amount(&r.rendimento)),
                ("percentual_rateio", amount(&r.percentual_rateio)),
                ("valor_rateio", amount(&r.valor_rateio)),
                ("correcao", text(&r.correcao)),
                ("execucoes", text(&r.execucoes)),
                ("categoria", text(&r.categoria)),
                ("caracteristica", text(&r.caracteristica)),
                ("isrc_iswc", text(&r.isrc_iswc)),
                ("data_pagamento", text(&r.data_pagamento)),
                ("valor_bruto", amount(&r.valor_bruto)),
                ("valor_liquido", amount(&r.valor_liquido)),
                ("tipo_extracao", text(&r.tipo_extracao)),
                ("artista_gravacao", text(&r.artista_gravacao)),
                ("or_e_peso", text(&r.or_e_peso)),
            ],
            ExtractedRow::AuthorParticipant(r) => vec![
                ("titular", text(&r.titular)),
                ("documento_origem", text(&r.documento_origem)),
                ("arquivo_origem", text(&r.arquivo_origem)),
                ("obra_referencia", text(&r.obra_referencia)),
                ("obra_codigo", text(&r.obra_codigo)),
                ("isrc_iswc", text(&r.isrc_iswc)),
                ("cod_ecad_participante", text(&r.cod_ecad_participante)),
                ("nome_participante", text(&r.nome_participante)),
                ("pseudonimo_participante", text(&r.pseudonimo_participante)),
                ("cae_participante", text(&r.cae_participante)),
                ("associacao_participante", text(&r.associacao_participante)),
                ("categoria", text(&r.categoria)),
                ("percentual_rateio", amount(&r.percentual_rateio)),
                ("tipo_extracao", text(&r.tipo_extracao)),
            ],
            ExtractedRow::RecordingParticipant(r) => vec![
                ("titular", text(&r.titular)),
                ("documento_origem", text(&r.documento_origem)),
                ("arquivo_origem", text(&r.arquivo_origem)),
                ("obra_referencia", text(&r.obra_referencia)),
                ("obra_codigo", text(&r.obra_codigo)),
                ("isrc_iswc", text(&r.isrc_iswc)),
                ("situacao", text(&r.situacao)),
                ("complemento_titulo", text(&r.complemento_titulo)),
                ("cod_ecad_participante", text(&r.cod_ecad_participante)),
                ("nome_participante", text(&r.nome_participante)),
                ("pseudonimo_participante", text(&r.pseudonimo_participante)),
                ("categoria", text(&r.categoria)),
                ("subcategoria", text(&r.subcategoria)),
                ("associacao_participante", text(&r.associacao_participante)),
                ("percentual_rateio", amount(&r.percentual_rateio)),
                ("tipo_extracao", text(&r.tipo_extracao)),
            ],
        }
    }

    /// The work or recording reference this row was attributed to.
    pub fn obra_referencia(&self) -> Option<&str> {
        match self {
            ExtractedRow::Statement(r) => r.obra_referencia.as_deref(),
            ExtractedRow::AuthorParticipant(r) => r.obra_referencia.as_deref(),
            ExtractedRow::RecordingParticipant(r) => r.obra_referencia.as_deref(),
        }
    }
}

/// One projected output row: master schema columns first, extras after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterRecord {
    columns: IndexMap<String, Option<Cell>>,
}

impl MasterRecord {
    pub fn new(columns: IndexMap<String, Option<Cell>>) -> Self {
        MasterRecord { columns }
    }

    /// Value of a column, `None` when the column is null or absent.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns.get(column).and_then(Option::as_ref)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::as_text)
    }

    pub fn amount(&self, column: &str) -> Option<Decimal> {
        self.get(column).and_then(Cell::as_amount)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Projected rows plus the column list they share. The column list always
/// carries the full master schema, even when there are no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub records: Vec<MasterRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of running one document through the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Name of the matched layout signature.
    pub layout: String,
    pub source_filename: String,
    pub context: ParseContext,
    pub records: RecordSet,
}
