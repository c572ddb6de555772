//! Integration tests for the extract_pdf() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use extrato_core::error::ExtractError;
use extrato_core::extraction::{PageContent, PdfExtractor};
use extrato_core::layout::builtin::builtin_signatures;
use extrato_core::layout::parse_signatures_str;
use extrato_core::layout::schema::LayoutSignature;
use extrato_core::model::Extraction;
use extrato_core::schema::{consolidate, MASTER_SCHEMA_COLUMNS};
use extrato_core::{extract_pdf, identify_pages, ExtractOptions};
use rust_decimal_macros::dec;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ExtractError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn signatures() -> Vec<LayoutSignature> {
    builtin_signatures().unwrap().signatures
}

fn run(pages: Vec<PageContent>) -> Result<Extraction, ExtractError> {
    let extractor = MockExtractor { pages };
    extract_pdf(
        &[],
        "extrato.pdf",
        &extractor,
        &signatures(),
        &ExtractOptions::default(),
    )
}

fn assert_master_prefix(columns: &[String]) {
    let prefix: Vec<&str> = columns
        .iter()
        .take(MASTER_SCHEMA_COLUMNS.len())
        .map(String::as_str)
        .collect();
    assert_eq!(prefix, MASTER_SCHEMA_COLUMNS);
}

fn statement_page() -> PageContent {
    page(
        1,
        &[
            "                 DEMONSTRATIVO DO TITULAR - EXECUÇÃO PÚBLICA",
            "DISTRIBUIÇÃO DE DIREITOS AUTORAIS NOVEMBRO/2024",
            "MARIA DA SILVA   CNPJ/CPF: 123.456.789-00",
            "",
            "OBRA   RUBRICA   PERÍODO   RENDIMENTO   % RATEIO   VALOR RATEIO",
            "00012345 SOME WORK TITLE 150,00 --- 10",
            "FULANO SDI 06/2024 A 08/2024 1.234,56 10,00 123,45 --- 5 A NA",
        ],
    )
}

// ---------------------------------------------------------------------------
// Standard statement, one work and one data line
// ---------------------------------------------------------------------------
#[test]
fn standard_statement_end_to_end() {
    let result = run(vec![statement_page()]).unwrap();

    assert_eq!(result.layout, "DEMONSTRATIVO_TITULAR");
    assert_eq!(result.source_filename, "extrato.pdf");
    assert_eq!(result.context.titular.as_deref(), Some("MARIA DA SILVA"));
    assert_eq!(
        result.context.periodo_distribuicao.as_deref(),
        Some("NOVEMBRO/2024")
    );

    let set = &result.records;
    assert_eq!(set.len(), 1);
    assert_master_prefix(&set.columns);

    let r = &set.records[0];
    assert_eq!(r.text("obra_referencia"), Some("SOME WORK TITLE"));
    assert_eq!(r.amount("rendimento"), Some(dec!(1234.56)));
    assert_eq!(r.amount("valor_rateio"), Some(dec!(123.45)));
    assert_eq!(r.amount("valor_liquido"), Some(dec!(123.45)));
    assert_eq!(r.text("periodo"), Some("06/2024 - 08/2024"));
    assert_eq!(r.text("periodo_inicial"), Some("06/2024"));
    assert_eq!(r.text("periodo_final"), Some("08/2024"));
    assert_eq!(r.text("titular"), Some("MARIA DA SILVA"));
    assert_eq!(r.text("documento_origem"), Some("DEMONSTRATIVO_TITULAR"));
    assert_eq!(r.text("tipo_extracao"), Some("DEMONSTRATIVO_TITULAR"));
    assert_eq!(r.text("arquivo_origem"), Some("extrato.pdf"));
    assert_eq!(r.text("data_pagamento"), Some("NOVEMBRO/2024"));
    assert_eq!(r.text("artista_gravacao"), Some("FULANO"));
}

// ---------------------------------------------------------------------------
// A specific statement signature wins over the generic one
// ---------------------------------------------------------------------------
#[test]
fn specific_statement_layout_wins() {
    let result = run(vec![page(
        1,
        &[
            "DEMONSTRATIVO DO TITULAR",
            "ANTECIPAÇÃO DE PRESCRITOS - EXECUÇÃO PÚBLICA",
            "OBRA   RUBRICA   PERÍODO",
            "00012345 OBRA ANTECIPADA 10,00 --- 1",
            "FULANO SDI 01/2024 10,00 100,00 10,00 --- 1 A NA",
        ],
    )])
    .unwrap();

    assert_eq!(result.layout, "DEMONSTRATIVO_ANTECIPACAO_PRESCRITOS");
    let r = &result.records.records[0];
    assert_eq!(
        r.text("tipo_extracao"),
        Some("DEMONSTRATIVO_ANTECIPACAO_PRESCRITOS")
    );
    assert_eq!(r.text("periodo_inicial"), Some("01/2024"));
    assert_eq!(r.text("periodo_final"), Some("01/2024"));
}

// ---------------------------------------------------------------------------
// Unidentified documents are rejected
// ---------------------------------------------------------------------------
#[test]
fn unidentified_document_is_rejected() {
    let err = run(vec![page(1, &["NOTA FISCAL DE SERVIÇOS", "TOTAL 10,00"])]).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::LayoutNotIdentified { ref file } if file == "extrato.pdf"
    ));
    assert!(err.is_document_error());
}

#[test]
fn blank_first_page_is_unidentified() {
    let err = run(vec![page(1, &["", "   "])]).unwrap_err();
    assert!(matches!(err, ExtractError::LayoutNotIdentified { .. }));

    let err = run(vec![]).unwrap_err();
    assert!(matches!(err, ExtractError::LayoutNotIdentified { .. }));
}

// ---------------------------------------------------------------------------
// A custom signature naming an unknown layout has no extractor
// ---------------------------------------------------------------------------
#[test]
fn custom_signature_without_extractor() {
    let custom = parse_signatures_str(
        r#"{
            "name": "Custom",
            "version": "1.0",
            "signatures": [
                { "name": "NOTA_FISCAL", "keywords": ["NOTA FISCAL"], "priority": 5 }
            ]
        }"#,
    )
    .unwrap();

    let extractor = MockExtractor {
        pages: vec![page(1, &["NOTA FISCAL DE SERVIÇOS"])],
    };
    let err = extract_pdf(
        &[],
        "nf.pdf",
        &extractor,
        &custom.signatures,
        &ExtractOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ExtractError::ExtractorMissing { ref layout } if layout == "NOTA_FISCAL"
    ));
    assert!(!err.is_document_error());
}

// ---------------------------------------------------------------------------
// Identified documents with no detail lines still yield the schema
// ---------------------------------------------------------------------------
#[test]
fn zero_rows_is_not_an_error() {
    let result = run(vec![page(
        1,
        &[
            "DEMONSTRATIVO DO TITULAR - EXECUÇÃO PÚBLICA",
            "OBRA   RUBRICA   PERÍODO",
            "NENHUM VALOR A DISTRIBUIR",
        ],
    )])
    .unwrap();

    assert_eq!(result.layout, "DEMONSTRATIVO_TITULAR");
    assert!(result.records.is_empty());
    assert_eq!(result.records.columns.len(), MASTER_SCHEMA_COLUMNS.len());
    assert_master_prefix(&result.records.columns);
}

// ---------------------------------------------------------------------------
// Forward fill across pages
// ---------------------------------------------------------------------------
#[test]
fn forward_fill_spans_pages() {
    let result = run(vec![
        statement_page(),
        page(
            2,
            &[
                "DEMONSTRATIVO DO TITULAR",
                "OBRA   RUBRICA   PERÍODO   RENDIMENTO",
                "ISRC BR-WNV-17-00176",
                "BELTRANO SDI 09/2024 50,00 100,00 50,00 --- 2 A NA",
                "00067890 ANOTHER WORK 10,00 --- 1",
                "CICRANO SDI 10/2024 10,00 100,00 10,00 --- 1 A NA",
            ],
        ),
    ])
    .unwrap();

    let refs: Vec<_> = result
        .records
        .records
        .iter()
        .map(|r| r.text("obra_referencia"))
        .collect();
    assert_eq!(
        refs,
        vec![
            Some("SOME WORK TITLE"),
            Some("SOME WORK TITLE"),
            Some("ANOTHER WORK"),
        ]
    );
    assert_eq!(
        result.records.records[1].text("isrc_iswc"),
        Some("BR-WNV-17-00176")
    );
    assert_eq!(result.records.records[2].text("isrc_iswc"), None);
}

// ---------------------------------------------------------------------------
// The code window is configurable
// ---------------------------------------------------------------------------
#[test]
fn code_window_option_controls_backfill() {
    let pages = vec![page(
        1,
        &[
            "DEMONSTRATIVO DO TITULAR - EXECUÇÃO PÚBLICA",
            "OBRA   RUBRICA   PERÍODO",
            "00012345 SOME WORK TITLE 150,00 --- 10",
            "FULANO SDI 06/2024 1,00 100,00 1,00 --- 1 A NA",
            "ISRC BR-ABC-24-00001",
        ],
    )];

    let extractor = MockExtractor { pages };
    let with_window = extract_pdf(
        &[],
        "a.pdf",
        &extractor,
        &signatures(),
        &ExtractOptions::default(),
    )
    .unwrap();
    assert_eq!(
        with_window.records.records[0].text("isrc_iswc"),
        Some("BR-ABC-24-00001")
    );

    let without_window = extract_pdf(
        &[],
        "a.pdf",
        &extractor,
        &signatures(),
        &ExtractOptions { code_window: 0 },
    )
    .unwrap();
    assert_eq!(without_window.records.records[0].text("isrc_iswc"), None);
}

// ---------------------------------------------------------------------------
// Authorial analytical report
// ---------------------------------------------------------------------------
#[test]
fn authorial_report_end_to_end() {
    let result = run(vec![page(
        1,
        &[
            "RELATÓRIO ANALÍTICO DE TITULAR AUTORAL E SUAS OBRAS",
            "ASSOCIAÇÃO: ABRAMUS",
            "TITULAR: 12345 JOAO PEREIRA CATEGORIA: AUTOR",
            "CÓD. OBRA   ISWC   TÍTULO   ASSOCIAÇÃO   SITUAÇÃO",
            "12345 T-123.456.789-0 MINHA CANCAO ABRAMUS LB ORIGINAL SIM 01/02/2020",
            "1234 MARIA MARIAZINHA 00123.45.67.89 ABRAMUS CA 50,00",
            "5678 JOAO JOTA 00987.65.43.21 UBC A 50,00",
        ],
    )])
    .unwrap();

    assert_eq!(result.layout, "RELATORIO_ANALITICO_AUTORAL");
    assert_eq!(result.context.titular.as_deref(), Some("JOAO PEREIRA"));
    assert_eq!(result.context.associacao.as_deref(), Some("ABRAMUS"));

    let set = &result.records;
    assert_eq!(set.len(), 2);
    assert_master_prefix(&set.columns);
    assert!(set.columns.contains(&"cae_participante".to_string()));

    for r in &set.records {
        assert_eq!(r.text("obra_referencia"), Some("MINHA CANCAO"));
        assert_eq!(r.text("isrc_iswc"), Some("T-123.456.789-0"));
        assert_eq!(r.text("titular"), Some("JOAO PEREIRA"));
        assert_eq!(r.text("tipo_extracao"), Some("RELATORIO_ANALITICO_AUTORAL"));
        assert_eq!(r.get("periodo"), None);
        assert_eq!(r.get("periodo_inicial"), None);
    }
    assert_eq!(set.records[0].amount("percentual_rateio"), Some(dec!(50.00)));
    assert_eq!(set.records[1].text("associacao_participante"), Some("UBC"));
}

// ---------------------------------------------------------------------------
// Connected-rights analytical report
// ---------------------------------------------------------------------------
#[test]
fn connected_report_end_to_end() {
    let result = run(vec![page(
        1,
        &[
            "RELATÓRIO ANALÍTICO DE TITULAR CONEXO E SUAS GRAVAÇÕES",
            "TITULAR: 777 ANA LIMA PSEUDÔNIMO: ANINHA",
            "10001 BR-ABC-12-34567 LIBERADO MINHA GRAVACAO SIM X",
            "AO VIVO",
            "5678 JOSE SANTOS  ZE   IN  AC  UBC  33,33",
        ],
    )])
    .unwrap();

    assert_eq!(result.layout, "RELATORIO_ANALITICO_CONEXO");
    assert_eq!(result.context.titular.as_deref(), Some("ANA LIMA"));

    let set = &result.records;
    assert_eq!(set.len(), 1);
    assert_master_prefix(&set.columns);

    let r = &set.records[0];
    assert_eq!(r.text("obra_referencia"), Some("MINHA GRAVACAO"));
    assert_eq!(r.text("isrc_iswc"), Some("BR-ABC-12-34567"));
    assert_eq!(r.text("situacao"), Some("LIBERADO"));
    assert_eq!(r.text("complemento_titulo"), Some("AO VIVO"));
    assert_eq!(r.text("categoria"), Some("IN"));
    assert_eq!(r.amount("percentual_rateio"), Some(dec!(33.33)));
    assert_eq!(r.text("documento_origem"), Some("RELATORIO_ANALITICO_CONEXO"));
}

// ---------------------------------------------------------------------------
// Identification without extraction
// ---------------------------------------------------------------------------
#[test]
fn identify_only() {
    let layout = identify_pages(&[statement_page()], "extrato.pdf", &signatures()).unwrap();
    assert_eq!(layout, "DEMONSTRATIVO_TITULAR");
}

// ---------------------------------------------------------------------------
// Results from different layouts consolidate into one schema
// ---------------------------------------------------------------------------
#[test]
fn consolidate_mixed_layouts() {
    let statement = run(vec![statement_page()]).unwrap();
    let connected = run(vec![page(
        1,
        &[
            "RELATÓRIO ANALÍTICO DE TITULAR CONEXO E SUAS GRAVAÇÕES",
            "10001 BR-ABC-12-34567 LIBERADO MINHA GRAVACAO SIM X",
            "5678 JOSE SANTOS  ZE   IN  AC  UBC  33,33",
        ],
    )])
    .unwrap();

    let merged = consolidate(&[statement.records, connected.records]);
    assert_eq!(merged.len(), 2);
    assert_master_prefix(&merged.columns);
    for record in &merged.records {
        assert_eq!(record.len(), merged.columns.len());
    }
    assert_eq!(merged.records[0].get("situacao"), None);
    assert_eq!(merged.records[1].text("situacao"), Some("LIBERADO"));
    assert_eq!(merged.records[1].get("artista_gravacao"), None);
}
