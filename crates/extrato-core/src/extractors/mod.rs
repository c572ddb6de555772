//! Line-oriented extractors, one grammar per layout family.
//!
//! Every grammar walks the pages top to bottom, carrying the active work or
//! recording in a [`ForwardFillState`]. Header lines re-seed the state;
//! detail lines become rows stamped with whatever the state holds at that
//! moment.

pub mod authorial;
pub mod connected;
pub mod statement;

use crate::extraction::PageContent;
use crate::layout::{Family, LayoutKind};
use crate::model::{ExtractedRow, ParseContext};

/// The header values inherited by detail rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardFillState {
    /// Work or recording code of the active header.
    pub work_code: Option<String>,
    pub work_title: Option<String>,
    /// Pending ISRC/ISWC.
    pub code: Option<String>,
    /// Recording status (connected-rights reports).
    pub status: Option<String>,
    /// Complementary title, e.g. "AO VIVO" (connected-rights reports).
    pub complement: Option<String>,
}

impl ForwardFillState {
    /// Re-seed from a new header line. The pending code is cleared.
    pub fn start(&mut self, work_code: &str, work_title: Option<String>) {
        tracing::debug!(code = work_code, title = ?work_title, "new work");
        self.work_code = Some(work_code.to_string());
        self.work_title = work_title;
        self.code = None;
    }

    /// The reference stamped on statement rows: title, else code.
    pub fn reference(&self) -> Option<String> {
        self.work_title.clone().or_else(|| self.work_code.clone())
    }
}

/// Outcome of feeding one line to a grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Blank line, page furniture or header band.
    Skipped,
    /// A work or recording header; state re-seeded.
    Header,
    /// A line carrying only a code; pending code updated.
    Code,
    /// A complementary line folded into the state.
    Continuation,
    Row(ExtractedRow),
    Unmatched,
}

/// Document-level values every row carries.
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub titular: Option<&'a str>,
    pub periodo_distribuicao: Option<&'a str>,
    pub source_filename: &'a str,
    /// Layout name, written as `tipo_extracao` and `documento_origem`.
    pub tipo: &'a str,
    /// Lines scanned either side of a data line for a missing ISRC.
    pub code_window: usize,
}

impl RowContext<'_> {
    pub(crate) fn titular(&self) -> Option<String> {
        self.titular.map(str::to_string)
    }

    pub(crate) fn tipo(&self) -> Option<String> {
        Some(self.tipo.to_string())
    }

    pub(crate) fn filename(&self) -> Option<String> {
        Some(self.source_filename.to_string())
    }
}

/// A per-line state machine for one layout family.
pub trait LineGrammar {
    type State: Default;

    /// Called before the first line of each page.
    fn begin_page(&self, _state: &mut Self::State) {}

    /// Consume `lines[idx]`. The whole page is passed so a grammar can look
    /// at neighbouring lines.
    fn step(
        &self,
        state: &mut Self::State,
        lines: &[String],
        idx: usize,
        ctx: &RowContext<'_>,
    ) -> Step;
}

#[derive(Debug, Default)]
struct StepCounts {
    skipped: usize,
    headers: usize,
    codes: usize,
    continuations: usize,
    rows: usize,
    unmatched: usize,
}

/// Drive a grammar over every line of every page.
pub fn run<G: LineGrammar>(
    grammar: &G,
    pages: &[PageContent],
    ctx: &RowContext<'_>,
) -> Vec<ExtractedRow> {
    let mut state = G::State::default();
    let mut rows = Vec::new();
    let mut counts = StepCounts::default();

    for page in pages {
        grammar.begin_page(&mut state);
        for idx in 0..page.lines.len() {
            match grammar.step(&mut state, &page.lines, idx, ctx) {
                Step::Skipped => counts.skipped += 1,
                Step::Header => counts.headers += 1,
                Step::Code => counts.codes += 1,
                Step::Continuation => counts.continuations += 1,
                Step::Row(row) => {
                    counts.rows += 1;
                    rows.push(row);
                }
                Step::Unmatched => counts.unmatched += 1,
            }
        }
    }

    tracing::debug!(
        layout = ctx.tipo,
        pages = pages.len(),
        skipped = counts.skipped,
        headers = counts.headers,
        codes = counts.codes,
        continuations = counts.continuations,
        rows = counts.rows,
        unmatched = counts.unmatched,
        "grammar finished"
    );

    rows
}

/// Run the extractor registered for `kind` over the document's pages.
pub fn extract_rows(
    kind: LayoutKind,
    pages: &[PageContent],
    context: &ParseContext,
    source_filename: &str,
    code_window: usize,
) -> Vec<ExtractedRow> {
    let ctx = RowContext {
        titular: context.titular.as_deref(),
        periodo_distribuicao: context.periodo_distribuicao.as_deref(),
        source_filename,
        tipo: kind.name(),
        code_window,
    };

    match kind.family() {
        Family::Statement => run(&statement::StatementGrammar, pages, &ctx),
        Family::Authorial => run(&authorial::AuthorialGrammar, pages, &ctx),
        Family::Connected => run(&connected::ConnectedGrammar, pages, &ctx),
    }
}
