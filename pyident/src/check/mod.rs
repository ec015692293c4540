//! Detection core for identity comparisons against literal values.
//!
//! Most runtimes do not guarantee that two textually identical literals share
//! a memory identity, so `x is 2` or `"a" is b"a"` is either always false,
//! unstable across runs, or accidentally true through small-integer caching.
//! The checker walks one parsed module at a time and reports two codes:
//!
//! - `literal-comparison`: an `is` / `is not` operand is a literal,
//! - `comparison-of-constants`: both operands are scalar constants.

use std::path::{Path, PathBuf};

use ruff_python_ast::{CmpOp, Expr, Stmt};
use ruff_text_size::{Ranged, TextRange};
use serde::Serialize;

use crate::utils::{get_ignored_lines, LineIndex};

pub mod compare;
pub mod constants;
pub mod literal;
mod visitor;

pub use compare::{CodeSet, ComparisonAnalyzer, Diagnosis, ScopeLookup};
pub use constants::ConstantBindings;
pub use literal::{classify, Classification, LiteralKind};

/// The two diagnostic codes this checker can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCode {
    /// An identity comparison where an operand is a literal.
    LiteralComparison,
    /// An identity comparison between two scalar constants.
    ComparisonOfConstants,
}

impl DiagnosticCode {
    /// Canonical user-facing code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::LiteralComparison => "literal-comparison",
            DiagnosticCode::ComparisonOfConstants => "comparison-of-constants",
        }
    }

    /// Parses a user-supplied code string.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "literal-comparison" => Some(DiagnosticCode::LiteralComparison),
            "comparison-of-constants" => Some(DiagnosticCode::ComparisonOfConstants),
            _ => None,
        }
    }
}

/// The narrow contract through which the analyzer reports findings.
///
/// Called once per fired code, in source order, with the comparison's range
/// and the two operand expressions. Message formatting is the implementor's
/// concern, not the analyzer's.
pub trait Emit {
    /// Reports one fired diagnosis.
    fn emit(
        &mut self,
        diagnosis: Diagnosis,
        range: TextRange,
        op: CmpOp,
        left: &Expr,
        right: &Expr,
    );
}

/// A single reported issue, ready for output.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Code of the rule that triggered the finding.
    pub rule_id: String,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// 1-indexed line number of the comparison.
    pub line: usize,
    /// 0-indexed column of the comparison.
    pub col: usize,
}

/// Result of checking one source file. Parse failures are reported, never
/// raised.
#[derive(Debug, Default)]
pub struct FileReport {
    /// Findings in source order.
    pub findings: Vec<Finding>,
    /// Parser error message, if the file could not be parsed.
    pub parse_error: Option<String>,
}

/// `Emit` implementation that renders findings with source snippets.
struct FindingCollector<'a> {
    source: &'a str,
    file: &'a Path,
    line_index: &'a LineIndex,
    findings: Vec<Finding>,
}

impl FindingCollector<'_> {
    fn snippet(&self, range: TextRange) -> String {
        let text = &self.source[range.start().to_usize()..range.end().to_usize()];
        // Collapse multi-line displays into a single-line summary.
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Emit for FindingCollector<'_> {
    fn emit(
        &mut self,
        diagnosis: Diagnosis,
        range: TextRange,
        op: CmpOp,
        left: &Expr,
        right: &Expr,
    ) {
        let op_text = if op == CmpOp::IsNot { "is not" } else { "is" };
        let left_text = self.snippet(left.range());
        let right_text = self.snippet(right.range());

        let message = match diagnosis.code {
            DiagnosticCode::LiteralComparison => {
                let alternative = if op == CmpOp::IsNot { "!=" } else { "==" };
                format!(
                    "Comparison to a literal: '{left_text} {op_text} {right_text}'; \
                     use '{alternative}' to compare values"
                )
            }
            DiagnosticCode::ComparisonOfConstants => format!(
                "Comparison between constants: '{left_text} {op_text} {right_text}' \
                 has a constant value"
            ),
        };

        self.findings.push(Finding {
            rule_id: diagnosis.code.as_str().to_owned(),
            message,
            file: self.file.to_path_buf(),
            line: self.line_index.line_index(range.start()),
            col: self.line_index.column_index(range.start()),
        });
    }
}

/// Per-file checker. Stateless across files; one instance can be shared by
/// any number of threads checking disjoint files.
#[derive(Debug, Clone, Copy)]
pub struct Checker {
    analyzer: ComparisonAnalyzer,
}

impl Checker {
    /// Creates a checker computing the given code set.
    #[must_use]
    pub const fn new(codes: CodeSet) -> Self {
        Self {
            analyzer: ComparisonAnalyzer::new(codes),
        }
    }

    /// Runs the rule over an already-parsed module body, reporting through
    /// `emitter`. The constant binding table pre-pass happens here.
    pub fn check_module(&self, body: &[Stmt], emitter: &mut dyn Emit) {
        let mut visitor = visitor::IdentityVisitor::new(body, &self.analyzer, emitter);
        visitor.visit_module(body);
    }

    /// Parses and checks one source file.
    ///
    /// Findings on lines carrying a `# pragma: no pyident` comment are
    /// dropped. A parse failure yields a report with no findings and the
    /// parser's message attached.
    #[must_use]
    pub fn check_source(&self, source: &str, file: &Path) -> FileReport {
        match ruff_python_parser::parse_module(source) {
            Ok(parsed) => {
                let module = parsed.into_syntax();
                let line_index = LineIndex::new(source);
                let mut collector = FindingCollector {
                    source,
                    file,
                    line_index: &line_index,
                    findings: Vec::new(),
                };
                self.check_module(&module.body, &mut collector);

                let ignored_lines = get_ignored_lines(source);
                let findings = collector
                    .findings
                    .into_iter()
                    .filter(|finding| !ignored_lines.contains(&finding.line))
                    .collect();
                FileReport {
                    findings,
                    parse_error: None,
                }
            }
            Err(e) => FileReport {
                findings: Vec::new(),
                parse_error: Some(format!("{e}")),
            },
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CodeSet::all())
    }
}
