//! The central decision procedure: given one `is` / `is not` link and its
//! scope context, decide which diagnostic codes fire.
//!
//! This is a pure function over the two operand shapes plus a read-only scope
//! lookup. It never errors: every input yields a (possibly empty) set of
//! diagnoses.

use ruff_python_ast::{CmpOp, Expr};
use smallvec::SmallVec;

use super::literal::{classify, is_empty_tuple, Classification, LiteralKind};
use super::DiagnosticCode;

/// Read-only view of the scope enclosing a comparison.
///
/// Implemented by the traversal; the analyzer itself holds no scope state.
pub trait ScopeLookup {
    /// Resolves a bare name through the constant binding tables, honoring
    /// shadowing by enclosing functions.
    fn resolve_name(&self, name: &str) -> Classification;

    /// Whether `name` refers to a parameter of an enclosing function whose
    /// declared default value is the literal empty tuple `()`.
    fn is_empty_tuple_default_param(&self, name: &str) -> bool;
}

/// Which diagnostic codes the analyzer computes.
///
/// The host passes this at construction instead of the analyzer reading any
/// ambient configuration. Disabling one code never changes the other code's
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSet {
    literal_comparison: bool,
    comparison_of_constants: bool,
}

impl Default for CodeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl CodeSet {
    /// Both codes enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            literal_comparison: true,
            comparison_of_constants: true,
        }
    }

    /// Disables one code, returning the updated set.
    #[must_use]
    pub const fn without(mut self, code: DiagnosticCode) -> Self {
        match code {
            DiagnosticCode::LiteralComparison => self.literal_comparison = false,
            DiagnosticCode::ComparisonOfConstants => self.comparison_of_constants = false,
        }
        self
    }

    /// Whether the given code is enabled.
    #[must_use]
    pub const fn contains(self, code: DiagnosticCode) -> bool {
        match code {
            DiagnosticCode::LiteralComparison => self.literal_comparison,
            DiagnosticCode::ComparisonOfConstants => self.comparison_of_constants,
        }
    }

    /// Whether no code is enabled at all.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.literal_comparison && !self.comparison_of_constants
    }
}

/// One fired diagnostic for a comparison link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnosis {
    /// The diagnostic code that fired.
    pub code: DiagnosticCode,
    /// Whether the left operand classified as a literal (directly or via
    /// constant resolution).
    pub left_is_literal: bool,
    /// Whether the right operand classified as a literal.
    pub right_is_literal: bool,
}

/// At most two diagnoses can fire per comparison link.
pub type Diagnoses = SmallVec<[Diagnosis; 2]>;

/// Stateless decision engine for identity comparisons.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonAnalyzer {
    codes: CodeSet,
}

impl ComparisonAnalyzer {
    /// Creates an analyzer computing the given code set.
    #[must_use]
    pub const fn new(codes: CodeSet) -> Self {
        Self { codes }
    }

    /// Analyzes one `left op right` link.
    ///
    /// Returns an empty set for any operator other than `is` / `is not`.
    pub fn analyze(
        &self,
        left: &Expr,
        op: CmpOp,
        right: &Expr,
        scope: &dyn ScopeLookup,
    ) -> Diagnoses {
        let mut diagnoses = Diagnoses::new();
        if !matches!(op, CmpOp::Is | CmpOp::IsNot) || self.codes.is_empty() {
            return diagnoses;
        }

        // Recognized idiom: a parameter defaulting to the immutable empty
        // tuple, identity-compared against `()` inside its own function.
        // Suppressed outright; this does not generalize to other literals.
        if Self::is_empty_tuple_default_idiom(left, right, scope)
            || Self::is_empty_tuple_default_idiom(right, left, scope)
        {
            return diagnoses;
        }

        let left_syntax = classify(left);
        let right_syntax = classify(right);

        // `literal-comparison` does no inference: only a spelled-out literal
        // makes the comparison fire. Name resolution participates solely in
        // the both-constants check below.
        let fires = Self::fires(left_syntax) || Self::fires(right_syntax);

        let left_class = Self::resolve_operand(left_syntax, left, scope);
        let right_class = Self::resolve_operand(right_syntax, right, scope);

        // Two scalar constants pairing, where a name resolved through the
        // binding tables counts as its literal.
        let both_constants = left_class.is_simple_literal() && right_class.is_simple_literal();

        let left_is_literal = left_class != Classification::NotLiteral;
        let right_is_literal = right_class != Classification::NotLiteral;

        if fires && self.codes.contains(DiagnosticCode::LiteralComparison) {
            diagnoses.push(Diagnosis {
                code: DiagnosticCode::LiteralComparison,
                left_is_literal,
                right_is_literal,
            });
        }

        if both_constants && self.codes.contains(DiagnosticCode::ComparisonOfConstants) {
            diagnoses.push(Diagnosis {
                code: DiagnosticCode::ComparisonOfConstants,
                left_is_literal,
                right_is_literal,
            });
        }

        diagnoses
    }

    fn resolve_operand(
        syntax: Classification,
        expr: &Expr,
        scope: &dyn ScopeLookup,
    ) -> Classification {
        match syntax {
            Classification::NotLiteral => match expr {
                Expr::Name(name) => scope.resolve_name(name.id.as_str()),
                _ => Classification::NotLiteral,
            },
            literal => literal,
        }
    }

    /// Syntactic firing rule. Tuple displays never fire on their own:
    /// `() is (1, 2, 3)` and `() is CONST` are documented non-findings, while
    /// any list, dict or set display (or any scalar literal) on either side
    /// does fire.
    fn fires(syntax: Classification) -> bool {
        match syntax.kind() {
            Some(LiteralKind::Tuple) | None => false,
            Some(_) => true,
        }
    }

    fn is_empty_tuple_default_idiom(
        candidate_name: &Expr,
        other: &Expr,
        scope: &dyn ScopeLookup,
    ) -> bool {
        let Expr::Name(name) = candidate_name else {
            return false;
        };
        is_empty_tuple(other) && scope.is_empty_tuple_default_param(name.id.as_str())
    }
}
