//! Bounded constant resolution.
//!
//! A `ConstantBindings` table maps a name to the literal kind it is bound to,
//! for exactly one lexical scope (a module body or a class body). The table is
//! built in a single pre-pass before any comparison is analyzed and is
//! read-only afterwards.
//!
//! The table is deliberately conservative. A name qualifies only when its one
//! and only binding in the scope is an unconditional `NAME = <literal>`
//! statement at the top level of that scope. Anything else (rebinding, a
//! binding inside a branch or loop, unpacking, augmented assignment, an
//! `import`, a `def`/`class` of the same name, a `match` capture pattern, an
//! assignment expression) drops the name from the table,
//! so it resolves as `NotLiteral`. Module-level sentinels such as
//! `MISSING = object()` must never be mistaken for literal constants, and
//! conservatism here is what guarantees that.

use ruff_python_ast::{self as ast, Expr, Stmt};
use rustc_hash::{FxHashMap, FxHashSet};

use super::literal::{classify, Classification, LiteralKind};

#[derive(Debug, Clone, Copy)]
enum BindState {
    /// Single unconditional literal binding seen so far.
    Literal(LiteralKind),
    /// Rebinding, non-literal value, or conditional binding: never resolves.
    Poisoned,
}

/// Name-to-literal-kind table for one module or class scope.
#[derive(Debug, Default)]
pub struct ConstantBindings {
    bindings: FxHashMap<String, BindState>,
}

impl ConstantBindings {
    /// Builds the table by scanning the statements of one scope.
    ///
    /// Nested function and class bodies are separate scopes and are not
    /// descended into; only the `def`/`class` name itself counts as a
    /// binding here.
    #[must_use]
    pub fn scan(body: &[Stmt]) -> Self {
        let mut table = Self::default();
        for stmt in body {
            table.record_stmt(stmt, true);
        }
        table
    }

    /// Resolves a name against this scope's table.
    pub fn resolve(&self, name: &str) -> Classification {
        match self.bindings.get(name) {
            Some(BindState::Literal(kind)) => Classification::Literal(*kind),
            Some(BindState::Poisoned) | None => Classification::NotLiteral,
        }
    }

    fn record_stmt(&mut self, stmt: &Stmt, top_level: bool) {
        match stmt {
            Stmt::Assign(node) => {
                self.poison_walrus(&node.value);
                for target in &node.targets {
                    self.record_target(target, &node.value, top_level);
                }
            }
            Stmt::AnnAssign(node) => {
                if let Some(value) = &node.value {
                    self.poison_walrus(value);
                    self.record_target(&node.target, value, top_level);
                }
            }
            Stmt::AugAssign(node) => {
                self.poison_walrus(&node.value);
                self.poison_target(&node.target);
            }
            Stmt::FunctionDef(node) => self.poison(node.name.as_str()),
            Stmt::ClassDef(node) => self.poison(node.name.as_str()),
            Stmt::Import(node) => {
                for alias in &node.names {
                    let bound = alias.asname.as_ref().map_or_else(
                        || alias.name.split('.').next().unwrap_or(alias.name.as_str()),
                        ruff_python_ast::Identifier::as_str,
                    );
                    self.poison(bound);
                }
            }
            Stmt::ImportFrom(node) => {
                for alias in &node.names {
                    let bound = alias
                        .asname
                        .as_ref()
                        .map_or_else(|| alias.name.as_str(), ruff_python_ast::Identifier::as_str);
                    self.poison(bound);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.poison_target(target);
                }
            }
            Stmt::Global(node) => {
                for name in &node.names {
                    self.poison(name.as_str());
                }
            }
            Stmt::Nonlocal(node) => {
                for name in &node.names {
                    self.poison(name.as_str());
                }
            }
            // Bindings under control flow are conditional: poison them.
            Stmt::If(node) => {
                self.poison_walrus(&node.test);
                self.record_body(&node.body);
                for clause in &node.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.poison_walrus(test);
                    }
                    self.record_body(&clause.body);
                }
            }
            Stmt::For(node) => {
                self.poison_walrus(&node.iter);
                self.poison_target(&node.target);
                self.record_body(&node.body);
                self.record_body(&node.orelse);
            }
            Stmt::While(node) => {
                self.poison_walrus(&node.test);
                self.record_body(&node.body);
                self.record_body(&node.orelse);
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.poison_walrus(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.poison_target(vars);
                    }
                }
                // `with` bodies do run unconditionally, but a binding there is
                // not the plain `NAME = <literal>` form this table tracks.
                self.record_body(&node.body);
            }
            Stmt::Try(node) => {
                self.record_body(&node.body);
                for ast::ExceptHandler::ExceptHandler(handler) in &node.handlers {
                    if let Some(name) = &handler.name {
                        self.poison(name.as_str());
                    }
                    self.record_body(&handler.body);
                }
                self.record_body(&node.orelse);
                self.record_body(&node.finalbody);
            }
            Stmt::Match(node) => {
                self.poison_walrus(&node.subject);
                for case in &node.cases {
                    // Capture patterns bind names, conditionally.
                    self.poison_pattern(&case.pattern);
                    if let Some(guard) = &case.guard {
                        self.poison_walrus(guard);
                    }
                    self.record_body(&case.body);
                }
            }
            Stmt::Expr(node) => self.poison_walrus(&node.value),
            Stmt::Assert(node) => {
                self.poison_walrus(&node.test);
                if let Some(msg) = &node.msg {
                    self.poison_walrus(msg);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.poison_walrus(exc);
                }
                if let Some(cause) = &node.cause {
                    self.poison_walrus(cause);
                }
            }
            _ => {}
        }
    }

    fn record_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.record_stmt(stmt, false);
        }
    }

    fn record_target(&mut self, target: &Expr, value: &Expr, top_level: bool) {
        match target {
            Expr::Name(name) => {
                if top_level {
                    self.record_binding(name.id.as_str(), classify(value));
                } else {
                    self.poison(name.id.as_str());
                }
            }
            // Unpacking targets never qualify.
            _ => self.poison_target(target),
        }
    }

    fn record_binding(&mut self, name: &str, classification: Classification) {
        let state = match classification {
            Classification::Literal(kind) => BindState::Literal(kind),
            Classification::NotLiteral => BindState::Poisoned,
        };
        match self.bindings.get_mut(name) {
            // Any second binding makes the name ambiguous.
            Some(existing) => *existing = BindState::Poisoned,
            None => {
                self.bindings.insert(name.to_owned(), state);
            }
        }
    }

    fn poison(&mut self, name: &str) {
        self.bindings.insert(name.to_owned(), BindState::Poisoned);
    }

    fn poison_target(&mut self, target: &Expr) {
        match target {
            Expr::Name(name) => self.poison(name.id.as_str()),
            Expr::Tuple(tuple) => {
                for elt in &tuple.elts {
                    self.poison_target(elt);
                }
            }
            Expr::List(list) => {
                for elt in &list.elts {
                    self.poison_target(elt);
                }
            }
            Expr::Starred(starred) => self.poison_target(&starred.value),
            // Attribute/subscript targets do not bind a bare name.
            _ => {}
        }
    }

    fn poison_pattern(&mut self, pattern: &ast::Pattern) {
        match pattern {
            ast::Pattern::MatchValue(_) | ast::Pattern::MatchSingleton(_) => {}
            ast::Pattern::MatchSequence(node) => {
                for p in &node.patterns {
                    self.poison_pattern(p);
                }
            }
            ast::Pattern::MatchMapping(node) => {
                for p in &node.patterns {
                    self.poison_pattern(p);
                }
                if let Some(rest) = &node.rest {
                    self.poison(rest.as_str());
                }
            }
            ast::Pattern::MatchClass(node) => {
                for p in &node.arguments.patterns {
                    self.poison_pattern(p);
                }
                for keyword in &node.arguments.keywords {
                    self.poison_pattern(&keyword.pattern);
                }
            }
            ast::Pattern::MatchStar(node) => {
                if let Some(name) = &node.name {
                    self.poison(name.as_str());
                }
            }
            ast::Pattern::MatchAs(node) => {
                if let Some(inner) = &node.pattern {
                    self.poison_pattern(inner);
                }
                if let Some(name) = &node.name {
                    self.poison(name.as_str());
                }
            }
            ast::Pattern::MatchOr(node) => {
                for p in &node.patterns {
                    self.poison_pattern(p);
                }
            }
        }
    }

    fn poison_walrus(&mut self, expr: &Expr) {
        let mut names = FxHashSet::default();
        collect_walrus_names(expr, &mut names);
        for name in names {
            self.bindings.insert(name, BindState::Poisoned);
        }
    }
}

/// Collects the names bound by assignment expressions (`:=`) anywhere inside
/// `expr`. Comprehensions are descended into because a walrus there binds in
/// the enclosing scope; lambda bodies are their own scope and are skipped.
pub(super) fn collect_walrus_names(expr: &Expr, names: &mut FxHashSet<String>) {
    match expr {
        Expr::Named(node) => {
            if let Expr::Name(name) = &*node.target {
                names.insert(name.id.to_string());
            }
            collect_walrus_names(&node.value, names);
        }
        Expr::BoolOp(node) => {
            for value in &node.values {
                collect_walrus_names(value, names);
            }
        }
        Expr::BinOp(node) => {
            collect_walrus_names(&node.left, names);
            collect_walrus_names(&node.right, names);
        }
        Expr::UnaryOp(node) => collect_walrus_names(&node.operand, names),
        Expr::If(node) => {
            collect_walrus_names(&node.test, names);
            collect_walrus_names(&node.body, names);
            collect_walrus_names(&node.orelse, names);
        }
        Expr::Dict(node) => {
            for item in &node.items {
                if let Some(key) = &item.key {
                    collect_walrus_names(key, names);
                }
                collect_walrus_names(&item.value, names);
            }
        }
        Expr::Set(node) => {
            for elt in &node.elts {
                collect_walrus_names(elt, names);
            }
        }
        Expr::List(node) => {
            for elt in &node.elts {
                collect_walrus_names(elt, names);
            }
        }
        Expr::Tuple(node) => {
            for elt in &node.elts {
                collect_walrus_names(elt, names);
            }
        }
        Expr::ListComp(node) => {
            collect_walrus_names(&node.elt, names);
            collect_walrus_in_generators(&node.generators, names);
        }
        Expr::SetComp(node) => {
            collect_walrus_names(&node.elt, names);
            collect_walrus_in_generators(&node.generators, names);
        }
        Expr::DictComp(node) => {
            if let Some(key) = &node.key {
                collect_walrus_names(key, names);
            }
            collect_walrus_names(&node.value, names);
            collect_walrus_in_generators(&node.generators, names);
        }
        Expr::Generator(node) => {
            collect_walrus_names(&node.elt, names);
            collect_walrus_in_generators(&node.generators, names);
        }
        Expr::Await(node) => collect_walrus_names(&node.value, names),
        Expr::Yield(node) => {
            if let Some(value) = &node.value {
                collect_walrus_names(value, names);
            }
        }
        Expr::YieldFrom(node) => collect_walrus_names(&node.value, names),
        Expr::Compare(node) => {
            collect_walrus_names(&node.left, names);
            for comparator in &node.comparators {
                collect_walrus_names(comparator, names);
            }
        }
        Expr::Call(node) => {
            collect_walrus_names(&node.func, names);
            for arg in &node.arguments.args {
                collect_walrus_names(arg, names);
            }
            for keyword in &node.arguments.keywords {
                collect_walrus_names(&keyword.value, names);
            }
        }
        Expr::FString(node) => {
            for part in &node.value {
                if let ast::FStringPart::FString(fstring) = part {
                    for element in &fstring.elements {
                        if let ast::InterpolatedStringElement::Interpolation(interp) = element {
                            collect_walrus_names(&interp.expression, names);
                        }
                    }
                }
            }
        }
        Expr::Attribute(node) => collect_walrus_names(&node.value, names),
        Expr::Subscript(node) => {
            collect_walrus_names(&node.value, names);
            collect_walrus_names(&node.slice, names);
        }
        Expr::Starred(node) => collect_walrus_names(&node.value, names),
        Expr::Slice(node) => {
            for bound in [&node.lower, &node.upper, &node.step].into_iter().flatten() {
                collect_walrus_names(bound, names);
            }
        }
        _ => {}
    }
}

fn collect_walrus_in_generators(generators: &[ast::Comprehension], names: &mut FxHashSet<String>) {
    for generator in generators {
        collect_walrus_names(&generator.iter, names);
        for condition in &generator.ifs {
            collect_walrus_names(condition, names);
        }
    }
}
