//! Single-pass traversal driving the comparison analyzer.
//!
//! The visitor walks one parsed module top-to-bottom, keeps a lexical scope
//! stack, and hands every `is` / `is not` link of every comparison to the
//! analyzer in source order. Scope state is the only state it carries, and
//! the constant binding tables on the stack are read-only once built.

use ruff_python_ast::{self as ast, Expr, Stmt};
use ruff_text_size::Ranged;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::compare::{ComparisonAnalyzer, ScopeLookup};
use super::constants::{collect_walrus_names, ConstantBindings};
use super::literal::{is_empty_tuple, Classification};
use super::Emit;

/// One enclosing function scope.
struct FunctionFrame {
    /// Names bound inside the function: parameters plus any local binding.
    /// These shadow outer constants and must never resolve through a table.
    shadowed: FxHashSet<String>,
    /// Parameters whose declared default is the literal empty tuple `()`.
    empty_tuple_defaults: FxHashSet<String>,
}

enum ScopeEntry {
    /// A class body with its own constant binding table.
    Class(ConstantBindings),
    Function(FunctionFrame),
}

/// Scope view handed to the analyzer for one comparison.
struct ScopeView<'a> {
    module_table: &'a ConstantBindings,
    stack: &'a [ScopeEntry],
}

impl ScopeLookup for ScopeView<'_> {
    fn resolve_name(&self, name: &str) -> Classification {
        // A binding in any enclosing function shadows module/class constants.
        for entry in self.stack.iter().rev() {
            if let ScopeEntry::Function(frame) = entry {
                if frame.shadowed.contains(name) {
                    return Classification::NotLiteral;
                }
            }
        }
        // Class attributes are visible only to code lexically in the class
        // body itself, not to methods or nested classes.
        if let Some(ScopeEntry::Class(table)) = self.stack.last() {
            if let Classification::Literal(kind) = table.resolve(name) {
                return Classification::Literal(kind);
            }
        }
        self.module_table.resolve(name)
    }

    fn is_empty_tuple_default_param(&self, name: &str) -> bool {
        // The innermost function binding the name decides; an inner shadowing
        // binding hides an outer empty-tuple-default parameter.
        for entry in self.stack.iter().rev() {
            if let ScopeEntry::Function(frame) = entry {
                if frame.shadowed.contains(name) {
                    return frame.empty_tuple_defaults.contains(name);
                }
            }
        }
        false
    }
}

/// Walks a module and reports identity comparisons through an emitter.
pub struct IdentityVisitor<'a> {
    analyzer: &'a ComparisonAnalyzer,
    emitter: &'a mut dyn Emit,
    module_table: ConstantBindings,
    stack: SmallVec<[ScopeEntry; 4]>,
}

impl<'a> IdentityVisitor<'a> {
    /// Builds the module constant table (the ordered pre-pass) and prepares
    /// the traversal.
    pub fn new(
        module_body: &[Stmt],
        analyzer: &'a ComparisonAnalyzer,
        emitter: &'a mut dyn Emit,
    ) -> Self {
        Self {
            analyzer,
            emitter,
            module_table: ConstantBindings::scan(module_body),
            stack: SmallVec::new(),
        }
    }

    /// Visits every statement of the module in source order.
    pub fn visit_module(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => self.visit_function_def(node),
            Stmt::ClassDef(node) => self.visit_class_def(node),
            Stmt::Assign(node) => {
                self.visit_expr(&node.value);
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::AugAssign(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.target);
            }
            Stmt::AnnAssign(node) => {
                self.visit_expr(&node.annotation);
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
                self.visit_expr(&node.target);
            }
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            Stmt::If(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                for clause in &node.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        self.visit_expr(test);
                    }
                    self.visit_body(&clause.body);
                }
            }
            Stmt::For(node) => {
                self.visit_expr(&node.iter);
                self.visit_expr(&node.target);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::While(node) => {
                self.visit_expr(&node.test);
                self.visit_body(&node.body);
                self.visit_body(&node.orelse);
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                    if let Some(vars) = &item.optional_vars {
                        self.visit_expr(vars);
                    }
                }
                self.visit_body(&node.body);
            }
            Stmt::Try(node) => {
                self.visit_body(&node.body);
                for ast::ExceptHandler::ExceptHandler(handler) in &node.handlers {
                    if let Some(type_) = &handler.type_ {
                        self.visit_expr(type_);
                    }
                    self.visit_body(&handler.body);
                }
                self.visit_body(&node.orelse);
                self.visit_body(&node.finalbody);
            }
            Stmt::Match(node) => {
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    self.visit_body(&case.body);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            _ => {}
        }
    }

    fn visit_function_def(&mut self, node: &ast::StmtFunctionDef) {
        for decorator in &node.decorator_list {
            self.visit_expr(&decorator.expression);
        }
        // Defaults and annotations evaluate in the enclosing scope.
        for param in non_variadic_params(&node.parameters) {
            if let Some(annotation) = &param.parameter.annotation {
                self.visit_expr(annotation);
            }
            if let Some(default) = &param.default {
                self.visit_expr(default);
            }
        }
        if let Some(returns) = &node.returns {
            self.visit_expr(returns);
        }

        self.stack
            .push(ScopeEntry::Function(function_frame(&node.parameters, &node.body)));
        self.visit_body(&node.body);
        self.stack.pop();
    }

    fn visit_class_def(&mut self, node: &ast::StmtClassDef) {
        for decorator in &node.decorator_list {
            self.visit_expr(&decorator.expression);
        }
        if let Some(arguments) = &node.arguments {
            for base in &arguments.args {
                self.visit_expr(base);
            }
            for keyword in &arguments.keywords {
                self.visit_expr(&keyword.value);
            }
        }

        self.stack
            .push(ScopeEntry::Class(ConstantBindings::scan(&node.body)));
        self.visit_body(&node.body);
        self.stack.pop();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Compare(node) = expr {
            self.analyze_compare(node);
        }
        self.visit_expr_children(expr);
    }

    /// Analyzes every adjacent `is` / `is not` link of a (possibly chained)
    /// comparison. Each link is anchored at the comparison's own range.
    fn analyze_compare(&mut self, node: &ast::ExprCompare) {
        let mut left: &Expr = &node.left;
        for (op, right) in node.ops.iter().zip(&node.comparators) {
            let diagnoses = {
                let scope = ScopeView {
                    module_table: &self.module_table,
                    stack: &self.stack,
                };
                self.analyzer.analyze(left, *op, right, &scope)
            };
            for diagnosis in diagnoses {
                self.emitter
                    .emit(diagnosis, node.range(), *op, left, right);
            }
            left = right;
        }
    }

    fn visit_expr_children(&mut self, expr: &Expr) {
        match expr {
            Expr::BoolOp(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Named(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.target);
            }
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::Lambda(node) => {
                if let Some(parameters) = &node.parameters {
                    for param in non_variadic_params(parameters) {
                        if let Some(default) = &param.default {
                            self.visit_expr(default);
                        }
                    }
                    self.stack
                        .push(ScopeEntry::Function(lambda_frame(parameters)));
                    self.visit_expr(&node.body);
                    self.stack.pop();
                } else {
                    self.visit_expr(&node.body);
                }
            }
            Expr::If(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Dict(node) => {
                for item in &node.items {
                    if let Some(key) = &item.key {
                        self.visit_expr(key);
                    }
                    self.visit_expr(&item.value);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::ListComp(node) => {
                self.visit_comprehension(&node.generators, &[&node.elt]);
            }
            Expr::SetComp(node) => {
                self.visit_comprehension(&node.generators, &[&node.elt]);
            }
            Expr::DictComp(node) => {
                if let Some(key) = &node.key {
                    self.visit_comprehension(&node.generators, &[key, &node.value]);
                } else {
                    self.visit_comprehension(&node.generators, &[&node.value]);
                }
            }
            Expr::Generator(node) => {
                self.visit_comprehension(&node.generators, &[&node.elt]);
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::Call(node) => {
                self.visit_expr(&node.func);
                for arg in &node.arguments.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.arguments.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::FString(node) => {
                for part in &node.value {
                    if let ast::FStringPart::FString(fstring) = part {
                        for element in &fstring.elements {
                            if let ast::InterpolatedStringElement::Interpolation(interp) = element {
                                self.visit_expr(&interp.expression);
                            }
                        }
                    }
                }
            }
            Expr::Attribute(node) => self.visit_expr(&node.value),
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
            _ => {}
        }
    }

    /// Comprehension targets bind names in the comprehension's own scope and
    /// shadow outer constants, so they get a function-like frame.
    fn visit_comprehension(&mut self, generators: &[ast::Comprehension], elements: &[&Expr]) {
        let mut shadowed = FxHashSet::default();
        for generator in generators {
            collect_target_names(&generator.target, &mut shadowed);
        }
        // The first iterable evaluates in the enclosing scope.
        if let Some(first) = generators.first() {
            self.visit_expr(&first.iter);
        }
        self.stack.push(ScopeEntry::Function(FunctionFrame {
            shadowed,
            empty_tuple_defaults: FxHashSet::default(),
        }));
        for (i, generator) in generators.iter().enumerate() {
            if i > 0 {
                self.visit_expr(&generator.iter);
            }
            for condition in &generator.ifs {
                self.visit_expr(condition);
            }
        }
        for element in elements {
            self.visit_expr(element);
        }
        self.stack.pop();
    }
}

/// Builds the scope frame for a function: all parameter names plus every name
/// the body binds, with the subset of parameters defaulting to `()`.
fn function_frame(parameters: &ast::Parameters, body: &[Stmt]) -> FunctionFrame {
    let mut frame = lambda_frame(parameters);
    let mut body_bound = FxHashSet::default();
    collect_bound_names(body, &mut body_bound);
    // A parameter the body rebinds no longer carries its declared default.
    for name in &body_bound {
        frame.empty_tuple_defaults.remove(name);
    }
    frame.shadowed.extend(body_bound);
    frame
}

/// Positional-only, regular, and keyword-only parameters, in declaration
/// order. Variadic `*args` / `**kwargs` have no defaults and are handled
/// separately.
fn non_variadic_params(
    parameters: &ast::Parameters,
) -> impl Iterator<Item = &ast::ParameterWithDefault> {
    parameters
        .posonlyargs
        .iter()
        .chain(&parameters.args)
        .chain(&parameters.kwonlyargs)
}

fn lambda_frame(parameters: &ast::Parameters) -> FunctionFrame {
    let mut shadowed = FxHashSet::default();
    let mut empty_tuple_defaults = FxHashSet::default();

    for param in non_variadic_params(parameters) {
        let name = param.parameter.name.to_string();
        if let Some(default) = &param.default {
            if is_empty_tuple(default) {
                empty_tuple_defaults.insert(name.clone());
            }
        }
        shadowed.insert(name);
    }
    if let Some(vararg) = &parameters.vararg {
        shadowed.insert(vararg.name.to_string());
    }
    if let Some(kwarg) = &parameters.kwarg {
        shadowed.insert(kwarg.name.to_string());
    }

    FunctionFrame {
        shadowed,
        empty_tuple_defaults,
    }
}

/// Collects every name a statement list binds, without descending into
/// nested function or class bodies (those are separate scopes; their names
/// still bind in this one).
fn collect_bound_names(body: &[Stmt], names: &mut FxHashSet<String>) {
    for stmt in body {
        match stmt {
            Stmt::Assign(node) => {
                collect_walrus_names(&node.value, names);
                for target in &node.targets {
                    collect_target_names(target, names);
                }
            }
            Stmt::AnnAssign(node) => {
                if let Some(value) = &node.value {
                    collect_walrus_names(value, names);
                }
                collect_target_names(&node.target, names);
            }
            Stmt::AugAssign(node) => {
                collect_walrus_names(&node.value, names);
                collect_target_names(&node.target, names);
            }
            Stmt::FunctionDef(node) => {
                names.insert(node.name.to_string());
            }
            Stmt::ClassDef(node) => {
                names.insert(node.name.to_string());
            }
            Stmt::Import(node) => {
                for alias in &node.names {
                    let bound = alias.asname.as_ref().map_or_else(
                        || alias.name.split('.').next().unwrap_or(alias.name.as_str()),
                        ast::Identifier::as_str,
                    );
                    names.insert(bound.to_owned());
                }
            }
            Stmt::ImportFrom(node) => {
                for alias in &node.names {
                    let bound = alias
                        .asname
                        .as_ref()
                        .map_or_else(|| alias.name.as_str(), ast::Identifier::as_str);
                    names.insert(bound.to_owned());
                }
            }
            Stmt::If(node) => {
                collect_walrus_names(&node.test, names);
                collect_bound_names(&node.body, names);
                for clause in &node.elif_else_clauses {
                    if let Some(test) = &clause.test {
                        collect_walrus_names(test, names);
                    }
                    collect_bound_names(&clause.body, names);
                }
            }
            Stmt::For(node) => {
                collect_walrus_names(&node.iter, names);
                collect_target_names(&node.target, names);
                collect_bound_names(&node.body, names);
                collect_bound_names(&node.orelse, names);
            }
            Stmt::While(node) => {
                collect_walrus_names(&node.test, names);
                collect_bound_names(&node.body, names);
                collect_bound_names(&node.orelse, names);
            }
            Stmt::With(node) => {
                for item in &node.items {
                    collect_walrus_names(&item.context_expr, names);
                    if let Some(vars) = &item.optional_vars {
                        collect_target_names(vars, names);
                    }
                }
                collect_bound_names(&node.body, names);
            }
            Stmt::Try(node) => {
                collect_bound_names(&node.body, names);
                for ast::ExceptHandler::ExceptHandler(handler) in &node.handlers {
                    if let Some(name) = &handler.name {
                        names.insert(name.to_string());
                    }
                    collect_bound_names(&handler.body, names);
                }
                collect_bound_names(&node.orelse, names);
                collect_bound_names(&node.finalbody, names);
            }
            Stmt::Match(node) => {
                collect_walrus_names(&node.subject, names);
                for case in &node.cases {
                    collect_pattern_names(&case.pattern, names);
                    if let Some(guard) = &case.guard {
                        collect_walrus_names(guard, names);
                    }
                    collect_bound_names(&case.body, names);
                }
            }
            Stmt::Expr(node) => collect_walrus_names(&node.value, names),
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    collect_walrus_names(value, names);
                }
            }
            Stmt::Assert(node) => {
                collect_walrus_names(&node.test, names);
                if let Some(msg) = &node.msg {
                    collect_walrus_names(msg, names);
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    collect_walrus_names(exc, names);
                }
                if let Some(cause) = &node.cause {
                    collect_walrus_names(cause, names);
                }
            }
            _ => {}
        }
    }
}

/// Names bound by the capture parts of a `match` pattern.
fn collect_pattern_names(pattern: &ast::Pattern, names: &mut FxHashSet<String>) {
    match pattern {
        ast::Pattern::MatchValue(_) | ast::Pattern::MatchSingleton(_) => {}
        ast::Pattern::MatchSequence(node) => {
            for p in &node.patterns {
                collect_pattern_names(p, names);
            }
        }
        ast::Pattern::MatchMapping(node) => {
            for p in &node.patterns {
                collect_pattern_names(p, names);
            }
            if let Some(rest) = &node.rest {
                names.insert(rest.to_string());
            }
        }
        ast::Pattern::MatchClass(node) => {
            for p in &node.arguments.patterns {
                collect_pattern_names(p, names);
            }
            for keyword in &node.arguments.keywords {
                collect_pattern_names(&keyword.pattern, names);
            }
        }
        ast::Pattern::MatchStar(node) => {
            if let Some(name) = &node.name {
                names.insert(name.to_string());
            }
        }
        ast::Pattern::MatchAs(node) => {
            if let Some(inner) = &node.pattern {
                collect_pattern_names(inner, names);
            }
            if let Some(name) = &node.name {
                names.insert(name.to_string());
            }
        }
        ast::Pattern::MatchOr(node) => {
            for p in &node.patterns {
                collect_pattern_names(p, names);
            }
        }
    }
}

fn collect_target_names(target: &Expr, names: &mut FxHashSet<String>) {
    match target {
        Expr::Name(name) => {
            names.insert(name.id.to_string());
        }
        Expr::Tuple(tuple) => {
            for elt in &tuple.elts {
                collect_target_names(elt, names);
            }
        }
        Expr::List(list) => {
            for elt in &list.elts {
                collect_target_names(elt, names);
            }
        }
        Expr::Starred(starred) => collect_target_names(&starred.value, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn frame_of(source: &str) -> FunctionFrame {
        let parsed = ruff_python_parser::parse_module(source).unwrap();
        let module = parsed.into_syntax();
        let Stmt::FunctionDef(def) = &module.body[0] else {
            panic!("expected a function definition");
        };
        function_frame(&def.parameters, &def.body)
    }

    #[test]
    fn untouched_parameter_keeps_its_empty_tuple_default() {
        let frame = frame_of("def f(arg=()):\n    return arg\n");
        assert!(frame.shadowed.contains("arg"));
        assert!(frame.empty_tuple_defaults.contains("arg"));
    }

    #[test]
    fn rebound_parameter_loses_its_empty_tuple_default() {
        let frame = frame_of("def f(arg=()):\n    arg = make()\n    return arg\n");
        assert!(frame.shadowed.contains("arg"));
        assert!(!frame.empty_tuple_defaults.contains("arg"));
    }

    #[test]
    fn bound_names_include_match_captures_and_walrus_targets() {
        let frame = frame_of(
            "def f(x):\n    if (y := x):\n        pass\n    match x:\n        case [a, *b] as c:\n            pass\n    return (z := 1)\n",
        );
        for name in ["y", "a", "b", "c", "z"] {
            assert!(frame.shadowed.contains(name), "{name}");
        }
    }
}
