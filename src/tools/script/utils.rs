use super::types::RawFieldMap;
use crate::error::{Result, ScrapeError};
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, Globals, SourceMap, SourceMapper, Span, Spanned, GLOBALS};
use swc_core::ecma::ast::{
    AssignExpr, CallExpr, Callee, Expr, KeyValueProp, Lit, PropName, Script, UnaryOp,
};
use swc_core::ecma::parser::{lexer::Lexer, Parser, StringInput, Syntax};
use swc_core::ecma::visit::{Visit, VisitWith};
use tracing::debug;

/// Run `f` with fresh swc globals installed for the current thread.
pub(super) fn with_globals<T>(f: impl FnOnce() -> T) -> T {
    GLOBALS.set(&Globals::new(), f)
}

/// Parse `source` with the script goal and return the tree plus the source
/// map needed to slice node text back out.
pub(super) fn parse_script(source: &str) -> Result<(Script, Lrc<SourceMap>)> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon, source.to_string());

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let script = parser
        .parse_script()
        .map_err(|e| ScrapeError::Script(format!("{:?}", e.kind())))?;

    for diagnostic in parser.take_errors() {
        debug!(error = ?diagnostic.kind(), "recovered script diagnostic");
    }

    Ok((script, cm))
}

/// Collect the fields carried by every `marker(...)` call in `script`.
pub(super) fn collect_marker_fields(
    script: &Script,
    cm: &Lrc<SourceMap>,
    marker: &str,
    multi_valued: &[String],
) -> RawFieldMap {
    let mut finder = MarkerCalls {
        cm,
        marker,
        multi_valued,
        fields: RawFieldMap::new(),
        calls: 0,
    };
    script.visit_with(&mut finder);
    debug!(calls = finder.calls, fields = finder.fields.len(), "marker calls walked");
    finder.fields
}

/// Finds marker calls anywhere in the tree.
struct MarkerCalls<'a> {
    cm: &'a Lrc<SourceMap>,
    marker: &'a str,
    multi_valued: &'a [String],
    fields: RawFieldMap,
    calls: usize,
}

impl MarkerCalls<'_> {
    fn is_marker(&self, callee: &Callee) -> bool {
        match callee {
            Callee::Expr(expr) => matches!(&**expr, Expr::Ident(ident) if &*ident.sym == self.marker),
            _ => false,
        }
    }
}

impl Visit for MarkerCalls<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.is_marker(&call.callee) {
            self.calls += 1;
            let mut fields = CallFields {
                cm: self.cm,
                multi_valued: self.multi_valued,
                fields: RawFieldMap::new(),
            };
            for arg in &call.args {
                arg.visit_with(&mut fields);
            }
            self.fields.merge(fields.fields);
        }
        call.visit_children_with(self);
    }
}

/// Collects `key = value` and `key: value` pairs inside one marker call.
struct CallFields<'a> {
    cm: &'a Lrc<SourceMap>,
    multi_valued: &'a [String],
    fields: RawFieldMap,
}

impl CallFields<'_> {
    fn snippet(&self, span: Span) -> Option<String> {
        self.cm.span_to_snippet(span).ok()
    }

    fn record(&mut self, key: Option<String>, value: String) {
        match key {
            Some(key) if !key.is_empty() => self.fields.insert(key, value, self.multi_valued),
            _ => {}
        }
    }

    /// Source text of a literal or identifier. String literals lose their
    /// delimiters only. Other expressions carry no scalar value.
    fn value_text(&self, expr: &Expr) -> String {
        let literal = match expr {
            Expr::Lit(_) | Expr::Ident(_) => true,
            Expr::Unary(unary) => unary.op == UnaryOp::Minus && matches!(&*unary.arg, Expr::Lit(_)),
            _ => false,
        };
        if !literal {
            return String::new();
        }
        let quoted = matches!(expr, Expr::Lit(Lit::Str(_)));
        self.snippet(expr.span())
            .map(|text| if quoted { unquote(&text).to_string() } else { text })
            .unwrap_or_default()
    }
}

impl Visit for CallFields<'_> {
    fn visit_assign_expr(&mut self, n: &AssignExpr) {
        let key = self.snippet(n.left.span()).filter(|text| is_identifier(text));
        let value = self.value_text(&n.right);
        self.record(key, value);
        n.visit_children_with(self);
    }

    fn visit_key_value_prop(&mut self, n: &KeyValueProp) {
        let key = match &n.key {
            PropName::Ident(_) | PropName::Num(_) => self.snippet(n.key.span()),
            PropName::Str(_) => self.snippet(n.key.span()).map(|text| unquote(&text).to_string()),
            _ => None,
        };
        let value = self.value_text(&n.value);
        self.record(key, value);
        n.visit_children_with(self);
    }
}

/// Drop the one matching pair of delimiters around a string literal.
pub(super) fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => chars.as_str(),
        _ => text,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
