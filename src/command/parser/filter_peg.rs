use crate::command::parser::error::ParseError;
use crate::command::types::{CompareOp, Expr};
use serde_json::{Number, Value};

peg::parser! {
    grammar run_filter() for str {

        // ==========
        // HELPERS
        // ==========

        rule _() = quiet!{ [' ' | '\t' | '\n' | '\r']* }

        // Case-insensitive keyword matcher
        rule ci(s: &'static str)
            = kw:$(['a'..='z' | 'A'..='Z']+) {? if eq_ci(kw, s) { Ok(()) } else { Err("expected keyword") } }

        // ==========
        // ENTRY POINT
        // ==========

        pub rule filter() -> Expr
            = _ e:expr() _ { e }

        // ==========
        // EXPRESSIONS
        // ==========

        rule expr() -> Expr = or_expr()

        rule or_expr() -> Expr
            = x:and_expr() _ ci("OR") _ y:or_expr() {
                Expr::Or(Box::new(x), Box::new(y))
            }
            / and_expr()

        rule and_expr() -> Expr
            = x:factor() _ ci("AND") _ y:and_expr() {
                Expr::And(Box::new(x), Box::new(y))
            }
            / factor()

        rule factor() -> Expr
            = ci("NOT") _ x:factor() { Expr::Not(Box::new(x)) }
            / "(" _ e:expr() _ ")" { e }
            / comparison()
            / atom()

        rule atom() -> Expr
            = f:field() { Expr::truthy(f) }

        rule comparison() -> Expr
            = f:field() _ op:cmp_op() _ v:value() {
                Expr::Compare { field: f, op, value: v }
            }

        rule cmp_op() -> CompareOp
            = "==" { CompareOp::Eq }
            / "!=" { CompareOp::Neq }
            / ">=" { CompareOp::Gte }
            / "<=" { CompareOp::Lte }
            / "=" { CompareOp::Eq }
            / ">" { CompareOp::Gt }
            / "<" { CompareOp::Lt }

        // ==========
        // TERMINALS
        // ==========

        rule value() -> Value
            = s:string_literal() { Value::String(s.to_string()) }
            / n:number() { n }
            / ci("TRUE") { Value::Bool(true) }
            / ci("FALSE") { Value::Bool(false) }
            / ci("NONE") { Value::Null }
            / ci("NULL") { Value::Null }

        rule field() -> String
            = head:ident() tail:( "." s:ident() { s } )+ {
                let mut path = head.to_string();
                for segment in tail {
                    path.push('.');
                    path.push_str(segment);
                }
                path
            }

        rule ident() -> &'input str
            = quiet!{
                $( ['a'..='z' | 'A'..='Z' | '_']
                   ['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-']* )
            }
            / expected!("identifier")

        rule string_literal() -> &'input str
            = "\"" chars:$((!"\"" [_])*) "\"" { chars }
            / "'" chars:$((!"'" [_])*) "'" { chars }

        rule number() -> Value
            = n:$("-"? ['0'..='9']+ ("." ['0'..='9']+)?) {?
                match n.parse::<i64>() {
                    Ok(i) => Ok(Value::Number(i.into())),
                    Err(_) => n
                        .parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .ok_or("number"),
                }
            }
    }
}

fn eq_ci(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub fn parse_filter(input: &str) -> Result<Expr, ParseError> {
    run_filter::filter(input).map_err(|err| ParseError::Syntax {
        line: err.location.line,
        column: err.location.column,
        expected: err.expected.to_string(),
    })
}
