use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::command::parser::{ParseError, parse_filter};
use crate::command::types::{CompareOp, Expr};
use crate::engine::types::Run;
use crate::shared::time::{TimeParser, TzOffset};

/// Rule applied when the filter text does not mention `contains`:
/// `expression` is and-ed onto whatever the client asked for.
#[derive(Debug, Clone)]
pub struct DefaultExpression {
    pub contains: String,
    pub expression: String,
}

/// Compiles filter text into a `Predicate` for a given store dialect.
#[derive(Debug, Clone)]
pub struct PredicateResolver {
    pub default: DefaultExpression,
    /// Filter entity (`runs`, `experiments`) to store table.
    pub tables: HashMap<String, String>,
    pub tz_offset: TzOffset,
    pub dialect: String,
}

impl PredicateResolver {
    /// Resolver used by the run search: archived runs are hidden unless the
    /// filter talks about them.
    pub fn for_run_search(tz_offset: TzOffset, dialect: impl Into<String>) -> Self {
        let tables = HashMap::from([
            ("runs".to_string(), "runs".to_string()),
            ("experiments".to_string(), "Experiment".to_string()),
        ]);
        Self {
            default: DefaultExpression {
                contains: "run.archived".to_string(),
                expression: "not run.archived".to_string(),
            },
            tables,
            tz_offset,
            dialect: dialect.into(),
        }
    }

    pub fn resolve(&self, text: &str) -> Result<Predicate, ParseError> {
        let text = text.trim();
        let expr = if text.is_empty() {
            parse_filter(&self.default.expression)?
        } else if text.contains(self.default.contains.as_str()) {
            parse_filter(text)?
        } else {
            parse_filter(text)?.and(parse_filter(&self.default.expression)?)
        };
        debug!(target: "run_export::predicate", ?expr, "Resolved filter expression");

        let condition = self.compile(&expr)?;
        Ok(Predicate {
            dialect: self.dialect.clone(),
            condition,
        })
    }

    fn compile(&self, expr: &Expr) -> Result<Arc<dyn RunCondition>, ParseError> {
        match expr {
            Expr::Compare { field, op, value } => {
                let field = self.resolve_field(field)?;
                let literal = self.literal_for(&field, value)?;
                Ok(Arc::new(FieldCondition::new(field, *op, literal)))
            }
            Expr::And(a, b) => Ok(Arc::new(LogicalCondition::new(
                vec![self.compile(a)?, self.compile(b)?],
                LogicalOp::And,
            ))),
            Expr::Or(a, b) => Ok(Arc::new(LogicalCondition::new(
                vec![self.compile(a)?, self.compile(b)?],
                LogicalOp::Or,
            ))),
            Expr::Not(inner) => Ok(Arc::new(LogicalCondition::new(
                vec![self.compile(inner)?],
                LogicalOp::Not,
            ))),
        }
    }

    fn resolve_field(&self, path: &str) -> Result<RunField, ParseError> {
        let mut segments = path.splitn(3, '.');
        let root = segments.next().unwrap_or_default();
        let entity = match root {
            "run" => "runs",
            "experiment" => "experiments",
            other => return Err(ParseError::UnknownEntity(other.to_string())),
        };
        if !self.tables.contains_key(entity) {
            return Err(ParseError::UnknownEntity(root.to_string()));
        }

        let unknown = || ParseError::UnknownField(path.to_string());
        let attr = segments.next().ok_or_else(unknown)?;
        let key = segments.next();

        let field = match (root, attr, key) {
            ("experiment", "name", None) => RunField::Experiment,
            ("run", "id" | "hash", None) => RunField::Id,
            ("run", "name", None) => RunField::Name,
            ("run", "experiment", None) => RunField::Experiment,
            ("run", "archived", None) => RunField::Archived,
            ("run", "active", None) => RunField::Active,
            ("run", "status", None) => RunField::Status,
            ("run", "creation_time", None) => RunField::CreationTime,
            ("run", "end_time", None) => RunField::EndTime,
            ("run", "params", Some(k)) => RunField::Param(k.to_string()),
            ("run", "tags", Some(k)) => RunField::Tag(k.to_string()),
            ("run", "metrics", Some(k)) => RunField::Metric(k.to_string()),
            _ => return Err(unknown()),
        };
        Ok(field)
    }

    fn literal_for(&self, field: &RunField, value: &Value) -> Result<Literal, ParseError> {
        let literal = match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) if field.is_time() => {
                let millis = n
                    .as_i64()
                    .and_then(|i| TimeParser::normalize_integer_epoch_millis(i as i128))
                    .ok_or_else(|| ParseError::InvalidValue(n.to_string()))?;
                Literal::Num(millis as f64)
            }
            Value::Number(n) => Literal::Num(
                n.as_f64()
                    .ok_or_else(|| ParseError::InvalidValue(n.to_string()))?,
            ),
            Value::String(s) if field.is_time() => {
                let millis = TimeParser::parse_str_to_epoch_millis(s, self.tz_offset)
                    .ok_or_else(|| ParseError::InvalidDate(s.clone()))?;
                Literal::Num(millis as f64)
            }
            Value::String(s) => Literal::Str(s.clone()),
            other => return Err(ParseError::InvalidValue(other.to_string())),
        };
        Ok(literal)
    }
}

/// A compiled, composable filter over runs.
#[derive(Debug, Clone)]
pub struct Predicate {
    dialect: String,
    condition: Arc<dyn RunCondition>,
}

impl Predicate {
    /// Predicate accepting every run.
    pub fn all(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            condition: Arc::new(LogicalCondition::new(Vec::new(), LogicalOp::And)),
        }
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn and(self, other: Predicate) -> Self {
        Self {
            dialect: self.dialect,
            condition: Arc::new(LogicalCondition::new(
                vec![self.condition, other.condition],
                LogicalOp::And,
            )),
        }
    }

    /// Evaluates against a run whose experiment has been joined in.
    pub fn matches(&self, run: &Run) -> bool {
        self.condition.evaluate(run)
    }
}

/// Represents a condition that can be evaluated against a single run
pub trait RunCondition: Send + Sync + Debug {
    fn evaluate(&self, run: &Run) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
enum RunField {
    Id,
    Name,
    Experiment,
    Archived,
    Active,
    Status,
    CreationTime,
    EndTime,
    Param(String),
    Tag(String),
    Metric(String),
}

impl RunField {
    fn is_time(&self) -> bool {
        matches!(self, RunField::CreationTime | RunField::EndTime)
    }

    fn extract<'a>(&self, run: &'a Run) -> FieldValue<'a> {
        match self {
            RunField::Id => FieldValue::Str(&run.id),
            RunField::Name => FieldValue::Str(&run.name),
            RunField::Experiment => FieldValue::Str(run.experiment_name()),
            RunField::Archived => FieldValue::Bool(run.is_archived()),
            RunField::Active => FieldValue::Bool(run.is_active()),
            RunField::Status => FieldValue::Str(run.status.as_str()),
            RunField::CreationTime => run
                .start_time
                .map_or(FieldValue::Null, |t| FieldValue::Num(t as f64)),
            RunField::EndTime => run
                .end_time
                .map_or(FieldValue::Null, |t| FieldValue::Num(t as f64)),
            RunField::Param(key) => run.param(key).map_or(FieldValue::Null, FieldValue::Str),
            RunField::Tag(key) => run.tag(key).map_or(FieldValue::Null, FieldValue::Str),
            RunField::Metric(key) => run
                .metric(key)
                .map_or(FieldValue::Null, |m| FieldValue::Num(m.export_value())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldValue<'a> {
    Str(&'a str),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

/// Comparison of one run field against a literal.
///
/// Missing values only satisfy `== None` / `!= None`; any other comparison
/// with a missing value is false.
#[derive(Debug)]
struct FieldCondition {
    field: RunField,
    op: CompareOp,
    literal: Literal,
}

impl FieldCondition {
    fn new(field: RunField, op: CompareOp, literal: Literal) -> Self {
        Self { field, op, literal }
    }

    fn apply(&self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self.op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Neq => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }
}

impl RunCondition for FieldCondition {
    fn evaluate(&self, run: &Run) -> bool {
        let value = self.field.extract(run);
        match (&self.literal, value) {
            (Literal::Null, FieldValue::Null) => self.op == CompareOp::Eq,
            (Literal::Null, _) => self.op == CompareOp::Neq,
            (_, FieldValue::Null) => false,
            (Literal::Str(lit), FieldValue::Str(v)) => self.apply(Some(v.cmp(lit.as_str()))),
            (Literal::Num(lit), FieldValue::Num(v)) => self.apply(v.partial_cmp(lit)),
            // Params and tags are stored as text; numeric literals compare numerically.
            (Literal::Num(lit), FieldValue::Str(v)) => {
                self.apply(v.parse::<f64>().ok().and_then(|n| n.partial_cmp(lit)))
            }
            (Literal::Bool(lit), FieldValue::Bool(v)) => match self.op {
                CompareOp::Eq => v == *lit,
                CompareOp::Neq => v != *lit,
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LogicalOp {
    And,
    Or,
    Not,
}

/// Logical combination of conditions
#[derive(Debug)]
struct LogicalCondition {
    conditions: Vec<Arc<dyn RunCondition>>,
    operation: LogicalOp,
}

impl LogicalCondition {
    fn new(conditions: Vec<Arc<dyn RunCondition>>, operation: LogicalOp) -> Self {
        Self {
            conditions,
            operation,
        }
    }
}

impl RunCondition for LogicalCondition {
    fn evaluate(&self, run: &Run) -> bool {
        match self.operation {
            LogicalOp::And => self.conditions.iter().all(|c| c.evaluate(run)),
            LogicalOp::Or => self.conditions.iter().any(|c| c.evaluate(run)),
            LogicalOp::Not => !self.conditions.iter().any(|c| c.evaluate(run)),
        }
    }
}
