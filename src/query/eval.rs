//! Evaluation of path expressions against a `serde_json::Value` tree.

use serde_json::Value;

use crate::query::error::{QueryError, QueryResult};
use crate::query::{Literal, PathExpr, Predicate, Step};

/// Evaluate a path expression against a data tree.
///
/// Matches are returned in document order: mapping values in key-insertion
/// order, sequence elements in sequence order. Missing keys and
/// out-of-range indices match nothing; applying a step to a node it cannot
/// descend into is an error.
///
/// # Errors
/// Returns a [`QueryError`] when a step, predicate, or projection is
/// structurally incompatible with the nodes it reaches.
pub fn execute(root: &Value, expr: &PathExpr) -> QueryResult<Vec<Value>> {
    let mut current: Vec<&Value> = vec![root];

    for step in &expr.steps {
        let mut next = Vec::new();
        for node in current {
            apply_step(node, step, &mut next)?;
        }
        current = next;
    }

    if let Some(predicate) = &expr.predicate {
        let mut kept = Vec::new();
        for node in current {
            let Value::Object(record) = node else {
                return Err(QueryError::PredicateOnScalar {
                    field: predicate.first_field().to_string(),
                });
            };
            if matches(record, predicate) {
                kept.push(node);
            }
        }
        current = kept;
    }

    if let Some(field) = &expr.select {
        let mut projected = Vec::new();
        for node in current {
            match node {
                Value::Object(record) => {
                    // a record without the projected field simply contributes nothing
                    if let Some(value) = record.get(field) {
                        projected.push(value.clone());
                    }
                }
                other => {
                    return Err(QueryError::TypeMismatch {
                        step: format!("select '{field}'"),
                        kind: kind_of(other),
                    });
                }
            }
        }
        return Ok(projected);
    }

    Ok(current.into_iter().cloned().collect())
}

/// Apply a single step to a node, pushing every resulting node onto `out`.
fn apply_step<'a>(node: &'a Value, step: &Step, out: &mut Vec<&'a Value>) -> QueryResult<()> {
    match step {
        Step::Key(name) => match node {
            Value::Object(map) => {
                if let Some(value) = map.get(name) {
                    out.push(value);
                }
            }
            other => {
                return Err(QueryError::TypeMismatch {
                    step: format!("key '{name}'"),
                    kind: kind_of(other),
                });
            }
        },

        Step::Index(index) => match node {
            Value::Array(items) => {
                if let Some(value) = items.get(*index) {
                    out.push(value);
                }
            }
            other => {
                return Err(QueryError::IndexOnNonSequence {
                    index: *index,
                    kind: kind_of(other),
                });
            }
        },

        Step::Any => match node {
            Value::Object(map) => out.extend(map.values()),
            Value::Array(items) => out.extend(items.iter()),
            other => {
                return Err(QueryError::TypeMismatch {
                    step: "any".to_string(),
                    kind: kind_of(other),
                });
            }
        },

        Step::Values(name) => match node {
            Value::Object(map) => match map.get(name) {
                Some(Value::Array(items)) => out.extend(items.iter()),
                Some(Value::Object(inner)) => out.extend(inner.values()),
                Some(other) => {
                    return Err(QueryError::TypeMismatch {
                        step: format!("values '{name}'"),
                        kind: kind_of(other),
                    });
                }
                None => {}
            },
            other => {
                return Err(QueryError::TypeMismatch {
                    step: format!("values '{name}'"),
                    kind: kind_of(other),
                });
            }
        },
    }
    Ok(())
}

/// Evaluate a predicate against a record-shaped node.
fn matches(record: &serde_json::Map<String, Value>, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Eq(field, literal) => literal_eq(record.get(field), literal),
        Predicate::NotEq(field, literal) => !literal_eq(record.get(field), literal),
        Predicate::Gt(field, literal) => compare(record.get(field), literal, |o| o > 0.0),
        Predicate::GtEq(field, literal) => compare(record.get(field), literal, |o| o >= 0.0),
        Predicate::Lt(field, literal) => compare(record.get(field), literal, |o| o < 0.0),
        Predicate::LtEq(field, literal) => compare(record.get(field), literal, |o| o <= 0.0),
        Predicate::Has(field) => matches!(record.get(field), Some(v) if !v.is_null()),
        Predicate::And(predicates) => predicates.iter().all(|p| matches(record, p)),
        Predicate::Or(predicates) => predicates.iter().any(|p| matches(record, p)),
        Predicate::Not(predicate) => !matches(record, predicate),
    }
}

/// Equality between a field value and a literal. A missing field is
/// treated as null, so `Eq(field, Null)` matches records without the field.
fn literal_eq(value: Option<&Value>, literal: &Literal) -> bool {
    match (value, literal) {
        (None | Some(Value::Null), Literal::Null) => true,
        (Some(Value::Bool(b)), Literal::Bool(l)) => b == l,
        (Some(Value::String(s)), Literal::Str(l)) => s == l,
        (Some(Value::Number(n)), Literal::Int(l)) => n.as_f64() == Some(*l as f64),
        (Some(Value::Number(n)), Literal::Float(l)) => n.as_f64() == Some(*l),
        _ => false,
    }
}

/// Numeric ordering comparison; non-numeric operands never match.
fn compare(value: Option<&Value>, literal: &Literal, accept: impl Fn(f64) -> bool) -> bool {
    let Some(lhs) = value.and_then(Value::as_f64) else {
        return false;
    };
    let rhs = match literal {
        Literal::Int(l) => *l as f64,
        Literal::Float(l) => *l,
        _ => return false,
    };
    accept(lhs - rhs)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

impl Predicate {
    /// First field name this predicate refers to, for diagnostics.
    fn first_field(&self) -> &str {
        match self {
            Self::Eq(field, _)
            | Self::NotEq(field, _)
            | Self::Gt(field, _)
            | Self::GtEq(field, _)
            | Self::Lt(field, _)
            | Self::LtEq(field, _)
            | Self::Has(field) => field,
            Self::And(predicates) | Self::Or(predicates) => {
                predicates.first().map_or("", |p| p.first_field())
            }
            Self::Not(predicate) => predicate.first_field(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_steps_descend_mappings() {
        let tree = json!({"a": {"b": 7}});
        let expr = PathExpr::new().key("a").key("b");
        assert_eq!(execute(&tree, &expr).unwrap(), vec![json!(7)]);
    }

    #[test]
    fn missing_key_matches_nothing() {
        let tree = json!({"a": 1});
        let expr = PathExpr::new().key("b");
        assert!(execute(&tree, &expr).unwrap().is_empty());
    }

    #[test]
    fn any_walks_sequences_and_mappings() {
        let tree = json!({"xs": [1, 2], "ys": [3]});
        let expr = PathExpr::new().any().any();
        assert_eq!(
            execute(&tree, &expr).unwrap(),
            vec![json!(1), json!(2), json!(3)]
        );
    }

    #[test]
    fn key_into_scalar_is_an_error() {
        let tree = json!({"a": 1});
        let expr = PathExpr::new().key("a").key("b");
        assert!(matches!(
            execute(&tree, &expr),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn predicate_and_projection() {
        let tree = json!({"recs": [
            {"name": "w", "value": 70.0},
            {"name": "w", "value": 80.0},
        ]});
        let expr = PathExpr::new()
            .values("recs")
            .filter(gt_pred())
            .select("value");
        assert_eq!(execute(&tree, &expr).unwrap(), vec![json!(80.0)]);
    }

    fn gt_pred() -> Predicate {
        Predicate::Gt("value".to_string(), Literal::Float(72.0))
    }

    #[test]
    fn null_literal_matches_missing_field() {
        let tree = json!([{"a": 1}, {"b": 2}]);
        let expr = PathExpr::new()
            .any()
            .filter(Predicate::Eq("a".to_string(), Literal::Null));
        assert_eq!(execute(&tree, &expr).unwrap(), vec![json!({"b": 2})]);
    }
}
