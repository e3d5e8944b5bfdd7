//! Compiles the rule-source format (one JSON object per line) into a frozen
//! [`EngineModel`]. This is the one piece of the original system's rule
//! authoring surface this crate reconstructs, limited to the flat
//! conjunctive shape the matching core actually consumes — no expression
//! language, no macros.
//!
//! ```text
//! {"rule_code": "R1", "conditions": [{"field": "country", "operator": "EQUAL_TO", "value": "US"}]}
//! {"rule_code": "R1", "conditions": [{"field": "country", "operator": "EQUAL_TO", "value": "CA"}]}
//! ```
//!
//! Two lines sharing a `rule_code` express disjunction: the rule matches if
//! either conjunct matches. Lines for the same `rule_code` must be
//! contiguous in the source — this mirrors how the original rule catalog
//! grouped a rule's disjuncts together and makes a malformed source (one
//! that revisits a rule code after moving on) a compile error rather than a
//! silently-accepted reordering.

use crate::error::{CompileError, CompileResult};
use crate::model::{EngineModel, EngineModelBuilder, Operator};
use crate::value::Scalar;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct RuleLine {
    rule_code: String,
    conditions: Vec<ConditionSource>,
}

#[derive(Debug, Deserialize)]
struct ConditionSource {
    field: String,
    operator: String,
    value: serde_json::Value,
}

fn to_scalar(value: &serde_json::Value) -> Option<Scalar> {
    match value {
        serde_json::Value::String(s) => Some(Scalar::from(s.as_str())),
        serde_json::Value::Bool(b) => Some(Scalar::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Scalar::Int64(i))
            } else {
                n.as_f64().map(Scalar::Float64)
            }
        }
        _ => None,
    }
}

/// Parse a rule source (one JSON object per line, blank lines ignored) into
/// a compiled `EngineModel`.
pub fn compile(source: &str) -> CompileResult<EngineModel> {
    let mut builder = EngineModelBuilder::new();
    let mut last_rule_code: Option<String> = None;
    let mut seen_rule_codes: HashSet<String> = HashSet::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let parsed: RuleLine =
            serde_json::from_str(line).map_err(|source| CompileError::InvalidJson {
                line: line_no,
                source,
            })?;

        if parsed.conditions.is_empty() {
            return Err(CompileError::EmptyRule { line: line_no });
        }

        if last_rule_code.as_deref() != Some(parsed.rule_code.as_str())
            && seen_rule_codes.contains(&parsed.rule_code)
        {
            return Err(CompileError::NonContiguousRule {
                rule_code: parsed.rule_code,
            });
        }

        let mut fields_in_rule: HashSet<String> = HashSet::new();
        let mut conditions = Vec::with_capacity(parsed.conditions.len());
        for cond in &parsed.conditions {
            if cond.operator != "EQUAL_TO" {
                return Err(CompileError::UnsupportedOperator {
                    line: line_no,
                    operator: cond.operator.clone(),
                });
            }
            if !fields_in_rule.insert(cond.field.clone()) {
                return Err(CompileError::DuplicateCondition {
                    line: line_no,
                    field: cond.field.clone(),
                });
            }
            let value = to_scalar(&cond.value).ok_or_else(|| CompileError::InvalidOperandValue {
                line: line_no,
                field: cond.field.clone(),
            })?;
            conditions.push((field_name_static(&cond.field), Operator::EqualTo, value));
        }

        builder.add_rule(&parsed.rule_code, conditions);
        seen_rule_codes.insert(parsed.rule_code.clone());
        last_rule_code = Some(parsed.rule_code);
    }

    Ok(builder.build())
}

/// The builder's `add_rule` takes `&'static str` field names as a
/// convenience for the (string-literal-heavy) test suite; the compiler
/// leaks the field name once per distinct string so it can satisfy the
/// same signature. Leaked bytes are bounded by the number of distinct
/// field names in a rule source, which is compiled once at startup.
fn field_name_static(field: &str) -> &'static str {
    Box::leak(field.to_string().into_boxed_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_single_condition_rule() {
        let src = r#"{"rule_code": "R1", "conditions": [{"field": "country", "operator": "EQUAL_TO", "value": "US"}]}"#;
        let model = compile(src).unwrap();
        assert_eq!(model.num_rules(), 1);
        assert_eq!(model.num_predicates(), 1);
    }

    #[test]
    fn disjunction_via_repeated_rule_code() {
        let src = "\
{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"country\", \"operator\": \"EQUAL_TO\", \"value\": \"US\"}]}
{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"country\", \"operator\": \"EQUAL_TO\", \"value\": \"CA\"}]}
";
        let model = compile(src).unwrap();
        assert_eq!(model.num_rules(), 2);
        assert!(model.rules().iter().all(|r| r.rule_code.as_ref() == "R1"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let src = "\n{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"x\", \"operator\": \"EQUAL_TO\", \"value\": 1}]}\n\n";
        let model = compile(src).unwrap();
        assert_eq!(model.num_rules(), 1);
    }

    #[test]
    fn rejects_unsupported_operator() {
        let src = r#"{"rule_code": "R1", "conditions": [{"field": "amount", "operator": "GREATER_THAN", "value": 100}]}"#;
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
    }

    #[test]
    fn rejects_empty_rule() {
        let src = r#"{"rule_code": "R1", "conditions": []}"#;
        assert!(matches!(compile(src), Err(CompileError::EmptyRule { .. })));
    }

    #[test]
    fn rejects_duplicate_field_within_one_rule() {
        let src = r#"{"rule_code": "R1", "conditions": [{"field": "x", "operator": "EQUAL_TO", "value": 1}, {"field": "x", "operator": "EQUAL_TO", "value": 2}]}"#;
        assert!(matches!(
            compile(src),
            Err(CompileError::DuplicateCondition { .. })
        ));
    }

    #[test]
    fn rejects_non_contiguous_rule_code() {
        let src = "\
{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"x\", \"operator\": \"EQUAL_TO\", \"value\": 1}]}
{\"rule_code\": \"R2\", \"conditions\": [{\"field\": \"y\", \"operator\": \"EQUAL_TO\", \"value\": 1}]}
{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"x\", \"operator\": \"EQUAL_TO\", \"value\": 2}]}
";
        assert!(matches!(
            compile(src),
            Err(CompileError::NonContiguousRule { .. })
        ));
    }

    #[test]
    fn deduplicates_identical_predicates_across_rules() {
        let src = "\
{\"rule_code\": \"R1\", \"conditions\": [{\"field\": \"country\", \"operator\": \"EQUAL_TO\", \"value\": \"US\"}, {\"field\": \"plan\", \"operator\": \"EQUAL_TO\", \"value\": \"pro\"}]}
{\"rule_code\": \"R2\", \"conditions\": [{\"field\": \"country\", \"operator\": \"EQUAL_TO\", \"value\": \"US\"}]}
";
        let model = compile(src).unwrap();
        assert_eq!(model.num_predicates(), 2);
    }
}
