// Validation stage: declarative request schemas

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::RequestContext;
use crate::error::ApiError;

/// The email shape accepted on user records: word characters with single
/// dot or hyphen separators, then a domain of the same shape and a 2-3
/// letter TLD. `(?-u)` pins `\w` to ASCII, so accented local parts and
/// internationalized domains do not pass.
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
        .expect("email pattern compiles")
});

pub(crate) const HEX_ID_MESSAGE: &str = "must be a 32-character hex identifier";

/// Shape a declared field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any non-empty JSON string.
    String,
    /// A string matching the email pattern.
    Email,
    /// A 32-character hex identifier.
    HexId,
}

/// One declared field in a schema group.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

/// A route's validation schema: declared rules per field group. Fields not
/// declared here pass through untouched; validation never rewrites input.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub body: &'static [FieldRule],
    pub params: &'static [FieldRule],
    pub query: &'static [FieldRule],
}

/// Value under inspection, either a JSON body field or a text param.
enum FieldValue<'a> {
    Json(&'a Value),
    Text(&'a str),
}

impl Schema {
    /// Check every declared rule, collecting all violations rather than
    /// stopping at the first. Violations are keyed by field path, e.g.
    /// `body.email` or `params.userId`.
    pub fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        let mut violations = HashMap::new();

        check_group(&mut violations, "body", self.body, |name| {
            ctx.body
                .get(name)
                .filter(|v| !v.is_null())
                .map(FieldValue::Json)
        });
        check_group(&mut violations, "params", self.params, |name| {
            ctx.param(name).map(FieldValue::Text)
        });
        check_group(&mut violations, "query", self.query, |name| {
            ctx.query.get(name).map(|v| FieldValue::Text(v.as_str()))
        });

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::warn!(
                schema = self.name,
                violations = violations.len(),
                "request failed validation"
            );
            Err(ApiError::validation_error("Validation failed", violations))
        }
    }
}

fn check_group<'a>(
    violations: &mut HashMap<String, String>,
    group: &str,
    rules: &[FieldRule],
    lookup: impl Fn(&str) -> Option<FieldValue<'a>>,
) {
    for rule in rules {
        let problem = match lookup(rule.name) {
            None if rule.required => Some("is required"),
            None => None,
            Some(value) => check_kind(rule.kind, value),
        };
        if let Some(problem) = problem {
            violations.insert(format!("{group}.{}", rule.name), problem.to_string());
        }
    }
}

fn check_kind(kind: FieldKind, value: FieldValue<'_>) -> Option<&'static str> {
    let text = match value {
        FieldValue::Json(v) => match v.as_str() {
            Some(s) => s,
            None => return Some("must be a string"),
        },
        FieldValue::Text(s) => s,
    };

    match kind {
        FieldKind::String if text.is_empty() => Some("is not allowed to be empty"),
        FieldKind::String => None,
        FieldKind::Email if !EMAIL_PATTERN.is_match(text) => Some("must be a valid email"),
        FieldKind::Email => None,
        FieldKind::HexId if crate::models::user::UserId::parse_str(text).is_err() => {
            Some(HEX_ID_MESSAGE)
        }
        FieldKind::HexId => None,
    }
}
