//! Rule renderers: indented detail listing and one-line expression text

use crate::model::{DateExpression, DateParts, Expression, Rule, RuleChild};

/// Multi-line listing used by `location show` and duplicate reports
///
/// Every line is prefixed with `indent`; nested content adds two spaces.
pub fn render_detailed(rule: &Rule, show_ids: bool, indent: &str) -> Vec<String> {
    detailed_rule(rule, show_ids)
        .into_iter()
        .map(|line| format!("{}{}", indent, line))
        .collect()
}

fn detailed_rule(rule: &Rule, show_ids: bool) -> Vec<String> {
    let mut header = vec!["Rule:".to_string()];
    header.extend(sorted_pairs(&rule.attributes()));
    if show_ids {
        header.push(format!("(id:{})", rule.id));
    }
    let mut lines = vec![header.join(" ")];

    for child in &rule.children {
        let nested = match child {
            RuleChild::Expression(expr) => vec![detailed_expression(expr, show_ids)],
            RuleChild::Date(date) => detailed_date(date, show_ids),
            RuleChild::Rule(inner) => detailed_rule(inner, show_ids),
            RuleChild::Other(_) => Vec::new(),
        };
        lines.extend(nested.into_iter().map(|line| format!("  {}", line)));
    }
    lines
}

fn detailed_expression(expr: &Expression, show_ids: bool) -> String {
    let mut parts = vec!["Expression:".to_string()];
    parts.extend(expression_words(expr, false));
    if show_ids {
        parts.push(format!("(id:{})", expr.id));
    }
    parts.join(" ")
}

fn detailed_date(date: &DateExpression, show_ids: bool) -> Vec<String> {
    let id_suffix = |parts: &mut Vec<String>, id: &str| {
        if show_ids {
            parts.push(format!("(id:{})", id));
        }
    };

    if date.operation.as_deref() == Some("date_spec") {
        let mut head = vec!["Expression:".to_string()];
        id_suffix(&mut head, &date.id);
        let mut lines = vec![head.join(" ")];
        if let Some(spec) = &date.date_spec {
            let mut parts = vec!["Date Spec:".to_string()];
            parts.extend(spec.fields.to_sorted_pairs());
            id_suffix(&mut parts, &spec.id);
            lines.push(format!("  {}", parts.join(" ")));
        }
        return lines;
    }

    let mut head = vec!["Expression:".to_string()];
    head.extend(date_words(date));
    if date.duration.is_some() {
        head.push("duration".to_string());
    }
    id_suffix(&mut head, &date.id);
    let mut lines = vec![head.join(" ")];
    if let Some(duration) = &date.duration {
        let mut parts = vec!["Duration:".to_string()];
        parts.extend(duration.fields.to_sorted_pairs());
        id_suffix(&mut parts, &duration.id);
        lines.push(format!("  {}", parts.join(" ")));
    }
    lines
}

/// One-line expression text
///
/// With `normalize`, parts joined by the same operator are sorted, missing
/// value types become `string` and integer values are canonicalized, so
/// equivalent rules render identically.
pub fn render_expression(rule: &Rule, normalize: bool) -> String {
    let op = rule.boolean_op.as_deref().unwrap_or("or");
    let mut parts: Vec<String> = rule
        .children
        .iter()
        .filter_map(|child| match child {
            RuleChild::Expression(expr) => Some(expression_words(expr, normalize).join(" ")),
            RuleChild::Date(date) => Some(date_expression_text(date, normalize)),
            RuleChild::Rule(inner) => Some(format!("({})", render_expression(inner, normalize))),
            RuleChild::Other(_) => None,
        })
        .collect();
    if normalize {
        parts.sort();
    }
    parts.join(&format!(" {} ", op))
}

fn expression_words(expr: &Expression, normalize: bool) -> Vec<String> {
    let attribute = expr.attribute.clone().unwrap_or_default();
    let operation = expr.operation.clone().unwrap_or_default();
    let Some(value) = &expr.value else {
        return vec![operation, attribute];
    };

    let mut words = vec![attribute, operation];
    match expr.value_type.as_deref() {
        Some(kind) => words.push(kind.to_string()),
        None if normalize => words.push("string".to_string()),
        None => {}
    }
    let mut value = value.clone();
    if normalize && expr.value_type.as_deref() == Some("integer") {
        if let Ok(number) = value.parse::<i64>() {
            value = number.to_string();
        }
    }
    if value.contains(' ') {
        value = format!("\"{}\"", value);
    }
    words.push(value);
    words
}

fn date_words(date: &DateExpression) -> Vec<String> {
    let operation = date.operation.clone().unwrap_or_default();
    let mut words = vec!["date".to_string(), operation.clone()];
    if operation == "in_range" {
        if let Some(start) = &date.start {
            words.push(start.clone());
        }
        words.push("to".to_string());
    } else if let Some(start) = &date.start {
        words.push(start.clone());
    }
    if let Some(end) = &date.end {
        words.push(end.clone());
    }
    words
}

fn date_expression_text(date: &DateExpression, normalize: bool) -> String {
    let fields = |parts: &DateParts| {
        let mut pairs = parts.fields.to_sorted_pairs();
        if normalize {
            pairs.sort();
        }
        pairs
    };

    if date.operation.as_deref() == Some("date_spec") {
        let mut words = vec!["date-spec".to_string()];
        if let Some(spec) = &date.date_spec {
            words.extend(fields(spec));
        }
        return words.join(" ");
    }

    let mut words = date_words(date);
    if let Some(duration) = &date.duration {
        words.push("duration".to_string());
        words.extend(fields(duration));
    }
    words.join(" ")
}

fn sorted_pairs(attributes: &[(String, String)]) -> Vec<String> {
    let mut pairs: Vec<&(String, String)> =
        attributes.iter().filter(|(name, _)| name != "id").collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect()
}
