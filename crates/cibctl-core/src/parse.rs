//! Score and `name=value` option parsing shared by the constraint commands

/// Score used when none is given
pub const DEFAULT_SCORE: &str = "INFINITY";

/// Split constraint arguments into a score and `name=value` pairs
///
/// A first token without `=` is the score; otherwise the score defaults to
/// `INFINITY`. Tokens that do not split into exactly two parts on `=` are
/// dropped.
pub fn parse_score_options(tokens: &[String]) -> (String, Vec<(String, String)>) {
    let Some(first) = tokens.first() else {
        return (DEFAULT_SCORE.to_string(), Vec::new());
    };

    let (score, rest) = if first.contains('=') {
        (DEFAULT_SCORE.to_string(), tokens)
    } else {
        (first.clone(), &tokens[1..])
    };

    let pairs = rest
        .iter()
        .filter_map(|token| {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => Some((name.to_string(), value.to_string())),
                _ => None,
            }
        })
        .collect();

    (score, pairs)
}

/// Split `name=value` at the first `=`
pub fn split_option(token: &str) -> Option<(&str, &str)> {
    token.split_once('=')
}

/// Optional sign followed by `INFINITY` or decimal digits
pub fn is_score(value: &str) -> bool {
    let unsigned = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    unsigned == "INFINITY" || (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()))
}

/// A score or a `name=value` option
pub fn is_score_or_opt(value: &str) -> bool {
    is_score(value) || value.contains('=')
}
