//! Identifier validation and allocation

use crate::errors::{CibError, Result};

/// Check that `candidate` is a well-formed XML id
///
/// `description` names the id in the error ("constraint id", "rule id").
///
/// # Errors
///
/// Returns `CibError::InvalidId` when the id is empty, starts with anything
/// but a letter or `_`, or contains characters outside letters, digits,
/// `_`, `-` and `.`.
pub fn validate_xml_id(candidate: &str, description: &str) -> Result<()> {
    let invalid = |reason: String| CibError::InvalidId {
        id: candidate.to_string(),
        description: description.to_string(),
        reason,
    };

    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return Err(invalid(format!("{} cannot be empty", description)));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid(format!(
            "'{}' is not a valid first character for a {}",
            first, description
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(invalid(format!(
            "'{}' is not a valid character for a {}",
            bad, description
        )));
    }
    Ok(())
}

/// First of `base`, `base-1`, `base-2`, ... for which `taken` is false
pub fn find_unique_id(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(validate_xml_id("location-A-node1-INFINITY", "constraint id").is_ok());
        assert!(validate_xml_id("_x.y", "constraint id").is_ok());
    }

    #[test]
    fn test_bad_first_character() {
        let err = validate_xml_id("1abc", "constraint id").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid constraint id '1abc', '1' is not a valid first character for a constraint id"
        );
    }

    #[test]
    fn test_bad_inner_character() {
        let err = validate_xml_id("a b", "rule id").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid rule id 'a b', ' ' is not a valid character for a rule id"
        );
    }

    #[test]
    fn test_empty_id() {
        assert!(matches!(
            validate_xml_id("", "constraint id"),
            Err(CibError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_find_unique_id_counts_up() {
        let taken = ["c", "c-1"];
        assert_eq!(find_unique_id("c", |id| taken.contains(&id)), "c-2");
        assert_eq!(find_unique_id("d", |id| taken.contains(&id)), "d");
    }
}
