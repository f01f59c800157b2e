/// Request validation for drug names, note text and reaction limits
///
/// Drug names: 3 to 60 characters counting any padding, starting with a
/// letter, then ASCII letters, digits, spaces or hyphens ("Vitamin B-12" passes,
/// "123" does not). Field names in errors match the JSON request fields.
use crate::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const DRUG_NAME_MIN_CHARS: usize = 3;
pub const DRUG_NAME_MAX_CHARS: usize = 60;

static DRUG_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 \-]*$").expect("Invalid drug name regex"));

/// Every rule `name` breaks, empty when valid
pub fn drug_name_problems(name: &str) -> Vec<String> {
    if name.trim().is_empty() {
        return vec!["Drug name is required.".to_string()];
    }

    // The name is forwarded as given, so padding counts toward the limit
    let mut problems = Vec::new();
    let length = name.chars().count();
    if !(DRUG_NAME_MIN_CHARS..=DRUG_NAME_MAX_CHARS).contains(&length) {
        problems.push(format!(
            "Drug name must be between {} and {} characters.",
            DRUG_NAME_MIN_CHARS, DRUG_NAME_MAX_CHARS
        ));
    }
    if !DRUG_NAME_PATTERN.is_match(name) {
        problems.push(
            "Drug name must start with a letter and contain only letters, digits, spaces or hyphens."
                .to_string(),
        );
    }
    problems
}

pub fn is_valid_drug_name(name: &str) -> bool {
    drug_name_problems(name).is_empty()
}

/// Both names of a pair, reported as `drugA` / `drugB`
pub fn validate_drug_pair(drug_a: &str, drug_b: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    errors.extend_field("drugA", drug_name_problems(drug_a));
    errors.extend_field("drugB", drug_name_problems(drug_b));
    errors.into_result()
}

/// Pair plus non-blank note text
pub fn validate_note_request(drug_a: &str, drug_b: &str, note: &str) -> Result<(), ValidationError> {
    let mut errors = match validate_drug_pair(drug_a, drug_b) {
        Ok(()) => ValidationError::new(),
        Err(errors) => errors,
    };
    if note.trim().is_empty() {
        errors.add("note", "Note is required.");
    }
    errors.into_result()
}

/// Reaction limit in `1..=max_limit`
pub fn validate_limit(limit: i64, max_limit: usize) -> Result<usize, ValidationError> {
    match usize::try_from(limit) {
        Ok(value) if (1..=max_limit).contains(&value) => Ok(value),
        _ => {
            let mut errors = ValidationError::new();
            errors.add("limit", format!("Limit must be between 1 and {}.", max_limit));
            Err(errors)
        }
    }
}
