//! Input normalisation shared by the domain services.

use crate::domain::StoreError;

/// Trim `value`, rejecting it when nothing is left.
pub(crate) fn required(value: &str, reason: &'static str) -> Result<String, StoreError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(reason));
    }

    Ok(trimmed.to_string())
}

/// Trim and check an email address against a practical `local@domain.tld` grammar.
pub(crate) fn email(value: &str) -> Result<String, StoreError> {
    let email = required(value, "email is required")?;

    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(StoreError::InvalidInput("email is not a valid address"))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.len() > 255 {
        return false;
    }

    let local_ok = local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c))
    });

    let labels: Vec<&str> = domain.split('.').collect();

    let domain_ok = labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    local_ok && domain_ok
}
