//! Journal-entry invariants, checked before anything touches storage.

use crate::models::JournalLine;
use brigade_domain::money::Cents;
use brigade_kernel::envelope::ApiError;

/// Validates the double-entry invariants of a set of lines:
/// at least two lines, no line carrying both sides, no zero or negative
/// amounts, and total debits equal to total credits.
///
/// # Errors
/// [`ApiError::Validation`] naming the violated rule.
pub fn validate_lines(lines: &[JournalLine]) -> Result<(), ApiError> {
    if lines.len() < 2 {
        return Err(ApiError::Validation("a journal entry needs at least two lines".to_owned()));
    }

    let mut debits = Cents::ZERO;
    let mut credits = Cents::ZERO;

    for (index, line) in lines.iter().enumerate() {
        if line.debit_cents < Cents::ZERO || line.credit_cents < Cents::ZERO {
            return Err(ApiError::Validation(format!(
                "line {index}: amounts must be positive; flip the side instead"
            )));
        }
        if line.debit_cents > Cents::ZERO && line.credit_cents > Cents::ZERO {
            return Err(ApiError::Validation(format!(
                "line {index}: a line cannot carry both a debit and a credit"
            )));
        }
        if line.debit_cents == Cents::ZERO && line.credit_cents == Cents::ZERO {
            return Err(ApiError::Validation(format!("line {index}: zero-amount line")));
        }

        debits = debits.saturating_add(line.debit_cents);
        credits = credits.saturating_add(line.credit_cents);
    }

    if debits != credits {
        return Err(ApiError::Validation(format!(
            "entry is unbalanced: debits {debits} vs credits {credits}"
        )));
    }

    Ok(())
}
