//! Test value generation
//!
//! Values are decimal strings counting up by one from a starting value.

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("'{0}' is not a base-10 integer")]
    NotNumeric(String),

    #[error("incrementing '{0}' overflows a 64-bit integer")]
    Overflow(String),
}

/// Decimal string of `value + 1`
pub fn increment(value: &str) -> Result<String, SequenceError> {
    let n: i64 = value
        .parse()
        .map_err(|_| SequenceError::NotNumeric(value.to_string()))?;

    n.checked_add(1)
        .map(|next| next.to_string())
        .ok_or_else(|| SequenceError::Overflow(value.to_string()))
}

/// Materialize `count` values starting at `start`.
///
/// The first value is always `start` verbatim. Generation stops early,
/// keeping what was produced so far, when a value cannot be incremented.
pub fn generate_sequence(start: &str, count: usize) -> Vec<String> {
    // count is user input; the sequence may stop long before it
    let mut values = Vec::with_capacity(count.min(1024));
    if count == 0 {
        return values;
    }

    values.push(start.to_string());
    while values.len() < count {
        let last = &values[values.len() - 1];
        match increment(last) {
            Ok(next) => values.push(next),
            Err(e) => {
                warn!(
                    "Cannot increment data: {}; generated {} of {} values",
                    e,
                    values.len(),
                    count
                );
                break;
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment() {
        assert_eq!(increment("99"), Ok("100".to_string()));
        assert_eq!(increment("-1"), Ok("0".to_string()));
        assert_eq!(increment("007"), Ok("8".to_string()));
        assert!(matches!(increment("12a"), Err(SequenceError::NotNumeric(_))));
        assert!(matches!(
            increment(&i64::MAX.to_string()),
            Err(SequenceError::Overflow(_))
        ));
    }

    #[test]
    fn test_sequence_counts_up() {
        assert_eq!(generate_sequence("99", 2), vec!["99", "100"]);

        let values = generate_sequence("1234567890123", 100);
        assert_eq!(values.len(), 100);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(value.parse::<i64>().unwrap(), 1234567890123 + i as i64);
        }
    }

    #[test]
    fn test_non_numeric_start_yields_one_value() {
        assert_eq!(generate_sequence("abc", 5), vec!["abc"]);
        assert_eq!(generate_sequence("abc", usize::MAX), vec!["abc"]);
    }

    #[test]
    fn test_overflow_truncates() {
        let start = (i64::MAX - 1).to_string();
        let values = generate_sequence(&start, 5);
        assert_eq!(values, vec![start.clone(), i64::MAX.to_string()]);

        let values = generate_sequence(&start, usize::MAX);
        assert_eq!(values, vec![start, i64::MAX.to_string()]);
    }

    #[test]
    fn test_zero_and_one() {
        assert!(generate_sequence("1", 0).is_empty());
        assert_eq!(generate_sequence("abc", 1), vec!["abc"]);
    }
}
