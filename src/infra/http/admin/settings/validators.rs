//! Validation helpers for the settings form.

use crate::application::admin::FieldError;

pub(super) fn int_in_range(
    value: Option<i64>,
    min: i64,
    max: i64,
    field: &'static str,
) -> Result<i64, FieldError> {
    let Some(value) = value else {
        return Err(FieldError::required(field));
    };
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::new(
            field,
            format!("Must be between {min} and {max}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusively() {
        assert_eq!(int_in_range(Some(1), 1, 30, "n").unwrap(), 1);
        assert_eq!(int_in_range(Some(30), 1, 30, "n").unwrap(), 30);
    }

    #[test]
    fn rejects_out_of_range_and_missing() {
        assert!(int_in_range(Some(0), 1, 30, "n").is_err());
        assert!(int_in_range(Some(31), 1, 30, "n").is_err());
        assert!(int_in_range(None, 1, 30, "n").is_err());
    }
}
