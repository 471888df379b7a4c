use rust_decimal::Decimal;

use crate::application::error::FieldErrors;

/// Trims `value`, mapping blank strings to `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn clean_change(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(clean)
}

pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "This field may not be blank.");
    }
    trimmed.to_string()
}

pub fn non_negative(errors: &mut FieldErrors, field: &str, value: Option<Decimal>) {
    if let Some(v) = value {
        if v.is_sign_negative() && !v.is_zero() {
            errors.add(field, "Ensure this value is greater than or equal to 0.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_drops_blank_values() {
        assert_eq!(clean(Some("  ".into())), None);
        assert_eq!(clean(Some(" CS101 ".into())), Some("CS101".into()));
        assert_eq!(clean_change(Some(Some(String::new()))), Some(None));
        assert_eq!(clean_change(None), None);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut errors = FieldErrors::new();
        non_negative(&mut errors, "price", Some(Decimal::new(-1, 0)));
        non_negative(&mut errors, "rent", Some(Decimal::ZERO));
        assert!(errors.contains("price"));
        assert!(!errors.contains("rent"));
    }
}
