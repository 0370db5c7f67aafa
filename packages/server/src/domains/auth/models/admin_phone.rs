use crate::common::PhoneNumber;

/// Check if a phone number should be granted admin privileges
///
/// Admin numbers may be configured in any of the accepted formats; they are
/// compared by canonical form.
pub fn is_admin_phone(phone: &PhoneNumber, admin_phone_numbers: &[String]) -> bool {
    !phone.is_empty()
        && admin_phone_numbers
            .iter()
            .any(|admin| phone.matches(admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_match_ignores_format() {
        let admins = vec!["233542709440".to_string(), "0244 123 456".to_string()];

        assert!(is_admin_phone(&PhoneNumber::parse("0542709440"), &admins));
        assert!(is_admin_phone(&PhoneNumber::parse("+233244123456"), &admins));
        assert!(!is_admin_phone(&PhoneNumber::parse("0201234567"), &admins));
    }

    #[test]
    fn test_empty_phone_is_never_admin() {
        let admins = vec!["".to_string()];
        assert!(!is_admin_phone(&PhoneNumber::parse(""), &admins));
    }

    #[test]
    fn test_no_admins_configured() {
        assert!(!is_admin_phone(&PhoneNumber::parse("0542709440"), &[]));
    }
}
