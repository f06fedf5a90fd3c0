//! Form validation rules.
//!
//! The registry and session store accept whatever they are given; these
//! checks run at the form boundary before a payload reaches them. Error
//! messages are the zh-TW strings shown next to the offending field.

use thiserror::Error;

use crate::types::{ConsumableReplacement, CustomerUpdate, Email, NewCustomer, NewPurifier};

/// Minimum password length for new passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single failed form rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("請輸入姓名")]
    NameRequired,
    #[error("請輸入電話")]
    PhoneRequired,
    #[error("電話號碼只能包含數字")]
    PhoneNotNumeric,
    #[error("請輸入地址")]
    AddressRequired,
    /// Optional customer email that is present but malformed.
    #[error("請輸入有效的電子信箱")]
    CustomerEmailInvalid,
    #[error("請輸入電子郵件")]
    EmailRequired,
    #[error("請輸入有效的電子郵件地址")]
    EmailInvalid,
    #[error("請輸入密碼")]
    PasswordRequired,
    #[error("密碼長度必須至少為8個字符")]
    PasswordTooShort,
    #[error("密碼必須包含大寫字母")]
    PasswordMissingUppercase,
    #[error("密碼必須包含小寫字母")]
    PasswordMissingLowercase,
    #[error("密碼必須包含數字")]
    PasswordMissingDigit,
    #[error("庫存數量不能為負數")]
    StockQuantityNegative,
    #[error("庫存數量超出範圍")]
    StockQuantityTooLarge,
    #[error("請輸入水機號碼")]
    SerialNumberRequired,
    #[error("請輸入型號")]
    ModelRequired,
    #[error("請選擇裝機時間")]
    InstallationDateRequired,
    #[error("請輸入裝機人員")]
    InstallerRequired,
    #[error("請選擇更換項目")]
    ReplacementItemsRequired,
    /// A replacement schedule would run past the supported calendar.
    #[error("日期超出範圍")]
    DateOutOfRange,
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::NameRequired => "name",
            Self::PhoneRequired | Self::PhoneNotNumeric => "phone",
            Self::AddressRequired => "address",
            Self::CustomerEmailInvalid | Self::EmailRequired | Self::EmailInvalid => "email",
            Self::PasswordRequired
            | Self::PasswordTooShort
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingLowercase
            | Self::PasswordMissingDigit => "password",
            Self::StockQuantityNegative | Self::StockQuantityTooLarge => "stock_quantity",
            Self::SerialNumberRequired => "serial_number",
            Self::ModelRequired => "model",
            Self::InstallationDateRequired => "installation_date",
            Self::InstallerRequired => "installation_person",
            Self::ReplacementItemsRequired => "items",
            Self::DateOutOfRange => "date",
        }
    }
}

/// Check a login or registration email.
///
/// # Errors
///
/// Returns `EmailRequired` for blank input and `EmailInvalid` when the
/// address does not have a `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !Email::is_well_formed(email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Check the strength of a new password.
///
/// # Errors
///
/// Returns the first failed rule: presence, length, upper case, lower case,
/// then digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    Ok(())
}

/// Check a phone number: digits only, with an optional leading `+`.
///
/// # Errors
///
/// Returns `PhoneRequired` for blank input and `PhoneNotNumeric` otherwise.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if phone.trim().is_empty() {
        return Err(ValidationError::PhoneRequired);
    }
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PhoneNotNumeric);
    }
    Ok(())
}

/// Check the add-customer form.
///
/// # Errors
///
/// Returns every failed rule, in form order.
pub fn validate_new_customer(customer: &NewCustomer) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if customer.name.trim().is_empty() {
        errors.push(ValidationError::NameRequired);
    }
    if let Err(e) = validate_phone(&customer.phone) {
        errors.push(e);
    }
    if customer
        .email
        .as_deref()
        .is_some_and(|e| !e.is_empty() && !Email::is_well_formed(e))
    {
        errors.push(ValidationError::CustomerEmailInvalid);
    }
    if customer.address.trim().is_empty() {
        errors.push(ValidationError::AddressRequired);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check the fields an edit form supplied.
///
/// Required fields may be left out of an update but not blanked.
///
/// # Errors
///
/// Returns every failed rule, in form order.
pub fn validate_customer_update(update: &CustomerUpdate) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        errors.push(ValidationError::NameRequired);
    }
    if let Some(Err(e)) = update.phone.as_deref().map(validate_phone) {
        errors.push(e);
    }
    if update
        .email
        .as_deref()
        .is_some_and(|e| !e.is_empty() && !Email::is_well_formed(e))
    {
        errors.push(ValidationError::CustomerEmailInvalid);
    }
    if update.address.as_deref().is_some_and(|a| a.trim().is_empty()) {
        errors.push(ValidationError::AddressRequired);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check a stock count entered by staff and narrow it to the stored type.
///
/// # Errors
///
/// Returns `StockQuantityNegative` below zero and `StockQuantityTooLarge`
/// above `u32::MAX`.
pub fn validate_stock_quantity(quantity: i64) -> Result<u32, ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::StockQuantityNegative);
    }
    u32::try_from(quantity).map_err(|_| ValidationError::StockQuantityTooLarge)
}

/// Check the add-purifier form. The location is optional.
///
/// # Errors
///
/// Returns every failed rule, in form order.
pub fn validate_new_purifier(purifier: &NewPurifier) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if purifier.serial_number.trim().is_empty() {
        errors.push(ValidationError::SerialNumberRequired);
    }
    if purifier.model.trim().is_empty() {
        errors.push(ValidationError::ModelRequired);
    }
    if purifier.installation_date.is_none() {
        errors.push(ValidationError::InstallationDateRequired);
    }
    if purifier.installation_person.trim().is_empty() {
        errors.push(ValidationError::InstallerRequired);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Check the record-replacement form.
///
/// # Errors
///
/// Returns `ReplacementItemsRequired` when no consumable was picked.
pub fn validate_replacement(replacement: &ConsumableReplacement) -> Result<(), ValidationError> {
    if replacement.items.is_empty() {
        return Err(ValidationError::ReplacementItemsRequired);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Gender;

    fn form() -> NewCustomer {
        NewCustomer {
            name: "李大華".to_string(),
            gender: Gender::Female,
            phone: "0912345678".to_string(),
            address: "新竹市信義區和平路12號".to_string(),
            member_id: None,
            email: None,
            line_id: None,
        }
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(""), Err(ValidationError::EmailRequired));
        assert_eq!(validate_email("nope"), Err(ValidationError::EmailInvalid));
        assert!(validate_email("admin@example.com").is_ok());
    }

    #[test]
    fn test_validate_password_rules_in_order() {
        assert_eq!(validate_password(""), Err(ValidationError::PasswordRequired));
        assert_eq!(
            validate_password("Ab1"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_password("admin1234"),
            Err(ValidationError::PasswordMissingUppercase)
        );
        assert_eq!(
            validate_password("ADMIN1234"),
            Err(ValidationError::PasswordMissingLowercase)
        );
        assert_eq!(
            validate_password("AdminUser"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert!(validate_password("Admin1234").is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+886912345678").is_ok());
        assert_eq!(validate_phone(""), Err(ValidationError::PhoneRequired));
        assert_eq!(
            validate_phone("0912-345-678"),
            Err(ValidationError::PhoneNotNumeric)
        );
        assert_eq!(validate_phone("+"), Err(ValidationError::PhoneNotNumeric));
    }

    #[test]
    fn test_validate_new_customer_collects_all_errors() {
        let mut bad = form();
        bad.name = "  ".to_string();
        bad.phone = "abc".to_string();
        bad.email = Some("broken".to_string());
        bad.address = String::new();

        let errors = validate_new_customer(&bad).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NameRequired,
                ValidationError::PhoneNotNumeric,
                ValidationError::CustomerEmailInvalid,
                ValidationError::AddressRequired,
            ]
        );
    }

    #[test]
    fn test_validate_new_customer_accepts_blank_optional_email() {
        let mut ok = form();
        ok.email = Some(String::new());
        assert!(validate_new_customer(&ok).is_ok());
    }

    #[test]
    fn test_validate_customer_update() {
        assert!(validate_customer_update(&CustomerUpdate::default()).is_ok());

        let update = CustomerUpdate {
            name: Some(String::new()),
            phone: Some("09x".to_string()),
            ..CustomerUpdate::default()
        };
        assert_eq!(
            validate_customer_update(&update).unwrap_err(),
            vec![ValidationError::NameRequired, ValidationError::PhoneNotNumeric]
        );
    }

    #[test]
    fn test_messages_and_fields() {
        assert_eq!(ValidationError::PhoneNotNumeric.to_string(), "電話號碼只能包含數字");
        assert_eq!(ValidationError::PasswordTooShort.field(), "password");
        assert_eq!(ValidationError::CustomerEmailInvalid.field(), "email");
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert_eq!(validate_stock_quantity(0), Ok(0));
        assert_eq!(validate_stock_quantity(12), Ok(12));
        assert_eq!(
            validate_stock_quantity(-1),
            Err(ValidationError::StockQuantityNegative)
        );
        assert_eq!(
            validate_stock_quantity(i64::from(u32::MAX) + 1),
            Err(ValidationError::StockQuantityTooLarge)
        );
        assert_eq!(ValidationError::StockQuantityNegative.to_string(), "庫存數量不能為負數");
    }

    #[test]
    fn test_validate_new_purifier() {
        let errors = validate_new_purifier(&NewPurifier::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::SerialNumberRequired,
                ValidationError::ModelRequired,
                ValidationError::InstallationDateRequired,
                ValidationError::InstallerRequired,
            ]
        );

        let ok = NewPurifier {
            serial_number: "SN-9".to_string(),
            model: "RO-500".to_string(),
            installation_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
            installation_person: "阿明".to_string(),
            location: None,
        };
        assert!(validate_new_purifier(&ok).is_ok());
    }
}
