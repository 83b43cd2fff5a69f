//! Member (borrower) model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L} ]*\p{L}[\p{L} ]*$").expect("valid regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10,12}$").expect("valid regex"));

/// Up to three contact numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phones {
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub phone3: Option<String>,
}

impl Phones {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.phone1, &self.phone2, &self.phone3]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Member record as stored in the members collection (keyed by id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub active: bool,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub program: String,
    #[serde(default)]
    pub phones: Phones,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration request
#[derive(Debug, Clone, Validate)]
pub struct NewMember {
    #[validate(custom(function = "validate_person_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_person_name"))]
    pub last_name: String,
    pub address: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub program: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone1: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone2: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone3: Option<String>,
}

impl From<NewMember> for Member {
    fn from(m: NewMember) -> Self {
        Self {
            active: true,
            first_name: m.first_name,
            last_name: m.last_name,
            address: m.address,
            email: m.email,
            program: m.program,
            phones: Phones {
                phone1: m.phone1,
                phone2: m.phone2,
                phone3: m.phone3,
            },
        }
    }
}

/// Edit request; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Validate)]
pub struct MemberChanges {
    #[validate(custom(function = "validate_person_name"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_person_name"))]
    pub last_name: Option<String>,
    pub address: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub program: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone1: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone2: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone3: Option<String>,
}

impl MemberChanges {
    pub fn apply_to(self, member: &mut Member) {
        if let Some(v) = self.first_name {
            member.first_name = v;
        }
        if let Some(v) = self.last_name {
            member.last_name = v;
        }
        if let Some(v) = self.address {
            member.address = v;
        }
        if let Some(v) = self.email {
            member.email = v;
        }
        if let Some(v) = self.program {
            member.program = v;
        }
        if let Some(v) = self.phone1 {
            member.phones.phone1 = Some(v);
        }
        if let Some(v) = self.phone2 {
            member.phones.phone2 = Some(v);
        }
        if let Some(v) = self.phone3 {
            member.phones.phone3 = Some(v);
        }
    }
}

/// Letters and spaces only, at least one letter
pub fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("person_name");
        err.message = Some("Name must contain only letters and spaces".into());
        Err(err)
    }
}

/// 10 to 12 digits, not all zeros
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) && value.bytes().any(|b| b != b'0') {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone must be 10 to 12 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member() -> NewMember {
        NewMember {
            first_name: "Ana María".into(),
            last_name: "Paz".into(),
            address: "Av. Siempre Viva 742".into(),
            email: "ana@uni.edu".into(),
            program: "Law".into(),
            phone1: Some("1122334455".into()),
            phone2: None,
            phone3: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(new_member().validate().is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_person_name("José Luis").is_ok());
        assert!(validate_person_name("R2D2").is_err());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name("").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("1122334455").is_ok());
        assert!(validate_phone("112233445566").is_ok());
        assert!(validate_phone("112233445").is_err());
        assert!(validate_phone("1122334455667").is_err());
        assert!(validate_phone("11-2233-4455").is_err());
        assert!(validate_phone("0000000000").is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut m = new_member();
        m.email = "not-an-email".into();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_changes_leave_unset_fields() {
        let mut member = Member::from(new_member());
        MemberChanges {
            program: Some("Medicine".into()),
            phone2: Some("1199887766".into()),
            ..Default::default()
        }
        .apply_to(&mut member);
        assert_eq!(member.program, "Medicine");
        assert_eq!(member.first_name, "Ana María");
        assert_eq!(member.phones.phone1.as_deref(), Some("1122334455"));
        assert_eq!(member.phones.phone2.as_deref(), Some("1199887766"));
        assert_eq!(member.full_name(), "Ana María Paz");
    }
}
