//! Customer records and the payloads that create and modify them.

use serde::{Deserialize, Serialize};

use super::id::CustomerId;

/// Customer gender as picked in the add-customer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "男")]
    Male,
    #[serde(alias = "女")]
    Female,
    #[serde(alias = "其他")]
    Other,
}

impl Gender {
    /// Label shown in the customer table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
            Self::Other => "其他",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Registry-assigned identifier.
    pub id: CustomerId,
    pub name: String,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    /// Membership number, e.g. `M1234`. `None` for non-members.
    pub member_id: Option<String>,
    pub email: Option<String>,
    /// LINE messenger ID.
    pub line_id: Option<String>,
}

impl Customer {
    /// Build a stored record from a create payload and its assigned ID.
    ///
    /// Empty optional fields are stored as `None`.
    #[must_use]
    pub fn from_new(id: CustomerId, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            gender: new.gender,
            phone: new.phone,
            address: new.address,
            member_id: non_empty(new.member_id),
            email: non_empty(new.email),
            line_id: non_empty(new.line_id),
        }
    }

    /// Returns true if the customer holds a membership number.
    #[must_use]
    pub const fn is_member(&self) -> bool {
        self.member_id.is_some()
    }

    /// Merge the supplied fields of `update` into this record.
    ///
    /// Fields left as `None` in the update are untouched. For the optional
    /// text fields an empty string clears the stored value.
    pub fn apply(&mut self, update: CustomerUpdate) {
        let CustomerUpdate {
            name,
            gender,
            phone,
            address,
            member_id,
            email,
            line_id,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(gender) = gender {
            self.gender = gender;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(member_id) = member_id {
            self.member_id = non_empty(Some(member_id));
        }
        if let Some(email) = email {
            self.email = non_empty(Some(email));
        }
        if let Some(line_id) = line_id {
            self.line_id = non_empty(Some(line_id));
        }
    }
}

/// Payload for adding a customer. The registry assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub gender: Gender,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub line_id: Option<String>,
}

/// Partial update for a customer. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub member_id: Option<String>,
    pub email: Option<String>,
    pub line_id: Option<String>,
}

impl CustomerUpdate {
    /// Returns true if the update would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.member_id.is_none()
            && self.email.is_none()
            && self.line_id.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_customer() -> NewCustomer {
        NewCustomer {
            name: "王小明".to_string(),
            gender: Gender::Male,
            phone: "0912345678".to_string(),
            address: "台北市中正區中正路1號".to_string(),
            member_id: Some(String::new()),
            email: Some("user1@example.com".to_string()),
            line_id: None,
        }
    }

    #[test]
    fn test_from_new_drops_empty_optionals() {
        let customer = Customer::from_new(CustomerId::new(1), new_customer());
        assert_eq!(customer.member_id, None);
        assert!(!customer.is_member());
        assert_eq!(customer.email.as_deref(), Some("user1@example.com"));
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut customer = Customer::from_new(CustomerId::new(1), new_customer());
        let before = customer.clone();

        customer.apply(CustomerUpdate {
            phone: Some("0987654321".to_string()),
            ..CustomerUpdate::default()
        });

        assert_eq!(customer.phone, "0987654321");
        assert_eq!(
            Customer {
                phone: before.phone.clone(),
                ..customer
            },
            before
        );
    }

    #[test]
    fn test_apply_empty_string_clears_optional_field() {
        let mut customer = Customer::from_new(CustomerId::new(1), new_customer());
        customer.apply(CustomerUpdate {
            email: Some(String::new()),
            member_id: Some("M1234".to_string()),
            ..CustomerUpdate::default()
        });
        assert_eq!(customer.email, None);
        assert_eq!(customer.member_id.as_deref(), Some("M1234"));
    }

    #[test]
    fn test_gender_accepts_chinese_labels() {
        let g: Gender = serde_json::from_str("\"女\"").unwrap();
        assert_eq!(g, Gender::Female);
        assert_eq!(serde_json::to_string(&g).unwrap(), "\"female\"");
        assert_eq!(Gender::Male.to_string(), "男");
    }

    #[test]
    fn test_new_customer_optional_fields_default() {
        let new: NewCustomer = serde_json::from_str(
            r#"{"name":"A","gender":"male","phone":"0911","address":"X"}"#,
        )
        .unwrap();
        assert_eq!(new.member_id, None);
        assert_eq!(new.email, None);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(CustomerUpdate::default().is_empty());
        let update: CustomerUpdate = serde_json::from_str(r#"{"name":"B"}"#).unwrap();
        assert!(!update.is_empty());
    }
}
