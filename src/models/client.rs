//! Client models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::wire;
use crate::pricing::ValidationError;

/// Client as returned by `GET /clients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "wire::lenient_int")]
    pub client_id: u64,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub last_name: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub email_address: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub company_name: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub company_address: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub company_vat_number: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub company_website: String,
}

/// Client create/edit form. Also the body sent to the hotel API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClientForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "required"),
        email(message = "invalid_email")
    )]
    pub email_address: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_vat_number: String,
    #[serde(default)]
    pub company_website: String,
}

impl ClientForm {
    /// First name and a well-formed email are required
    pub fn check(&self) -> Result<(), ValidationError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let fields = errors.field_errors();

        for field in ["first_name", "email_address"] {
            let Some(field_errors) = fields.get(field) else {
                continue;
            };
            if field_errors.iter().any(|e| e.code == "length") {
                return Err(ValidationError::Missing { field });
            }
            return Err(ValidationError::InvalidEmail { field });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(first_name: &str, email: &str) -> ClientForm {
        ClientForm {
            first_name: first_name.to_string(),
            email_address: email.to_string(),
            ..ClientForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(form("Lerato", "lerato@example.co.za").check(), Ok(()));
    }

    #[test]
    fn test_first_name_required() {
        assert_eq!(
            form("", "lerato@example.co.za").check(),
            Err(ValidationError::Missing {
                field: "first_name"
            })
        );
    }

    #[test]
    fn test_email_required() {
        assert_eq!(
            form("Lerato", "").check(),
            Err(ValidationError::Missing {
                field: "email_address"
            })
        );
    }

    #[test]
    fn test_first_name_reported_before_email() {
        assert_eq!(form("", "").check().unwrap_err().field(), "first_name");
    }

    #[test]
    fn test_malformed_email() {
        assert_eq!(
            form("Lerato", "lerato-at-example").check(),
            Err(ValidationError::InvalidEmail {
                field: "email_address"
            })
        );
    }

    #[test]
    fn test_client_tolerates_nulls() {
        let client: Client = serde_json::from_value(json!({
            "client_id": "5",
            "first_name": "Sipho",
            "last_name": "Dlamini",
            "email_address": "sipho@example.com",
            "phone_number": null,
            "company_website": null
        }))
        .unwrap();
        assert_eq!(client.client_id, 5);
        assert_eq!(client.last_name, "Dlamini");
        assert_eq!(client.phone_number, "");
    }
}
