use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{AppError, AppResult};

use super::client::Endpoint;
use super::validation::{present, split_list};

pub fn contacts_endpoint() -> Endpoint {
    Endpoint::me(["contacts"])
}

pub fn contact_endpoint(id: &str) -> Endpoint {
    contacts_endpoint().join(id)
}

/// Contact properties accepted by create and update. Blank strings count as absent.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ContactFields {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    /// Comma-separated email addresses.
    #[serde(default)]
    pub email_addresses: Option<String>,
    /// Comma-separated business phone numbers.
    #[serde(default)]
    pub business_phones: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub office_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateContactInput {
    #[serde(flatten)]
    pub fields: ContactFields,
    #[serde(default)]
    pub client_request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateContactInput {
    pub contact_id: String,
    #[serde(flatten)]
    pub fields: ContactFields,
    /// Raw Graph contact properties, overridden by any named field above.
    #[serde(default)]
    pub update_data: Option<Map<String, Value>>,
}

/// Copies present fields under their Graph names, expanding comma lists.
pub fn build_contact_payload(fields: &ContactFields) -> Map<String, Value> {
    let mut payload = Map::new();
    let mut put = |key: &str, value: Option<&str>| {
        if let Some(value) = value {
            payload.insert(key.to_string(), json!(value.trim()));
        }
    };

    put("givenName", present(&fields.given_name));
    put("surname", present(&fields.surname));
    put("mobilePhone", present(&fields.mobile_phone));
    put("jobTitle", present(&fields.job_title));
    put("companyName", present(&fields.company_name));
    put("department", present(&fields.department));
    put("officeLocation", present(&fields.office_location));

    if let Some(raw) = present(&fields.email_addresses) {
        let addresses = split_list(raw)
            .into_iter()
            .map(|address| json!({ "address": address }))
            .collect();
        payload.insert("emailAddresses".to_string(), Value::Array(addresses));
    }
    if let Some(raw) = present(&fields.business_phones) {
        payload.insert("businessPhones".to_string(), json!(split_list(raw)));
    }

    payload
}

pub fn create_payload(input: &CreateContactInput) -> AppResult<Value> {
    if present(&input.fields.given_name).is_none() {
        return Err(AppError::invalid("contact given_name is required"));
    }
    Ok(Value::Object(build_contact_payload(&input.fields)))
}

pub fn update_payload(input: &UpdateContactInput) -> AppResult<Value> {
    let mut payload = input.update_data.clone().unwrap_or_default();
    payload.extend(build_contact_payload(&input.fields));

    if payload.is_empty() {
        return Err(AppError::invalid(
            "update data is required but was not provided",
        ));
    }
    Ok(Value::Object(payload))
}
