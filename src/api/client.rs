//! Request Core
//!
//! Base-URL prefixing, bearer-token injection and failure normalization.
//! Every failure mode (fetch throw, non-2xx status, malformed JSON,
//! server-side field errors, missing token) collapses into the uniform
//! envelope, so callers never branch on raw errors.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::form_schema::FormConfig;
use crate::models::Pagination;
use crate::table_schema::{ColumnConfig, ConfigMap, FilterConfig};

/// Connection settings. The bearer token is handed to the client at
/// startup; how it is obtained (HttpOnly cookie exchange) is outside this
/// crate.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
            bearer_token: None,
        }
    }
}

thread_local! {
    static CONFIG: RefCell<ApiConfig> = RefCell::new(ApiConfig::default());
}

/// Install connection settings before the first request
pub fn configure(config: ApiConfig) {
    CONFIG.with(|c| *c.borrow_mut() = config);
}

fn current_config() -> ApiConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Server validation errors arrive as `field -> message` or
/// `field -> [messages]` depending on the endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldErrors {
    One(String),
    Many(Vec<String>),
}

impl FieldErrors {
    pub fn messages(&self) -> Vec<String> {
        match self {
            FieldErrors::One(m) => vec![m.clone()],
            FieldErrors::Many(ms) => ms.clone(),
        }
    }
}

/// Uniform response envelope every endpoint returns
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, FieldErrors>>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub table_columns_config: Option<ConfigMap<ColumnConfig>>,
    #[serde(default)]
    pub filters_config: Option<ConfigMap<FilterConfig>>,
    #[serde(default)]
    pub form_config: Option<FormConfig>,
    /// Set on HTTP 401 so the shell can show a login-required notice
    #[serde(skip)]
    pub unauthorized: bool,
}

impl Envelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Normalize a response body. A non-2xx status or unparseable body
    /// always yields `success: false` with a usable message.
    pub fn from_json_str(status: u16, body: &str) -> Self {
        let ok_status = (200..300).contains(&status);
        let parsed = serde_json::from_str::<Envelope>(body);
        let parse_failed = parsed.is_err();
        let mut envelope = parsed.unwrap_or_default();

        if !ok_status {
            envelope.success = false;
            if envelope.message.is_none() {
                envelope.message = Some(if status == 401 {
                    "Authentication required".to_string()
                } else {
                    format!("Request failed with status {}", status)
                });
            }
        } else if parse_failed {
            envelope.success = false;
            envelope.message = Some("Invalid response from server".to_string());
        }
        if status == 401 {
            envelope.unauthorized = true;
        }
        envelope
    }

    /// Decode `data` into a concrete shape
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, String> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| e.to_string())
    }

    /// User-facing failure text with field errors folded in
    pub fn error_message(&self) -> String {
        let mut msg = self
            .message
            .clone()
            .unwrap_or_else(|| "Request failed".to_string());
        if let Some(errors) = &self.errors {
            let details: Vec<String> = errors
                .iter()
                .flat_map(|(field, errs)| {
                    errs.messages()
                        .into_iter()
                        .map(move |m| format!("{}: {}", field, m))
                })
                .collect();
            if !details.is_empty() {
                msg = format!("{} ({})", msg, details.join("; "));
            }
        }
        msg
    }

    /// Field → messages map for inline form display
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .as_ref()
            .map(|errors| {
                errors
                    .iter()
                    .map(|(field, errs)| (field.clone(), errs.messages()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub async fn get(path: &str) -> Envelope {
    request("GET", path, None).await
}

pub async fn post(path: &str, body: Value) -> Envelope {
    request("POST", path, Some(body)).await
}

pub async fn put(path: &str, body: Value) -> Envelope {
    request("PUT", path, Some(body)).await
}

pub async fn patch(path: &str) -> Envelope {
    request("PATCH", path, None).await
}

pub async fn delete(path: &str) -> Envelope {
    request("DELETE", path, None).await
}

async fn request(method: &str, path: &str, body: Option<Value>) -> Envelope {
    let config = current_config();
    let Some(token) = config.bearer_token else {
        let mut envelope = Envelope::failure("Authentication token missing");
        envelope.unauthorized = true;
        return envelope;
    };

    let url = format!("{}{}", config.base_url, path);
    match send(method, &url, &token, body).await {
        Ok((status, text)) => Envelope::from_json_str(status, &text),
        Err(message) => Envelope::failure(message),
    }
}

async fn send(
    method: &str,
    url: &str,
    token: &str,
    body: Option<Value>,
) -> Result<(u16, String), String> {
    let win = web_sys::window().ok_or("no window")?;

    let headers = Headers::new().map_err(js_error)?;
    headers.set("Accept", "application/json").map_err(js_error)?;
    headers
        .set("Authorization", &format!("Bearer {}", token))
        .map_err(js_error)?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = body {
        headers
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
        init.set_body(&JsValue::from_str(&body.to_string()));
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
    let response = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(|_| "unexpected fetch result")?;

    let status = response.status();
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok((status, text.as_string().unwrap_or_default()))
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| "Network request failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_successful_envelope() {
        let body = r#"{"success":true,"data":[{"id":1}],"pagination":{"current_page":1,"last_page":2,"per_page":10,"total":15,"from":1,"to":10}}"#;
        let env = Envelope::from_json_str(200, body);
        assert!(env.success);
        assert!(!env.unauthorized);
        assert_eq!(env.pagination.unwrap().total, 15);
    }

    #[test]
    fn test_malformed_json_normalized() {
        let env = Envelope::from_json_str(200, "<html>oops</html>");
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("Invalid response from server"));
    }

    #[test]
    fn test_non_2xx_forces_failure() {
        // Body claims success but the status says otherwise
        let env = Envelope::from_json_str(500, r#"{"success":true}"#);
        assert!(!env.success);
        assert_eq!(
            env.message.as_deref(),
            Some("Request failed with status 500")
        );
    }

    #[test]
    fn test_unauthorized_flagged() {
        let env = Envelope::from_json_str(401, "");
        assert!(env.unauthorized);
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("Authentication required"));
    }

    #[test]
    fn test_error_message_merges_field_errors() {
        let body = r#"{"success":false,"message":"Validation failed","errors":{"name":["required"],"slug":"taken"}}"#;
        let env = Envelope::from_json_str(422, body);
        let msg = env.error_message();
        assert!(msg.contains("Validation failed"));
        assert!(msg.contains("name: required"));
        assert!(msg.contains("slug: taken"));

        let inline = env.field_errors();
        assert_eq!(inline.get("name"), Some(&vec!["required".to_string()]));
    }

    #[test]
    fn test_data_as_decodes() {
        let env = Envelope::from_json_str(200, r#"{"success":true,"data":{"id":3,"label":"One Step","slug":"one-step"}}"#);
        let tab: crate::models::ChallengeTab = env.data_as().unwrap();
        assert_eq!(tab.id, 3);
        assert!(env.data_as::<Vec<crate::models::ChallengeTab>>().is_err());
    }
}
