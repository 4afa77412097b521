//! Upstream response bodies and the shared error policy applied to them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WechatError};

/// `GET /token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// `GET /ticket/getticket`
#[derive(Debug, Clone, Deserialize)]
pub struct TicketResponse {
    pub ticket: String,
    pub expires_in: u64,
}

/// `GET /sns/jscode2session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code2Session {
    pub openid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unionid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

/// `GET /sns/oauth2/access_token`
///
/// A user-scoped token; unrelated to the application access token and
/// never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccessToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: String,
    pub openid: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unionid: Option<String>,
    /// Fields the platform adds over time are kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Applies the credential endpoints' error policy to a raw body.
///
/// An empty or non-JSON body is an empty response; a non-zero `errcode`
/// fails with the serialized body attached. `errcode: 0` is success.
pub fn check_body(endpoint: &'static str, body: &str) -> Result<Value> {
    let value: Value = match serde_json::from_str(body.trim()) {
        Ok(Value::Null) | Err(_) => return Err(WechatError::EmptyResponse { endpoint }),
        Ok(value) => value,
    };
    if has_error_code(&value) {
        return Err(WechatError::ErrorCode { endpoint, body: value.to_string() });
    }
    Ok(value)
}

/// [`check_body`] followed by decoding into the endpoint's DTO.
pub fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T> {
    let value = check_body(endpoint, body)?;
    let rendered = value.to_string();
    serde_json::from_value(value).map_err(|_| WechatError::MalformedResponse { endpoint, body: rendered })
}

fn has_error_code(value: &Value) -> bool {
    match value.get("errcode") {
        None | Some(Value::Null) => false,
        Some(Value::Number(code)) => code.as_i64() != Some(0),
        Some(Value::String(code)) => !code.is_empty() && code != "0",
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_and_unparsable_bodies_are_empty_responses() {
        for body in ["", "   ", "null", "<html>bad gateway</html>"] {
            let err = check_body("token", body).unwrap_err();
            assert!(matches!(err, WechatError::EmptyResponse { endpoint: "token" }), "{body}");
        }
    }

    #[test]
    fn error_code_carries_serialized_body() {
        let body = json!({"errcode": 40001, "errmsg": "invalid credential"}).to_string();
        let err = check_body("token", &body).unwrap_err();
        match &err {
            WechatError::ErrorCode { body: detail, .. } => assert_eq!(detail, &body),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains(r#""errmsg":"invalid credential""#));
    }

    #[test]
    fn zero_error_code_is_success() {
        let body = r#"{"errcode":0,"errmsg":"ok","ticket":"T","expires_in":7200}"#;
        let ticket: TicketResponse = decode("ticket", body).unwrap();
        assert_eq!(ticket.ticket, "T");
        assert_eq!(ticket.expires_in, 7200);
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = decode::<TokenResponse>("token", r#"{"token":"x"}"#).unwrap_err();
        assert!(matches!(err, WechatError::MalformedResponse { .. }));
    }

    #[test]
    fn user_token_keeps_unknown_fields() {
        let body = json!({
            "access_token": "U", "expires_in": 7200, "refresh_token": "R",
            "openid": "O", "scope": "snsapi_base", "is_snapshotuser": 1
        })
        .to_string();
        let token: UserAccessToken = decode("code2token", &body).unwrap();
        assert_eq!(token.openid, "O");
        assert_eq!(token.unionid, None);
        assert_eq!(token.extra.get("is_snapshotuser"), Some(&json!(1)));
    }
}
