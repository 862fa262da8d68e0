// Response classification
//
// The platform reports faults in several shapes: bare HTTP statuses from
// its front door, JSON error objects with HTTP 4xx, and occasionally an
// error object alongside a 2xx. Every response is decoded exactly once
// into a `CentralResponse` so callers only ever match on one enum.

use serde::Deserialize;

use crate::error::Error;

const PREVIEW_LEN: usize = 200;

/// Decoded outcome of a single platform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CentralResponse {
    /// 2xx with no error payload; carries the raw body.
    Success(String),
    /// HTTP 503.
    TransientFault { reason: String },
    /// Error payload (`description` / `error_code`) or any other non-2xx.
    ApplicationFault { description: String },
    /// HTTP 429.
    RateLimited,
    /// HTTP 502 or 504.
    GatewayFault { status: u16 },
}

/// Error object shapes observed from the platform.
///
/// Configuration endpoints use `{description, error_code, service_name}`,
/// the OAuth layer uses `{error, error_description}`.
#[derive(Deserialize)]
struct ErrorPayload {
    description: Option<String>,
    error_description: Option<String>,
    error_code: Option<serde_json::Value>,
}

impl ErrorPayload {
    fn into_description(self) -> Option<String> {
        if let Some(text) = self.description.or(self.error_description) {
            return Some(text);
        }
        self.error_code.map(|code| match code {
            serde_json::Value::String(code) => format!("error code {code}"),
            other => format!("error code {other}"),
        })
    }
}

impl CentralResponse {
    /// Classify a raw HTTP status and body.
    pub fn classify(status: u16, body: String) -> Self {
        match status {
            503 => Self::TransientFault {
                reason: if body.trim().is_empty() {
                    "Service Unavailable".into()
                } else {
                    preview(&body)
                },
            },
            429 => Self::RateLimited,
            502 | 504 => Self::GatewayFault { status },
            _ => {
                if let Some(description) = error_description(&body) {
                    return Self::ApplicationFault { description };
                }
                if (200..300).contains(&status) {
                    Self::Success(body)
                } else {
                    Self::ApplicationFault {
                        description: format!("HTTP {status}: {}", preview(&body)),
                    }
                }
            }
        }
    }

    /// Whether the request was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into the body on success, or the matching [`Error`].
    pub fn into_result(self) -> Result<String, Error> {
        match self {
            Self::Success(body) => Ok(body),
            Self::TransientFault { reason } => Err(Error::ServerFault { reason }),
            Self::ApplicationFault { description } => Err(Error::Application { description }),
            Self::RateLimited => Err(Error::RateLimited),
            Self::GatewayFault { status } => Err(Error::GatewayFault { status }),
        }
    }
}

fn error_description(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(ErrorPayload::into_description)
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_unavailable_is_transient() {
        let resp = CentralResponse::classify(503, String::new());
        assert_eq!(
            resp,
            CentralResponse::TransientFault {
                reason: "Service Unavailable".into()
            }
        );
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert_eq!(
            CentralResponse::classify(429, "{\"message\":\"API rate limit exceeded\"}".into()),
            CentralResponse::RateLimited
        );
    }

    #[test]
    fn bad_gateway_and_gateway_timeout_are_gateway_faults() {
        assert_eq!(
            CentralResponse::classify(502, "Bad Gateway".into()),
            CentralResponse::GatewayFault { status: 502 }
        );
        assert_eq!(
            CentralResponse::classify(504, String::new()),
            CentralResponse::GatewayFault { status: 504 }
        );
    }

    #[test]
    fn description_payload_is_application_fault_even_with_2xx() {
        let body = r#"{"description":"Group not found","error_code":"0001","service_name":"Configuration"}"#;
        assert_eq!(
            CentralResponse::classify(200, body.into()),
            CentralResponse::ApplicationFault {
                description: "Group not found".into()
            }
        );
    }

    #[test]
    fn bare_error_code_is_described() {
        let resp = CentralResponse::classify(400, r#"{"error_code":"0005"}"#.into());
        assert_eq!(
            resp,
            CentralResponse::ApplicationFault {
                description: "error code 0005".into()
            }
        );
    }

    #[test]
    fn oauth_error_description_is_used() {
        let body = r#"{"error":"invalid_token","error_description":"Invalid access token"}"#;
        assert_eq!(
            CentralResponse::classify(401, body.into()),
            CentralResponse::ApplicationFault {
                description: "Invalid access token".into()
            }
        );
    }

    #[test]
    fn other_non_success_status_carries_status() {
        let resp = CentralResponse::classify(404, "nope".into());
        assert_eq!(
            resp,
            CentralResponse::ApplicationFault {
                description: "HTTP 404: nope".into()
            }
        );
    }

    #[test]
    fn json_array_body_is_success() {
        let body = r#"["wlan ssid-profile A","  essid A"]"#.to_string();
        assert_eq!(
            CentralResponse::classify(200, body.clone()),
            CentralResponse::Success(body)
        );
    }

    #[test]
    fn success_object_without_error_fields_is_success() {
        let body = r#"{"_global_result":{"status":0,"status_str":"Success"}}"#.to_string();
        assert!(CentralResponse::classify(200, body).is_success());
    }

    #[test]
    fn into_result_maps_variants() {
        assert!(matches!(
            CentralResponse::RateLimited.into_result(),
            Err(Error::RateLimited)
        ));
        assert!(matches!(
            CentralResponse::GatewayFault { status: 502 }.into_result(),
            Err(Error::GatewayFault { status: 502 })
        ));
        assert_eq!(
            CentralResponse::Success("ok".into()).into_result().ok(),
            Some("ok".to_string())
        );
    }
}
