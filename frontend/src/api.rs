use crate::config::ApiConfig;
use crate::web::http::{Attachment, FetchTransport, HttpRequest, Transport};
use gogreen_shared::ApiError;
use gogreen_shared::protocol::{ApiRequest, decode_response, encode_body};
use leptos::prelude::*;

/// Typed client for the GoGreen REST backend.
///
/// Every endpoint goes through [`GoGreenApi::call`]; the request type decides
/// method, path, body encoding and the fallback error message.
#[derive(Clone, Debug)]
pub struct GoGreenApi<T = FetchTransport> {
    config: ApiConfig,
    transport: T,
}

impl GoGreenApi<FetchTransport> {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            transport: FetchTransport,
        }
    }
}

impl<T: Transport> GoGreenApi<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn call<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        self.call_with(req, None).await
    }

    /// Same as [`call`](Self::call), with an optional file part for multipart bodies.
    pub async fn call_with<R: ApiRequest>(
        &self,
        req: &R,
        attachment: Option<Attachment>,
    ) -> Result<R::Response, ApiError> {
        let request = HttpRequest {
            url: self.config.url_for(req),
            method: R::METHOD,
            body: encode_body(req)?,
            attachment,
        };
        let method = request.method.as_str();
        let url = request.url.clone();
        log::debug!("{method} {url}");

        let result = match self.transport.send(request).await {
            Ok(response) => decode_response::<R>(response.status, &response.body),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            log::warn!("{method} {url} failed: {e}");
        }
        result
    }
}

/// The API client provided by `App`.
pub fn use_api() -> GoGreenApi {
    use_context::<GoGreenApi>().expect("GoGreenApi should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::tests::MockTransport;
    use gogreen_shared::protocol::{
        HttpMethod, LoginRequest, OrdersQuery, RequestBody, ResendOtpRequest,
    };
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api() -> (GoGreenApi<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        (
            GoGreenApi::with_transport(ApiConfig::new(BASE), mock.clone()),
            mock,
        )
    }

    #[tokio::test]
    async fn test_login_success_returns_user() {
        let (api, mock) = api();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/api/users/login/",
            200,
            json!({
                "message": "Login successful",
                "user": {"full_name": "Asha", "email": "asha@example.com", "phone": "98450"}
            }),
        );

        let res = api
            .call(&LoginRequest {
                email: "asha@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(res.user.unwrap().full_name, "Asha");
        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        let RequestBody::Json(body) = &sent[0].body else {
            panic!("login must send json");
        };
        assert!(body.contains("\"password\":\"pw\""));
    }

    #[tokio::test]
    async fn test_field_error_is_surfaced() {
        let (api, mock) = api();
        mock.mock_response(
            HttpMethod::Post,
            "http://api.test/api/users/resend-otp/",
            400,
            json!({"email": ["User not found."]}),
        );

        let err = api
            .call(&ResendOtpRequest {
                email: "nobody@example.com".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User not found.");
        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn test_html_body_is_rewritten() {
        let (api, mock) = api();
        mock.mock_raw(
            HttpMethod::Get,
            "http://api.test/api/trees/orders/?email=a%40b.in",
            500,
            "<!DOCTYPE html><html>Server Error</html>",
        );

        let err = api
            .call(&OrdersQuery {
                email: "a@b.in".into(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Unable to load orders."));
        assert!(err.to_string().contains("HTML instead of JSON"));
    }

    #[tokio::test]
    async fn test_network_error_passes_through() {
        let (api, mock) = api();
        mock.mock_network_error(
            HttpMethod::Post,
            "http://api.test/api/users/login/",
            "connection refused",
        );

        let err = api
            .call(&LoginRequest {
                email: "a@b.in".into(),
                password: "x".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Network("connection refused".into()));
    }
}
