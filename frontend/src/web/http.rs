//! HTTP transport.
//!
//! `Transport` is the seam between the typed API client and the browser. The
//! production implementation goes through `gloo-net`'s fetch wrapper; tests use
//! [`tests::MockTransport`].

use gogreen_shared::ApiError;
use gogreen_shared::protocol::{HttpMethod, RequestBody};

/// File attached to a multipart request (avatar uploads).
#[derive(Clone)]
pub struct Attachment {
    pub field: &'static str,
    pub file: web_sys::File,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Attachment({}: {})", self.field, self.file.name())
    }
}

/// Transport-level request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: RequestBody,
    pub attachment: Option<Attachment>,
}

/// Transport-level response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a request and returns the raw response.
///
/// `?Send` because browser futures hold `JsValue`s.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Resolves with any HTTP status; only transport failures are errors.
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =========================================================
// Fetch transport
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn js_error(value: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Encoding(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn form_data(
    fields: &[(String, String)],
    attachment: Option<&Attachment>,
) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    for (key, value) in fields {
        form.append_with_str(key, value).map_err(js_error)?;
    }
    if let Some(attachment) = attachment {
        form.append_with_blob(attachment.field, &attachment.file)
            .map_err(js_error)?;
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        let request = match &req.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(json) => builder
                .header("Content-Type", "application/json")
                .body(json.as_str()),
            // Browser sets the multipart boundary header itself.
            RequestBody::Form(fields) => {
                builder.body(form_data(fields, req.attachment.as_ref())?)
            }
        }
        .map_err(|e| ApiError::Encoding(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// MockTransport
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub body: RequestBody,
    }

    #[derive(Default)]
    struct MockState {
        // (Method, URL) -> Result<(Status, Body), network error>
        responses: RefCell<HashMap<(HttpMethod, String), Result<(u16, String), String>>>,
        requests: RefCell<Vec<RecordedRequest>>,
    }

    /// Records every request and answers from a table; unknown routes get a
    /// plain-text 404.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Rc<MockState>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
            self.state
                .responses
                .borrow_mut()
                .insert((method, url.to_string()), Ok((status, body.to_string())));
        }

        pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
            self.state
                .responses
                .borrow_mut()
                .insert((method, url.to_string()), Ok((status, body.to_string())));
        }

        pub fn mock_network_error(&self, method: HttpMethod, url: &str, message: &str) {
            self.state
                .responses
                .borrow_mut()
                .insert((method, url.to_string()), Err(message.to_string()));
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.state.requests.borrow().clone()
        }

        pub fn request_count(&self) -> usize {
            self.state.requests.borrow().len()
        }

        pub fn count_for(&self, method: HttpMethod, url: &str) -> usize {
            self.state
                .requests
                .borrow()
                .iter()
                .filter(|r| r.method == method && r.url == url)
                .count()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Transport for MockTransport {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.state.requests.borrow_mut().push(RecordedRequest {
                method: req.method,
                url: req.url.clone(),
                body: req.body.clone(),
            });

            let responses = self.state.responses.borrow();
            match responses.get(&(req.method, req.url)) {
                Some(Ok((status, body))) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Some(Err(message)) => Err(ApiError::Network(message.clone())),
                None => Ok(HttpResponse {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }
}
