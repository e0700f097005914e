//! Mock transport for testing

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

/// Replays canned responses and records every request it receives.
///
/// Responses are registered per method and URL. A route may be given either
/// as an absolute URL or as a path (`/redfish/v1/Systems`), in which case it
/// matches any host. Several responses on one route are returned in order;
/// the last one repeats.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` on `route`
    pub fn on(&self, method: Method, route: impl Into<String>, response: HttpResponse) -> &Self {
        self.routes
            .lock()
            .entry((method, route.into()))
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a `200 OK` JSON response for a GET
    pub fn on_get_json(&self, route: impl Into<String>, body: serde_json::Value) -> &Self {
        self.on(Method::GET, route, HttpResponse::new(200).with_json(&body))
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests sent with `method` to a URL ending in `path`
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    fn find_response(&self, method: &Method, url: &str) -> Option<HttpResponse> {
        let mut routes = self.routes.lock();

        let full = (method.clone(), url.to_string());
        let key = if routes.contains_key(&full) {
            full
        } else {
            (method.clone(), path_of(url))
        };

        let queue = routes.get_mut(&key)?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        response.map(|mut r| {
            r.url = url.to_string();
            r
        })
    }
}

fn path_of(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = request.method.clone();
        let url = request.url.clone();
        self.requests.lock().push(request);

        self.find_response(&method, &url)
            .ok_or_else(|| TransportError::NoResponse {
                method: method.to_string(),
                url,
            })
    }
}
