//! Test utilities: an in-memory [`Transport`].
//!
//! Responses are queued up front and popped one per call; every POST is
//! recorded so tests can assert on what would have been sent.

use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::transport::{HttpResponse, Transport};

type Queue = Arc<Mutex<Vec<Result<HttpResponse, TransportError>>>>;

#[derive(Clone, Default)]
pub struct MockTransport {
    gets: Queue,
    posts: Queue,
    get_urls: Arc<Mutex<Vec<String>>>,
    posted: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl MockTransport {
    /// Every GET answers 200 with the next body in order.
    pub fn with_pages(pages: &[&str]) -> Self {
        Self::with_responses(
            pages
                .iter()
                .map(|body| {
                    Ok(HttpResponse {
                        status: 200,
                        body: body.to_string(),
                    })
                })
                .collect(),
        )
    }

    pub fn with_responses(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            gets: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    pub fn with_post_responses(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            posts: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    pub fn get_count(&self) -> usize {
        self.get_urls.lock().unwrap().len()
    }

    pub fn get_urls(&self) -> Vec<String> {
        self.get_urls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.posted.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.get_urls.lock().unwrap().push(url.to_string());
        let mut gets = self.gets.lock().unwrap();
        if gets.is_empty() {
            Err(TransportError::Connect(format!("no response queued for {url}")))
        } else {
            gets.remove(0)
        }
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.posted
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        let mut posts = self.posts.lock().unwrap();
        if posts.is_empty() {
            Ok(HttpResponse {
                status: 200,
                body: "ok".to_string(),
            })
        } else {
            posts.remove(0)
        }
    }
}
