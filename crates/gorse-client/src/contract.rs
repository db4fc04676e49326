//! Request/response contract shared by the async and blocking clients.
//!
//! Every endpoint is described once, as a value implementing [`Operation`]:
//! it knows how to turn itself into an [`ApiRequest`] (method, path segments,
//! query pairs, JSON body) and how to decode a successful response body.
//! The clients only execute requests; they never know about individual
//! endpoints.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// Header carrying the caller's API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default number of results for recommendation and neighbor queries.
pub const DEFAULT_N: usize = 10;

/// An endpoint call described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path segments below the entry point, e.g. `["api", "item", "42"]`.
    /// Each segment is percent-encoded on its own.
    pub segments: Vec<String>,
    /// Query parameters, in order.
    pub query: Vec<(&'static str, String)>,
    /// JSON body, for writes.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Append a query parameter only when a value was supplied.
    pub fn query_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Resolve the full URL against an entry point.
    ///
    /// Any path on the entry point is kept as a prefix; its query and
    /// fragment are dropped.
    pub fn url(&self, entry_point: &Url) -> Result<Url> {
        let mut url = entry_point.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("entry point cannot carry a path: {}", entry_point))
            })?;
            path.pop_if_empty();
            path.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// A single endpoint of the Gorse API.
pub trait Operation {
    /// Decoded response.
    type Output;

    /// Describe the HTTP request for this call.
    fn request(&self) -> Result<ApiRequest>;

    /// Decode the body of a 200 response.
    fn decode(&self, body: &str) -> Result<Self::Output>;
}

/// Map a response to its body when the status is exactly 200.
pub fn check_status(status: u16, body: String) -> Result<String> {
    if status == 200 {
        Ok(body)
    } else {
        Err(Error::Api { status, body })
    }
}

/// Decode a JSON object body.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a JSON array body; `null` is an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let list: Option<Vec<T>> = serde_json::from_str(body)?;
    Ok(list.unwrap_or_default())
}
