//! Response envelopes returned by application services.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Result-or-errors envelope. `has_error` is derived from `errors`.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseResponse<T> {
    pub errors: Vec<String>,
    pub total: i64,
    pub result: Option<T>,
}

impl<T> Default for BaseResponse<T> {
    fn default() -> Self { Self { errors: Vec::new(), total: 0, result: None } }
}

impl<T> BaseResponse<T> {
    pub fn new() -> Self { Self::default() }

    pub fn ok(result: T) -> Self { Self { result: Some(result), ..Self::default() } }

    pub fn has_error(&self) -> bool { !self.errors.is_empty() }

    pub fn add_error(&mut self, message: impl Into<String>) { self.errors.push(message.into()); }

    pub fn extend_errors<I: IntoIterator<Item = String>>(&mut self, messages: I) { self.errors.extend(messages); }
}

impl<T: Serialize> Serialize for BaseResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BaseResponse", 4)?;
        s.serialize_field("has_error", &self.has_error())?;
        s.serialize_field("errors", &self.errors)?;
        s.serialize_field("total", &self.total)?;
        s.serialize_field("result", &self.result)?;
        s.end()
    }
}

/// One page of a listing plus optional navigation links.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PagedResponse<T> {
    pub index: u64,
    pub page_size: u64,
    pub total: Option<u64>,
    pub items: Vec<T>,
    pub first: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub last: Option<String>,
}

impl<T> PagedResponse<T> {
    pub fn new(index: u64, page_size: u64) -> Self {
        Self { index, page_size, total: None, items: Vec::new(), first: None, next: None, prev: None, last: None }
    }
}

/// Offset/limit listing request, as read from a query string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PagedRequest {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub order_by: Option<String>,
}

fn default_limit() -> u64 { 10 }

impl Default for PagedRequest {
    fn default() -> Self { Self { offset: 0, limit: default_limit(), order_by: None } }
}

impl PagedRequest {
    /// 1-based page index containing `offset`. `None` when `limit` is zero.
    pub fn index(&self) -> Option<u64> { self.offset.checked_div(self.limit).map(|page| page + 1) }
}
