//! Blocking client for the Year/Make/Model fitment service.
//!
//! # Overview
//! Manages YMM fitment rows for a storefront domain and links them to store
//! product ids. Every operation issues exactly one HTTP request and returns
//! the raw response; remote failures are reported in the response body, not
//! as errors.
//!
//! # Design
//! - `YmmClient` holds the domain, the service base URL, its headers and a
//!   `Transport`.
//! - Each operation has a pure `build_*` counterpart producing an
//!   `HttpRequest`, so wire shapes can be tested without a server.
//! - `UreqTransport` is the default blocking transport. Anything
//!   implementing `Transport` can replace it.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod routes;
pub mod transport;
pub mod types;

pub use client::{parse_ymm_list, parse_ymm_record, YmmClient};
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use headers::{Headers, DEFAULT_USER_AGENT};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::{Action, Route, DEFAULT_SERVICE_DOMAIN};
pub use transport::{Transport, UreqTransport};
pub use types::{
    build_post_fields, AssignPayload, DeletePayload, FieldEntry, FilterFields, SearchCondition,
    SearchPayload, SearchQuery, SearchResult, YmmList, YmmPayload, YmmRecord, YmmRow,
};
