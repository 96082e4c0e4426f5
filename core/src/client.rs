//! Request builder and executor for the YMM service.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and an executing method that sends it through the client's
//! `Transport` and returns the raw `HttpResponse`. The build step is pure, so
//! the exact wire shape of every call can be checked without a server.
//!
//! Responses are not interpreted. `search_ymm` is the one exception: it reads
//! `total` and `list` to pick between no match, one id and many rows.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::headers::Headers;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::routes::{Action, Route, DEFAULT_SERVICE_DOMAIN};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    build_post_fields, AssignPayload, DeletePayload, FieldEntry, SearchPayload, SearchQuery,
    SearchResult, YmmList, YmmPayload, YmmRecord,
};

/// Client bound to one storefront domain.
///
/// Not meant for concurrent mutation: the header mapping belongs to this
/// instance and `headers_mut` requires exclusive access.
#[derive(Debug, Clone)]
pub struct YmmClient<T = UreqTransport> {
    domain: String,
    service_domain: String,
    headers: Headers,
    transport: T,
}

impl YmmClient<UreqTransport> {
    /// Client for `domain` against the hosted service.
    pub fn new(domain: &str) -> Self {
        Self::with_service_domain(domain, DEFAULT_SERVICE_DOMAIN)
    }

    pub fn with_service_domain(domain: &str, service_domain: &str) -> Self {
        Self::with_transport(domain, service_domain, UreqTransport::new())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::with_timeout(config.timeout_duration());
        let mut client = Self::with_transport(&config.domain, &config.service_domain, transport);
        client.headers = config.headers.into_iter().collect();
        client
    }
}

impl<T: Transport> YmmClient<T> {
    /// `service_domain` is stored verbatim; a malformed value surfaces as a
    /// transport error on the first call.
    pub fn with_transport(domain: &str, service_domain: &str, transport: T) -> Self {
        Self {
            domain: domain.to_string(),
            service_domain: service_domain.to_string(),
            headers: Headers::new(),
            transport,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn service_domain(&self) -> &str {
        &self.service_domain
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the headers sent with every subsequent request.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fill in the default `user-agent` on this client's own headers and
    /// return them. An explicitly set `user-agent` is left alone.
    pub fn build_default_headers(&mut self) -> &Headers {
        self.headers.apply_defaults()
    }

    pub fn build_post_fields<S: AsRef<str>>(&self, fields: &[S]) -> Vec<FieldEntry> {
        build_post_fields(fields)
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_get_ymms(&self) -> HttpRequest {
        self.get(Route::GetYmm, vec![self.action(Action::Get), self.domain_param()])
    }

    pub fn build_search_ymms(&self, query: &SearchQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            Route::GetYmm,
            vec![self.action(Action::Get), self.domain_param()],
            &SearchPayload::from(query),
        )
    }

    pub fn build_get_single_ymm(&self, ymm_id: &str) -> HttpRequest {
        self.get(
            Route::GetYmm,
            vec![
                self.action(Action::Edit),
                param("data_id", ymm_id),
                self.domain_param(),
            ],
        )
    }

    pub fn build_add_ymm<F, P>(&self, fields: &[F], product_ids: &[P]) -> Result<HttpRequest, ApiError>
    where
        F: AsRef<str>,
        P: AsRef<str>,
    {
        self.post(
            Route::PostYmm,
            vec![self.action(Action::Save), self.domain_param()],
            &ymm_payload(fields, product_ids),
        )
    }

    pub fn build_update_ymm<F, P>(
        &self,
        ymm_id: &str,
        fields: &[F],
        product_ids: &[P],
    ) -> Result<HttpRequest, ApiError>
    where
        F: AsRef<str>,
        P: AsRef<str>,
    {
        self.post(
            Route::PostYmm,
            vec![
                self.action(Action::Save),
                self.domain_param(),
                param("data_id", ymm_id),
            ],
            &ymm_payload(fields, product_ids),
        )
    }

    pub fn build_assign_prods_ymms<P, Y>(
        &self,
        product_ids: &[P],
        ymm_ids: &[Y],
    ) -> Result<HttpRequest, ApiError>
    where
        P: AsRef<str>,
        Y: AsRef<str>,
    {
        let payload = AssignPayload {
            product_ids: to_strings(product_ids),
            ymm_row_ids: to_strings(ymm_ids),
        };
        self.post(
            Route::AssignYmm,
            vec![self.action(Action::BulkAssign), self.domain_param()],
            &payload,
        )
    }

    pub fn build_get_prod_ymms(&self, prod_ymms_id: &str) -> HttpRequest {
        self.get(
            Route::GetProdYmm,
            vec![
                self.action(Action::Edit),
                param("data_id", prod_ymms_id),
                self.domain_param(),
            ],
        )
    }

    pub fn build_delete_ymm(&self, ymm_id: &str) -> Result<HttpRequest, ApiError> {
        let payload = DeletePayload {
            delete_id: ymm_id.to_string(),
        };
        self.post(
            Route::PostYmm,
            vec![self.action(Action::Delete), self.domain_param()],
            &payload,
        )
    }

    pub fn build_delete_all_ymms(&self) -> HttpRequest {
        self.get(
            Route::GetYmm,
            vec![self.action(Action::DeleteAll), self.domain_param()],
        )
    }

    // -----------------------------------------------------------------------
    // Execute
    // -----------------------------------------------------------------------

    /// List every fitment row for the domain.
    pub fn get_ymms(&self) -> Result<HttpResponse, ApiError> {
        self.send(self.build_get_ymms())
    }

    pub fn search_ymms(&self, query: &SearchQuery) -> Result<HttpResponse, ApiError> {
        self.send(self.build_search_ymms(query)?)
    }

    /// Search and reduce the response to nothing, one id, or all rows.
    pub fn search_ymm(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        let response = self.search_ymms(query)?;
        let list: YmmList = response.json().map_err(ApiError::Deserialization)?;
        interpret_search(list)
    }

    pub fn get_single_ymm(&self, ymm_id: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_get_single_ymm(ymm_id))
    }

    /// Create a row and optionally link it to `product_ids` (may be empty).
    pub fn add_ymm<F, P>(&self, fields: &[F], product_ids: &[P]) -> Result<HttpResponse, ApiError>
    where
        F: AsRef<str>,
        P: AsRef<str>,
    {
        self.send(self.build_add_ymm(fields, product_ids)?)
    }

    pub fn update_ymm<F, P>(
        &self,
        ymm_id: &str,
        fields: &[F],
        product_ids: &[P],
    ) -> Result<HttpResponse, ApiError>
    where
        F: AsRef<str>,
        P: AsRef<str>,
    {
        self.send(self.build_update_ymm(ymm_id, fields, product_ids)?)
    }

    /// Link every product in `product_ids` to every row in `ymm_ids`.
    pub fn assign_prods_ymms<P, Y>(
        &self,
        product_ids: &[P],
        ymm_ids: &[Y],
    ) -> Result<HttpResponse, ApiError>
    where
        P: AsRef<str>,
        Y: AsRef<str>,
    {
        self.send(self.build_assign_prods_ymms(product_ids, ymm_ids)?)
    }

    pub fn get_prod_ymms(&self, prod_ymms_id: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_get_prod_ymms(prod_ymms_id))
    }

    /// Delete one or more rows. How several ids are packed into `ymm_id`
    /// is defined by the service.
    pub fn delete_ymm(&self, ymm_id: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_delete_ymm(ymm_id)?)
    }

    pub fn delete_all_ymms(&self) -> Result<HttpResponse, ApiError> {
        self.send(self.build_delete_all_ymms())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let action = request.query_param("action").unwrap_or_default().to_string();
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            action = %action,
            domain = %self.domain,
            "sending ymm request"
        );
        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(status = response.status, action = %action, "ymm response received");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, action = %action, url = %request.url, "ymm request failed");
                Err(e.into())
            }
        }
    }

    fn get(&self, route: Route, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(route),
            query,
            headers: self.headers.with_defaults().to_pairs(),
            body: None,
        }
    }

    fn post<B: Serialize>(
        &self,
        route: Route,
        query: Vec<(String, String)>,
        payload: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Serialization)?;
        let mut headers = self.headers.with_defaults().to_pairs();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(route),
            query,
            headers,
            body: Some(body),
        })
    }

    fn url(&self, route: Route) -> String {
        format!("{}{}", self.service_domain, route.path())
    }

    fn action(&self, action: Action) -> (String, String) {
        param("action", action.as_str())
    }

    fn domain_param(&self) -> (String, String) {
        param("domain", &self.domain)
    }
}

/// Decode a list or search response body.
pub fn parse_ymm_list(response: &HttpResponse) -> Result<YmmList, ApiError> {
    response.json().map_err(ApiError::Deserialization)
}

/// Decode a single-row (`action=edit`) response body.
pub fn parse_ymm_record(response: &HttpResponse) -> Result<YmmRecord, ApiError> {
    response.json().map_err(ApiError::Deserialization)
}

fn interpret_search(list: YmmList) -> Result<SearchResult, ApiError> {
    match list.total {
        0 => Ok(SearchResult::Empty),
        1 => list
            .list
            .into_iter()
            .next()
            .map(|row| SearchResult::Single(row.id))
            .ok_or_else(|| ApiError::UnexpectedResponse("total is 1 but list is empty".to_string())),
        _ => Ok(SearchResult::Many(list.list)),
    }
}

fn ymm_payload<F: AsRef<str>, P: AsRef<str>>(fields: &[F], product_ids: &[P]) -> YmmPayload {
    YmmPayload {
        ymm_fields: build_post_fields(fields),
        product_ids: to_strings(product_ids),
    }
}

fn to_strings<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_string()).collect()
}

fn param(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}
