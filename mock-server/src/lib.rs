use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Rows returned per search page.
pub const PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FieldEntry {
    pub field: String,
    pub field_val: String,
    pub tag_field: String,
    pub tag_val: String,
}

#[derive(Clone, Debug, Default)]
pub struct Ymm {
    pub id: u64,
    pub fields: Vec<FieldEntry>,
    pub product_ids: Vec<String>,
}

impl Ymm {
    fn value_of(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.field_val.as_str())
    }

    /// Row as it appears in list and search responses.
    fn summary(&self) -> Value {
        let mut row = Map::new();
        row.insert("id".to_string(), json!(self.id.to_string()));
        for entry in &self.fields {
            row.insert(entry.field.clone(), json!(entry.field_val));
        }
        Value::Object(row)
    }

    /// Row as it appears in `action=edit` responses.
    fn detail(&self, domain: &str) -> Value {
        let mut row = Map::new();
        row.insert("id".to_string(), json!(self.id.to_string()));
        row.insert("shop_id".to_string(), json!(domain));
        row.insert("product_ids".to_string(), json!(self.product_ids.join(",")));
        for entry in &self.fields {
            row.insert(entry.field.clone(), json!(entry.field_val));
            row.insert(entry.tag_field.clone(), json!(entry.tag_val));
        }
        Value::Object(row)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    shops: HashMap<String, BTreeMap<u64, Ymm>>,
}

impl Store {
    fn shop(&mut self, domain: &str) -> &mut BTreeMap<u64, Ymm> {
        self.shops.entry(domain.to_string()).or_default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Deserialize)]
pub struct Params {
    pub action: String,
    pub domain: String,
    pub data_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    txt: String,
    #[serde(default = "default_condition")]
    search_cond: String,
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default)]
    filter_fields: Vec<String>,
}

fn default_condition() -> String {
    "contains".to_string()
}

fn default_page() -> usize {
    1
}

#[derive(Deserialize)]
struct SaveBody {
    ymm_fields: Vec<FieldEntry>,
    #[serde(default)]
    product_ids: Vec<String>,
}

#[derive(Deserialize)]
struct DeleteBody {
    delete_id: String,
}

#[derive(Deserialize)]
struct AssignBody {
    product_ids: Vec<String>,
    ymm_row_ids: Vec<String>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/ajax/manage_ymm.php", get(manage_get).post(manage_post))
        .route("/ajax/bulk_ymm.php", post(bulk_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "status": "error", "message": message.into() }))).into_response()
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, format!("invalid body: {e}")))
}

fn parse_id(raw: &str) -> Result<u64, Response> {
    raw.trim()
        .parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, format!("invalid id: {raw}")))
}

async fn manage_get(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    match params.action.as_str() {
        "get" => list_ymms(&db, &params.domain).await,
        "edit" => match params.data_id.as_deref() {
            Some(raw) => match parse_id(raw) {
                Ok(id) => get_ymm(&db, &params.domain, id).await,
                Err(resp) => resp,
            },
            None => error(StatusCode::BAD_REQUEST, "missing data_id"),
        },
        "delete_all" => delete_all(&db, &params.domain).await,
        other => error(StatusCode::BAD_REQUEST, format!("unknown action: {other}")),
    }
}

async fn manage_post(State(db): State<Db>, Query(params): Query<Params>, body: Bytes) -> Response {
    let result = match params.action.as_str() {
        "get" => match parse_body::<SearchBody>(&body) {
            Ok(search) => search_ymms(&db, &params.domain, search).await,
            Err(resp) => Err(resp),
        },
        "save" => match parse_body::<SaveBody>(&body) {
            Ok(save) => save_ymm(&db, &params, save).await,
            Err(resp) => Err(resp),
        },
        "delete" => match parse_body::<DeleteBody>(&body) {
            Ok(delete) => delete_ymms(&db, &params.domain, &delete.delete_id).await,
            Err(resp) => Err(resp),
        },
        other => Err(error(
            StatusCode::BAD_REQUEST,
            format!("unknown action: {other}"),
        )),
    };
    result.unwrap_or_else(|resp| resp)
}

async fn bulk_post(State(db): State<Db>, Query(params): Query<Params>, body: Bytes) -> Response {
    if params.action != "bulk_assign" {
        return error(
            StatusCode::BAD_REQUEST,
            format!("unknown action: {}", params.action),
        );
    }
    let assign: AssignBody = match parse_body(&body) {
        Ok(assign) => assign,
        Err(resp) => return resp,
    };

    let mut store = db.write().await;
    let shop = store.shop(&params.domain);
    let mut assigned = 0;
    for raw in &assign.ymm_row_ids {
        let Ok(id) = raw.trim().parse::<u64>() else {
            continue;
        };
        if let Some(ymm) = shop.get_mut(&id) {
            for product in &assign.product_ids {
                if !ymm.product_ids.contains(product) {
                    ymm.product_ids.push(product.clone());
                }
            }
            assigned += 1;
        }
    }
    debug!(domain = %params.domain, assigned, "bulk assigned products");
    Json(json!({ "status": "success", "assigned": assigned })).into_response()
}

fn list_body(all_count: usize, total: usize, rows: &[&Ymm]) -> Value {
    json!({
        "all_count": all_count.to_string(),
        "total": total,
        "list": rows.iter().map(|y| y.summary()).collect::<Vec<_>>(),
    })
}

async fn list_ymms(db: &Db, domain: &str) -> Response {
    let store = db.read().await;
    let rows: Vec<&Ymm> = store
        .shops
        .get(domain)
        .map(|shop| shop.values().collect())
        .unwrap_or_default();
    Json(list_body(rows.len(), rows.len(), &rows)).into_response()
}

async fn get_ymm(db: &Db, domain: &str, id: u64) -> Response {
    let store = db.read().await;
    match store.shops.get(domain).and_then(|shop| shop.get(&id)) {
        Some(ymm) => Json(ymm.detail(domain)).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("ymm {id} not found")),
    }
}

async fn search_ymms(db: &Db, domain: &str, search: SearchBody) -> Result<Response, Response> {
    let store = db.read().await;
    let all: Vec<&Ymm> = store
        .shops
        .get(domain)
        .map(|shop| shop.values().collect())
        .unwrap_or_default();

    let mut matched = Vec::new();
    for ymm in &all {
        let values: Vec<&str> = if search.filter_fields.is_empty() {
            ymm.fields.iter().map(|f| f.field_val.as_str()).collect()
        } else {
            search
                .filter_fields
                .iter()
                .filter_map(|name| ymm.value_of(name))
                .collect()
        };
        let mut hit = false;
        for value in values {
            let Some(is_match) = matches(&search.search_cond, value, &search.txt) else {
                return Err(error(
                    StatusCode::BAD_REQUEST,
                    format!("unknown search_cond: {}", search.search_cond),
                ));
            };
            if is_match {
                hit = true;
                break;
            }
        }
        if hit {
            matched.push(*ymm);
        }
    }

    let start = search.page.saturating_sub(1) * PAGE_SIZE;
    let page: Vec<&Ymm> = matched.iter().skip(start).take(PAGE_SIZE).copied().collect();
    Ok(Json(list_body(all.len(), matched.len(), &page)).into_response())
}

async fn save_ymm(db: &Db, params: &Params, save: SaveBody) -> Result<Response, Response> {
    let mut store = db.write().await;
    let id = match params.data_id.as_deref() {
        Some(raw) => {
            let id = parse_id(raw)?;
            let ymm = store
                .shop(&params.domain)
                .get_mut(&id)
                .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("ymm {id} not found")))?;
            ymm.fields = save.ymm_fields;
            ymm.product_ids = save.product_ids;
            debug!(domain = %params.domain, id, "updated ymm");
            id
        }
        None => {
            let id = store.allocate_id();
            store.shop(&params.domain).insert(
                id,
                Ymm {
                    id,
                    fields: save.ymm_fields,
                    product_ids: save.product_ids,
                },
            );
            debug!(domain = %params.domain, id, "created ymm");
            id
        }
    };
    Ok(Json(json!({ "status": "success", "id": id.to_string() })).into_response())
}

async fn delete_ymms(db: &Db, domain: &str, delete_id: &str) -> Result<Response, Response> {
    let ids = delete_id
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_id)
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = db.write().await;
    let shop = store.shop(domain);
    let deleted = ids.iter().filter(|&&id| shop.remove(&id).is_some()).count();
    debug!(domain, deleted, "deleted ymms");
    Ok(Json(json!({ "status": "success", "deleted": deleted })).into_response())
}

async fn delete_all(db: &Db, domain: &str) -> Response {
    let mut store = db.write().await;
    let deleted = store.shops.remove(domain).map(|shop| shop.len()).unwrap_or(0);
    debug!(domain, deleted, "deleted all ymms");
    Json(json!({ "status": "success", "deleted": deleted })).into_response()
}

/// Evaluate a search condition of `value` against `txt`. `None` for an
/// unknown condition.
pub fn matches(cond: &str, value: &str, txt: &str) -> Option<bool> {
    let value_lc = value.to_lowercase();
    let txt_lc = txt.to_lowercase();
    let ordering = match (value.trim().parse::<f64>(), txt.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(value_lc.cmp(&txt_lc)),
    };
    let result = match cond {
        "equals" => value_lc == txt_lc,
        "not_equals" => value_lc != txt_lc,
        "begins_with" => value_lc.starts_with(&txt_lc),
        "ends_with" => value_lc.ends_with(&txt_lc),
        "contains" => value_lc.contains(&txt_lc),
        "does_not_contains" => !value_lc.contains(&txt_lc),
        "greater_than" => ordering.is_some_and(|o| o.is_gt()),
        "greater_than_or_equal" => ordering.is_some_and(|o| o.is_ge()),
        "less_than" => ordering.is_some_and(|o| o.is_lt()),
        "less_than_or_equal" => ordering.is_some_and(|o| o.is_le()),
        _ => return None,
    };
    Some(result)
}
