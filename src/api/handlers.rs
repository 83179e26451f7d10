use std::sync::{Mutex, MutexGuard};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use crate::api::format::{format_text, OutputFormat};
use crate::document::filters::Filters;
use crate::engine::search::{SearchEngine, SearchMode, SearchRequest};
use crate::error::{Error, Result};
use crate::extractor::ExtractorKind;
use crate::preprocessing::entities::Entity;
use crate::store::SortOrder;

pub type AppState = web::Data<Mutex<SearchEngine>>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "query")]
    pub q: String,
    pub limit: Option<usize>,
    pub mode: Option<String>,
    pub extractor: Option<String>,
    pub sort: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    pub query: String,
    pub limit: Option<usize>,
    pub mode: Option<String>,
    pub extractor: Option<String>,
    pub sort: Option<String>,
    pub format: Option<String>,
}

impl From<SearchBody> for SearchParams {
    fn from(body: SearchBody) -> Self {
        Self {
            q: body.query,
            limit: body.limit,
            mode: body.mode,
            extractor: body.extractor,
            sort: body.sort,
            format: body.format,
        }
    }
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T>
where
    T: std::str::FromStr<Err = Error> + Default,
{
    match value {
        Some(v) if !v.trim().is_empty() => v.parse(),
        _ => Ok(T::default()),
    }
}

impl SearchParams {
    fn into_request(self) -> Result<(SearchRequest, OutputFormat)> {
        let request = SearchRequest {
            limit: self.limit,
            mode: parse_or_default::<SearchMode>(self.mode.as_deref())?,
            extractor: parse_or_default::<ExtractorKind>(self.extractor.as_deref())?,
            sort: parse_or_default::<SortOrder>(self.sort.as_deref())?,
            query: self.q,
        };
        let format = parse_or_default::<OutputFormat>(self.format.as_deref())?;
        Ok((request, format))
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordsBody {
    pub query: String,
    pub extractor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub query: String,
    pub extractor: ExtractorKind,
    pub keywords: Vec<String>,
    pub entities: Vec<Entity>,
    pub filters: Filters,
}

fn lock(data: &AppState) -> Result<MutexGuard<'_, SearchEngine>> {
    data.lock().map_err(|_| Error::Poisoned)
}

fn run_search(params: SearchParams, data: &AppState) -> Result<HttpResponse> {
    let (request, format) = params.into_request()?;
    let engine = lock(data)?;
    let response = engine.search(&request)?;

    Ok(match format {
        OutputFormat::Json => HttpResponse::Ok().json(response),
        OutputFormat::Text => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(format_text(&response)),
    })
}

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Welcome to Data Scout!")
}

#[get("/search")]
async fn search_get(params: web::Query<SearchParams>, data: AppState) -> Result<HttpResponse> {
    run_search(params.into_inner(), &data)
}

#[post("/search")]
async fn search_post(body: web::Json<SearchBody>, data: AppState) -> Result<HttpResponse> {
    run_search(body.into_inner().into(), &data)
}

#[post("/keywords")]
async fn keywords(body: web::Json<KeywordsBody>, data: AppState) -> Result<HttpResponse> {
    let body = body.into_inner();
    let query = body.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidQuery("query must not be empty".to_string()));
    }
    let extractor = parse_or_default::<ExtractorKind>(body.extractor.as_deref())?;

    let extracted = lock(&data)?.extract(extractor, query);
    Ok(HttpResponse::Ok().json(KeywordsResponse {
        query: query.to_string(),
        extractor,
        keywords: extracted.keywords,
        entities: extracted.entities,
        filters: extracted.filters,
    }))
}

#[get("/stats")]
async fn stats(data: AppState) -> Result<HttpResponse> {
    let stats = lock(&data)?.stats();
    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| Error::InvalidArgument(err.to_string()).into()),
    )
    .app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| Error::InvalidArgument(err.to_string()).into()),
    );
    cfg.service(hello)
        .service(search_get)
        .service(search_post)
        .service(keywords)
        .service(stats);
}
