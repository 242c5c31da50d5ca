use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use ahash::AHashMap;
use jobscout_engine::{Embedder, Error, RetrieveOptions, Retriever};
use jobscout_store::{FragmentInput, PostingStore};
use serde::Deserialize;
use tracing::{info, warn};

/// Shared handler state: the engine plus direct store access for the
/// ingest and analytics surfaces.
#[derive(Clone)]
pub struct AppState {
    pub retriever: Retriever,
    pub store: Arc<PostingStore>,
}

fn default_k() -> usize {
    8
}
fn default_ask_k() -> usize {
    5
}
fn default_per_doc() -> usize {
    2
}
fn default_candidates() -> usize {
    250
}
fn default_weight() -> f32 {
    0.25
}
fn default_max_quote() -> usize {
    800
}
fn default_ask_max_quote() -> usize {
    700
}
fn default_true() -> bool {
    true
}
fn default_tech_limit() -> usize {
    20
}
fn default_keyword_limit() -> usize {
    30
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default = "default_k")]
    k: usize,
    #[serde(default = "default_per_doc")]
    per_doc: usize,
    #[serde(default = "default_candidates")]
    candidates: usize,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default = "default_max_quote")]
    max_quote: usize,
    #[serde(default = "default_true")]
    highlight: bool,
}

#[derive(Deserialize)]
struct AskParams {
    q: String,
    #[serde(default = "default_ask_k")]
    k: usize,
    #[serde(default = "default_per_doc")]
    per_doc: usize,
    #[serde(default = "default_candidates")]
    candidates: usize,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default = "default_ask_max_quote")]
    max_quote: usize,
    #[serde(default = "default_true")]
    highlight: bool,
}

#[derive(Deserialize)]
struct LimitParams {
    #[serde(default = "default_tech_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct KeywordLimitParams {
    #[serde(default = "default_keyword_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct IngestRequest {
    postings: Vec<PostingRequest>,
}

#[derive(Deserialize)]
struct PostingRequest {
    id: u64,
    name: String,
    #[serde(default)]
    employer_name: Option<String>,
    #[serde(default)]
    area_name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    fragments: Vec<String>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        let data = web::Data::new(state);
        info!(port, "REST API listening");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(data.clone())
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Route table, shared between the server and handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/stats", web::get().to(stats))
        .route("/search", web::get().to(search))
        .route("/ask", web::get().to(ask))
        .route("/market/tech-top", web::get().to(market_tech_top))
        .route("/market/geo", web::get().to(market_geo))
        .route("/market/employers", web::get().to(market_employers))
        .route("/market/keywords", web::get().to(market_keywords))
        .route("/postings", web::put().to(put_postings))
        .route("/postings/{id}", web::get().to(get_posting))
        .route("/postings/{id}", web::delete().to(delete_posting));
}

fn engine_error(err: &Error) -> HttpResponse {
    warn!(error = %err, "retrieval failed");
    if err.is_collaborator_failure() {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": err.to_string()
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": err.to_string()
        }))
    }
}

fn query_too_short(q: &str) -> bool {
    q.trim().chars().count() < 2
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

async fn stats(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let counts = state.store.counts();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "postings": counts.postings,
        "fragments": counts.fragments,
        "embedded_fragments": counts.embedded,
        "trigram_enabled": state.store.config().enable_trigram,
        "vector_dim": state.store.config().vector_dim,
    })))
}

async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    if query_too_short(&params.q) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "query must be at least 2 characters"
        })));
    }

    let opts = RetrieveOptions {
        k: params.k,
        per_doc: params.per_doc,
        candidates: params.candidates,
        weight: params.weight,
        max_quote_len: params.max_quote,
        highlight: params.highlight,
        ..Default::default()
    };
    match state.retriever.retrieve(&params.q, &opts).await {
        Ok(retrieval) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "query": params.q,
            "k": params.k,
            "per_doc": params.per_doc,
            "hybrid_used": retrieval.hybrid_used,
            "weight_used": retrieval.weight_used,
            "results": retrieval.results,
        }))),
        Err(err) => Ok(engine_error(&err)),
    }
}

async fn ask(
    state: web::Data<AppState>,
    params: web::Query<AskParams>,
) -> ActixResult<HttpResponse> {
    if query_too_short(&params.q) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "query must be at least 2 characters"
        })));
    }

    let opts = RetrieveOptions {
        k: params.k,
        per_doc: params.per_doc,
        candidates: params.candidates,
        weight: params.weight,
        max_quote_len: params.max_quote,
        highlight: params.highlight,
        explain: true,
        ..Default::default()
    };
    let retrieval = match state.retriever.retrieve(&params.q, &opts).await {
        Ok(retrieval) => retrieval,
        Err(err) => return Ok(engine_error(&err)),
    };

    // Technology-term frequency over every evidence fragment. Highlight
    // markers are stripped first; the single-pass highlighter guarantees
    // that recovers the normalized fragment text.
    let mut tech_counts: AHashMap<String, usize> = AHashMap::new();
    for result in &retrieval.results {
        for evidence in &result.evidence {
            let plain = evidence.text.replace(['[', ']'], "");
            for term in jobscout_text::tech_terms(&plain) {
                *tech_counts.entry(term).or_insert(0) += 1;
            }
        }
    }
    let mut ranked: Vec<(String, usize)> = tech_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let tech_signals: Vec<String> = ranked.into_iter().take(10).map(|(t, _)| t).collect();

    let keywords =
        jobscout_text::query_keywords(&params.q, jobscout_engine::MAX_QUERY_KEYWORDS);
    let mut summary_parts = Vec::new();
    if !tech_signals.is_empty() {
        summary_parts.push(format!("Tech signals: {}", tech_signals.join(", ")));
    }
    if !keywords.is_empty() {
        summary_parts.push(format!("Query keywords: {}", keywords.join(", ")));
    }
    let summary_text = if summary_parts.is_empty() {
        "Results are ranked by semantic closeness with quoted evidence.".to_string()
    } else {
        summary_parts.join(" | ")
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "query": params.q,
        "hybrid_used": retrieval.hybrid_used,
        "weight_used": retrieval.weight_used,
        "k": params.k,
        "per_doc": params.per_doc,
        "results": retrieval.results,
        "summary": {
            "text": summary_text,
            "query_keywords": keywords,
            "tech_signals": tech_signals,
            "notes": [
                "Results are grouped by posting, not by fragment.",
                "Quotes are posting fragments kept as retrieval evidence.",
            ],
        },
    })))
}

async fn market_tech_top(
    state: web::Data<AppState>,
    params: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for (_, text) in state.store.documents() {
        for term in jobscout_text::tech_terms(&text) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }
    let mut top: Vec<(String, usize)> = counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let top: Vec<serde_json::Value> = top
        .into_iter()
        .take(params.limit)
        .map(|(term, postings)| serde_json::json!({ "term": term, "postings": postings }))
        .collect();
    Ok(HttpResponse::Ok().json(top))
}

fn count_meta_field<F>(state: &AppState, limit: usize, field: F) -> Vec<(String, usize)>
where
    F: Fn(&jobscout_engine::DocumentMeta) -> Option<&str>,
{
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for meta in state.store.posting_metas() {
        if let Some(value) = field(&meta) {
            if !value.trim().is_empty() {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
    }
    let mut top: Vec<(String, usize)> = counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    top.truncate(limit);
    top
}

async fn market_geo(
    state: web::Data<AppState>,
    params: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    let top: Vec<serde_json::Value> =
        count_meta_field(&state, params.limit, |m| m.area_name.as_deref())
            .into_iter()
            .map(|(area, count)| serde_json::json!({ "area_name": area, "count": count }))
            .collect();
    Ok(HttpResponse::Ok().json(top))
}

async fn market_employers(
    state: web::Data<AppState>,
    params: web::Query<LimitParams>,
) -> ActixResult<HttpResponse> {
    let top: Vec<serde_json::Value> =
        count_meta_field(&state, params.limit, |m| m.employer_name.as_deref())
            .into_iter()
            .map(|(employer, count)| {
                serde_json::json!({ "employer_name": employer, "count": count })
            })
            .collect();
    Ok(HttpResponse::Ok().json(top))
}

async fn market_keywords(
    state: web::Data<AppState>,
    params: web::Query<KeywordLimitParams>,
) -> ActixResult<HttpResponse> {
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for text in state.store.fragment_texts() {
        for token in jobscout_text::content_tokens(&text) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    let mut top: Vec<(String, usize)> = counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let top: Vec<serde_json::Value> = top
        .into_iter()
        .take(params.limit)
        .map(|(keyword, count)| serde_json::json!({ "keyword": keyword, "count": count }))
        .collect();
    Ok(HttpResponse::Ok().json(top))
}

async fn put_postings(
    state: web::Data<AppState>,
    req: web::Json<IngestRequest>,
) -> ActixResult<HttpResponse> {
    let embedder = state.retriever.embedder();
    let mut upserted = 0usize;

    for posting in req.into_inner().postings {
        let mut fragments = Vec::with_capacity(posting.fragments.len());
        for text in posting.fragments {
            let embedding = match embedder.embed(&text).await {
                Ok(embedding) => embedding,
                Err(err) => return Ok(engine_error(&err)),
            };
            fragments.push(FragmentInput::new(text, embedding));
        }

        let meta = jobscout_engine::DocumentMeta {
            name: posting.name,
            employer_name: posting.employer_name,
            area_name: posting.area_name,
            url: posting.url,
        };
        if let Err(err) = state.store.upsert_posting(posting.id, meta, fragments) {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": err.to_string()
            })));
        }
        upserted += 1;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "upserted": upserted,
    })))
}

async fn get_posting(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> ActixResult<HttpResponse> {
    let doc_id = path.into_inner();
    match state.store.posting(doc_id) {
        Some((meta, fragments)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "id": doc_id,
            "name": meta.name,
            "employer_name": meta.employer_name,
            "area_name": meta.area_name,
            "url": meta.url,
            "fragments": fragments,
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "posting not found"
        }))),
    }
}

async fn delete_posting(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> ActixResult<HttpResponse> {
    let doc_id = path.into_inner();
    match state.store.remove_posting(doc_id) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))),
        Err(_) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "posting not found"
        }))),
    }
}
