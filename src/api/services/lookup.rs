use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::services::{GeoLocator, LookupOutcome};
use crate::utils::resolve_target_ip;

/// 成功查询响应的浏览器缓存时间
pub const RESPONSE_MAX_AGE: u64 = 3600;

pub struct LookupService;

impl LookupService {
    /// 所有方法、所有路径的统一入口
    pub async fn handle_lookup(
        req: HttpRequest,
        locator: web::Data<Arc<GeoLocator>>,
    ) -> HttpResponse {
        let method = req.method();
        if method == Method::OPTIONS {
            return HttpResponse::Ok().finish();
        }
        if method != Method::GET {
            trace!("Rejected {} {}", method, req.path());
            return Self::error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let target = match resolve_target_ip(req.path(), req.headers()) {
            Ok(ip) => ip,
            Err(e) => {
                debug!("Invalid IP in path {:?}", req.path());
                return Self::error_response(StatusCode::BAD_REQUEST, e.message());
            }
        };

        match locator.locate(&target).await {
            Ok(outcome) => Self::outcome_response(&outcome),
            Err(e) => {
                error!("Lookup for {} failed: {}", target, e);
                Self::internal_error(&e.to_string())
            }
        }
    }

    fn outcome_response(outcome: &LookupOutcome) -> HttpResponse {
        match serde_json::to_string_pretty(outcome) {
            Ok(body) => HttpResponse::Ok()
                .content_type(ContentType::json())
                .insert_header((
                    CACHE_CONTROL,
                    format!("public, max-age={}", RESPONSE_MAX_AGE),
                ))
                .body(body),
            Err(e) => {
                error!(
                    "Failed to serialize lookup result for {}: {}",
                    outcome.ip(),
                    e
                );
                Self::internal_error(&e.to_string())
            }
        }
    }

    fn internal_error(message: &str) -> HttpResponse {
        Self::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Internal server error: {}", message),
        )
    }

    fn error_response(status: StatusCode, message: &str) -> HttpResponse {
        HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(json!({ "error": message }).to_string())
    }
}

pub fn lookup_routes() -> actix_web::Scope {
    web::scope("").route("/{path:.*}", web::route().to(LookupService::handle_lookup))
}
