//! Declarative route table.
//!
//! One [`RouteForward`] per endpoint; the handler factory supplies all the
//! plumbing. Upstream paths use the `/api/v1` prefix uniformly, except the
//! notes namespace, which the upstream serves under `/api/notes`.

use axum::http::Method;
use axum::Router;
use bytes::Bytes;

use crate::proxy::descriptor::{ResponseMode, RouteForward};
use crate::proxy::error::ProxyError;
use crate::proxy::handler::forward;
use crate::proxy::server::AppState;

// ---- files ----------------------------------------------------------------

static FILES_LIST: RouteForward =
    RouteForward::get(|_| Ok("/api/v1/files".to_string())).query();

static FILES_CREATE: RouteForward =
    RouteForward::new(Method::POST, |_| Ok("/api/v1/files".to_string()))
        .body()
        .authenticated();

static FILES_GET: RouteForward =
    RouteForward::get(|p| Ok(format!("/api/v1/files/{}", p.seg("file_id")?)));

static FILES_DELETE: RouteForward =
    RouteForward::new(Method::DELETE, |p| {
        Ok(format!("/api/v1/files/{}", p.seg("file_id")?))
    })
    .authenticated();

static FILES_RENAME_ONE: RouteForward = RouteForward::new(Method::PATCH, |p| {
    Ok(format!("/api/v1/files/{}/rename", p.seg("file_id")?))
})
.body()
.authenticated();

static FILES_RENAME_BULK: RouteForward =
    RouteForward::new(Method::POST, |_| Ok("/api/v1/files/rename".to_string()))
        .body()
        .validate(reject_notes_base_path)
        .authenticated();

static FILES_DOWNLOAD: RouteForward =
    RouteForward::get(|_| Ok("/api/v1/files/download".to_string()))
        .query()
        .mode(ResponseMode::Stream);

static FILES_THUMBNAIL: RouteForward = RouteForward::get(|p| {
    Ok(format!("/api/v1/files/{}/thumbnail", p.seg("file_id")?))
})
.mode(ResponseMode::Passthrough);

// ---- notes ----------------------------------------------------------------

static NOTES_LIST: RouteForward =
    RouteForward::get(|_| Ok("/api/notes".to_string())).query();

static NOTES_GET: RouteForward =
    RouteForward::get(|p| Ok(format!("/api/notes/{}", p.seg("note_id")?)));

static NOTES_CREATE: RouteForward =
    RouteForward::new(Method::POST, |_| Ok("/api/notes".to_string()))
        .body()
        .authenticated();

static NOTES_UPDATE: RouteForward = RouteForward::new(Method::PATCH, |p| {
    Ok(format!("/api/notes/{}", p.seg("note_id")?))
})
.body()
.authenticated();

static NOTES_DELETE: RouteForward = RouteForward::new(Method::DELETE, |p| {
    Ok(format!("/api/notes/{}", p.seg("note_id")?))
})
.authenticated();

// ---- websites -------------------------------------------------------------

static WEBSITES_LIST: RouteForward =
    RouteForward::get(|_| Ok("/api/v1/websites".to_string())).query();

static WEBSITES_CREATE: RouteForward =
    RouteForward::new(Method::POST, |_| Ok("/api/v1/websites".to_string()))
        .body()
        .authenticated();

static WEBSITES_UPDATE: RouteForward = RouteForward::new(Method::PATCH, |p| {
    Ok(format!("/api/v1/websites/{}", p.seg("website_id")?))
})
.body()
.authenticated();

static WEBSITES_DELETE: RouteForward = RouteForward::new(Method::DELETE, |p| {
    Ok(format!("/api/v1/websites/{}", p.seg("website_id")?))
})
.authenticated();

static WEBSITES_PIN: RouteForward = RouteForward::new(Method::PATCH, |p| {
    Ok(format!("/api/v1/websites/{}/pin", p.seg("website_id")?))
})
.body()
.authenticated();

static WEBSITES_PINNED_ORDER: RouteForward = RouteForward::new(Method::PATCH, |_| {
    Ok("/api/v1/websites/pinned-order".to_string())
})
.body()
.authenticated();

static WEBSITES_SCREENSHOT: RouteForward = RouteForward::get(|p| {
    Ok(format!(
        "/api/v1/websites/{}/screenshot",
        p.seg("website_id")?
    ))
})
.mode(ResponseMode::Passthrough);

/// Bulk file renames must not touch the notes namespace; those documents are
/// owned by the notes endpoints.
fn reject_notes_base_path(body: &Bytes) -> Result<(), ProxyError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ProxyError::Validation(format!("invalid JSON body: {e}")))?;
    let base_path = value
        .get("basePath")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if base_path == "notes" || base_path.starts_with("notes/") {
        return Err(ProxyError::Validation(
            "Notes are served from /api/notes".to_string(),
        ));
    }
    Ok(())
}

/// Assemble the forwarded routes. Static segments (`/files/download`,
/// `/files/rename`, `/websites/pinned-order`) take priority over captures at
/// the same position.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/files", forward(&FILES_LIST).merge(forward(&FILES_CREATE)))
        .route("/files/download", forward(&FILES_DOWNLOAD))
        .route("/files/rename", forward(&FILES_RENAME_BULK))
        .route(
            "/files/{file_id}",
            forward(&FILES_GET).merge(forward(&FILES_DELETE)),
        )
        .route("/files/{file_id}/rename", forward(&FILES_RENAME_ONE))
        .route("/files/{file_id}/thumbnail", forward(&FILES_THUMBNAIL))
        .route("/notes", forward(&NOTES_LIST).merge(forward(&NOTES_CREATE)))
        .route(
            "/notes/{note_id}",
            forward(&NOTES_GET)
                .merge(forward(&NOTES_UPDATE))
                .merge(forward(&NOTES_DELETE)),
        )
        .route(
            "/websites",
            forward(&WEBSITES_LIST).merge(forward(&WEBSITES_CREATE)),
        )
        .route("/websites/pinned-order", forward(&WEBSITES_PINNED_ORDER))
        .route(
            "/websites/{website_id}",
            forward(&WEBSITES_UPDATE).merge(forward(&WEBSITES_DELETE)),
        )
        .route("/websites/{website_id}/pin", forward(&WEBSITES_PIN))
        .route(
            "/websites/{website_id}/screenshot",
            forward(&WEBSITES_SCREENSHOT),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_guard_rejects_notes_base_path() {
        let body = Bytes::from(r#"{"basePath":"notes","from":"a","to":"b"}"#);
        let err = reject_notes_base_path(&body).unwrap_err();
        assert_eq!(err.to_string(), "Notes are served from /api/notes");
    }

    #[test]
    fn notes_guard_rejects_nested_notes_path() {
        let body = Bytes::from(r#"{"basePath":"notes/2024"}"#);
        assert!(reject_notes_base_path(&body).is_err());
    }

    #[test]
    fn notes_guard_allows_other_namespaces() {
        let body = Bytes::from(r#"{"basePath":"documents/notes"}"#);
        assert!(reject_notes_base_path(&body).is_ok());
    }

    #[test]
    fn notes_guard_rejects_malformed_json() {
        let body = Bytes::from("not json");
        assert!(matches!(
            reject_notes_base_path(&body),
            Err(ProxyError::Validation(_))
        ));
    }
}
