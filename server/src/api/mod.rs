//! HTTP endpoints for the file storage API.
//!
//! Four endpoints, one per storage operation, all addressing the target
//! item through the `filename` query parameter. Handlers stay thin:
//! extract the name, gather the body where one is expected, call the
//! storage service, and phrase the outcome. Error classification and its
//! status mapping live on [`StorageError`](crate::error::StorageError).

use actix_web::error::ErrorInternalServerError;
use actix_web::http::header;
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use log::{debug, warn};
use serde::Deserialize;

use crate::app_state::AppState;

/// Query parameters shared by every file endpoint.
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub filename: String,
}

/// Collects the request body into one buffer.
///
/// An empty body is not an error; it becomes a zero-length item.
async fn collect_payload(mut payload: web::Payload) -> Result<Bytes, Error> {
    let mut bytes = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            warn!("error reading payload chunk: {}", err);
            ErrorInternalServerError("Error reading payload")
        })?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes.freeze())
}

#[post("/file/create")]
pub async fn create(
    query: web::Query<FileQuery>,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let name = query.into_inner().filename;
    log_mdc::insert("filename", &name);
    debug!("create requested for {}", name);

    let content = collect_payload(payload).await?;
    app_state.storage_service.create(&name, content).await?;

    Ok(HttpResponse::Created().body(format!("File {} created successfully.", name)))
}

#[get("/file/read")]
pub async fn read(
    query: web::Query<FileQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let name = query.into_inner().filename;
    log_mdc::insert("filename", &name);
    debug!("read requested for {}", name);

    let content = app_state.storage_service.read(&name).await?;

    // The item lock is already released; the client drains the stream at
    // its own pace without holding up writers of the same name.
    let mut response = HttpResponse::Ok();
    response
        .content_type("application/octet-stream")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ))
        .no_chunking(content.len());
    Ok(response.streaming(content.into_stream()))
}

#[put("/file/update")]
pub async fn update(
    query: web::Query<FileQuery>,
    payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let name = query.into_inner().filename;
    log_mdc::insert("filename", &name);
    debug!("update requested for {}", name);

    let content = collect_payload(payload).await?;
    app_state.storage_service.update(&name, content).await?;

    Ok(HttpResponse::Ok().body(format!("File {} updated successfully.", name)))
}

#[delete("/file/delete")]
pub async fn delete(
    query: web::Query<FileQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let name = query.into_inner().filename;
    log_mdc::insert("filename", &name);
    debug!("delete requested for {}", name);

    app_state.storage_service.delete(&name).await?;

    Ok(HttpResponse::Ok().body(format!("File {} deleted successfully.", name)))
}
