use crate::config::Settings;
use crate::drafts::state::{Draft, DraftsState};
use crate::engine::fingerprint::fingerprint;
use crate::engine::scanner::normalize_line_endings;
use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::services::checks::service;
use crate::storage::Store;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::submission::{StagedUpload, UploadStatus};
use common::model::tool::Tool;
use futures_util::StreamExt;
use log::info;
use std::time::Instant;

/// Reads the `file` part of a multipart upload, enforcing `max_bytes`.
/// Other parts are ignored.
async fn read_file_field(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<(String, Vec<u8>), CheckError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| CheckError::InvalidInput(format!("Malformed upload: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| CheckError::InvalidInput(format!("Malformed upload: {}", e)))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(CheckError::InvalidInput(format!(
                    "The file is larger than {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some((filename, bytes));
    }

    upload.ok_or_else(|| CheckError::InvalidInput("Missing file".into()))
}

/// Stages an uploaded file without scoring it. A student who already checked
/// the same content gets the stored results instead of a token.
pub async fn process(
    tool: web::Path<Tool>,
    user: CurrentUser,
    store: web::Data<Store>,
    drafts: web::Data<DraftsState>,
    settings: web::Data<Settings>,
    payload: Multipart,
) -> Result<HttpResponse, CheckError> {
    let tool = tool.into_inner();
    let identity = user.into_inner();

    let (filename, bytes) = read_file_field(payload, settings.max_upload_bytes).await?;
    let filename = service::validate_filename(&filename)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| CheckError::InvalidInput("The file is not valid UTF-8 text".into()))?;
    if text.trim().is_empty() {
        return Err(CheckError::InvalidInput(
            "The submitted file has no content".into(),
        ));
    }
    let text = normalize_line_endings(&text);
    let code_hash = fingerprint(&text);

    let replay = {
        let store = store.get_ref().clone();
        let identity = identity.clone();
        let filename = filename.clone();
        let code_hash = code_hash.clone();
        tokio::task::spawn_blocking(move || {
            service::precheck(&store, &identity, tool, &filename, &code_hash)
        })
        .await??
    };

    if let Some(response) = replay {
        return Ok(HttpResponse::Ok().json(StagedUpload {
            status: UploadStatus::AlreadyChecked,
            token: None,
            filename,
            message: response.message,
            results: response.results,
        }));
    }

    let message = format!(
        "File '{}' uploaded by user '{}'. Ready to extract.",
        filename, identity.username
    );
    let token = drafts
        .stage(Draft {
            owner_id: identity.id,
            tool,
            filename: filename.clone(),
            text,
            fingerprint: code_hash,
            staged_at: Instant::now(),
        })
        .await;
    info!("staged '{}' for user {} ({})", filename, identity.id, tool);

    Ok(HttpResponse::Ok().json(StagedUpload {
        status: UploadStatus::Ready,
        token: Some(token),
        filename,
        message,
        results: Vec::new(),
    }))
}
