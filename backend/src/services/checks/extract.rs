use crate::drafts::state::DraftsState;
use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::services::checks::service;
use crate::storage::Store;
use actix_web::{web, HttpResponse};
use common::model::tool::Tool;
use common::requests::ExtractRequest;
use log::info;

/// Scores a previously staged upload. The draft is consumed.
pub async fn process(
    tool: web::Path<Tool>,
    user: CurrentUser,
    store: web::Data<Store>,
    drafts: web::Data<DraftsState>,
    payload: web::Json<ExtractRequest>,
) -> Result<HttpResponse, CheckError> {
    let tool = tool.into_inner();
    let identity = user.into_inner();

    let draft = drafts
        .take(&payload.token, identity.id, tool)
        .await
        .ok_or_else(|| {
            CheckError::NotFound("Upload not found or expired. Please upload the file again.".into())
        })?;

    info!(
        "extracting '{}' ({}) for user {}",
        draft.filename, draft.fingerprint, identity.id
    );
    let store = store.get_ref().clone();
    let response = tokio::task::spawn_blocking(move || {
        service::run_check(&store, &identity, tool, &draft.filename, &draft.text)
    })
    .await??;
    Ok(HttpResponse::Ok().json(response))
}
