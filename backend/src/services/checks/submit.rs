use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::services::checks::service;
use crate::storage::Store;
use actix_web::{web, HttpResponse};
use common::model::tool::Tool;
use common::requests::SubmitRequest;
use log::info;

/// Scores a submission sent as JSON in a single step.
pub async fn process(
    tool: web::Path<Tool>,
    user: CurrentUser,
    store: web::Data<Store>,
    payload: web::Json<SubmitRequest>,
) -> Result<HttpResponse, CheckError> {
    let tool = tool.into_inner();
    let identity = user.into_inner();
    let request = payload.into_inner();
    let store = store.get_ref().clone();
    info!(
        "{} submit of '{}' by user {}",
        tool, request.filename, identity.id
    );

    let response = tokio::task::spawn_blocking(move || {
        service::run_check(&store, &identity, tool, &request.filename, &request.text)
    })
    .await??;
    Ok(HttpResponse::Ok().json(response))
}
