use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::services::checks::service;
use crate::storage::Store;
use actix_web::{web, HttpResponse};
use common::model::tool::Tool;
use common::requests::FileQuery;

pub async fn process(
    tool: web::Path<Tool>,
    user: CurrentUser,
    store: web::Data<Store>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, CheckError> {
    let tool = tool.into_inner();
    let identity = user.into_inner();
    let filename = query.into_inner().filename;
    let store = store.get_ref().clone();

    let response = tokio::task::spawn_blocking(move || {
        service::stored_results(&store, &identity, tool, &filename)
    })
    .await??;
    Ok(HttpResponse::Ok().json(response))
}
