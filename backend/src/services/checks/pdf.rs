use crate::config::Settings;
use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::services::checks::service;
use crate::storage::Store;
use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{web, HttpResponse};
use common::model::tool::Tool;
use common::requests::FileQuery;
use log::info;

/// Downloads the caller's latest result for a file as a PDF attachment.
pub async fn process(
    tool: web::Path<Tool>,
    user: CurrentUser,
    store: web::Data<Store>,
    settings: web::Data<Settings>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, CheckError> {
    let tool = tool.into_inner();
    let identity = user.into_inner();
    let filename = query.into_inner().filename;
    let store = store.get_ref().clone();
    let pdf_settings = settings.pdf.clone();

    let (download_name, bytes) = tokio::task::spawn_blocking(move || {
        service::export_pdf(&store, &identity, tool, &filename, &pdf_settings)
    })
    .await??;
    info!("exported {} ({} bytes)", download_name, bytes.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name),
        ))
        .body(bytes))
}
