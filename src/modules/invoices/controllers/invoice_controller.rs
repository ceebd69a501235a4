use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::invoices::models::{AddLinePayload, InvoicePayload};
use crate::modules::invoices::services::InvoiceService;

/// List all invoices
/// GET /api/invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list().await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// Get an invoice by id, with lines and client resolved
/// GET /api/invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get(id).await? {
        Some(invoice) => Ok(HttpResponse::Ok().json(invoice)),
        None => Err(AppError::not_found(format!("invoice {} not found", id))),
    }
}

/// List the invoices of one client
/// GET /api/invoices/client/{client_id}
pub async fn list_invoices_for_client(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_for_client(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// Create a new invoice bound to an existing client
/// POST /api/invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    payload: web::Json<InvoicePayload>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.create(payload.client_id, payload.date).await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// Add a line to an invoice
/// POST /api/invoices/{id}/lines
pub async fn add_invoice_line(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
    payload: web::Json<AddLinePayload>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .add_line(path.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Reassign an invoice's client and date
/// PUT /api/invoices/{id}
pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
    payload: web::Json<InvoicePayload>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update(path.into_inner(), payload.client_id, payload.date)
        .await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Delete an invoice with its lines
/// DELETE /api/invoices/{id}
pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Export the full invoice record: client, lines and totals
/// GET /api/invoices/{id}/export
pub async fn export_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get(id).await? {
        Some(invoice) => Ok(HttpResponse::Ok().json(invoice)),
        None => Err(AppError::not_found(format!("invoice {} not found", id))),
    }
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/invoices")
            .route("", web::get().to(list_invoices))
            .route("", web::post().to(create_invoice))
            // Registered before /{id} so "client" is not captured as an id
            .route("/client/{client_id}", web::get().to(list_invoices_for_client))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice))
            .route("/{id}/lines", web::post().to(add_invoice_line))
            .route("/{id}/export", web::get().to(export_invoice)),
    );
}
