use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::clients::models::ClientPayload;
use crate::modules::clients::services::ClientService;

/// List all clients
/// GET /api/clients
pub async fn list_clients(
    service: web::Data<Arc<ClientService>>,
) -> Result<HttpResponse, AppError> {
    let clients = service.list().await?;

    Ok(HttpResponse::Ok().json(clients))
}

/// Get a client by id
/// GET /api/clients/{id}
pub async fn get_client(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get(id).await? {
        Some(client) => Ok(HttpResponse::Ok().json(client)),
        None => Err(AppError::not_found(format!("client {} not found", id))),
    }
}

/// Create a new client
/// POST /api/clients
pub async fn create_client(
    service: web::Data<Arc<ClientService>>,
    payload: web::Json<ClientPayload>,
) -> Result<HttpResponse, AppError> {
    let client = service
        .create(&payload.name, &payload.email, &payload.siret)
        .await?;

    Ok(HttpResponse::Created().json(client))
}

/// Update an existing client
/// PUT /api/clients/{id}
pub async fn update_client(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<i64>,
    payload: web::Json<ClientPayload>,
) -> Result<HttpResponse, AppError> {
    let client = service
        .update(path.into_inner(), &payload.name, &payload.email, &payload.siret)
        .await?;

    Ok(HttpResponse::Ok().json(client))
}

/// Delete a client with its invoices and their lines
/// DELETE /api/clients/{id}
pub async fn delete_client(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/clients")
            .route("", web::get().to(list_clients))
            .route("", web::post().to(create_client))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
