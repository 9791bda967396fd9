// src/handlers/favorites.rs
// DOCUMENTATION: HTTP handlers for favorite cafés
// PURPOSE: List, add, toggle and remove favorites

use crate::errors::CafeError;
use crate::models::Cafe;
use crate::services::FavoritesStore;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /favorites
pub async fn list_favorites(store: web::Data<FavoritesStore>) -> impl Responder {
    let favorites = store.list().await;
    HttpResponse::Ok().json(json!({
        "count": favorites.len(),
        "favorites": favorites,
    }))
}

/// POST /favorites
/// 201 when the café was added, 200 when it already was a favorite
pub async fn add_favorite(
    store: web::Data<FavoritesStore>,
    cafe: web::Json<Cafe>,
) -> Result<impl Responder, CafeError> {
    let id = cafe.id;
    let added = store.add(cafe.into_inner()).await?;

    let body = json!({ "id": id, "isFavorite": true, "added": added });
    if added {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

/// POST /favorites/toggle
pub async fn toggle_favorite(
    store: web::Data<FavoritesStore>,
    cafe: web::Json<Cafe>,
) -> Result<impl Responder, CafeError> {
    let id = cafe.id;
    let is_favorite = store.toggle(cafe.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": id, "isFavorite": is_favorite })))
}

/// DELETE /favorites/{id}
pub async fn remove_favorite(
    store: web::Data<FavoritesStore>,
    path: web::Path<i64>,
) -> Result<impl Responder, CafeError> {
    let id = path.into_inner();
    let removed = store.remove(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": id, "removed": removed })))
}

/// DELETE /favorites
pub async fn clear_favorites(store: web::Data<FavoritesStore>) -> Result<impl Responder, CafeError> {
    store.clear().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("", web::delete().to(clear_favorites))
            .route("/toggle", web::post().to(toggle_favorite))
            .route("/{id}", web::delete().to(remove_favorite)),
    );
}
