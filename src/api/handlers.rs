//! HTTP request handlers.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Extension, Form, Json,
};

use crate::api::types::*;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{AdminIdentity, MenuItemPatch, NewMenuItem};
use crate::error::{BistroError, BistroResult};
use crate::AppState;

// ==================== Authentication Endpoints ====================

/// Login with admin credentials to obtain a bearer token.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> BistroResult<Json<LoginResponse>> {
    let admin = state
        .repository
        .find_admin_by_username(&form.username)
        .await?
        .filter(|admin| verify_password(&form.password, &admin.password_hash))
        .ok_or_else(|| {
            tracing::warn!(username = %form.username, "Failed login attempt");
            BistroError::InvalidCredentials
        })?;

    let token = state.jwt_manager.generate_token(&admin.username)?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// Get the authenticated admin's account data.
///
/// GET /api/admin/me
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Current admin info", body = AdminResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "admins"
)]
pub async fn get_current_admin(
    Extension(identity): Extension<AdminIdentity>,
) -> Json<AdminResponse> {
    Json(AdminResponse::from(identity))
}

// ==================== Admin Management ====================

/// Create a new admin account.
///
/// POST /api/admins
#[utoipa::path(
    post,
    path = "/api/admins",
    request_body(content = AdminForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "admins"
)]
pub async fn create_admin(
    State(state): State<AppState>,
    Form(form): Form<AdminForm>,
) -> BistroResult<(StatusCode, Json<AdminResponse>)> {
    if form.username.trim().is_empty() {
        return Err(BistroError::BadRequest("Username must not be empty".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let admin = state
        .repository
        .insert_admin(&form.username, form.email.as_deref(), &password_hash)
        .await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin created");

    Ok((StatusCode::CREATED, Json(AdminResponse::from(&admin))))
}

/// Update an admin's username, email, and password.
///
/// PUT /api/admins/:id
#[utoipa::path(
    put,
    path = "/api/admins/{id}",
    request_body(content = AdminForm, content_type = "application/x-www-form-urlencoded"),
    params(("id" = i64, Path, description = "Admin id")),
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "admins"
)]
pub async fn update_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<AdminForm>,
) -> BistroResult<Json<AdminResponse>> {
    if form.username.trim().is_empty() {
        return Err(BistroError::BadRequest("Username must not be empty".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let admin = state
        .repository
        .update_admin(id, &form.username, form.email.as_deref(), &password_hash)
        .await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin updated");

    Ok(Json(AdminResponse::from(&admin)))
}

// ==================== Menu Endpoints ====================

/// List all menu items for the public page.
///
/// GET /api/menu-items
#[utoipa::path(
    get,
    path = "/api/menu-items",
    responses(
        (status = 200, description = "All menu items", body = [MenuItemResponse])
    ),
    tag = "menu"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
) -> BistroResult<Json<Vec<MenuItemResponse>>> {
    let items = state.repository.list_menu_items().await?;
    Ok(Json(items.into_iter().map(MenuItemResponse::from).collect()))
}

/// Create a menu item, with an optional image upload.
///
/// POST /api/menu (multipart/form-data)
#[utoipa::path(
    post,
    path = "/api/menu",
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    multipart: Multipart,
) -> BistroResult<(StatusCode, Json<MenuItemResponse>)> {
    let fields = read_menu_multipart(multipart, &state).await?;

    // The image hits disk during parsing; a failed create must not
    // leave it orphaned.
    let new_image = fields.image.clone();
    match insert_menu_item_from_fields(&state, fields).await {
        Ok(item) => {
            tracing::info!(item_id = item.id, name = %item.name, "Menu item created");
            Ok((StatusCode::CREATED, Json(MenuItemResponse::from(item))))
        }
        Err(e) => {
            if let Some(stored) = new_image {
                state.images.remove(&stored).await;
            }
            Err(e)
        }
    }
}

async fn insert_menu_item_from_fields(
    state: &AppState,
    fields: MenuItemPatch,
) -> BistroResult<crate::domain::MenuItem> {
    let new_item = NewMenuItem {
        name: fields.name.ok_or_else(|| missing("name"))?,
        description: fields.description.ok_or_else(|| missing("description"))?,
        price: fields.price.ok_or_else(|| missing("price"))?,
        category: fields.category.ok_or_else(|| missing("category"))?,
        image: fields.image,
        special: fields.special.unwrap_or(false),
    };

    state.repository.insert_menu_item(&new_item).await
}

/// Partially update a menu item; an uploaded image replaces the old one.
///
/// PUT /api/menu/:id (multipart/form-data)
#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> BistroResult<Json<MenuItemResponse>> {
    let patch = read_menu_multipart(multipart, &state).await?;

    if patch.is_empty() {
        return Err(BistroError::BadRequest("No fields to update".to_string()));
    }

    // Same orphan concern as on create: a failed update must not leave
    // the fresh upload behind.
    let new_image = patch.image.clone();
    match update_item_and_swap_image(&state, id, &patch).await {
        Ok(item) => {
            tracing::info!(item_id = item.id, name = %item.name, "Menu item updated");
            Ok(Json(MenuItemResponse::from(item)))
        }
        Err(e) => {
            if let Some(stored) = new_image {
                state.images.remove(&stored).await;
            }
            Err(e)
        }
    }
}

async fn update_item_and_swap_image(
    state: &AppState,
    id: i64,
    patch: &MenuItemPatch,
) -> BistroResult<crate::domain::MenuItem> {
    // Grab the previous image before the update so a replacement can be
    // cleaned off disk afterwards.
    let previous_image = if patch.image.is_some() {
        state
            .repository
            .get_menu_item(id)
            .await?
            .and_then(|item| item.image)
    } else {
        None
    };

    let item = state.repository.update_menu_item(id, patch).await?;

    if let Some(old) = previous_image {
        state.images.remove(&old).await;
    }

    Ok(item)
}

/// Delete a menu item and its stored image.
///
/// DELETE /api/menu/:id
#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BistroResult<Json<MessageResponse>> {
    let item = state.repository.delete_menu_item(id).await?;

    if let Some(image) = &item.image {
        state.images.remove(image).await;
    }

    tracing::info!(item_id = item.id, name = %item.name, "Menu item deleted");

    Ok(Json(MessageResponse {
        message: "Menu item deleted".to_string(),
    }))
}

// ==================== Health ====================

/// Service health and database connectivity.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1").execute(state.repository.pool()).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::error!(error = %e, "Health check database probe failed");
            "error".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ==================== Multipart parsing ====================

fn missing(field: &str) -> BistroError {
    BistroError::BadRequest(format!("Missing field: {}", field))
}

async fn text_field(field: Field<'_>, name: &str) -> BistroResult<String> {
    field
        .text()
        .await
        .map_err(|e| BistroError::BadRequest(format!("Invalid {} field: {}", name, e)))
}

/// Read the menu item multipart fields. Unknown fields are ignored; an
/// uploaded image is stored immediately and arrives in the patch as its
/// stored filename.
async fn read_menu_multipart(
    mut multipart: Multipart,
    state: &AppState,
) -> BistroResult<MenuItemPatch> {
    let mut patch = MenuItemPatch::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BistroError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "name" => patch.name = Some(text_field(field, "name").await?),
            "description" => patch.description = Some(text_field(field, "description").await?),
            "category" => patch.category = Some(text_field(field, "category").await?),
            "price" => {
                let raw = text_field(field, "price").await?;
                let price = raw
                    .parse::<f64>()
                    .map_err(|_| BistroError::BadRequest(format!("Invalid price: {}", raw)))?;
                if price < 0.0 {
                    return Err(BistroError::BadRequest(format!("Invalid price: {}", raw)));
                }
                patch.price = Some(price);
            }
            "special" => {
                let raw = text_field(field, "special").await?;
                patch.special = Some(matches!(raw.as_str(), "true" | "1" | "on"));
            }
            "image" => {
                let original = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    BistroError::BadRequest(format!("Invalid image upload: {}", e))
                })?;
                // An empty file input still submits the field; skip it.
                if !bytes.is_empty() {
                    patch.image = Some(state.images.save(&original, &bytes).await?);
                }
            }
            _ => {}
        }
    }

    Ok(patch)
}
