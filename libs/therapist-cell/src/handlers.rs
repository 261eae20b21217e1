use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{BookingView, RegisterTherapistRequest, UpdateProfileRequest};
use crate::services::{
    booking::{unique_client_names, BookingService},
    intake::CredentialsService,
    therapist::TherapistService,
};

/// POST / — public registration. Multipart form with the therapist fields
/// and an optional file under key `credentials`. Every failure on this
/// route maps to 400.
#[axum::debug_handler]
pub async fn register_therapist(
    State(state): State<Arc<AppConfig>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut name = None;
    let mut email = None;
    let mut password = None;
    let mut license = None;
    let mut expertise: Vec<String> = Vec::new();
    let mut years = None;
    let mut institution = None;
    let mut credentials: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        if field_name == "credentials" {
            let file_name = field
                .file_name()
                .unwrap_or("credentials")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {}", e)))?;
            credentials = Some((file_name, bytes.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart field: {}", e)))?;

        match field_name.as_str() {
            "name" => name = Some(value),
            "email" => email = Some(value),
            "password" => password = Some(value),
            "license" => license = Some(value),
            // A lone value yields a one-element sequence; repeated fields
            // accumulate in submission order.
            "expertise" => expertise.push(value),
            "years" => years = Some(value),
            "institution" => institution = Some(value),
            _ => {}
        }
    }

    let years = years
        .ok_or_else(|| AppError::Validation("years is required".to_string()))?
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation("years must be a non-negative number".to_string()))?;

    let request = RegisterTherapistRequest {
        name: name.ok_or_else(|| AppError::Validation("name is required".to_string()))?,
        email: email.ok_or_else(|| AppError::Validation("email is required".to_string()))?,
        password: password.ok_or_else(|| AppError::Validation("password is required".to_string()))?,
        license: license.ok_or_else(|| AppError::Validation("license is required".to_string()))?,
        expertise,
        years,
        institution: institution
            .ok_or_else(|| AppError::Validation("institution is required".to_string()))?,
    };
    request.validate().map_err(AppError::Validation)?;

    let credentials_url = match credentials {
        Some((file_name, bytes)) => {
            let intake = CredentialsService::new(&state);
            intake
                .store(&file_name, &bytes)
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?
        }
        None => String::new(),
    };

    let therapist_service = TherapistService::new(&state);
    let therapist = therapist_service
        .register(request, &credentials_url)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Therapist registered successfully",
            "therapist": therapist
        })),
    ))
}

/// GET /profile — the caller's own profile projection, with display-label
/// fallbacks applied read-side.
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let therapist_service = TherapistService::new(&state);

    let profile = therapist_service
        .fetch_profile(&user.id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Therapist not found".to_string()))?;

    Ok(Json(json!({
        "name": profile.name,
        "email": profile.email,
        "role": profile.role_label(),
        "status": profile.status_label()
    })))
}

/// PUT /profile — merge-patch the caller's own record. Succeeds whether or
/// not the record exists; no existence check is made.
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let therapist_service = TherapistService::new(&state);

    therapist_service
        .update_profile(&user.id, request, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}

/// GET /bookings — the caller's bookings in store-return order, client
/// reference resolved to a name or `"Unknown"`.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let bookings = booking_service
        .for_therapist(&user.id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let views: Vec<BookingView> = bookings.iter().map(BookingView::from_record).collect();

    Ok(Json(json!(views)))
}

/// GET /clients — unique client names across the caller's bookings,
/// first-occurrence order.
#[axum::debug_handler]
pub async fn list_clients(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let booking_service = BookingService::new(&state);

    let bookings = booking_service
        .for_therapist(&user.id, token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let names = unique_client_names(&bookings);

    Ok(Json(json!(names)))
}
