use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::input::{required_text, JsonBody};
use crate::{
    database::Database,
    error::AppError,
    models::{user, ByEmail, SizeCategory, User, UserResponse},
    services::{classification, seeding},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub business_name: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
    pub sector: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: &'static str,
    pub user: UserResponse,
}

fn or_default(value: Option<String>, default: fn() -> String) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(default)
}

pub async fn register(
    State(db): State<Database>,
    JsonBody(form): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let name = required_text(form.name, "name")?;
    let email = required_text(form.email, "email")?;
    let password = required_text(form.password, "password")?;

    let size_category = match form.size.as_deref().map(str::trim) {
        None | Some("") => SizeCategory::Micro,
        Some(label) => label.parse().map_err(AppError::Validation)?,
    };

    let new_user = User {
        id: String::new(),
        name,
        email: email.clone(),
        password,
        business_name: form.business_name.unwrap_or_default().trim().to_string(),
        business_type: form.business_type.unwrap_or_default().trim().to_string(),
        sector: or_default(form.sector, user::default_sector),
        location: or_default(form.location, user::default_location),
        size_category,
        created_at: Some(Utc::now()),
    };

    let saved = db
        .add_unless(new_user, &ByEmail(&email))?
        .ok_or_else(|| AppError::Conflict("User already exists with this email".to_string()))?;

    let starters = seeding::starter_products(&saved.business_type, &saved.id);
    let count = starters.len();
    db.add_many(starters)?;

    log::info!(
        "registered {} ({}) with {} starter products",
        saved.id,
        saved.business_type,
        count
    );

    Ok(Json(RegisterResponse {
        msg: "Registration Successful",
        user: saved.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub msg: &'static str,
    pub user_id: String,
    pub name: String,
    pub business_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub business_type: String,
    pub location: String,
    pub category: SizeCategory,
}

pub async fn login(
    State(db): State<Database>,
    JsonBody(form): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = required_text(form.email, "email")?;
    let password = form.password.unwrap_or_default();

    // Plain equality on the stored credential.
    let user = db
        .find::<User>(&ByEmail(&email))
        .filter(|u| u.password == password)
        .ok_or(AppError::InvalidCredentials)?;

    let category = classification::classify_and_persist(&db, &user.id)?;

    Ok(Json(LoginResponse {
        msg: "Login successful",
        user_id: user.id,
        name: user.name,
        business_name: user.business_name,
        email: user.email,
        business_type: user.business_type,
        location: user.location,
        category,
    }))
}
