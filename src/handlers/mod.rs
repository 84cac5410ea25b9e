pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod input;
pub mod inventory;
pub mod marketing;
pub mod schemes;

pub async fn index() -> &'static str {
    "MSME Business Intelligence Dashboard API is running"
}
