pub mod ai;
pub mod aggregation;
pub mod classification;
pub mod inventory;
pub mod schemes;
pub mod seeding;
