pub mod admin;
pub mod error;
pub mod export;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod session;
pub mod state;
pub mod structured_data;
pub mod templates;
pub mod views;

pub use router::app_router;
pub use state::AppState;
