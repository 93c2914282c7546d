pub mod auth;
pub mod rankings;
pub mod tournaments;
pub mod winners;
