pub mod ranking;
pub mod registration;
pub mod tournament;
pub mod user;
pub mod winner;
