pub mod registration;
pub mod tournament;
pub mod user;

pub use registration::Registration;
pub use tournament::{Tournament, TournamentStatus};
pub use user::User;
