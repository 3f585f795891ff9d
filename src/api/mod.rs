pub mod extract;
pub mod state;

pub use extract::{AuthUser, ValidatedJson};
pub use state::AppState;
