mod bootstrap;
mod state;

pub use bootstrap::bootstrap;
pub use state::AppState;
