// ============================================================================
// STATE MODULE - Contexto de sesión, secuenciación y estado de widgets
// ============================================================================

pub mod reactivity;
pub mod sequencer;
pub mod session_state;
pub mod widget_state;
pub mod app_state;

pub use reactivity::ReactiveState;
pub use sequencer::{RequestSequencer, Ticket};
pub use session_state::{guard_decision, is_public_route, GuardDecision, SessionContext};
pub use widget_state::WidgetState;
pub use app_state::AppState;
