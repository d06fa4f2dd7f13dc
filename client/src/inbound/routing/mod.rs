//! Route table, per-route guard state machine, and session-driven navigator.
//!
//! ```text
//! RouteTable::resolve(path) -> RouteAccess
//! RouteGuard::evaluate(&Session) -> GuardState
//! Navigator: RouteTable + watch::Receiver<Session>
//! ```

mod guard;
mod navigator;
mod route_table;

pub use guard::{GuardState, RouteGuard, not_found_call_to_action};
pub use navigator::Navigator;
pub use route_table::{RouteAccess, RouteTable};
