//! Order submission and result value types.
//!
//! An [`Order`] is what a caller submits; a [`Ticket`] is the immediate
//! acceptance receipt; a [`PendingOrder`] is the engine-owned record that
//! tracks the order from acceptance to release; a [`Table`] is the
//! materialized query result.

mod record;
mod types;

pub use record::{Order, OrderCallback, PendingOrder};
pub use types::{Table, Ticket, TicketStatus};
