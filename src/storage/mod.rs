//! In-memory storage for outstanding challenges and sessions.
//!
//! Both stores are explicit objects, built once at startup and handed to the
//! protocol. Nothing is persisted; a restart clears them.

pub mod clock;
pub mod nonce;
pub mod session;

pub use clock::{Clock, SystemClock};
pub use nonce::NonceStore;
pub use session::SessionStore;
