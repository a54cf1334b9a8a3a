//! # Pennywise Client
//!
//! Holds a logged-in client's token and account snapshot, and logs the
//! session out when the token's expiry passes.
//!
//! Expiry is read from the token without checking its signature. That is
//! enough to schedule a logout but is never a security decision: the server
//! validates every protected request on its own.
//!
//! # Example
//!
//! ```ignore
//! use pennywise_client::{ClientSession, FileStorage, SessionEvent};
//!
//! let session = ClientSession::new(FileStorage::new("session.json"));
//! let mut events = session.subscribe();
//! session.rehydrate()?;
//!
//! // after POST /api/auth/login
//! session.login(&response.token, response.data)?;
//!
//! if let Ok(SessionEvent::Expired) = events.recv().await {
//!     // redirect to the login view
//! }
//! ```

pub mod error;
pub mod session;
pub mod storage;

pub use error::SessionError;
pub use session::{ClientSession, SessionEvent, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_SLOT, USER_SLOT};
