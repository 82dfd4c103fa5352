//! Conversation driver and session memory for the workforce agent.

mod driver;
mod prompts;
mod session;

pub use driver::{ConversationDriver, FALLBACK_RESPONSE};
pub use prompts::{RAW_SQL_SYSTEM_PROMPT, SYSTEM_PROMPT};
pub use session::SessionStore;
