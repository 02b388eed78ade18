//! Player-facing messages: templates under `messages.<key>`, `{token}`
//! placeholders and `&` colour codes.
//!
//! # Invariants
//! - Rendering never fails; a missing template renders a visible placeholder line.
//! - Delivery to an offline player is dropped silently.

mod service;
mod template;

pub use service::{MessageRenderer, MessageService, MessageSink};
pub use template::{SECTION_SIGN, colorize, substitute};
