use std::sync::Arc;
use worldlink_common::PlayerRef;
use worldlink_config::ConfigReader;
use worldlink_kernel::SharedServer;

use crate::template::{colorize, substitute};

/// Renders a message template and delivers it to a player.
pub trait MessageRenderer: Send + Sync {
    fn send(&self, player: &PlayerRef, key: &str, placeholders: &[(&str, &str)]);
}

/// Final delivery of a rendered chat line.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, player: &PlayerRef, line: &str);
}

impl MessageSink for SharedServer {
    fn deliver(&self, player: &PlayerRef, line: &str) {
        if !self.with(|s| s.deliver(player.id, line)) {
            tracing::debug!(player = %player.name, "dropping message for offline player");
        }
    }
}

/// Template-backed renderer reading `messages.<key>` from the configuration.
pub struct MessageService {
    config: Arc<dyn ConfigReader>,
    sink: Arc<dyn MessageSink>,
}

impl MessageService {
    pub fn new(config: Arc<dyn ConfigReader>, sink: Arc<dyn MessageSink>) -> Self {
        Self { config, sink }
    }

    /// Render the template for `key` with colour codes and placeholders applied.
    ///
    /// Colour codes are translated in the template only, so placeholder values
    /// reach the player verbatim. A missing template renders as a red
    /// "Missing message" line naming the key.
    pub fn render(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        let template = self
            .config
            .get_string(&format!("messages.{key}"))
            .unwrap_or_else(|| {
                tracing::warn!(key, "message template not configured");
                format!("&cMissing message: {key}")
            });
        substitute(&colorize(&template), placeholders)
    }
}

impl MessageRenderer for MessageService {
    fn send(&self, player: &PlayerRef, key: &str, placeholders: &[(&str, &str)]) {
        let line = self.render(key, placeholders);
        self.sink.deliver(player, &line);
    }
}
