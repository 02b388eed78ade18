use std::sync::Arc;
use worldlink_common::{PlayerRef, TeleportOutcome};
use worldlink_messages::MessageRenderer;

/// Message key for each outcome. Adding an outcome fails to compile until it
/// is given a key here.
pub fn message_key(outcome: TeleportOutcome) -> &'static str {
    match outcome {
        TeleportOutcome::Success => "success",
        TeleportOutcome::WorldNotFound => "world-not-found",
        TeleportOutcome::LocationUnsafe => "location-not-safe",
        TeleportOutcome::GenericFailure => "generic-failure",
    }
}

/// Turns an outcome into exactly one player-facing message.
#[derive(Clone)]
pub struct ResultDispatcher {
    renderer: Arc<dyn MessageRenderer>,
}

impl ResultDispatcher {
    pub fn new(renderer: Arc<dyn MessageRenderer>) -> Self {
        Self { renderer }
    }

    /// Send the message for `outcome` with `{world}` set to `world_label`.
    /// Returns the key that was sent.
    pub fn dispatch(
        &self,
        player: &PlayerRef,
        outcome: TeleportOutcome,
        world_label: &str,
    ) -> &'static str {
        let key = message_key(outcome);
        self.renderer.send(player, key, &[("world", world_label)]);
        key
    }
}
