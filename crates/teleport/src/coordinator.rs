use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use worldlink_common::{Location, PlayerRef, TeleportOutcome, WorldTarget};

use crate::context::ExecutionContext;
use crate::host::{RelocationError, RelocationFuture, Relocator, WorldRegistry};
use crate::resolver::SpawnResolver;
use crate::table::WorldTable;

/// Validates a teleport request, resolves the destination spawn and drives
/// the relocation.
///
/// Validation, world lookup and spawn resolution happen when
/// `teleport_to_world` is called; only the relocation itself is awaited.
/// Every returned future completes exactly once with one `TeleportOutcome`.
#[derive(Clone)]
pub struct TeleportCoordinator {
    worlds: WorldTable,
    registry: Arc<dyn WorldRegistry>,
    relocator: Arc<dyn Relocator>,
    resolver: SpawnResolver,
    context: Arc<dyn ExecutionContext>,
}

enum Prepared {
    Done(TeleportOutcome),
    Relocating {
        player: PlayerRef,
        pending: RelocationFuture,
    },
}

impl TeleportCoordinator {
    pub fn new(
        worlds: WorldTable,
        registry: Arc<dyn WorldRegistry>,
        relocator: Arc<dyn Relocator>,
        resolver: SpawnResolver,
        context: Arc<dyn ExecutionContext>,
    ) -> Self {
        Self {
            worlds,
            registry,
            relocator,
            resolver,
            context,
        }
    }

    pub fn worlds(&self) -> &WorldTable {
        &self.worlds
    }

    /// Teleport `player` to the spawn of `target`.
    ///
    /// Short-circuits, in order:
    /// 1. missing player or target: `GenericFailure`
    /// 2. target's folder not loaded: `WorldNotFound`
    /// 3. no spawn could be resolved: `LocationUnsafe`
    ///
    /// Otherwise the relocation is requested and its result is turned into an
    /// outcome on the execution context: `true` is `Success`; `false` or a
    /// fault is `GenericFailure`. Faults are logged here and go no further.
    pub fn teleport_to_world(
        &self,
        player: Option<&PlayerRef>,
        target: Option<WorldTarget>,
    ) -> impl Future<Output = TeleportOutcome> + Send + use<> {
        let prepared = self.prepare(player, target);
        let context = Arc::clone(&self.context);
        async move {
            let (player, pending) = match prepared {
                Prepared::Done(outcome) => return outcome,
                Prepared::Relocating { player, pending } => (player, pending),
            };
            let result = pending.await;

            let (tx, rx) = oneshot::channel();
            context.execute(Box::new(move || {
                let _ = tx.send(settle(&player, result));
            }));
            rx.await.unwrap_or_else(|_| {
                tracing::debug!("execution context dropped teleport continuation");
                TeleportOutcome::GenericFailure
            })
        }
    }

    fn prepare(&self, player: Option<&PlayerRef>, target: Option<WorldTarget>) -> Prepared {
        let (Some(player), Some(target)) = (player, target) else {
            return Prepared::Done(TeleportOutcome::GenericFailure);
        };

        let folder = self.worlds.folder(target);
        let Some(world) = self.registry.find_world(folder) else {
            return Prepared::Done(TeleportOutcome::WorldNotFound);
        };

        let Some(spawn) = self.resolver.spawn_location(&world.name) else {
            return Prepared::Done(TeleportOutcome::LocationUnsafe);
        };

        tracing::debug!(
            player = %player.name,
            world = %world.name,
            destination = %spawn,
            "requesting relocation"
        );
        let pending = self
            .relocator
            .relocate(player, Location::new(world.name, spawn));
        Prepared::Relocating {
            player: player.clone(),
            pending,
        }
    }
}

fn settle(player: &PlayerRef, result: Result<bool, RelocationError>) -> TeleportOutcome {
    match result {
        Ok(true) => TeleportOutcome::Success,
        Ok(false) => {
            tracing::debug!(player = %player.name, "relocation refused");
            TeleportOutcome::GenericFailure
        }
        Err(err) => {
            tracing::warn!(
                player = %player.name,
                player_id = %player.id,
                error = %err,
                "failed to teleport player"
            );
            TeleportOutcome::GenericFailure
        }
    }
}
