use worldlink_common::PlayerRef;
use worldlink_config::ConfigError;

/// Errors from running a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("empty command line")]
    Empty,
    #[error("unknown command '/{0}'")]
    Unknown(String),
    #[error("player {0} is not online")]
    PlayerOffline(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A player command.
pub trait Command: Send + Sync {
    /// Primary name, without the leading slash.
    fn name(&self) -> &'static str;

    /// Additional names the command answers to.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn description(&self) -> &'static str;

    /// Run for `player` with whitespace-separated `args`.
    fn execute(&self, player: &PlayerRef, args: &[&str]) -> Result<(), CommandError>;

    /// Suggestions for the argument being typed.
    fn complete(&self, _args: &[&str]) -> Vec<String> {
        Vec::new()
    }
}
