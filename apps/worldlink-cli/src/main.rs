use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use worldlink_commands::{CONFIG_FILE, WorldLink};
use worldlink_common::{Location, PlayerRef, SpawnCoordinate, WorldTarget};
use worldlink_kernel::{Server, SharedServer};
use worldlink_messages::SECTION_SIGN;
use worldlink_teleport::SpawnResolver;

/// How long the main thread waits for more work before a command counts as done.
const SETTLE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "worldlink-cli", about = "CLI tool for worldlink operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding config.yml
    #[arg(short, long, default_value = "worldlink-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, config path and world bindings
    Info,
    /// Resolve the spawn a teleport to a world would use
    Resolve {
        /// World identifier (overworld, nether, the_end) or folder name
        world: String,
        /// Print the location as JSON
        #[arg(long)]
        json: bool,
    },
    /// Teleport a player from the overworld spawn to a world
    Teleport {
        #[arg(short, long, default_value = "Steve")]
        player: String,
        /// World identifier or folder name
        target: String,
    },
    /// Store a world spawn as if a player stood there and ran /setworldspawn
    SetSpawn {
        #[arg(short, long, default_value = "Steve")]
        player: String,
        #[arg(short, long, default_value = "world")]
        world: String,
        x: f64,
        y: f64,
        z: f64,
        #[arg(default_value = "0")]
        yaw: f32,
        #[arg(default_value = "0")]
        pitch: f32,
    },
    /// Read `<player> <command line>` from stdin and run each line
    Console,
    /// Print completions for a partial command line, e.g. "tpworld ne"
    Complete {
        /// Partial command line; a trailing space completes the next argument
        line: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let server = SharedServer::new(Server::with_vanilla_worlds());
    let mut link = WorldLink::enable(
        &cli.data_dir,
        server.clone(),
        tokio::runtime::Handle::current(),
    )?;

    match cli.command {
        Commands::Info => {
            println!("worldlink-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("config: {}", cli.data_dir.join(CONFIG_FILE).display());
            for (target, folder) in link.coordinator().worlds().iter() {
                let loaded = server.lock().world(folder).is_some();
                println!("  {:<10} -> {folder} (loaded={loaded})", target.name());
            }
            let labels: Vec<&str> = link.commands().labels().collect();
            println!("commands: {}", labels.join(", "));
        }
        Commands::Resolve { world, json } => {
            let folder = folder_for(&link, &world);
            let resolver =
                SpawnResolver::new(Arc::new(link.config().clone()), Arc::new(server.clone()));
            match resolver.spawn_location(&folder) {
                Some(spawn) if json => {
                    let location = Location::new(folder, spawn);
                    println!("{}", serde_json::to_string_pretty(&location)?);
                }
                Some(spawn) => println!("{folder}: {spawn}"),
                None => anyhow::bail!("world '{folder}' is not loaded"),
            }
        }
        Commands::Teleport { player, target } => {
            let player = join_at_spawn(&server, &player)?;
            link.dispatch(&player, &format!("tpworld {target}"))?;
            link.run_until_quiet(SETTLE).await;
            print_inbox(&server, &player, 0);
            if let Some(location) = server.location_of(&player) {
                println!(
                    "{} is in {} at {}",
                    player.name, location.world, location.coordinate
                );
            }
        }
        Commands::SetSpawn {
            player,
            world,
            x,
            y,
            z,
            yaw,
            pitch,
        } => {
            if server.lock().world(&world).is_none() {
                anyhow::bail!("world '{world}' is not loaded");
            }
            let player = PlayerRef::new(player);
            let location = Location::new(world, SpawnCoordinate::new(x, y, z, yaw, pitch));
            server.with(|s| s.join(player.clone(), location));
            link.dispatch(&player, "setworldspawn")?;
            print_inbox(&server, &player, 0);
        }
        Commands::Console => run_console(&mut link, &server).await?,
        Commands::Complete { line } => {
            for suggestion in link.commands().complete(&line) {
                println!("{suggestion}");
            }
        }
    }

    link.disable();
    Ok(())
}

async fn run_console(link: &mut WorldLink, server: &SharedServer) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some((name, command)) = line.trim().split_once(char::is_whitespace) else {
            if !line.trim().is_empty() {
                eprintln!("expected: <player> <command line>");
            }
            continue;
        };
        let found = server.lock().find_player(name);
        let player = match found {
            Some(player) => player,
            None => join_at_spawn(server, name)?,
        };
        let seen = server.inbox_of(&player).len();
        if let Err(err) = link.dispatch(&player, command) {
            tracing::warn!(player = %player.name, command, error = %err, "command failed");
        }
        link.run_until_quiet(SETTLE).await;
        print_inbox(server, &player, seen);
    }
    Ok(())
}

/// Folder named by an identifier, or the input itself when it is not one.
fn folder_for(link: &WorldLink, input: &str) -> String {
    let worlds = link.coordinator().worlds();
    match worlds.parse_target(input) {
        Some(target) => worlds.folder(target).to_string(),
        None => input.to_string(),
    }
}

fn join_at_spawn(server: &SharedServer, name: &str) -> anyhow::Result<PlayerRef> {
    let player = PlayerRef::new(name);
    let overworld = WorldTarget::Overworld.default_folder();
    if !server.with(|s| s.join_at_spawn(player.clone(), overworld)) {
        anyhow::bail!("cannot join {name}: '{overworld}' is not loaded");
    }
    Ok(player)
}

fn print_inbox(server: &SharedServer, player: &PlayerRef, skip: usize) {
    for line in server.inbox_of(player).iter().skip(skip) {
        println!("[{}] {}", player.name, strip_colors(line));
    }
}

fn strip_colors(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
