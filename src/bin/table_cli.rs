use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt::time::Uptime, EnvFilter};
use url::Url;

use holdem_client::client::{
    CreateGameRequest, EngineApi, EngineClientConfig, HttpEngineClient, JoinGameRequest,
};
use holdem_client::game::{
    ActionDispatcher, OpponentServiceMonitor, SubmitError, TableCommand, TableCoordinator,
    ViewUpdate,
};
use holdem_client::realtime::{PushChannelClient, PushChannelConfig, RoomSubscription};
use holdem_client::table::ActionError;
use holdem_client::view::render::{render_prompt, render_table};

const LOG_TARGET: &str = "bin::table_cli";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001/";
const DEFAULT_WS_URL: &str = "ws://127.0.0.1:5001/ws";
const OPPONENT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Parser)]
#[command(name = "table_cli")]
#[command(about = "Join a hold'em table and play from the terminal", long_about = None)]
struct Args {
    /// Base HTTP endpoint of the rules engine
    #[arg(long, env = "ENGINE_URL")]
    server_url: Option<String>,

    /// WebSocket endpoint of the push channel
    #[arg(long, env = "ENGINE_WS_URL")]
    ws_url: Option<String>,

    /// Display name at the table
    #[arg(long, default_value = "Player")]
    name: String,

    /// Join this table instead of creating one
    #[arg(long)]
    game_id: Option<String>,

    /// Watch the table without taking a seat (requires --game-id)
    #[arg(long)]
    spectate: bool,

    /// Seats at the table when creating (2-9)
    #[arg(long, default_value_t = 6)]
    num_players: usize,

    #[arg(long, default_value_t = 1000)]
    starting_chips: u64,

    #[arg(long, default_value_t = 5)]
    small_blind: u64,

    #[arg(long, default_value_t = 10)]
    big_blind: u64,

    /// Toggle structured (JSON) tracing output
    #[arg(long)]
    json: bool,
}

struct Config {
    server_url: Url,
    ws_url: Url,
    name: String,
    game_id: Option<String>,
    spectate: bool,
    num_players: usize,
    starting_chips: u64,
    small_blind: u64,
    big_blind: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json)?;
    let config = build_config(args)?;
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let client = Arc::new(HttpEngineClient::new(EngineClientConfig::new(
        config.server_url.clone(),
    ))?);
    let mut coordinator = TableCoordinator::new();

    // Create or join over the request/response channel first; the response
    // doubles as the bootstrap snapshot until the push channel takes over.
    match (&config.game_id, config.spectate) {
        (None, _) => {
            let request = CreateGameRequest {
                player_name: config.name.clone(),
                num_players: config.num_players,
                starting_chips: config.starting_chips,
                small_blind: config.small_blind,
                big_blind: config.big_blind,
            };
            let joined = client
                .create_game(&request)
                .await
                .context("failed to create table")?;
            info!(target = LOG_TARGET, game_id = %joined.state.game_id, seat = joined.player_id, "table created");
            println!("created table {}", joined.state.game_id);
            coordinator.adopt_joined(joined);
        }
        (Some(game_id), true) => {
            let state = client
                .fetch_game(game_id)
                .await
                .context("failed to look up table")?;
            coordinator.adopt_spectator(state);
        }
        (Some(game_id), false) => {
            // Lookup first so a bad id fails before taking a seat.
            client
                .fetch_game(game_id)
                .await
                .context("failed to look up table")?;
            let request = JoinGameRequest {
                player_name: config.name.clone(),
            };
            let joined = client
                .join_game(game_id, &request)
                .await
                .context("failed to join table")?;
            info!(target = LOG_TARGET, game_id = %game_id, seat = joined.player_id, "joined table");
            coordinator.adopt_joined(joined);
        }
    }

    render(&coordinator);

    let game_id = coordinator
        .session()
        .game_id()
        .ok_or_else(|| anyhow!("no game id after bootstrap"))?
        .to_string();

    let stop = CancellationToken::new();

    let room = RoomSubscription {
        game_id: game_id.clone(),
        player_id: coordinator.viewer_seat(),
        player_name: config.name.clone(),
    };
    let (push_client, mut push_rx) =
        PushChannelClient::new(PushChannelConfig::new(config.ws_url.clone()), room, stop.child_token());
    let push_task = tokio::spawn(push_client.run());

    let (monitor, mut opponents_rx) =
        OpponentServiceMonitor::new(client.clone(), OPPONENT_POLL_INTERVAL);
    tokio::spawn(monitor.run(stop.child_token()));

    let dispatcher = ActionDispatcher::new(client.clone());
    let mut commands = spawn_stdin_reader();
    let (submit_tx, mut submit_rx) = mpsc::channel::<Result<(), SubmitError>>(4);

    println!("{}", render_prompt(&coordinator.legals()));

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(target = LOG_TARGET, "shutdown signal received");
                break;
            }
            event = push_rx.recv() => {
                match event {
                    Ok(event) => match coordinator.handle_push(event) {
                        ViewUpdate::Redraw => {
                            render(&coordinator);
                            println!("{}", render_prompt(&coordinator.legals()));
                        }
                        ViewUpdate::Notice(message) => println!("* {message}"),
                        ViewUpdate::Quiet => {}
                    },
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(target = LOG_TARGET, skipped, "push events dropped, view may lag one frame");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        warn!(target = LOG_TARGET, "push channel task ended");
                        break;
                    }
                }
            }
            line = commands.recv() => {
                let Some(line) = line else { break };
                match parse_command(&line) {
                    Command::Table(command) => {
                        let dispatcher = dispatcher.clone();
                        let session = coordinator.session().clone();
                        let state = coordinator.state().cloned();
                        let submit_tx = submit_tx.clone();
                        tokio::spawn(async move {
                            let result = dispatcher.submit(&session, state.as_ref(), command).await;
                            let _ = submit_tx.send(result).await;
                        });
                    }
                    Command::Quit => break,
                    Command::Help => println!("{}", render_prompt(&coordinator.legals())),
                    Command::Unknown => println!("* unrecognized command ({})", line.trim()),
                }
            }
            result = submit_rx.recv() => {
                if let Some(result) = result {
                    report_submission(result);
                }
            }
            changed = opponents_rx.changed() => {
                if changed.is_ok() {
                    let online = *opponents_rx.borrow_and_update();
                    println!(
                        "* automated opponents {}",
                        if online { "online" } else { "offline" }
                    );
                }
            }
        }
    }

    stop.cancel();
    coordinator.leave();
    push_task.await.ok();
    Ok(())
}

fn render(coordinator: &TableCoordinator) {
    match coordinator.state() {
        Some(state) => println!("\n{}", render_table(state, coordinator.viewer_seat())),
        None => println!("waiting for the first table snapshot"),
    }
}

enum Command {
    Table(TableCommand),
    Quit,
    Help,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("fold") => Command::Table(TableCommand::Fold),
        Some("check") => Command::Table(TableCommand::Check),
        Some("call") => Command::Table(TableCommand::Call),
        Some("raise") => match parts.next().and_then(|raw| raw.parse::<u64>().ok()) {
            Some(to) => Command::Table(TableCommand::Raise { to }),
            None => Command::Table(TableCommand::Raise { to: 0 }),
        },
        Some("deal") => Command::Table(TableCommand::DealNextHand),
        Some("quit") | Some("exit") => Command::Quit,
        Some("help") | Some("?") => Command::Help,
        Some(_) => Command::Unknown,
        None => Command::Help,
    }
}

fn report_submission(result: Result<(), SubmitError>) {
    match result {
        Ok(()) => {
            // The table redraws when the broadcast lands, not before.
            debug!(target = LOG_TARGET, "action accepted, awaiting broadcast");
        }
        Err(SubmitError::Refused(ActionError::IdentityUnresolved)) => {
            println!("* waiting for seat assignment, try again shortly");
        }
        Err(SubmitError::Refused(refusal)) => println!("* {refusal}"),
        Err(SubmitError::Engine(err)) if err.is_transport() => {
            println!("* engine unreachable, action not sent ({err})");
        }
        Err(SubmitError::Engine(err)) => println!("* rejected by the table: {err}"),
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("table_cli=info,holdem_client=info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_timer(Uptime::default())
            .with_ansi(false)
            .json()
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_timer(Uptime::default())
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))?;
    }
    Ok(())
}

fn build_config(args: Args) -> Result<Config> {
    if args.spectate && args.game_id.is_none() {
        return Err(anyhow!("--spectate requires --game-id"));
    }
    if args.game_id.is_none() && !(2..=9).contains(&args.num_players) {
        return Err(anyhow!("--num-players must be between 2 and 9"));
    }
    let server_url = args
        .server_url
        .as_deref()
        .unwrap_or(DEFAULT_SERVER_URL)
        .parse::<Url>()
        .context("invalid --server-url")?;
    let ws_url = args
        .ws_url
        .as_deref()
        .unwrap_or(DEFAULT_WS_URL)
        .parse::<Url>()
        .context("invalid --ws-url")?;
    Ok(Config {
        server_url,
        ws_url,
        name: args.name,
        game_id: args.game_id,
        spectate: args.spectate,
        num_players: args.num_players,
        starting_chips: args.starting_chips,
        small_blind: args.small_blind,
        big_blind: args.big_blind,
    })
}
