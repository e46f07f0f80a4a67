//! Interactive line client for the arena server.
//!
//! Identifies from `ARENA_ADDRESS` / `ARENA_USERNAME`, then turns simple
//! commands into wire events:
//!
//!   create 0.01
//!   join <matchId>
//!   move <matchId> e2e4
//!   state <matchId>
//!
//! Server events are printed as they arrive.

use std::env;
use std::io::{self, Write};

use arena_core::rules::MoveRequest;
use arena_core::{ClientEvent, ServerEvent};
use arena_protocol::{format_client_event, parse_server_line};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("ARENA_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
    let address = env::var("ARENA_ADDRESS").unwrap_or_else(|_| "0xdemo".to_string());
    let username = env::var("ARENA_USERNAME").unwrap_or_else(|_| "demo".to_string());

    println!("Connecting to {addr} as {address} ({username})...");
    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    println!("Connected.");
    println!("Commands:");
    println!("  create <stake>");
    println!("  join <matchId>");
    println!("  move <matchId> <uci>   (e.g. move <matchId> e2e4)");
    println!("  state <matchId>");
    println!("Type 'quit' or 'exit' to leave.\n");

    // Print server events as they arrive.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_server_line(&line) {
                Ok(event) => println!("<< {}", describe(&event)),
                Err(_) => println!("<< {line}"),
            }
        }
        println!("\nServer closed the connection.");
    });

    send_event(
        &mut write_half,
        &ClientEvent::Identify { address, username },
    )
    .await?;

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        let event = match parse_command(trimmed) {
            Some(event) => event,
            None => {
                eprintln!("Could not parse command. See the list above.");
                continue;
            }
        };

        send_event(&mut write_half, &event).await?;
    }

    Ok(())
}

fn parse_command(input: &str) -> Option<ClientEvent> {
    let mut tokens = input.split_whitespace();

    match tokens.next()? {
        "create" => {
            let stake = tokens.next()?.parse::<f64>().ok()?;
            Some(ClientEvent::CreateGame { stake })
        }
        "join" => Some(ClientEvent::JoinGame {
            match_id: tokens.next()?.to_string(),
        }),
        "move" => {
            let match_id = tokens.next()?.to_string();
            let mv = MoveRequest::from_uci(tokens.next()?)?;
            Some(ClientEvent::MakeMove { match_id, mv })
        }
        "state" => Some(ClientEvent::RequestInitialGameState {
            match_id: tokens.next()?.to_string(),
        }),
        _ => None,
    }
}

async fn send_event(
    write_half: &mut tokio::net::tcp::OwnedWriteHalf,
    event: &ClientEvent,
) -> anyhow::Result<()> {
    let mut line = format_client_event(event)?;
    line.push('\n');
    write_half.write_all(line.as_bytes()).await?;
    Ok(())
}

fn describe(event: &ServerEvent) -> String {
    match event {
        ServerEvent::GameCreated { match_id } => format!("game created: {match_id}"),
        ServerEvent::GameState(s) | ServerEvent::InitialGameState(s) => format!(
            "[{:?}] {} moves, position {}",
            s.status,
            s.move_log.len(),
            s.position
        ),
        ServerEvent::GameOver { winner } => format!("game over: {winner:?}"),
        ServerEvent::Error { reason } => format!("error: {reason}"),
    }
}
