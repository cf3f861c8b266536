//! Interactive command loop.
//!
//! Owns stdin and all user-facing wording. The flow is the session's
//! lifecycle: connect, registration retry loop, then a select loop over user
//! input and engine events until the session dies or the user leaves.

use std::{error::Error, io::Write as _, sync::Arc};

use patter_client::{
    ClientError, Dispatcher, DisconnectReason, EndDisposition, EndOutcome, OpenOutcome,
    Registration, SendOutcome, Session, SessionEvent, Transport, handshake, receiver,
};
use patter_proto::LineFramer;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::mpsc,
};

use crate::commands::{self, Command};

type Input = Lines<BufReader<Stdin>>;

/// Run the client against the relay at `server`.
///
/// `first_name` seeds the registration loop; every further candidate is
/// prompted for on stdin.
pub async fn run(server: String, first_name: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("[System] Connecting to {server}...");
    let transport = match Transport::connect(&server).await {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            println!("[System] Connection failed: {e}");
            return Ok(());
        },
    };

    let session = Arc::new(Session::new());
    let mut framer = LineFramer::new();

    if !register_loop(&transport, &session, &mut framer, &mut input, first_name).await {
        transport.close().await;
        return Ok(());
    }

    print_help();

    let (events_tx, events) = mpsc::unbounded_channel();
    let _receiver =
        receiver::spawn(Arc::clone(&transport), Arc::clone(&session), framer, events_tx);
    let dispatcher = Dispatcher::new(Arc::clone(&transport), Arc::clone(&session));

    command_loop(&dispatcher, &session, &mut input, events).await;

    transport.close().await;
    let name = session.display_name().unwrap_or_else(|| "Client".to_string());
    println!("[{name}] Disconnected.");
    Ok(())
}

/// Drive registration until accepted (true) or a fatal condition (false).
async fn register_loop(
    transport: &Transport,
    session: &Session,
    framer: &mut LineFramer,
    input: &mut Input,
    first_name: Option<String>,
) -> bool {
    let mut candidate = first_name;

    loop {
        let name = match candidate.take() {
            Some(name) => name,
            None => {
                print_prompt("Enter your name: ");
                match input.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => return false,
                    Err(e) => {
                        println!("[System] Failed to read input: {e}");
                        return false;
                    },
                }
            },
        };

        match handshake::register(transport, session, framer, &name).await {
            Ok(Registration::Accepted { reply }) => {
                println!("{reply}");
                return true;
            },
            Ok(Registration::Retry { reply: Some(reply) }) => println!("{reply}"),
            Ok(Registration::Retry { reply: None }) => {
                println!("[System] Name cannot be empty.");
            },
            Err(ClientError::ServerFull(reply)) => {
                println!("{reply}");
                println!("[System] Server is full. Try again later.");
                return false;
            },
            Err(e) => {
                println!("[System] Registration failed: {e}");
                return false;
            },
        }
    }
}

/// The interactive loop proper. Returns when the session is over.
async fn command_loop(
    dispatcher: &Dispatcher,
    session: &Session,
    input: &mut Input,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) {
    loop {
        if !session.is_alive() {
            println!("[System] Connection lost. Exiting...");
            return;
        }

        print_prompt(&prompt_for(session.current_target().as_deref()));

        tokio::select! {
            line = input.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => return,
                    Err(e) => {
                        println!("[System] Failed to read input: {e}");
                        return;
                    },
                };
                let Some(command) = commands::parse(&line) else { continue };
                if !apply_command(dispatcher, command).await {
                    return;
                }
            }

            event = events.recv() => {
                match event {
                    Some(event) => {
                        if !render_event(event) {
                            return;
                        }
                    },
                    None => return,
                }
            }
        }
    }
}

/// Execute one command. Returns false when the client should exit.
async fn apply_command(dispatcher: &Dispatcher, command: Command) -> bool {
    let sent = match command {
        Command::Quit => return false,
        Command::Open { target } => {
            match dispatcher.open(&target) {
                OpenOutcome::Opened { target } => {
                    println!("Now chatting with {target}. Type END to stop.");
                },
                OpenOutcome::AlreadyActive { target } => {
                    println!("[System] Already chatting with {target}.");
                },
            }
            return true;
        },
        Command::OneOff { target, text } => dispatcher.send_one_off(&target, &text).await,
        Command::End => match dispatcher.end_current().await {
            Ok(outcome) => {
                render_end(outcome);
                Ok(())
            },
            Err(e) => Err(e),
        },
        Command::Say { text } => match dispatcher.send_to_current(&text).await {
            Ok(SendOutcome::Sent { .. }) => Ok(()),
            Ok(SendOutcome::NoTarget) => {
                println!("No active target. Use: TO <target> (or TO <target> <message>).");
                Ok(())
            },
            Err(e) => Err(e),
        },
    };

    match sent {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("send failed: {e}");
            println!("[System] Failed to send (connection lost).");
            false
        },
    }
}

fn render_end(outcome: EndOutcome) {
    match outcome {
        EndOutcome::NoActiveConversation => println!("No active chat to end."),
        EndOutcome::Ended { disposition: EndDisposition::ReturnedTo(back), .. } => {
            println!("[System] Back to chat with {back}.");
        },
        EndOutcome::Ended { .. } => println!("Chat closed."),
    }
}

/// Print one engine event. Returns false when the session is over.
fn render_event(event: SessionEvent) -> bool {
    match event {
        SessionEvent::Message { sender, text } => {
            println!("[System] New message from {sender}. Use: TO {sender} to reply.");
            if text.is_empty() {
                println!("FROM {sender}");
            } else {
                println!("FROM {sender} {text}");
            }
            true
        },
        SessionEvent::ConversationEnded { peer, disposition } => {
            match disposition {
                EndDisposition::ReturnedTo(back) => {
                    println!("[System] {peer} ended the chat. Back to chat with {back}.");
                },
                EndDisposition::Cleared => {
                    println!("[System] {peer} ended the chat. Chat closed.");
                },
                EndDisposition::NotCurrent => println!("[System] {peer} ended the chat."),
            }
            true
        },
        SessionEvent::PeerUnavailable { peer, disposition, line } => {
            match disposition {
                EndDisposition::ReturnedTo(back) => {
                    println!("[System] Chat closed: {peer} is unavailable. Back to chat with {back}.");
                },
                EndDisposition::Cleared => {
                    println!("[System] Chat closed: {peer} is unavailable.");
                },
                EndDisposition::NotCurrent => {},
            }
            println!("{line}");
            true
        },
        SessionEvent::Server { line } => {
            println!("{line}");
            true
        },
        SessionEvent::Disconnected { reason } => {
            match reason {
                DisconnectReason::ServerClosed => {
                    println!("[System] Server closed the connection.");
                },
                DisconnectReason::ReceiveFailed(e) => {
                    println!("[System] Disconnected from server (socket error: {e}).");
                },
            }
            false
        },
    }
}

fn prompt_for(target: Option<&str>) -> String {
    match target {
        Some(target) => format!("[to {target}]> "),
        None => "> ".to_string(),
    }
}

fn print_prompt(prompt: &str) {
    print!("{prompt}");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("TO <target>              -> open chat with target (set default)");
    println!("TO <target> <message>    -> send one message to target (one-off)");
    println!("END                      -> end current chat on BOTH sides");
    println!("exit / quit              -> disconnect");
    println!();
}
