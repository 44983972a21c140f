//! User input: line parsing and the readline thread.

use rustyline::{DefaultEditor, error::ReadlineError};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{reconciler::ClickTarget, ui::PROMPT};

/// A gesture or command typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Start playback if paused
    Play,
    /// Pause playback if playing
    Pause,
    Toggle,
    /// Skip by the given number of seconds
    Skip(f64),
    /// Move the progress control to a percentage
    Seek(f64),
    /// Pointer-down / touch-start on the progress control
    DragStart,
    /// Drag to a percentage of the control width
    DragMove(f64),
    /// Pointer-up / touch-end
    DragEnd,
    /// Click on the progress track at a percentage
    Click(ClickTarget, f64),
    /// Send an arbitrary JSON payload to the other clients
    Relay(Value),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown command '{0}' (type 'help')")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(String),

    #[error("Invalid argument for '{command}': {value}")]
    InvalidArgument { command: String, value: String },
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_action(line: &str) -> Result<Option<UserAction>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "play" => UserAction::Play,
        "pause" => UserAction::Pause,
        "t" | "toggle" => UserAction::Toggle,
        "f" | "ff" | "forward" => UserAction::Skip(crate::reconciler::SKIP_SECONDS),
        "b" | "rw" | "back" => UserAction::Skip(-crate::reconciler::SKIP_SECONDS),
        "seek" => UserAction::Seek(percent_arg(command, rest)?),
        "drag" => UserAction::DragStart,
        "move" => UserAction::DragMove(percent_arg(command, rest)? / 100.0),
        "release" | "drop" => UserAction::DragEnd,
        "click" => UserAction::Click(ClickTarget::Track, percent_arg(command, rest)? / 100.0),
        "click-thumb" => UserAction::Click(ClickTarget::ScrubControl, 0.0),
        "say" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument(command.to_string()));
            }
            // plain text is sent as a JSON string
            let payload = serde_json::from_str(rest).unwrap_or_else(|_| Value::String(rest.to_string()));
            UserAction::Relay(payload)
        }
        "s" | "status" => UserAction::Status,
        "h" | "?" | "help" => UserAction::Help,
        "q" | "quit" | "exit" => UserAction::Quit,
        _ => return Err(InputError::UnknownCommand(command.to_string())),
    };
    Ok(Some(action))
}

fn percent_arg(command: &str, rest: &str) -> Result<f64, InputError> {
    if rest.is_empty() {
        return Err(InputError::MissingArgument(command.to_string()));
    }
    let value = rest.trim_end_matches('%');
    match value.parse::<f64>() {
        Ok(percent) if (0.0..=100.0).contains(&percent) => Ok(percent),
        _ => Err(InputError::InvalidArgument {
            command: command.to_string(),
            value: rest.to_string(),
        }),
    }
}

/// Spawn a blocking thread for rustyline (synchronous readline).
///
/// Parsed actions are sent on `actions`. Ctrl+C and Ctrl+D send
/// [`UserAction::Quit`] and end the thread.
pub fn spawn_input_thread(actions: mpsc::UnboundedSender<UserAction>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                let _ = actions.send(UserAction::Quit);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let action = match parse_action(&line) {
                        Ok(Some(action)) => action,
                        Ok(None) => continue,
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    };
                    rl.add_history_entry(line.trim()).ok();
                    let quit = action == UserAction::Quit;
                    if actions.send(action).is_err() || quit {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    let _ = actions.send(UserAction::Quit);
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    let _ = actions.send(UserAction::Quit);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = actions.send(UserAction::Quit);
                    break;
                }
            }
        }
    })
}
