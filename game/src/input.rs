//! Human command surface: key names to abstract commands, plus a stdin reader

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The two commands a player (human or remote) can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Crouch,
}

/// Maps a key or word to a command. Case and surrounding whitespace are ignored.
pub fn parse_key(key: &str) -> Option<Command> {
    match key.trim().to_ascii_lowercase().as_str() {
        "space" | "w" | "up" | "jump" => Some(Command::Jump),
        "s" | "down" | "crouch" => Some(Command::Crouch),
        _ => None,
    }
}

/// Reads commands from stdin, one per line, until stdin closes or the
/// receiver is dropped. An empty line counts as a jump.
pub fn spawn_stdin_reader(commands: mpsc::UnboundedSender<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Controls: enter 'w'/'up'/'space' (or an empty line) to jump, 's'/'down' to crouch");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let command = if line.trim().is_empty() {
                        Some(Command::Jump)
                    } else {
                        parse_key(&line)
                    };
                    match command {
                        Some(command) => {
                            if commands.send(command).is_err() {
                                break;
                            }
                        }
                        None => debug!("Unknown key: {:?}", line),
                    }
                }
                Ok(None) => {
                    debug!("Stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_keys() {
        for key in ["space", "w", "W", "up", "Up", "jump", "  w  "] {
            assert_eq!(parse_key(key), Some(Command::Jump), "key {:?}", key);
        }
    }

    #[test]
    fn test_crouch_keys() {
        for key in ["s", "S", "down", "crouch"] {
            assert_eq!(parse_key(key), Some(Command::Crouch), "key {:?}", key);
        }
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(parse_key("a"), None);
        assert_eq!(parse_key("left"), None);
        assert_eq!(parse_key(""), None);
    }
}
