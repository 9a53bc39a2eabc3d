//! Operator console on stdin.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::server::status::ServerStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Status,
    Unknown(String),
}

impl Command {
    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => None,
            "q" => Some(Command::Quit),
            "i" => Some(Command::Status),
            other => Some(Command::Unknown(other.to_string())),
        }
    }
}

fn print_prompt() {
    println!("ENTER \"q\" to close server");
    println!("ENTER \"i\" to display status");
}

/// Reads commands until `q`. If stdin closes, the console goes quiet but
/// the server keeps running.
pub async fn run(status: ServerStatus) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Status) => {
                println!("\nYou have requested the server status:");
                print!("{}", status.snapshot().await.report());
                println!();
            }
            Some(Command::Unknown(_)) => {
                println!("INFO: unknown command. Please Enter a valid command");
            }
            None => continue,
        }
        print_prompt();
    }

    std::future::pending::<()>().await;
    Ok(())
}
