use clap::{Parser, ValueEnum};

/// Command-line arguments: which user triggered which event, and where the
/// config lives.
///
/// # Examples
///
/// ```sh
/// # Deliver the latest unseen articles to user 42
/// news-relay --user 42
///
/// # Send the greeting instead
/// news-relay --user 42 --event start
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, env = "CONFIG", default_value = "config.json")]
    pub config: String,

    /// User the inbound event is attributed to
    #[arg(short, long)]
    pub user: String,

    /// Inbound event to feed the relay
    #[arg(short, long, value_enum, default_value_t = EventKind::News)]
    pub event: EventKind,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Conversation start
    Start,
    /// Request the latest articles
    News,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news-relay", "--user", "42"]);
        assert_eq!(cli.user, "42");
        assert_eq!(cli.config, "config.json");
        assert_eq!(cli.event, EventKind::News);
    }

    #[test]
    fn test_cli_start_event() {
        let cli = Cli::parse_from(["news-relay", "-u", "42", "-e", "start", "-c", "relay.json"]);
        assert_eq!(cli.event, EventKind::Start);
        assert_eq!(cli.config, "relay.json");
    }
}
