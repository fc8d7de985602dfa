use clap::{Parser, Subcommand};

/// Booking Agent: reserve service slots over HTTP
#[derive(Parser)]
#[command(name = "booking-agent", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind (overrides BOOKING_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the database schema and exit
    Migrate,

    /// Inspect stored bookings
    Bookings {
        #[command(subcommand)]
        command: BookingCommands,
    },
}

#[derive(Subcommand)]
pub enum BookingCommands {
    /// List the most recent bookings
    List {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Show every booking carrying a reference
    Find {
        #[arg(long)]
        reference: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["booking-agent"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["booking-agent", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
    }

    #[test]
    fn test_bookings_list_default_limit() {
        let cli = Cli::try_parse_from(["booking-agent", "bookings", "list"]).unwrap();
        match cli.command {
            Some(Commands::Bookings {
                command: BookingCommands::List { limit },
            }) => assert_eq!(limit, 20),
            _ => panic!("expected bookings list"),
        }
    }

    #[test]
    fn test_bookings_find_requires_reference() {
        assert!(Cli::try_parse_from(["booking-agent", "bookings", "find"]).is_err());
    }
}
