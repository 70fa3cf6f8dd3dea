use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for timeclock
/// Terminal client for the personnel time-tracking service
#[derive(Parser)]
#[command(
    name = "timeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in/out, take breaks and review your booking protocol from the terminal",
    long_about = None
)]
pub struct Cli {
    /// Override client storage path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the API base URL (e.g. https://tt.example.com/api)
    #[arg(global = true, long = "api")]
    pub api: Option<String>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BreakAction {
    Start,
    End,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the client storage and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Create a new account (does not log in)
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TIMECLOCK_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long = "first-name")]
        first_name: String,

        #[arg(long = "last-name")]
        last_name: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,

        /// Password; read from stdin when neither this nor TIMECLOCK_PASSWORD is set
        #[arg(long, env = "TIMECLOCK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        #[arg(long = "refresh", help = "Reload the user from the server")]
        refresh: bool,
    },

    /// Clock in
    In {
        /// Location (O = Office, H = Home, T = Business trip, C = Client site)
        #[arg(
            long = "loc",
            help = "Work location: O=Office, H=Home, T=Business trip, C=Client site"
        )]
        loc: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Clock out
    Out {
        #[arg(long = "loc", help = "Work location (defaults to the configured one)")]
        loc: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Start or end a break
    Break {
        #[arg(value_enum)]
        action: BreakAction,

        #[arg(long = "loc", help = "Work location (defaults to the configured one)")]
        loc: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show today's summary
    Status {
        #[arg(long = "offline", help = "Show the last stored snapshot without contacting the server")]
        offline: bool,

        #[arg(
            long = "current",
            conflicts_with = "offline",
            help = "Show only the current work status and last booking"
        )]
        current: bool,
    },

    /// List bookings
    Protocol {
        #[arg(long = "today", help = "Show only today's bookings")]
        today: bool,

        #[arg(
            long,
            short,
            help = "Filter by year/month/day (YYYY, YYYY-MM, YYYY-MM-DD) or a custom range A:B"
        )]
        period: Option<String>,
    },

    /// Replace the notes of a booking
    Notes {
        id: i64,

        text: String,
    },

    /// Delete a booking by ID
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
