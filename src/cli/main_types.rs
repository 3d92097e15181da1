use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "persona-view")]
#[command(about = "Fetch persona records through the API gateway and render them as HTML")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Gateway root, overrides the profile
    #[arg(long, global = true, env = "PERSONA_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Escape field values before writing them into markup
    #[arg(long, global = true)]
    pub escape_html: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the gateway's home message
    Home,
    /// Show the gateway's about information
    About,
    /// List every persona
    List,
    /// List persona names only
    Names {
        /// Sort alphabetically by name
        #[arg(long)]
        sorted: bool,
    },
    /// List every persona sorted by a field
    Sort {
        /// Field path, e.g. name, address.city, olympicAppearances
        field: String,
        /// Compare as numbers instead of case-insensitive text
        #[arg(long)]
        numeric: bool,
    },
    /// List personas matching exact field values
    Search(SearchArgs),
    /// Show one persona
    Show {
        /// Record ID
        id: String,
        /// Template file with ### TOKEN ### placeholders
        #[arg(long, conflicts_with = "card")]
        template: Option<PathBuf>,
        /// Use the built-in persona card template
        #[arg(long)]
        card: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    pub fn name(&self) -> String {
        match self {
            Commands::Home => "home".to_string(),
            Commands::About => "about".to_string(),
            Commands::List => "list".to_string(),
            Commands::Names { .. } => "names".to_string(),
            Commands::Sort { field, .. } => format!("sort {}", field),
            Commands::Search(_) => "search".to_string(),
            Commands::Show { id, .. } => format!("show {}", id),
            Commands::Config { .. } => "config".to_string(),
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct SearchArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub appearances: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Year contained in the world championship participation list
    #[arg(long)]
    pub year: Option<String>,
    /// Require every given criterion instead of any
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value on the active profile
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
