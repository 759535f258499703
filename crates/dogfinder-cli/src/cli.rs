//! Command-line definitions and the top-level entrypoint.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dogfinder_api_models::SortSpec;
use dogfinder_core::clock::SystemClock;
use dogfinder_core::session::{SessionController, SessionTiming};
use dogfinder_core::storage::StorageHandle;
use dogfinder_telemetry::{CommandSpanGuard, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use reqwest::Url;
use uuid::Uuid;

use crate::client::{CliResult, HttpDogApi, build_http_client, parse_url};
use crate::commands::auth::{handle_login, handle_logout, handle_session_extend, handle_session_status};
use crate::commands::favorites::{
    handle_favorites_add, handle_favorites_list, handle_favorites_remove, handle_favorites_toggle,
};
use crate::commands::locations::{handle_locations_lookup, handle_locations_search};
use crate::commands::matching::handle_match;
use crate::commands::search::{handle_breeds, handle_page, handle_search};
use crate::state::StateFiles;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "https://frontend-take-home-service.fetch.com";
const DEFAULT_STATE_FILE: &str = ".dogfinder/state.json";

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
        build_sha: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let span = CommandSpanGuard::enter(command_label(&cli.command), &trace_id);

    let exit_code = match dispatch(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            let message = err.display_message();
            tracing::debug!(error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    };
    span.record_exit_code(exit_code);
    exit_code
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::new(
        cli.api_url,
        Duration::from_secs(cli.timeout),
        &cli.state_file,
        trace_id,
        cli.output,
    )?;

    match cli.command {
        Command::Login(args) => handle_login(&ctx, args).await,
        Command::Logout => handle_logout(&ctx).await,
        Command::Session(session) => match session {
            SessionCommand::Status => handle_session_status(&ctx),
            SessionCommand::Extend => handle_session_extend(&ctx).await,
        },
        Command::Breeds => handle_breeds(&ctx).await,
        Command::Search(args) => handle_search(&ctx, args).await,
        Command::Next => handle_page(&ctx, PageStep::Next).await,
        Command::Prev => handle_page(&ctx, PageStep::Prev).await,
        Command::Favorites(favorites) => match favorites {
            FavoritesCommand::List => handle_favorites_list(&ctx).await,
            FavoritesCommand::Add(args) => handle_favorites_add(&ctx, args).await,
            FavoritesCommand::Remove(args) => handle_favorites_remove(&ctx, args).await,
            FavoritesCommand::Toggle(args) => handle_favorites_toggle(&ctx, args).await,
        },
        Command::Match => handle_match(&ctx).await,
        Command::Locations(locations) => match locations {
            LocationsCommand::Lookup(args) => handle_locations_lookup(&ctx, args).await,
            LocationsCommand::Search(args) => handle_locations_search(&ctx, args).await,
        },
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Session(SessionCommand::Status) => "session_status",
        Command::Session(SessionCommand::Extend) => "session_extend",
        Command::Breeds => "breeds",
        Command::Search(_) => "search",
        Command::Next => "next",
        Command::Prev => "prev",
        Command::Favorites(_) => "favorites",
        Command::Match => "match",
        Command::Locations(_) => "locations",
    }
}

/// Everything a command handler needs.
pub(crate) struct AppContext {
    pub(crate) api: HttpDogApi,
    pub(crate) local: StorageHandle,
    pub(crate) session: StorageHandle,
    pub(crate) clock: SystemClock,
    pub(crate) timing: SessionTiming,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    pub(crate) fn new(
        base_url: Url,
        timeout: Duration,
        state_file: &std::path::Path,
        trace_id: &str,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let client = build_http_client(timeout, trace_id)?;
        let files = StateFiles::open(state_file);
        Ok(Self {
            api: HttpDogApi::new(client, base_url, files.session.clone()),
            local: files.local,
            session: files.session,
            clock: SystemClock,
            timing: SessionTiming::default(),
            output,
        })
    }

    pub(crate) fn session_controller(&self) -> SessionController {
        SessionController::restore(self.session.clone(), self.timing)
    }
}

#[derive(Parser)]
#[command(
    name = "dogfinder",
    about = "Search adoptable dogs, keep favorites and request a match"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "DOGFINDER_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "DOGFINDER_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long,
        global = true,
        env = "DOGFINDER_STATE_FILE",
        default_value = DEFAULT_STATE_FILE,
        help = "File holding filters, favorites and the login session between runs"
    )]
    pub(crate) state_file: PathBuf,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, env = "DOGFINDER_LOG_FORMAT", default_value_t = LogFormat::infer())]
    pub(crate) log_format: LogFormat,
    #[arg(long, global = true, env = "DOGFINDER_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start a session.
    Login(LoginArgs),
    /// End the session; favorites are kept.
    Logout,
    #[command(subcommand)]
    Session(SessionCommand),
    /// List breeds available to filter by.
    Breeds,
    /// Change filters and show the first matching page.
    Search(SearchArgs),
    /// Show the next page.
    Next,
    /// Show the previous page.
    Prev,
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Ask the service to pick one favorite.
    Match,
    #[command(subcommand)]
    Locations(LocationsCommand),
}

#[derive(Subcommand)]
pub(crate) enum SessionCommand {
    /// Show login state and time left.
    Status,
    /// Refresh the token and restart the session clock.
    Extend,
}

#[derive(Subcommand)]
pub(crate) enum FavoritesCommand {
    /// List every favorite.
    List,
    /// Fetch dogs by id and add them.
    Add(DogIdsArgs),
    /// Remove dogs by id.
    Remove(DogIdsArgs),
    /// Add or remove one dog.
    Toggle(DogIdArgs),
}

#[derive(Subcommand)]
pub(crate) enum LocationsCommand {
    /// Resolve zip codes to locations.
    Lookup(ZipArgs),
    /// Search locations by city and state.
    Search(LocationSearchArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "DOGFINDER_NAME")]
    pub(crate) name: String,
    #[arg(long, env = "DOGFINDER_EMAIL")]
    pub(crate) email: String,
}

#[derive(Args, Default)]
pub(crate) struct SearchArgs {
    /// Breed to include; repeat for several.
    #[arg(long = "breed")]
    pub(crate) breeds: Vec<String>,
    /// Drop the breed selection.
    #[arg(long, conflicts_with = "breeds")]
    pub(crate) any_breed: bool,
    #[arg(long)]
    pub(crate) age_min: Option<u32>,
    #[arg(long)]
    pub(crate) age_max: Option<u32>,
    /// Single zip code; an empty value clears it.
    #[arg(long)]
    pub(crate) zip: Option<String>,
    /// Sort as `field:direction`, e.g. `name:desc`.
    #[arg(long)]
    pub(crate) sort: Option<SortSpec>,
    /// Flip the current sort direction.
    #[arg(long, conflicts_with = "sort")]
    pub(crate) toggle_sort: bool,
    #[arg(long)]
    pub(crate) size: Option<u32>,
    /// Reset breeds, ages, zip and sort before applying other flags.
    #[arg(long)]
    pub(crate) clear: bool,
    /// Browse favorites instead of the service.
    #[arg(long, conflicts_with = "all")]
    pub(crate) favorites: bool,
    /// Browse the service again after `--favorites`.
    #[arg(long)]
    pub(crate) all: bool,
}

#[derive(Args)]
pub(crate) struct DogIdsArgs {
    #[arg(required = true)]
    pub(crate) ids: Vec<String>,
}

#[derive(Args)]
pub(crate) struct DogIdArgs {
    pub(crate) id: String,
}

#[derive(Args)]
pub(crate) struct ZipArgs {
    #[arg(required = true)]
    pub(crate) zip_codes: Vec<String>,
}

#[derive(Args)]
pub(crate) struct LocationSearchArgs {
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Two-letter state code; repeat for several.
    #[arg(long = "state")]
    pub(crate) states: Vec<String>,
    #[arg(long)]
    pub(crate) size: Option<u32>,
    #[arg(long)]
    pub(crate) from: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageStep {
    Next,
    Prev,
}
