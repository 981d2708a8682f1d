use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use spotify_facade::{
    auth::AuthSession,
    config::{self, SpotifyConfig},
    logging, Outcome, PageRequest, PlayedWindow, RepeatMode, Spotify, SpotifyClient, TimeRange,
};

#[derive(Parser)]
#[command(name = "spotify-facade")]
#[command(about = "Query and control Spotify playback from the command line", long_about = None)]
struct Cli {
    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", default_value = config::DEFAULT_CLIENT_ID, global = true)]
    client_id: String,

    /// OAuth redirect URI registered for the client id
    #[arg(long, env = "SPOTIFY_REDIRECT_URI", default_value = config::DEFAULT_REDIRECT_URI, global = true)]
    redirect_uri: String,

    /// Directory holding the cached refresh token
    #[arg(long, env = "SPOTIFY_CACHE_DIR", default_value = config::DEFAULT_CACHE_DIR, global = true)]
    cache_dir: PathBuf,

    /// Web API base URL
    #[arg(long, env = "SPOTIFY_API_BASE_URL", default_value = config::DEFAULT_API_BASE_URL, global = true)]
    api_base_url: String,

    /// Use this access token instead of running the OAuth flow
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// Directory for log files
    #[arg(long, env = "SPOTIFY_LOG_DIR", default_value = logging::LOG_DIR, global = true)]
    log_dir: PathBuf,

    /// Send player commands to this device instead of the active one
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> SpotifyConfig {
        SpotifyConfig {
            client_id: self.client_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            cache_dir: self.cache_dir.clone(),
            api_base_url: self.api_base_url.clone(),
            ..SpotifyConfig::default()
        }
    }
}

#[derive(Args)]
struct PageArgs {
    /// Number of items (1-50)
    #[arg(long, default_value_t = PageRequest::DEFAULT_LIMIT)]
    limit: u32,
    /// Index of the first item
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest::new(args.limit, args.offset)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the item currently loaded
    NowPlaying,
    /// Show the full playback state
    State,
    /// Show shuffle, repeat and device
    Settings,
    /// Print whether something is playing
    IsPlaying,
    /// Resume playback, or start a single track
    Play {
        /// Track id, URI or URL
        track: Option<String>,
    },
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    Toggle {
        /// Force a state instead of flipping the current one
        #[arg(long)]
        playing: Option<bool>,
    },
    /// Skip to the next track
    Next,
    /// Skip to the previous track
    Previous,
    /// Seek within the current track
    Seek {
        /// Position in milliseconds
        position_ms: u32,
    },
    /// Set the volume
    Volume {
        /// Volume percent (0-100)
        percent: u8,
    },
    /// Set shuffle, or toggle it when no state is given
    Shuffle { state: Option<bool> },
    /// Set repeat (off, track, context), or cycle it when no mode is given
    Repeat { mode: Option<RepeatMode> },
    /// Add a track to the queue
    Queue {
        /// Track id, URI or URL
        track: String,
    },
    /// Search for tracks
    Search {
        query: String,
        /// Number of results (clamped to 1-50)
        #[arg(short, long, default_value_t = spotify_facade::facade::DEFAULT_SEARCH_COUNT)]
        count: u32,
    },
    /// List available devices
    Devices,
    /// Move playback to a device and start playing there
    Transfer { device_id: String },
    /// Play a playlist, album or artist
    PlayContext {
        /// Context URI or URL
        uri: String,
    },
    /// Show the user's profile
    Me,
    /// Show the user's top artists
    TopArtists {
        /// short, medium or long
        #[arg(long, default_value = "medium")]
        range: TimeRange,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show the user's top tracks
    TopTracks {
        #[arg(long, default_value = "medium")]
        range: TimeRange,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List the user's playlists
    Playlists {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show recently played tracks
    Recent {
        #[arg(long, default_value_t = PageRequest::DEFAULT_LIMIT)]
        limit: u32,
        /// Only plays before this RFC 3339 timestamp
        #[arg(long, conflicts_with = "after")]
        before: Option<DateTime<Utc>>,
        /// Only plays after this RFC 3339 timestamp
        #[arg(long)]
        after: Option<DateTime<Utc>>,
    },
    /// Look up tracks
    Track {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Look up artists
    Artist {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Look up albums
    Album {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show an artist's top tracks
    ArtistTopTracks { id: String },
    /// Refresh the access token now
    Reauth,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_outcome<T: Serialize>(outcome: Outcome<T>) -> Result<()> {
    match outcome {
        Outcome::Ready(value) => print_json(&value),
        Outcome::Empty(state) => print_json(&json!({ "empty": state })),
    }
}

fn print_ack(outcome: Outcome<()>) -> Result<()> {
    print_outcome(outcome.map(|_| json!({ "ok": true })))
}

/// Print a single record for one id, a list for several.
fn print_lookup<T: Serialize>(mut records: Vec<T>) -> Result<()> {
    if records.len() == 1 {
        if let Some(record) = records.pop() {
            return print_json(&record);
        }
    }
    print_json(&records)
}

async fn run(spotify: &Spotify, command: Commands, device: Option<String>) -> Result<()> {
    let controls = match device {
        Some(device) => spotify.controls().on_device(device),
        None => spotify.controls(),
    };

    match command {
        Commands::NowPlaying => print_outcome(spotify.playback().current().await?),
        Commands::State => print_outcome(spotify.playback().state().await?),
        Commands::Settings => print_outcome(controls.settings().await?),
        Commands::IsPlaying => print_json(&json!({ "is_playing": controls.is_playing().await? })),
        Commands::Play { track: Some(track) } => print_ack(controls.play_track(&track).await?),
        Commands::Play { track: None } => print_ack(controls.play().await?),
        Commands::Pause => print_ack(controls.pause().await?),
        Commands::Toggle { playing } => {
            print_outcome(controls.toggle(playing).await?.map(|p| json!({ "is_playing": p })))
        }
        Commands::Next => print_ack(controls.next().await?),
        Commands::Previous => print_ack(controls.previous().await?),
        Commands::Seek { position_ms } => print_ack(controls.seek(position_ms).await?),
        Commands::Volume { percent } => print_ack(controls.set_volume(percent).await?),
        Commands::Shuffle { state } => {
            print_outcome(controls.set_shuffle(state).await?.map(|s| json!({ "shuffle": s })))
        }
        Commands::Repeat { mode } => {
            print_outcome(controls.set_repeat(mode).await?.map(|r| json!({ "repeat": r })))
        }
        Commands::Queue { track } => print_ack(controls.add_to_queue(&track).await?),
        Commands::Search { query, count } => print_json(&controls.find_song(&query, count).await?),
        Commands::Devices => print_json(&controls.devices().await?),
        Commands::Transfer { device_id } => {
            controls.transfer_to(&device_id).await?;
            print_json(&json!({ "ok": true }))
        }
        Commands::PlayContext { uri } => print_ack(controls.play_context(&uri).await?),
        Commands::Me => print_json(&spotify.user_data().profile().await?),
        Commands::TopArtists { range, page } => {
            print_json(&spotify.user_data().top_artists(range, page.into()).await?)
        }
        Commands::TopTracks { range, page } => {
            print_json(&spotify.user_data().top_tracks(range, page.into()).await?)
        }
        Commands::Playlists { page } => print_json(&spotify.user_data().playlists(page.into()).await?),
        Commands::Recent { limit, before, after } => {
            let window = before.map(PlayedWindow::Before).or(after.map(PlayedWindow::After));
            print_json(&spotify.user_data().recently_played(limit, window).await?)
        }
        Commands::Track { ids } => print_lookup(spotify.song_data().tracks(ids.as_slice()).await?),
        Commands::Artist { ids } => print_lookup(spotify.song_data().artists(ids.as_slice()).await?),
        Commands::Album { ids } => print_lookup(spotify.song_data().albums(ids.as_slice()).await?),
        Commands::ArtistTopTracks { id } => {
            print_json(&spotify.song_data().artist_top_tracks(&id).await?)
        }
        Commands::Reauth => {
            spotify.reauthenticate().await?;
            print_json(&json!({ "ok": true }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init_logging(&cli.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== spotify-facade starting ===");

    let config = cli.config();
    let client = match &cli.access_token {
        Some(token) => SpotifyClient::connect(&config, AuthSession::from_access_token(&config, token)).await?,
        None => SpotifyClient::login(&config).await?,
    };
    let spotify = Spotify::new(client);

    let result = run(&spotify, cli.command, cli.device).await;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}
