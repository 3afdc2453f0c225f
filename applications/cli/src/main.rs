/// Serenade - terminal music box
use anyhow::Context;
use clap::{Parser, Subcommand};
use serenade_cli::{
    commands::HELP,
    config::StorageBackend,
    display, media, CliConfig, Flow, Session, SessionInput, SimulatedDevice,
};
use serenade_core::{
    load_site_settings, parse_start_date, save_site_settings, MediaData, MediaId, MediaStore,
    NewImage, NewTrack, SettingsStore,
};
use serenade_playback::AudioDevice;
use serenade_storage::{
    MemoryMediaStore, MemorySettingsStore, SqliteMediaStore, SqliteSettingsStore,
};
use std::{io::BufRead, path::PathBuf, sync::Arc};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "serenade")]
#[command(about = "Serenade music box for the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SERENADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive player (default)
    Play,
    /// Manage stored songs
    Tracks {
        #[command(subcommand)]
        action: TrackAction,
    },
    /// Manage carousel images
    Images {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Show or change site settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum TrackAction {
    /// List stored songs in playlist order
    List,
    /// Store a song from a URL or a local file
    #[command(group(clap::ArgGroup::new("source").required(true).args(["url", "file"])))]
    Add {
        /// Song title
        #[arg(short, long)]
        title: String,
        /// Artist name
        #[arg(short, long)]
        artist: String,
        /// Remote or relative URL
        #[arg(long)]
        url: Option<String>,
        /// Local audio file to embed
        #[arg(long)]
        file: Option<PathBuf>,
        /// MIME type for --file (guessed from the extension otherwise)
        #[arg(long, requires = "file")]
        mime: Option<String>,
    },
    /// Delete a song by id
    Remove { id: String },
    /// Delete every song and image
    Clear,
}

#[derive(Subcommand)]
enum ImageAction {
    /// List stored images
    List,
    /// Store an image from a URL or a local file
    #[command(group(clap::ArgGroup::new("source").required(true).args(["url", "file"])))]
    Add {
        /// Remote or relative URL
        #[arg(long)]
        url: Option<String>,
        /// Local image file to embed
        #[arg(long)]
        file: Option<PathBuf>,
        /// MIME type for --file (guessed from the extension otherwise)
        #[arg(long, requires = "file")]
        mime: Option<String>,
    },
    /// Delete an image by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective site settings
    Show,
    /// Set the custom message
    SetMessage { message: String },
    /// Set the relationship start date (e.g. 2025-11-04T01:00:00)
    SetStart { date: String },
}

struct Stores {
    media: Arc<dyn MediaStore>,
    settings: Arc<dyn SettingsStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serenade_cli=info,serenade_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let stores = open_stores(&config).await?;

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(config, stores).await?,
        Commands::Tracks { action } => tracks(action, &stores).await?,
        Commands::Images { action } => images(action, &stores).await?,
        Commands::Settings { action } => settings(action, &config, &stores).await?,
    }

    Ok(())
}

async fn open_stores(config: &CliConfig) -> anyhow::Result<Stores> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage; nothing will be saved");
            Ok(Stores {
                media: Arc::new(MemoryMediaStore::new()),
                settings: Arc::new(MemorySettingsStore::new()),
            })
        }
        StorageBackend::Sqlite => {
            let url = &config.storage.database_url;
            if let Some(parent) = sqlite_path(url).and_then(|path| path.parent().map(PathBuf::from))
            {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(&parent).with_context(|| {
                        format!("creating database directory {}", parent.display())
                    })?;
                }
            }

            let pool = serenade_storage::create_pool(url).await?;
            serenade_storage::run_migrations(&pool).await?;
            tracing::info!("Database connected");

            Ok(Stores {
                media: Arc::new(SqliteMediaStore::new(pool.clone())),
                settings: Arc::new(SqliteSettingsStore::new(pool)),
            })
        }
    }
}

/// File path of a `sqlite:` URL, if it names a file
fn sqlite_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

async fn play(config: CliConfig, stores: Stores) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let device_tx = tx.clone();
    let device_settings = config.device.clone();
    let mut session = Session::open(config, stores.media, stores.settings, move |resolver| {
        Box::new(SimulatedDevice::new(resolver, device_tx, device_settings)) as Box<dyn AudioDevice>
    })
    .await?;

    let site = session.site();
    println!("Together since {}", site.start_date.format("%d/%m/%Y %H:%M"));
    if !site.custom_message.is_empty() {
        println!("{}", site.custom_message);
    }
    println!("{}", session.status_line());
    println!("Type `help` for commands.");
    print_events(&mut session);

    // A plain thread: a blocked stdin read must not hold up runtime shutdown
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(SessionInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(SessionInput::Shutdown);
    });

    loop {
        let input = tokio::select! {
            input = rx.recv() => input.unwrap_or(SessionInput::Shutdown),
            _ = tokio::signal::ctrl_c() => SessionInput::Shutdown,
        };

        let typed = matches!(&input, SessionInput::Line(line) if !line.trim().is_empty());

        let flow = session.handle(input).await;
        print_events(&mut session);

        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::ShowHelp) => println!("{HELP}"),
            Ok(Flow::Continue) => {}
            Err(e) => println!("{e}"),
        }

        if typed {
            println!("{}", session.status_line());
        }
    }

    println!("Bye.");
    Ok(())
}

fn print_events(session: &mut Session) {
    let events = session.drain_events();
    if events.is_empty() {
        return;
    }

    for event in &events {
        if let Some(text) = display::describe_event(event, session.playlist()) {
            println!("{text}");
        }
    }
}

async fn media_data(
    url: Option<String>,
    file: Option<PathBuf>,
    mime: Option<String>,
) -> anyhow::Result<MediaData> {
    match (url, file) {
        (Some(url), None) => Ok(MediaData::url(url)),
        (None, Some(file)) => Ok(media::import_file(&file, mime.as_deref()).await?),
        _ => anyhow::bail!("give exactly one of --url or --file"),
    }
}

async fn tracks(action: TrackAction, stores: &Stores) -> anyhow::Result<()> {
    match action {
        TrackAction::List => {
            let tracks = stores.media.list_tracks().await?;
            if tracks.is_empty() {
                println!("No songs stored; the default playlist will be used.");
            }
            for (n, track) in tracks.iter().enumerate() {
                println!(
                    "{:>3}. {}  {} - {}  [{}]",
                    n + 1,
                    track.id,
                    track.title,
                    track.artist,
                    track.data.describe()
                );
            }
        }
        TrackAction::Add {
            title,
            artist,
            url,
            file,
            mime,
        } => {
            let data = media_data(url, file, mime).await?;
            let track = stores
                .media
                .save_track(NewTrack::new(title, artist, data))
                .await?;
            println!("Added {} ({})", track.title, track.id);
        }
        TrackAction::Remove { id } => {
            stores.media.delete_track(&MediaId::new(id.clone())).await?;
            println!("Removed {id}");
        }
        TrackAction::Clear => {
            stores.media.clear_all().await?;
            println!("All songs and images deleted");
        }
    }

    Ok(())
}

async fn images(action: ImageAction, stores: &Stores) -> anyhow::Result<()> {
    match action {
        ImageAction::List => {
            let images = stores.media.list_images().await?;
            if images.is_empty() {
                println!("No images stored.");
            }
            for (n, image) in images.iter().enumerate() {
                println!("{:>3}. {}  [{}]", n + 1, image.id, image.data.describe());
            }
        }
        ImageAction::Add { url, file, mime } => {
            let data = media_data(url, file, mime).await?;
            let image = stores.media.save_image(NewImage::new(data)).await?;
            println!("Added image {}", image.id);
        }
        ImageAction::Remove { id } => {
            stores.media.delete_image(&MediaId::new(id.clone())).await?;
            println!("Removed {id}");
        }
    }

    Ok(())
}

async fn settings(
    action: SettingsAction,
    config: &CliConfig,
    stores: &Stores,
) -> anyhow::Result<()> {
    let defaults = config.default_site_settings()?;
    let mut site = load_site_settings(stores.settings.as_ref(), &defaults).await?;

    match action {
        SettingsAction::Show => {
            println!("start_date     = {}", site.start_date_string());
            println!("custom_message = {}", site.custom_message);
            return Ok(());
        }
        SettingsAction::SetMessage { message } => {
            site.custom_message = message;
        }
        SettingsAction::SetStart { date } => {
            site.start_date = parse_start_date(&date)?;
        }
    }

    save_site_settings(stores.settings.as_ref(), &site).await?;
    println!("Settings saved");
    Ok(())
}
