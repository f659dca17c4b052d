use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use slidegen_common::{
    deck_json_filename, load_deck, save_deck, Audience, PresentationConfig, SavedDeck, SlideConfig, Tone, DEFAULT_SLIDES,
};
use slidegen_core::{
    client_from_config, error::GenerationError, exporter_from_config, Config, ConfigOverrides, ErrorReporter,
    SlideError,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "slidegen")]
#[command(about = "AI-powered presentation generator with PPTX export")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use this config file instead of the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the model (e.g. gemini-3-flash-preview)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Directory exported .pptx files are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Generate a built-in deck and skip image downloads
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill in the form, generate, preview and download (default)
    Interactive,
    /// Generate a deck without the UI and export it
    Generate(GenerateArgs),
    /// Open a deck saved with --save-json
    Preview {
        /// Path to the deck JSON
        file: PathBuf,
    },
    /// Export a saved deck to .pptx
    Export {
        /// Path to the deck JSON
        file: PathBuf,
        /// Re-theme the deck before exporting
        #[arg(long)]
        tone: Option<Tone>,
    },
    /// Inspect or create the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// What the presentation is about
    pub topic: String,
    #[arg(long)]
    pub audience: Option<Audience>,
    #[arg(long)]
    pub tone: Option<Tone>,
    /// Number of slides, 3 to 20
    #[arg(long, default_value_t = DEFAULT_SLIDES)]
    pub slides: usize,
    #[arg(long)]
    pub no_images: bool,
    #[arg(long)]
    pub no_notes: bool,
    #[arg(long)]
    pub citations: bool,
    /// Also write the deck as JSON for later preview or export; without a
    /// PATH the file goes next to the .pptx, named after the deck title
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub save_json: Option<Option<PathBuf>>,
    /// Skip writing the .pptx
    #[arg(long)]
    pub no_export: bool,
}

impl GenerateArgs {
    pub fn to_config(&self) -> PresentationConfig {
        let mut config = PresentationConfig::new(self.topic.trim());
        if let Some(audience) = self.audience {
            config.audience = audience;
        }
        if let Some(tone) = self.tone {
            config.tone = tone;
        }
        config.slide_count = self.slides;
        config.include_images = !self.no_images;
        config.include_speaker_notes = !self.no_notes;
        config.include_citations = self.citations;
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration with the API key masked
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        report(&e);
        std::process::exit(1);
    }
    Ok(())
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<SlideError>() {
        Some(slide_error) => {
            eprintln!("{}", ErrorReporter::get_severity(slide_error));
            eprintln!("{}", ErrorReporter::format_user_error(slide_error));
        }
        None => eprintln!("❌ {error:#}"),
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    // init never reads config, so a missing --config target is fine there
    if let Some(Commands::Config {
        action: ConfigAction::Init { force },
    }) = &cli.command
    {
        init_logging(cli.debug, None)?;
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => SlideConfig::config_path()?,
        };
        return init_config(&path, *force).await;
    }

    let overrides = ConfigOverrides {
        config_path: cli.config.clone(),
        model: cli.model.clone(),
        output_dir: cli.output_dir.clone(),
        offline: cli.offline,
    };
    let config = Config::load(overrides).await?;

    let interactive = matches!(
        cli.command,
        None | Some(Commands::Interactive) | Some(Commands::Preview { .. })
    );
    init_logging(cli.debug, interactive.then(|| config.log_path()))?;
    debug!(sources = ?config.sources, offline = config.offline, "configuration loaded");

    match cli.command {
        None | Some(Commands::Interactive) => slidegen_tui::run_interactive(&config).await,
        Some(Commands::Generate(args)) => generate(&config, &args).await.map(|_| ()),
        Some(Commands::Preview { file }) => {
            let deck = read_deck(&file).await?;
            slidegen_tui::run_preview(&config, deck).await
        }
        Some(Commands::Export { file, tone }) => {
            let mut deck = read_deck(&file).await?;
            if let Some(tone) = tone {
                deck.config.tone = tone;
            }
            let path = exporter_from_config(&config)?.export(&deck.data, &deck.config).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Some(Commands::Config { action: ConfigAction::Show }) => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Stderr for headless commands; a file when the terminal belongs to the UI.
fn init_logging(debug: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

/// Returns the exported .pptx path, if one was written.
pub async fn generate(config: &Config, args: &GenerateArgs) -> Result<Option<PathBuf>> {
    let request = args.to_config();
    request
        .validate()
        .map_err(|reason| SlideError::from(GenerationError::InvalidRequest { reason }))?;

    let client = client_from_config(config)?;
    info!(client = client.name(), topic = %request.topic, "generating deck");
    let data = client.generate(&request).await?;
    println!("Generated \"{}\" with {} slides", data.title, data.slides.len());

    if let Some(explicit) = &args.save_json {
        let path = explicit
            .clone()
            .unwrap_or_else(|| config.settings.output_dir.join(deck_json_filename(&data.title)));
        let deck = SavedDeck {
            config: request.clone(),
            data: data.clone(),
        };
        let saved = save_deck(&path, &deck).await?;
        println!("Saved deck JSON to {}", saved.display());
    }

    if args.no_export {
        return Ok(None);
    }
    let path = exporter_from_config(config)?.export(&data, &request).await?;
    println!("Saved {}", path.display());
    Ok(Some(path))
}

async fn read_deck(path: &Path) -> Result<SavedDeck> {
    let mut deck = load_deck(path).await?;
    let clipped = deck.data.clip_slides();
    if clipped > 0 {
        info!("dropped {clipped} slides past the limit from {}", path.display());
    }
    Ok(deck)
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite", path.display());
    }
    SlideConfig::default().save_to(path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
