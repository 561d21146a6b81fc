use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ink_separation::{decode_image, SeparationMethod, SeparationRequest, Separator, Srgb};
use inksep::api;
use inksep::assets::AssetLoader;
use inksep::models::AppConfig;
use inksep::server;
use inksep::services::export_result;

#[derive(Parser)]
#[command(name = "inksep")]
#[command(about = "Screen-print color separation: ink channels, previews and ink estimates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Separate an image file into channel PNGs
    Separate {
        /// Source image (PNG, JPEG, GIF, BMP, WebP or TIFF)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Separation method
        #[arg(short, long, default_value = "gradient_aware")]
        method: SeparationMethod,

        /// Target number of colors (2-20)
        #[arg(short, long, default_value_t = 8)]
        colors: usize,

        /// Garment color as #RRGGBB
        #[arg(long, default_value = "#000000")]
        fabric_color: String,

        /// Do not print a white underbase
        #[arg(long)]
        no_underbase: bool,

        /// Mask edge softness (0-1)
        #[arg(long, default_value_t = 0.6)]
        softness: f32,

        /// Match channel colors to the Pantone table
        #[arg(long)]
        match_pantone: bool,
    },
    /// Analyze an image and suggest a method and color count
    Analyze {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract pantone-coated.json
        #[arg(long)]
        reference: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "inksep API",
        description = "Screen-print color separation: ink channels, previews and ink estimates",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_root,
        api::handle_health,
        api::handle_process,
        api::handle_adjust_colors,
        api::handle_match_pantone,
        api::handle_analyze,
        api::handle_compare,
    ),
    components(schemas(
        api::ServiceInfo,
        api::MethodInfo,
        api::HealthResponse,
        api::ProcessRequest,
        api::ChannelResponse,
        api::SeparationResponse,
        api::AdjustRequest,
        api::AdjustResponse,
        api::MatchRequest,
        api::MatchResponse,
        api::AnalyzeRequest,
        api::CompareRequest,
        api::CompareResponse,
    )),
    tags(
        (name = "Service", description = "Service description and health"),
        (name = "Separation", description = "Full color separation"),
        (name = "Tools", description = "Adjustment, matching, analysis and comparison")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Separate {
            input,
            output,
            method,
            colors,
            fabric_color,
            no_underbase,
            softness,
            match_pantone,
        }) => run_separate_command(
            &input,
            &output,
            method,
            colors,
            &fabric_color,
            !no_underbase,
            softness,
            match_pantone,
        ),
        Some(Commands::Analyze { input }) => run_analyze_command(&input),
        Some(Commands::Init {
            config,
            reference,
            all,
            force,
            list,
        }) => run_init_command(config, reference, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inksep=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Build a separator from config and reference table (env vars honored)
fn cli_separator() -> Separator {
    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    let reference = Arc::new(server::load_reference_table(&loader, &config));
    Separator::new(reference).with_max_dimension(config.max_dimension)
}

fn read_image(input: &Path) -> anyhow::Result<image::RgbImage> {
    let bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", input.display()))?;
    Ok(decode_image(&bytes)?)
}

/// Separate an image file (no server needed)
#[allow(clippy::too_many_arguments)]
fn run_separate_command(
    input: &Path,
    output: &Path,
    method: SeparationMethod,
    colors: usize,
    fabric_color: &str,
    underbase: bool,
    softness: f32,
    match_pantone: bool,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let fabric: Srgb = fabric_color
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid --fabric-color {fabric_color:?}: {e}"))?;
    let image = read_image(input)?;

    let request = SeparationRequest::builder(image)
        .method(method)
        .target_count(colors)
        .fabric_color(fabric)
        .underbase(underbase)
        .softness(softness)
        .match_reference(match_pantone)
        .build()?;

    let result = cli_separator().separate(&request)?;
    let written = export_result(&result, output)?;

    println!(
        "Separated {} into {} channels ({} method, quality {:.1})",
        input.display(),
        result.channels.len(),
        method,
        result.quality_score
    );
    for channel in &result.channels {
        println!(
            "  {:>2}  {:<24} {}  {:5.1}%",
            channel.order,
            channel.name,
            channel.hex(),
            channel.coverage_percent
        );
    }
    for rec in &result.recommendations {
        println!("  * {rec}");
    }
    println!("Wrote {} files to {}", written.len(), output.display());

    Ok(())
}

/// Print the analysis of an image file as JSON
fn run_analyze_command(input: &Path) -> anyhow::Result<()> {
    init_cli_tracing();

    let image = read_image(input)?;
    let analysis = cli_separator().analyze(&image)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    config: bool,
    reference: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    use inksep::assets::AssetCategory;

    if list {
        println!("Embedded assets:\n");
        println!("Config:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        println!("\nReference:");
        for f in AssetLoader::list_embedded(AssetCategory::Reference) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || config {
        categories.push(AssetCategory::Config);
    }
    if all || reference {
        categories.push(AssetCategory::Reference);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --config, or --reference");
        eprintln!("\nRun 'inksep init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = AssetLoader::from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let reference_table = std::env::var("REFERENCE_TABLE").ok();

    println!("inksep v{VERSION}");
    println!("Screen-print color separation service\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR       = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:8000 (default)")
    );
    println!(
        "  CONFIG_FILE     = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  REFERENCE_TABLE = {}",
        reference_table.as_deref().unwrap_or("(not set)")
    );

    fn source(path: Option<&str>) -> String {
        match path {
            Some(p) if Path::new(p).exists() => p.to_string(),
            Some(_) => "embedded (file not found)".to_string(),
            None => "embedded".to_string(),
        }
    }

    println!("\nAsset Sources:");
    println!("  Config:    {}", source(config_file.as_deref()));
    println!("  Reference: {}", source(reference_table.as_deref()));

    println!("\nSeparation Methods:");
    for method in <SeparationMethod as strum::IntoEnumIterator>::iter() {
        println!("  {:<18} {}", method.to_string(), method.description());
    }

    println!("\nCommands:");
    println!("  inksep serve      Start the HTTP server");
    println!("  inksep separate   Separate an image into channel PNGs");
    println!("  inksep analyze    Suggest a method and color count");
    println!("  inksep init       Extract embedded assets");
    println!("\nRun 'inksep --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inksep=debug,ink_separation=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let asset_loader = Arc::new(AssetLoader::from_env());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    // Log asset sources
    let describe = |p: Option<&Path>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    };
    tracing::info!(
        config = %describe(asset_loader.config_file()),
        reference = %describe(asset_loader.reference_table()),
        "Asset sources configured"
    );

    // Seed if configured paths are missing
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                config = report.config_seeded,
                reference = report.reference_seeded,
                "Seeded missing files with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "inksep server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
