//! Forbidden Wording Scanner Server
//!
//! Accepts PDF and DOCX report uploads and returns every occurrence of
//! forbidden wording, grouped by page or section, with context and a
//! suggested rewording.
//!
//! ## Architecture
//!
//! - Uploads are spooled to a temporary file and decoded off the async runtime
//! - Scanning is done by `wording-engine` against a dictionary loaded at startup
//! - Optional advisory enrichment through an OpenAI-compatible API
//! - Rate limiting via tower-governor

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wording_engine::advisory::{Advisor, AdvisoryOptions};
use wording_engine::{Dictionary, SegmenterConfig, WordingEngine};

mod advisor;
mod api;
mod error;
mod upload;

use advisor::OpenAiAdvisor;
use api::{
    handle_health, handle_list_categories, handle_parse_document, handle_supported_types,
};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Command-line arguments for the scanner server
#[derive(Parser, Debug)]
#[command(name = "wording-server")]
#[command(about = "Forbidden wording scanner for PDF and DOCX reports")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// JSON dictionary replacing the built-in English word lists
    #[arg(long = "dictionary", env = "DICTIONARY_PATH")]
    dictionary_path: Option<PathBuf>,

    /// Word count after which a DOCX section starts a new synthetic page
    #[arg(long, env = "WORDS_PER_PAGE", default_value = "500")]
    words_per_page: usize,

    /// Maximum upload size in bytes
    #[arg(long, env = "MAX_FILE_SIZE", default_value = "10485760")]
    max_file_size: usize,

    /// Directory for spooled uploads (defaults to the system temp dir)
    #[arg(long, env = "UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Decode and scan timeout in milliseconds
    #[arg(long, env = "DECODE_TIMEOUT_MS", default_value = "30000")]
    decode_timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// API key for the advisory service; advisory is disabled when unset
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "API_BASE_URL", default_value = "https://api.openai.com/v1")]
    api_base_url: String,

    /// Chat model used for advisories
    #[arg(long, env = "ADVISORY_MODEL", default_value = "gpt-4")]
    advisory_model: String,

    /// Per-record advisory timeout in milliseconds
    #[arg(long, env = "ADVISORY_TIMEOUT_MS", default_value = "10000")]
    advisory_timeout_ms: u64,

    /// Upper bound in milliseconds for advising all findings of one scan
    #[arg(long, env = "ADVISORY_TOTAL_TIMEOUT_MS", default_value = "30000")]
    advisory_total_timeout_ms: u64,

    /// Concurrent advisory requests per scan
    #[arg(long, default_value = "4")]
    advisory_concurrency: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WordingEngine>,
    pub advisor: Option<Arc<dyn Advisor>>,
    pub advisory: AdvisoryOptions,
    pub upload_dir: PathBuf,
    pub max_file_size: usize,
    /// Decode and scan timeout in milliseconds
    pub decode_timeout_ms: u64,
}

/// All routes and non-rate-limit middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.max_file_size.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // Health check
        .route("/", get(handle_health))
        .route("/health", get(handle_health))
        .route("/api/health", get(handle_health))
        // API endpoints
        .route("/api/parse-document", post(handle_parse_document))
        .route("/api/upload", post(handle_parse_document))
        .route("/api/supported-types", get(handle_supported_types))
        .route("/api/categories", get(handle_list_categories))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wording server on {}:{}", args.host, args.port);

    let dictionary = match &args.dictionary_path {
        Some(path) => Dictionary::from_path(path)
            .with_context(|| format!("loading dictionary {}", path.display()))?,
        None => Dictionary::builtin(),
    };
    info!(
        "Dictionary: {} categories, {} terms",
        dictionary.categories().len(),
        dictionary.term_count()
    );

    let engine = WordingEngine::new(Arc::new(dictionary))?.with_segmenter(SegmenterConfig {
        words_per_page: args.words_per_page,
        ..SegmenterConfig::default()
    });

    let advisor: Option<Arc<dyn Advisor>> = match &args.openai_api_key {
        Some(key) if !key.trim().is_empty() => {
            info!("Advisory enabled: model {} at {}", args.advisory_model, args.api_base_url);
            Some(Arc::new(OpenAiAdvisor::new(
                key.clone(),
                args.api_base_url.clone(),
                args.advisory_model.clone(),
            )?))
        }
        _ => {
            info!("Advisory disabled: no API key configured");
            None
        }
    };

    let upload_dir = args.upload_dir.clone().unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&upload_dir)
        .with_context(|| format!("creating upload dir {}", upload_dir.display()))?;

    let state = AppState {
        engine: Arc::new(engine),
        advisor,
        advisory: AdvisoryOptions {
            timeout: Duration::from_millis(args.advisory_timeout_ms),
            max_concurrency: args.advisory_concurrency,
            total_timeout: Duration::from_millis(args.advisory_total_timeout_ms),
        },
        upload_dir,
        max_file_size: args.max_file_size,
        decode_timeout_ms: args.decode_timeout_ms,
    };

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .context("invalid rate limit configuration")?,
    );

    let app = build_router(state).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Max upload size: {} bytes", args.max_file_size);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
