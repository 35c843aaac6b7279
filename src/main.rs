//! waypoint demo server.
//!
//! ```text
//! GET  /                      landing page
//! GET  /panic                 recovered by the Recovery middleware
//! GET  /assets/*filepath      echoes the captured path
//! GET  /static/*filepath      files from --static-dir
//! GET  /v1/hello?name=        query parameter
//! GET  /v1/hello/:name        path parameter
//! POST /v2/login              form body, needs an Authorization header
//! ```

use std::path::PathBuf;

use axum::http::StatusCode;
use clap::Parser;
use tokio::net::TcpListener;

use waypoint::config::{load_config, ServerConfig};
use waypoint::http::{Context, Engine, Flow, HttpServer};
use waypoint::lifecycle::{wait_for_signal, Shutdown};
use waypoint::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Demo server for the waypoint router", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory served under /static.
    #[arg(long, default_value = "./static")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, demo_engine(cli.static_dir));

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_engine(static_dir: PathBuf) -> Engine {
    let mut engine = Engine::with_defaults();
    engine.static_files("/static", static_dir);

    engine.get("/", |ctx: &mut Context| {
        ctx.html(StatusCode::OK, "<h1>Hello waypoint</h1>\n");
        Flow::Handled
    });
    engine.get("/panic", |_: &mut Context| -> Flow {
        panic!("demo panic");
    });
    engine.get("/assets/*filepath", |ctx: &mut Context| {
        let filepath = ctx.param("filepath").unwrap_or_default().to_string();
        ctx.json(StatusCode::OK, &serde_json::json!({ "filepath": filepath }));
        Flow::Handled
    });

    {
        let mut v1 = engine.group("/v1");
        v1.get("/hello", |ctx: &mut Context| {
            let name = ctx.query("name").unwrap_or_default();
            let greeting = format!("hello {}, you're at {}\n", name, ctx.path());
            ctx.string(StatusCode::OK, greeting);
            Flow::Handled
        });
        v1.get("/hello/:name", |ctx: &mut Context| {
            let greeting = format!(
                "hello {}, you're at {}\n",
                ctx.param("name").unwrap_or_default(),
                ctx.path()
            );
            ctx.string(StatusCode::OK, greeting);
            Flow::Handled
        });
    }

    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware(|ctx: &mut Context| {
            if ctx.header("authorization").is_none() {
                return ctx.abort(StatusCode::UNAUTHORIZED, "missing Authorization header");
            }
            Flow::Continue
        });
        v2.post("/login", |ctx: &mut Context| {
            let username = ctx.post_form("username").unwrap_or_default();
            let password = ctx.post_form("password").unwrap_or_default();
            ctx.json(
                StatusCode::OK,
                &serde_json::json!({ "username": username, "password": password }),
            );
            Flow::Handled
        });
    }

    engine
}
