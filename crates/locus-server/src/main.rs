//! locus-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite registry, provisions the admin account on first start, and
//! serves the JSON API over HTTP behind Basic auth.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash` in
//! config.toml:
//!
//! ```text
//! cargo run -p locus-server -- --hash-password
//! ```

mod auth;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use locus_core::{
  store::RegistryStore as _,
  user::{NewUser, Role},
};
use locus_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOCUS_*` environment variables.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  host:                String,
  port:                u16,
  store_path:          PathBuf,
  admin_username:      String,
  /// Argon2 PHC string; see `--hash-password`.
  admin_password_hash: String,
}

#[derive(Parser)]
#[command(author, version, about = "Locus registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = password_from_stdin()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LOCUS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path and open the registry.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  bootstrap_admin(&store, &server_cfg).await?;

  let app = locus_api::api_router(store.clone())
    .layer(axum::middleware::from_fn_with_state(
      store,
      auth::require_basic_auth::<SqliteStore>,
    ))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create the configured admin account unless the username already exists.
/// Without it a fresh database would have no credentials that can pass the
/// auth middleware.
async fn bootstrap_admin(
  store: &Arc<SqliteStore>,
  cfg: &ServerConfig,
) -> anyhow::Result<()> {
  let existing = store
    .get_user_by_username(&cfg.admin_username)
    .await
    .context("admin lookup failed")?;
  if existing.is_some() {
    return Ok(());
  }

  store
    .create_user(NewUser {
      username:      cfg.admin_username.clone(),
      password_hash: cfg.admin_password_hash.clone(),
      name:          "Administrator".to_string(),
      role:          Role::Admin,
      email:         None,
      phone:         None,
    })
    .await
    .context("failed to provision admin user")?;
  tracing::info!("provisioned admin user {:?}", cfg.admin_username);
  Ok(())
}

/// Read a password from stdin.
fn password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
