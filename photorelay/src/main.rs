// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use config::Config;
use relay::{AppState, DefaultsSource};
use std::sync::Arc;
use telegram::TelegramClient;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

#[instrument(skip(config))]
fn build_state(config: &Config) -> Result<AppState> {
  let client = TelegramClient::builder()
    .api_base(config.telegram.api_base.clone())
    .json_timeout(config.telegram.json_timeout())
    .upload_timeout(config.telegram.upload_timeout())
    .build()
    .context("Failed to build Telegram client")?;

  Ok(AppState::new(
    Arc::new(client),
    DefaultsSource::Environment,
    config.server.max_body_bytes,
  ))
}

#[actix_web::main]
async fn main() -> Result<()> {
  #[cfg(debug_assertions)]
  base::dotenv::load()?;
  setup_logging();

  let config = Config::load().context("Failed to load configuration")?;
  let state = web::Data::new(build_state(&config)?);
  let address = config.server.bind_address();

  info!(
    address = %address,
    api_base = %config.telegram.api_base,
    max_body_bytes = config.server.max_body_bytes,
    "Starting photo relay"
  );

  HttpServer::new(move || {
    App::new()
      .app_data(state.clone())
      .wrap(relay::access_logger())
      .configure(relay::configure)
  })
  .bind(&address)
  .with_context(|| format!("Failed to bind {}", address))?
  .run()
  .await
  .context("Server terminated with an error")
}
