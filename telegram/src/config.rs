// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::time::Duration;

pub(crate) const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub(crate) const JSON_TIMEOUT_SECS: u64 = 10;
pub(crate) const UPLOAD_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct TelegramConfig {
  pub(crate) api_base: String,
  pub(crate) json_timeout: Duration,
  pub(crate) upload_timeout: Duration,
}

impl Default for TelegramConfig {
  fn default() -> Self {
    Self {
      api_base: TELEGRAM_API_BASE.to_string(),
      json_timeout: Duration::from_secs(JSON_TIMEOUT_SECS),
      upload_timeout: Duration::from_secs(UPLOAD_TIMEOUT_SECS),
    }
  }
}
