// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::Defaults;
use std::sync::Arc;
use telegram::PhotoApi;

/// Where fallback credentials come from.
#[derive(Debug, Clone)]
pub enum DefaultsSource {
  /// `BOT_TOKEN` / `CHAT_ID`, read on every request.
  Environment,
  Fixed(Defaults),
}

impl DefaultsSource {
  pub fn current(&self) -> Defaults {
    match self {
      DefaultsSource::Environment => Defaults::from_env(),
      DefaultsSource::Fixed(defaults) => defaults.clone(),
    }
  }
}

/// Read-only state shared by every request.
pub struct AppState {
  pub(crate) api: Arc<dyn PhotoApi>,
  pub(crate) defaults: DefaultsSource,
  pub(crate) max_body_bytes: usize,
}

impl AppState {
  pub fn new(api: Arc<dyn PhotoApi>, defaults: DefaultsSource, max_body_bytes: usize) -> Self {
    Self {
      api,
      defaults,
      max_body_bytes,
    }
  }

  pub fn defaults(&self) -> Defaults {
    self.defaults.current()
  }

  pub fn max_body_bytes(&self) -> usize {
    self.max_body_bytes
  }
}
