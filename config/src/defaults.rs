// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::fmt;

pub(crate) const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub(crate) const CHAT_ID_ENV: &str = "CHAT_ID";

/// Process-wide fallback credentials, used only when a request omits them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Defaults {
  pub bot_token: Option<String>,
  pub chat_id: Option<String>,
}

impl Defaults {
  pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
    Self {
      bot_token: bot_token.filter(|v| !v.trim().is_empty()),
      chat_id: chat_id.filter(|v| !v.trim().is_empty()),
    }
  }

  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    Self::new(lookup(BOT_TOKEN_ENV), lookup(CHAT_ID_ENV))
  }
}

impl fmt::Debug for Defaults {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Defaults")
      .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
      .field("chat_id", &self.chat_id)
      .finish()
  }
}
