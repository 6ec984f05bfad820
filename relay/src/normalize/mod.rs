// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
//! Turns each inbound transport encoding into a [`PhotoMessage`].
//!
//! Every decoder resolves credentials first, then the image, then the
//! optional parameters, so the reported error does not depend on which
//! transport the caller used.
pub(crate) mod json;
pub(crate) mod multipart;
pub(crate) mod raw;

use config::Defaults;
use error::{Credential, Error};
use std::fmt;
use telegram::{ChatId, ParseMode, PhotoMessageBuilder};

pub(crate) const DEFAULT_FILE_NAME: &str = "image.png";
pub(crate) const DEFAULT_MIME_TYPE: &str = "image/png";

pub(crate) struct Credentials {
  bot_token: String,
  chat_id: ChatId,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("bot_token", &"<redacted>")
      .field("chat_id", &self.chat_id)
      .finish()
  }
}

impl Credentials {
  /// Request-supplied values win over the configured defaults.
  pub(crate) fn resolve(
    bot_token: Option<String>,
    chat_id: Option<ChatId>,
    defaults: &Defaults,
  ) -> Result<Self, Error> {
    let bot_token = resolve_bot_token(bot_token, defaults)?;
    let chat_id = resolve_chat_id(chat_id, defaults)?;
    Ok(Self { bot_token, chat_id })
  }

  pub(crate) fn new(bot_token: String, chat_id: ChatId) -> Self {
    Self { bot_token, chat_id }
  }

  pub(crate) fn into_builder(self) -> PhotoMessageBuilder {
    PhotoMessageBuilder::new()
      .bot_token(self.bot_token)
      .chat_id(self.chat_id)
  }
}

pub(crate) fn resolve_bot_token(bot_token: Option<String>, defaults: &Defaults) -> Result<String, Error> {
  non_blank(bot_token)
    .or_else(|| non_blank(defaults.bot_token.clone()))
    .ok_or(Error::MissingCredential(Credential::BotToken))
}

pub(crate) fn resolve_chat_id(chat_id: Option<ChatId>, defaults: &Defaults) -> Result<ChatId, Error> {
  chat_id
    .or_else(|| non_blank(defaults.chat_id.clone()).map(ChatId::Name))
    .ok_or(Error::MissingCredential(Credential::ChatId))
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

pub(crate) fn chat_id_from_text(value: Option<String>) -> Option<ChatId> {
  non_blank(value).map(ChatId::Name)
}

pub(crate) fn parse_thread_id(value: Option<&str>) -> Result<Option<i64>, Error> {
  match value.map(str::trim).filter(|v| !v.is_empty()) {
    None => Ok(None),
    Some(raw) => raw
      .parse::<i64>()
      .map(Some)
      .map_err(|_| Error::InvalidParameter(format!("threadId must be a number (got {})", raw))),
  }
}

pub(crate) fn parse_mode(value: Option<String>) -> Result<Option<ParseMode>, Error> {
  non_blank(value).map(|mode| mode.parse()).transpose()
}
