// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  client::{PhotoApi, TelegramClient},
  config::TelegramConfig,
  types::{ChatId, Destination, ImageSource, SendOptions, SentPhoto},
};
use error::{Credential, Error};

/// A fully normalized `sendPhoto` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMessage {
  pub(crate) destination: Destination,
  pub(crate) photo: ImageSource,
  pub(crate) options: SendOptions,
}

impl PhotoMessage {
  pub fn builder() -> PhotoMessageBuilder {
    PhotoMessageBuilder::new()
  }

  pub fn destination(&self) -> &Destination {
    &self.destination
  }

  pub fn photo(&self) -> &ImageSource {
    &self.photo
  }

  pub fn options(&self) -> &SendOptions {
    &self.options
  }

  pub async fn send(self, api: &dyn PhotoApi) -> Result<SentPhoto, Error> {
    api.send_photo(self).await
  }
}

#[derive(Debug, Default)]
pub struct PhotoMessageBuilder {
  pub(crate) bot_token: Option<String>,
  pub(crate) chat_id: Option<ChatId>,
  pub(crate) photo: Option<ImageSource>,
  pub(crate) options: SendOptions,
}

impl PhotoMessageBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn bot_token(mut self, token: impl Into<String>) -> Self {
    self.bot_token = Some(token.into());
    self
  }

  pub fn chat_id(mut self, id: impl Into<ChatId>) -> Self {
    self.chat_id = Some(id.into());
    self
  }

  pub fn photo(mut self, photo: ImageSource) -> Self {
    self.photo = Some(photo);
    self
  }

  pub fn options(mut self, options: SendOptions) -> Self {
    self.options = options;
    self
  }

  /// Checks the bot token, then the chat id, then the photo.
  pub fn build(self) -> Result<PhotoMessage, Error> {
    let bot_token = self
      .bot_token
      .filter(|t| !t.trim().is_empty())
      .ok_or(Error::MissingCredential(Credential::BotToken))?;

    let chat_id = self
      .chat_id
      .map(ChatId::trimmed)
      .filter(|id| !matches!(id, ChatId::Name(name) if name.is_empty()))
      .ok_or(Error::MissingCredential(Credential::ChatId))?;

    let photo = self
      .photo
      .ok_or_else(|| Error::MissingImage("Photo is required".into()))?;

    Ok(PhotoMessage {
      destination: Destination::new(bot_token.trim(), chat_id),
      photo,
      options: self.options,
    })
  }
}

#[derive(Default)]
pub struct TelegramClientBuilder {
  pub(crate) config: TelegramConfig,
}

impl TelegramClientBuilder {
  pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
    self.config.api_base = api_base.into().trim_end_matches('/').to_string();
    self
  }

  pub fn json_timeout(mut self, timeout: std::time::Duration) -> Self {
    self.config.json_timeout = timeout;
    self
  }

  pub fn upload_timeout(mut self, timeout: std::time::Duration) -> Self {
    self.config.upload_timeout = timeout;
    self
  }

  pub fn build(self) -> Result<TelegramClient, Error> {
    if self.config.api_base.is_empty() {
      return Err(Error::ConfigError("Telegram API base cannot be empty".into()));
    }

    let client = reqwest::Client::builder()
      .build()
      .map_err(Error::HttpError)?;

    Ok(TelegramClient {
      config: self.config,
      client,
    })
  }
}
