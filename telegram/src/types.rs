// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
  #[serde(rename = "HTML")]
  Html,
  Markdown,
  MarkdownV2,
}

impl ParseMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      ParseMode::Html => "HTML",
      ParseMode::Markdown => "Markdown",
      ParseMode::MarkdownV2 => "MarkdownV2",
    }
  }
}

impl FromStr for ParseMode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "html" => Ok(ParseMode::Html),
      "markdown" => Ok(ParseMode::Markdown),
      "markdownv2" => Ok(ParseMode::MarkdownV2),
      _ => Err(Error::InvalidParameter(format!(
        "parseMode must be one of HTML, Markdown, MarkdownV2 (got {})",
        s
      ))),
    }
  }
}

/// Chat identifier as supplied by the caller. Sent upstream unchanged, so a
/// numeric string stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
  Id(i64),
  Name(String),
}

impl ChatId {
  pub(crate) fn trimmed(self) -> Self {
    match self {
      ChatId::Name(name) if name.trim().len() != name.len() => ChatId::Name(name.trim().to_string()),
      other => other,
    }
  }
}

impl fmt::Display for ChatId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChatId::Id(id) => write!(f, "{}", id),
      ChatId::Name(name) => write!(f, "{}", name),
    }
  }
}

impl From<i64> for ChatId {
  fn from(id: i64) -> Self {
    ChatId::Id(id)
  }
}

impl From<String> for ChatId {
  fn from(name: String) -> Self {
    ChatId::Name(name)
  }
}

impl From<&str> for ChatId {
  fn from(name: &str) -> Self {
    ChatId::Name(name.to_string())
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Destination {
  pub(crate) bot_token: String,
  pub(crate) chat_id: ChatId,
}

impl Destination {
  pub fn new(bot_token: impl Into<String>, chat_id: impl Into<ChatId>) -> Self {
    Self {
      bot_token: bot_token.into(),
      chat_id: chat_id.into(),
    }
  }

  pub fn bot_token(&self) -> &str {
    &self.bot_token
  }

  pub fn chat_id(&self) -> &ChatId {
    &self.chat_id
  }
}

impl fmt::Debug for Destination {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Destination")
      .field("bot_token", &"<redacted>")
      .field("chat_id", &self.chat_id)
      .finish()
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PhotoFile {
  pub(crate) bytes: Vec<u8>,
  pub(crate) file_name: String,
  pub(crate) mime_type: String,
}

impl PhotoFile {
  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  pub fn mime_type(&self) -> &str {
    &self.mime_type
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

impl fmt::Debug for PhotoFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PhotoFile")
      .field("len", &self.bytes.len())
      .field("file_name", &self.file_name)
      .field("mime_type", &self.mime_type)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
  Url(String),
  Buffer(PhotoFile),
}

impl ImageSource {
  pub fn url(url: impl Into<String>) -> Result<Self, Error> {
    let url = url.into();
    if url.trim().is_empty() {
      return Err(Error::MissingImage("Photo URL is empty".into()));
    }
    Ok(ImageSource::Url(url.trim().to_string()))
  }

  pub fn buffer(
    bytes: Vec<u8>,
    file_name: impl Into<String>,
    mime_type: impl Into<String>,
  ) -> Result<Self, Error> {
    if bytes.is_empty() {
      return Err(Error::MissingImage("Photo data is empty".into()));
    }
    Ok(ImageSource::Buffer(PhotoFile {
      bytes,
      file_name: file_name.into(),
      mime_type: mime_type.into(),
    }))
  }

  pub fn is_upload(&self) -> bool {
    matches!(self, ImageSource::Buffer(_))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
  pub(crate) caption: Option<String>,
  pub(crate) parse_mode: Option<ParseMode>,
  pub(crate) thread_id: Option<i64>,
}

impl SendOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Blank captions are treated as absent.
  pub fn caption(mut self, caption: Option<String>) -> Self {
    self.caption = caption.filter(|c| !c.trim().is_empty());
    self
  }

  pub fn parse_mode(mut self, mode: Option<ParseMode>) -> Self {
    self.parse_mode = mode;
    self
  }

  pub fn thread_id(mut self, thread_id: Option<i64>) -> Self {
    self.thread_id = thread_id;
    self
  }

  pub fn get_caption(&self) -> Option<&str> {
    self.caption.as_deref()
  }

  pub fn get_parse_mode(&self) -> Option<ParseMode> {
    self.parse_mode
  }

  pub fn get_thread_id(&self) -> Option<i64> {
    self.thread_id
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPhoto {
  pub message_id: i64,
  pub chat_id: Option<ChatId>,
}

#[derive(Serialize)]
pub(crate) struct JsonPhotoRequest<'a> {
  pub chat_id: &'a ChatId,
  pub photo: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub caption: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parse_mode: Option<ParseMode>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message_thread_id: Option<i64>,
}

#[derive(Deserialize)]
pub(crate) struct TelegramResponse {
  pub ok: bool,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub error_code: Option<u16>,
  #[serde(default)]
  pub result: Option<MessageResult>,
}

#[derive(Deserialize)]
pub(crate) struct MessageResult {
  pub message_id: i64,
  #[serde(default)]
  pub chat: Option<ChatRef>,
}

#[derive(Deserialize)]
pub(crate) struct ChatRef {
  pub id: ChatId,
}
