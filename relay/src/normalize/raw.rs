// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::{chat_id_from_text, parse_thread_id, Credentials, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE};
use crate::encoding::decode_bytes;
use actix_web::web;
use config::Defaults;
use error::Error;
use serde::Deserialize;
use telegram::{ImageSource, PhotoMessage, SendOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawVariant {
  /// Credentials only.
  Simple,
  /// Credentials plus `caption` and `threadId`.
  Extended,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawQuery {
  bot_token: Option<String>,
  chat_id: Option<String>,
  thread_id: Option<String>,
  caption: Option<String>,
}

impl RawQuery {
  pub(crate) fn parse(query: &str) -> Result<Self, Error> {
    web::Query::<RawQuery>::from_query(query)
      .map(web::Query::into_inner)
      .map_err(|e| Error::InvalidParameter(format!("Invalid query string: {}", e)))
  }
}

#[derive(Debug)]
pub(crate) struct RawBody {
  pub bytes: Vec<u8>,
  /// Set when the body arrived with `Content-Transfer-Encoding: base64`.
  pub base64: bool,
}

pub(crate) fn normalize_raw(
  query: RawQuery,
  body: RawBody,
  variant: RawVariant,
  defaults: &Defaults,
) -> Result<PhotoMessage, Error> {
  let credentials =
    Credentials::resolve(query.bot_token, chat_id_from_text(query.chat_id), defaults)?;

  let bytes = if body.base64 {
    decode_bytes(&body.bytes)?
  } else {
    body.bytes
  };
  if bytes.is_empty() {
    return Err(Error::MissingImage("Request body must contain the image".into()));
  }
  let photo = ImageSource::buffer(bytes, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE)?;

  let options = match variant {
    RawVariant::Simple => SendOptions::new(),
    RawVariant::Extended => SendOptions::new()
      .caption(query.caption)
      .thread_id(parse_thread_id(query.thread_id.as_deref())?),
  };

  credentials.into_builder().photo(photo).options(options).build()
}
