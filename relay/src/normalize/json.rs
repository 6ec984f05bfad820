// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::{
  non_blank, parse_mode, parse_thread_id, resolve_bot_token, resolve_chat_id, Credentials,
  DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE,
};
use crate::encoding::decode_base64;
use config::Defaults;
use error::Error;
use serde::Deserialize;
use serde_json::{Map, Value};
use telegram::{ChatId, ImageSource, PhotoMessage, SendOptions};
use tracing::debug;

/// Image fields are typed here; options stay untyped until the image has
/// been resolved.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonPhotoPayload {
  photo_url: Option<String>,
  photo: Option<String>,
  photo_base64: Option<String>,
  file_name: Option<String>,
  mime_type: Option<String>,
  caption: Option<Value>,
  parse_mode: Option<Value>,
  thread_id: Option<Value>,
}

impl JsonPhotoPayload {
  /// A URL takes precedence; the base64 payload is then never decoded.
  fn image_source(&mut self) -> Result<ImageSource, Error> {
    if let Some(url) = non_blank(self.photo_url.take()).or_else(|| non_blank(self.photo.take())) {
      debug!("Using remote photo URL");
      return ImageSource::url(url);
    }

    let encoded = non_blank(self.photo_base64.take())
      .ok_or_else(|| Error::MissingImage("photoUrl or photoBase64 is required".into()))?;
    let decoded = decode_base64(&encoded)?;
    debug!("Decoded base64 photo: {} bytes", decoded.bytes.len());

    let mime_type = non_blank(self.mime_type.take())
      .or(decoded.mime_type)
      .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
    let file_name =
      non_blank(self.file_name.take()).unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    ImageSource::buffer(decoded.bytes, file_name, mime_type)
  }

  fn options(&mut self) -> Result<SendOptions, Error> {
    Ok(
      SendOptions::new()
        .caption(text_from_value(self.caption.take(), "caption")?)
        .parse_mode(parse_mode(text_from_value(self.parse_mode.take(), "parseMode")?)?)
        .thread_id(thread_id_from_value(self.thread_id.take())?),
    )
  }
}

fn text_from_value(value: Option<Value>, name: &str) -> Result<Option<String>, Error> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(_) => Err(Error::InvalidParameter(format!("{} must be a string", name))),
  }
}

fn chat_id_from_value(value: Option<Value>) -> Result<Option<ChatId>, Error> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => n
      .as_i64()
      .map(|id| Some(ChatId::Id(id)))
      .ok_or_else(|| Error::InvalidParameter("chatId must be an integer or a string".into())),
    Some(Value::String(s)) => Ok(non_blank(Some(s)).map(ChatId::Name)),
    Some(_) => Err(Error::InvalidParameter(
      "chatId must be an integer or a string".into(),
    )),
  }
}

fn thread_id_from_value(value: Option<Value>) -> Result<Option<i64>, Error> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => n
      .as_i64()
      .map(Some)
      .ok_or_else(|| Error::InvalidParameter("threadId must be a number".into())),
    Some(Value::String(s)) => parse_thread_id(Some(&s)),
    Some(_) => Err(Error::InvalidParameter("threadId must be a number".into())),
  }
}

/// A missing credential is reported before a wrongly typed one, and both
/// before any image or option field is looked at.
fn credentials(fields: &mut Map<String, Value>, defaults: &Defaults) -> Result<Credentials, Error> {
  let bot_token = match fields.remove("botToken") {
    Some(Value::String(token)) => Some(token),
    None | Some(Value::Null) => None,
    Some(_) => {
      resolve_bot_token(None, defaults)?;
      return Err(Error::InvalidParameter("botToken must be a string".into()));
    }
  };
  let bot_token = resolve_bot_token(bot_token, defaults)?;

  let chat_id = match chat_id_from_value(fields.remove("chatId")) {
    Ok(chat_id) => chat_id,
    Err(err) => {
      resolve_chat_id(None, defaults)?;
      return Err(err);
    }
  };
  let chat_id = resolve_chat_id(chat_id, defaults)?;

  Ok(Credentials::new(bot_token, chat_id))
}

pub(crate) fn normalize_json(body: &[u8], defaults: &Defaults) -> Result<PhotoMessage, Error> {
  let value: Value =
    serde_json::from_slice(body).map_err(|e| Error::MalformedInput(e.to_string()))?;
  let mut fields = match value {
    Value::Object(fields) => fields,
    _ => {
      return Err(Error::InvalidParameter(
        "Request body must be a JSON object".into(),
      ))
    }
  };

  let credentials = credentials(&mut fields, defaults)?;

  let mut payload: JsonPhotoPayload = serde_json::from_value(Value::Object(fields))
    .map_err(|e| Error::InvalidParameter(format!("Invalid request field: {}", e)))?;
  let photo = payload.image_source()?;
  let options = payload.options()?;

  credentials.into_builder().photo(photo).options(options).build()
}
