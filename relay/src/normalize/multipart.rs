// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::{
  chat_id_from_text, non_blank, parse_mode, parse_thread_id, Credentials, DEFAULT_FILE_NAME,
  DEFAULT_MIME_TYPE,
};
use actix_multipart::{Field, Multipart};
use config::Defaults;
use error::Error;
use futures_util::StreamExt as _;
use std::collections::HashMap;
use telegram::{ImageSource, PhotoMessage, SendOptions};
use tracing::debug;

pub(crate) const PHOTO_FIELD: &str = "photo";

#[derive(Debug)]
pub(crate) struct UploadedPhoto {
  pub bytes: Vec<u8>,
  pub file_name: Option<String>,
  pub mime_type: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FormData {
  pub fields: HashMap<String, String>,
  pub photo: Option<UploadedPhoto>,
}

impl FormData {
  fn take(&mut self, name: &str) -> Option<String> {
    self.fields.remove(name)
  }
}

pub(crate) fn check_content_type(content_type: Option<&str>) -> Result<(), Error> {
  match content_type {
    Some(ct) if ct.to_ascii_lowercase().contains("multipart/form-data") => Ok(()),
    Some(ct) => Err(Error::UnsupportedMediaType(format!(
      "expected multipart/form-data, got {}",
      ct
    ))),
    None => Err(Error::UnsupportedMediaType(
      "expected multipart/form-data, got no content type".into(),
    )),
  }
}

/// Consumes the whole stream. Only the `photo` part is buffered; other file
/// parts are drained. `limit` bounds the total number of buffered bytes.
pub(crate) async fn collect_form(mut multipart: Multipart, limit: usize) -> Result<FormData, Error> {
  let mut form = FormData::default();
  let mut buffered = 0usize;

  while let Some(field) = multipart.next().await {
    let mut field =
      field.map_err(|e| Error::InvalidParameter(format!("Malformed multipart body: {}", e)))?;
    let name = field.name().to_string();
    let file_name = field
      .content_disposition()
      .get_filename()
      .map(str::to_string);

    if name == PHOTO_FIELD {
      let mime_type = field.content_type().map(|m| m.to_string());
      let bytes = read_field(&mut field, limit, &mut buffered).await?;
      debug!("Received photo part: {} bytes", bytes.len());
      form.photo = Some(UploadedPhoto {
        bytes,
        file_name,
        mime_type,
      });
    } else if file_name.is_some() {
      drain_field(&mut field).await?;
      debug!("Discarded file part: {}", name);
    } else {
      let data = read_field(&mut field, limit, &mut buffered).await?;
      form
        .fields
        .insert(name, String::from_utf8_lossy(&data).into_owned());
    }
  }

  Ok(form)
}

async fn read_field(field: &mut Field, limit: usize, buffered: &mut usize) -> Result<Vec<u8>, Error> {
  let mut data = Vec::new();

  while let Some(chunk) = field.next().await {
    let chunk =
      chunk.map_err(|e| Error::InvalidParameter(format!("Malformed multipart body: {}", e)))?;
    *buffered += chunk.len();
    if *buffered > limit {
      return Err(Error::PayloadTooLarge { limit });
    }
    data.extend_from_slice(&chunk);
  }

  Ok(data)
}

async fn drain_field(field: &mut Field) -> Result<(), Error> {
  while let Some(chunk) = field.next().await {
    chunk.map_err(|e| Error::InvalidParameter(format!("Malformed multipart body: {}", e)))?;
  }
  Ok(())
}

pub(crate) fn normalize_multipart(mut form: FormData, defaults: &Defaults) -> Result<PhotoMessage, Error> {
  let credentials = Credentials::resolve(
    form.take("botToken"),
    chat_id_from_text(form.take("chatId")),
    defaults,
  )?;

  let photo = form
    .photo
    .take()
    .ok_or_else(|| Error::MissingImage("photo file part is required".into()))?;
  let file_name = non_blank(photo.file_name).unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
  let mime_type = non_blank(photo.mime_type).unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
  let photo = ImageSource::buffer(photo.bytes, file_name, mime_type)?;

  let options = SendOptions::new()
    .caption(form.take("caption"))
    .parse_mode(parse_mode(form.take("parseMode"))?)
    .thread_id(parse_thread_id(form.take("threadId").as_deref())?);

  credentials.into_builder().photo(photo).options(options).build()
}
