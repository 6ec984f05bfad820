// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  builders::{PhotoMessage, TelegramClientBuilder},
  config::TelegramConfig,
  types::{ChatId, ImageSource, JsonPhotoRequest, PhotoFile, SendOptions, SentPhoto, TelegramResponse},
};
use async_trait::async_trait;
use error::Error;
use reqwest::{
  multipart::{Form, Part},
  Client, RequestBuilder, Response,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

/// Upstream photo delivery. The HTTP layer only depends on this trait.
#[async_trait]
pub trait PhotoApi: Send + Sync {
  async fn send_photo(&self, message: PhotoMessage) -> Result<SentPhoto, Error>;
}

#[derive(Clone)]
pub struct TelegramClient {
  pub(crate) config: TelegramConfig,
  pub(crate) client: Client,
}

impl TelegramClient {
  pub fn builder() -> TelegramClientBuilder {
    TelegramClientBuilder::default()
  }

  pub(crate) fn method_url(&self, token: &str, method: &str) -> String {
    format!("{}/bot{}/{}", self.config.api_base, token, method)
  }

  fn json_request(&self, url: &str, chat_id: &ChatId, photo: &str, options: &SendOptions) -> RequestBuilder {
    let body = JsonPhotoRequest {
      chat_id,
      photo,
      caption: options.caption.as_deref(),
      parse_mode: options.parse_mode,
      message_thread_id: options.thread_id,
    };
    self.client.post(url).json(&body)
  }

  fn upload_form(chat_id: &ChatId, file: PhotoFile, options: &SendOptions) -> Result<Form, Error> {
    let size = file.bytes.len();
    let file_part = Part::bytes(file.bytes)
      .file_name(file.file_name)
      .mime_str(&file.mime_type)
      .map_err(|_| {
        Error::InvalidParameter(format!("mimeType is not a valid MIME type: {}", file.mime_type))
      })?;
    debug!("Prepared upload part of {} bytes", size);

    let mut form = Form::new()
      .text("chat_id", chat_id.to_string())
      .part("photo", file_part);

    if let Some(caption) = &options.caption {
      form = form.text("caption", caption.clone());
    }
    if let Some(mode) = options.parse_mode {
      form = form.text("parse_mode", mode.as_str());
    }
    if let Some(thread_id) = options.thread_id {
      form = form.text("message_thread_id", thread_id.to_string());
    }

    Ok(form)
  }

  async fn exchange(request: RequestBuilder, limit: Duration) -> Result<SentPhoto, Error> {
    let exchange = async {
      let response = request.send().await.map_err(transport_error)?;
      Self::read_response(response).await
    };

    timeout(limit, exchange).await.map_err(|_| {
      warn!("Telegram API did not answer within {:?}", limit);
      Error::TimeoutError(limit)
    })?
  }

  async fn read_response(response: Response) -> Result<SentPhoto, Error> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;

    let envelope: TelegramResponse = match serde_json::from_slice(&body) {
      Ok(envelope) => envelope,
      Err(_) if !status.is_success() => {
        return Err(Error::UpstreamRejected {
          status: status.as_u16(),
          description: None,
        })
      }
      Err(e) => {
        return Err(Error::ParseError(format!(
          "Unexpected sendPhoto response: {}",
          e
        )))
      }
    };

    if !status.is_success() || !envelope.ok {
      let status = if status.is_success() {
        envelope.error_code.unwrap_or(502)
      } else {
        status.as_u16()
      };
      return Err(Error::UpstreamRejected {
        status,
        description: envelope.description,
      });
    }

    let result = envelope
      .result
      .ok_or_else(|| Error::ParseError("sendPhoto response has no result".into()))?;

    Ok(SentPhoto {
      message_id: result.message_id,
      chat_id: result.chat.map(|chat| chat.id),
    })
  }
}

/// The request URL carries the bot token, so it never reaches the error text.
fn transport_error(err: reqwest::Error) -> Error {
  Error::HttpError(err.without_url())
}

#[async_trait]
impl PhotoApi for TelegramClient {
  #[instrument(
    skip(self, message),
    fields(chat_id = %message.destination.chat_id, upload = message.photo.is_upload())
  )]
  async fn send_photo(&self, message: PhotoMessage) -> Result<SentPhoto, Error> {
    let PhotoMessage {
      destination,
      photo,
      options,
    } = message;
    let url = self.method_url(&destination.bot_token, "sendPhoto");

    let (request, limit) = match photo {
      ImageSource::Url(photo_url) => (
        self.json_request(&url, &destination.chat_id, &photo_url, &options),
        self.config.json_timeout,
      ),
      ImageSource::Buffer(file) => {
        let form = Self::upload_form(&destination.chat_id, file, &options)?;
        (self.client.post(&url).multipart(form), self.config.upload_timeout)
      }
    };

    match Self::exchange(request, limit).await {
      Ok(sent) => {
        debug!("Photo sent, message_id {}", sent.message_id);
        Ok(sent)
      }
      Err(e) => {
        error!("sendPhoto failed: {}", e);
        Err(e)
      }
    }
  }
}
