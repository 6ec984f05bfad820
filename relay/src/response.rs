// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use actix_web::{http::StatusCode, HttpResponse};
use chrono::{SecondsFormat, Utc};
use error::{Error, ErrorKind};
use serde::Serialize;
use telegram::{ChatId, SentPhoto};
use tracing::{error, warn};

/// Body of every response from the photo endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub chat_id: Option<ChatId>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_kind: Option<ErrorKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  pub timestamp: String,
}

impl SubmissionResult {
  /// Falls back to the requested chat when the upstream result has no chat.
  pub fn sent(sent: SentPhoto, requested: ChatId) -> Self {
    Self {
      success: true,
      message_id: Some(sent.message_id),
      chat_id: Some(sent.chat_id.unwrap_or(requested)),
      error_kind: None,
      error_message: None,
      timestamp: timestamp(),
    }
  }

  pub fn failed(err: &Error) -> Self {
    Self {
      success: false,
      message_id: None,
      chat_id: None,
      error_kind: Some(err.kind()),
      error_message: Some(err.public_message()),
      timestamp: timestamp(),
    }
  }

  pub fn acknowledged() -> Self {
    Self {
      success: true,
      message_id: None,
      chat_id: None,
      error_kind: None,
      error_message: None,
      timestamp: timestamp(),
    }
  }
}

fn timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn respond(result: Result<SubmissionResult, Error>) -> HttpResponse {
  match result {
    Ok(body) => HttpResponse::Ok().json(body),
    Err(err) => error_response(&err),
  }
}

pub(crate) fn error_response(err: &Error) -> HttpResponse {
  let status =
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

  if status.is_server_error() {
    error!(kind = ?err.kind(), status = status.as_u16(), "Request failed: {}", err);
  } else {
    warn!(kind = ?err.kind(), status = status.as_u16(), "Request rejected: {}", err);
  }

  HttpResponse::build(status).json(SubmissionResult::failed(err))
}
