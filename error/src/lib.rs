// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use serde::Serialize;
use std::{fmt, time::Duration};
use thiserror::Error as ThisError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to reach Telegram API";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const MALFORMED_INPUT_MESSAGE: &str = "Invalid JSON in request body";

/// Stable, caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
  MethodNotAllowed,
  MalformedInput,
  MissingCredential,
  MissingImage,
  InvalidEncoding,
  UnsupportedMediaType,
  InvalidParameter,
  PayloadTooLarge,
  UpstreamRejected,
  NetworkError,
  InternalError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
  BotToken,
  ChatId,
}

impl Credential {
  pub fn env_var(&self) -> &'static str {
    match self {
      Credential::BotToken => "BOT_TOKEN",
      Credential::ChatId => "CHAT_ID",
    }
  }
}

impl fmt::Display for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Credential::BotToken => "botToken",
      Credential::ChatId => "chatId",
    };
    write!(f, "{}", name)
  }
}

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("Method not allowed")]
  MethodNotAllowed,
  #[error("Invalid JSON in request body: {0}")]
  MalformedInput(String),
  #[error("Missing {0}: pass it in the request or set {var}", var = .0.env_var())]
  MissingCredential(Credential),
  #[error("{0}")]
  MissingImage(String),
  #[error("Invalid base64 encoding: {0}")]
  InvalidEncoding(String),
  #[error("Unsupported media type: {0}")]
  UnsupportedMediaType(String),
  #[error("{0}")]
  InvalidParameter(String),
  #[error("Request body exceeds the limit of {limit} bytes")]
  PayloadTooLarge { limit: usize },
  #[error("Telegram API error ({status}): {}", .description.as_deref().unwrap_or("no description"))]
  UpstreamRejected {
    status: u16,
    description: Option<String>,
  },
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("Request timed out after {0:?}")]
  TimeoutError(Duration),
  #[error("Failed to parse response: {0}")]
  ParseError(String),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::MethodNotAllowed => ErrorKind::MethodNotAllowed,
      Error::MalformedInput(_) => ErrorKind::MalformedInput,
      Error::MissingCredential(_) => ErrorKind::MissingCredential,
      Error::MissingImage(_) => ErrorKind::MissingImage,
      Error::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
      Error::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
      Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
      Error::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
      Error::UpstreamRejected { .. } => ErrorKind::UpstreamRejected,
      Error::HttpError(_) | Error::TimeoutError(_) => ErrorKind::NetworkError,
      Error::ParseError(_) | Error::ConfigError(_) | Error::IoError(_) | Error::Internal(_) => {
        ErrorKind::InternalError
      }
    }
  }

  /// HTTP status returned to the caller. Upstream rejections forward the
  /// upstream status verbatim.
  pub fn status_code(&self) -> u16 {
    match self {
      Error::UpstreamRejected { status, .. } => *status,
      other => match other.kind() {
        ErrorKind::MethodNotAllowed => 405,
        ErrorKind::MalformedInput
        | ErrorKind::MissingCredential
        | ErrorKind::MissingImage
        | ErrorKind::InvalidEncoding
        | ErrorKind::InvalidParameter => 400,
        ErrorKind::UnsupportedMediaType => 415,
        ErrorKind::PayloadTooLarge => 413,
        ErrorKind::UpstreamRejected | ErrorKind::NetworkError | ErrorKind::InternalError => 500,
      },
    }
  }

  /// Message safe to show to the caller. Internal detail stays in the logs.
  pub fn public_message(&self) -> String {
    match self {
      Error::MalformedInput(_) => MALFORMED_INPUT_MESSAGE.to_string(),
      Error::UpstreamRejected {
        status,
        description,
      } => upstream_message(*status, description.as_deref()),
      other => match other.kind() {
        ErrorKind::NetworkError => NETWORK_ERROR_MESSAGE.to_string(),
        ErrorKind::InternalError => INTERNAL_ERROR_MESSAGE.to_string(),
        _ => other.to_string(),
      },
    }
  }
}

fn upstream_message(status: u16, description: Option<&str>) -> String {
  match status {
    400 => match description {
      Some(desc) if desc.starts_with("Bad Request") => desc.to_string(),
      Some(desc) => format!("Bad Request: {}", desc),
      None => "Bad Request".to_string(),
    },
    401 => "Unauthorized: Invalid bot token".to_string(),
    403 => "Forbidden: Bot was blocked by user or kicked from chat".to_string(),
    404 => "Not Found: Chat not found".to_string(),
    _ => description.unwrap_or("Telegram API error").to_string(),
  }
}
