// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use actix_web::web;
use error::Error;
use futures_util::StreamExt as _;
use tracing::debug;

/// Buffers the whole request body, failing once it grows past `limit`.
pub(crate) async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
  let mut body = Vec::new();

  while let Some(chunk) = payload.next().await {
    let chunk = chunk
      .map_err(|e| Error::InvalidParameter(format!("Failed to read request body: {}", e)))?;
    if body.len() + chunk.len() > limit {
      return Err(Error::PayloadTooLarge { limit });
    }
    body.extend_from_slice(&chunk);
  }

  debug!("Read request body: {} bytes", body.len());
  Ok(body)
}
