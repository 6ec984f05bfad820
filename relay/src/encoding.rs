// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use base64::{engine::general_purpose::STANDARD, Engine};
use error::Error;

#[derive(Debug)]
pub(crate) struct Decoded {
  pub bytes: Vec<u8>,
  /// MIME type taken from a `data:` URL prefix, if there was one.
  pub mime_type: Option<String>,
}

/// Strict standard-alphabet decoding. ASCII whitespace is ignored, anything
/// else outside the alphabet is an error.
pub(crate) fn decode_base64(input: &str) -> Result<Decoded, Error> {
  let (mime_type, payload) = split_data_url(input.trim());
  let bytes = decode_bytes(payload.as_bytes())?;
  Ok(Decoded { bytes, mime_type })
}

pub(crate) fn decode_bytes(input: &[u8]) -> Result<Vec<u8>, Error> {
  let cleaned: Vec<u8> = input
    .iter()
    .copied()
    .filter(|b| !b.is_ascii_whitespace())
    .collect();

  STANDARD
    .decode(cleaned)
    .map_err(|e| Error::InvalidEncoding(e.to_string()))
}

fn split_data_url(input: &str) -> (Option<String>, &str) {
  let parsed = input.strip_prefix("data:").and_then(|rest| {
    let (meta, data) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, data))
  });

  match parsed {
    Some((mime, data)) => {
      let mime = mime.trim();
      ((!mime.is_empty()).then(|| mime.to_string()), data)
    }
    None => (None, input),
  }
}
