// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  body::read_body,
  normalize::{
    json::normalize_json,
    multipart::{check_content_type, collect_form, normalize_multipart},
    raw::{normalize_raw, RawBody, RawQuery, RawVariant},
  },
  response::{error_response, respond, SubmissionResult},
  state::AppState,
};
use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use error::Error;
use telegram::PhotoMessage;
use tracing::{debug, info, instrument};

async fn submit(state: &AppState, message: PhotoMessage) -> Result<SubmissionResult, Error> {
  let requested = message.destination().chat_id().clone();
  let upload = message.photo().is_upload();

  let sent = message.send(state.api.as_ref()).await?;
  info!(
    message_id = sent.message_id,
    chat_id = %requested,
    upload,
    "Photo relayed"
  );

  Ok(SubmissionResult::sent(sent, requested))
}

/// `POST /api/send-photo`: JSON body with `photoUrl` or `photoBase64`.
#[instrument(skip_all)]
pub async fn send_photo_json(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
  respond(handle_json(&state, payload).await)
}

async fn handle_json(state: &AppState, payload: web::Payload) -> Result<SubmissionResult, Error> {
  let body = read_body(payload, state.max_body_bytes).await?;
  let message = normalize_json(&body, &state.defaults())?;
  submit(state, message).await
}

/// `POST /api/send-photo/multipart`: form fields plus a `photo` file part.
#[instrument(skip_all)]
pub async fn send_photo_multipart(
  req: HttpRequest,
  state: web::Data<AppState>,
  payload: web::Payload,
) -> HttpResponse {
  respond(handle_multipart(&req, &state, payload).await)
}

async fn handle_multipart(
  req: &HttpRequest,
  state: &AppState,
  payload: web::Payload,
) -> Result<SubmissionResult, Error> {
  let content_type = req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok());
  check_content_type(content_type)?;

  let form = collect_form(Multipart::new(req.headers(), payload), state.max_body_bytes).await?;
  debug!("Multipart form fields: {:?}", form.fields.keys().collect::<Vec<_>>());
  let message = normalize_multipart(form, &state.defaults())?;
  submit(state, message).await
}

/// `POST /api/send-photo/raw`: raw image body, `botToken`/`chatId` in the query.
#[instrument(skip_all)]
pub async fn send_photo_raw(
  req: HttpRequest,
  state: web::Data<AppState>,
  payload: web::Payload,
) -> HttpResponse {
  respond(handle_raw(&req, &state, payload, RawVariant::Simple).await)
}

/// `POST /api/send-photo/raw-extended`: like the raw entry point, plus
/// `caption` and `threadId` in the query.
#[instrument(skip_all)]
pub async fn send_photo_raw_extended(
  req: HttpRequest,
  state: web::Data<AppState>,
  payload: web::Payload,
) -> HttpResponse {
  respond(handle_raw(&req, &state, payload, RawVariant::Extended).await)
}

async fn handle_raw(
  req: &HttpRequest,
  state: &AppState,
  payload: web::Payload,
  variant: RawVariant,
) -> Result<SubmissionResult, Error> {
  let query = RawQuery::parse(req.query_string())?;
  let base64 = req
    .headers()
    .get("content-transfer-encoding")
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"));

  let bytes = read_body(payload, state.max_body_bytes).await?;
  let message = normalize_raw(query, RawBody { bytes, base64 }, variant, &state.defaults())?;
  submit(state, message).await
}

pub async fn preflight() -> HttpResponse {
  HttpResponse::Ok().json(SubmissionResult::acknowledged())
}

pub async fn method_not_allowed() -> HttpResponse {
  error_response(&Error::MethodNotAllowed)
}

pub async fn health() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}
