// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use config::Defaults;
use error::Error;
use relay::{AppState, DefaultsSource};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use telegram::{ChatId, ImageSource, PhotoApi, PhotoMessage, SentPhoto, TelegramClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "relayboundary";

type Reply = Box<dyn Fn() -> Result<SentPhoto, Error> + Send + Sync>;

struct RecordingApi {
  sent: Mutex<Vec<PhotoMessage>>,
  reply: Reply,
}

impl RecordingApi {
  fn replying(reply: impl Fn() -> Result<SentPhoto, Error> + Send + Sync + 'static) -> Arc<Self> {
    Arc::new(Self {
      sent: Mutex::new(Vec::new()),
      reply: Box::new(reply),
    })
  }

  fn ok(message_id: i64) -> Arc<Self> {
    Self::replying(move || {
      Ok(SentPhoto {
        message_id,
        chat_id: None,
      })
    })
  }

  fn sent(&self) -> Vec<PhotoMessage> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl PhotoApi for RecordingApi {
  async fn send_photo(&self, message: PhotoMessage) -> Result<SentPhoto, Error> {
    self.sent.lock().unwrap().push(message);
    (self.reply)()
  }
}

fn state(api: Arc<dyn PhotoApi>, defaults: Defaults) -> web::Data<AppState> {
  web::Data::new(AppState::new(api, DefaultsSource::Fixed(defaults), 64 * 1024))
}

macro_rules! app {
  ($state:expr) => {
    test::init_service(App::new().app_data($state).configure(relay::configure)).await
  };
}

fn multipart_body(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  body.extend_from_slice(
    format!(
      "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"attachment\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nignored\r\n"
    )
    .as_bytes(),
  );
  if let Some((file_name, bytes)) = photo {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

#[actix_web::test]
async fn url_request_is_relayed() {
  let api = RecordingApi::ok(42);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .set_json(json!({"botToken": "T", "chatId": "123", "photoUrl": "https://x/y.png"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get("access-control-allow-origin").unwrap(),
    "*"
  );

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["messageId"], json!(42));
  assert_eq!(body["chatId"], json!("123"));
  assert!(body["timestamp"].is_string());

  let sent = api.sent();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].photo(), &ImageSource::Url("https://x/y.png".into()));
  assert_eq!(sent[0].destination().chat_id(), &ChatId::from("123"));
}

#[actix_web::test]
async fn missing_bot_token_without_default() {
  let api = RecordingApi::ok(1);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .set_json(json!({"chatId": "123", "photoUrl": "https://x/y.png"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["errorKind"], json!("MissingCredential"));
  assert!(body["errorMessage"].as_str().unwrap().contains("botToken"));
  assert!(api.sent().is_empty());
}

#[actix_web::test]
async fn configured_defaults_fill_credentials() {
  let api = RecordingApi::ok(5);
  let app = app!(state(
    api.clone(),
    Defaults::new(Some("ENV".into()), Some("-100".into()))
  ));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .set_json(json!({"photoBase64": "aGVsbG8="}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let sent = api.sent();
  assert_eq!(sent[0].destination().bot_token(), "ENV");
  assert!(sent[0].photo().is_upload());
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .insert_header(("content-type", "application/json"))
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("MalformedInput"));
  assert_eq!(body["errorMessage"], json!("Invalid JSON in request body"));
}

#[actix_web::test]
async fn multipart_upload_is_relayed() {
  let api = RecordingApi::ok(8);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/multipart")
    .insert_header((
      "content-type",
      format!("multipart/form-data; boundary={BOUNDARY}"),
    ))
    .set_payload(multipart_body(
      &[("botToken", "T"), ("chatId", "55")],
      Some(("chart.png", b"PNGDATA")),
    ))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let sent = api.sent();
  match sent[0].photo() {
    ImageSource::Buffer(file) => {
      assert_eq!(file.bytes(), b"PNGDATA");
      assert_eq!(file.file_name(), "chart.png");
      assert_eq!(file.mime_type(), "image/png");
    }
    other => panic!("expected upload, got {:?}", other),
  }
}

#[actix_web::test]
async fn multipart_without_photo_part() {
  let api = RecordingApi::ok(1);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/multipart")
    .insert_header((
      "content-type",
      format!("multipart/form-data; boundary={BOUNDARY}"),
    ))
    .set_payload(multipart_body(&[("botToken", "T"), ("chatId", "55")], None))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("MissingImage"));
  assert!(api.sent().is_empty());
}

#[actix_web::test]
async fn multipart_requires_form_content_type() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/multipart")
    .set_json(json!({"botToken": "T"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("UnsupportedMediaType"));
}

#[actix_web::test]
async fn raw_body_is_relayed() {
  let api = RecordingApi::ok(3);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=T&chatId=-1001")
    .insert_header(("content-type", "image/png"))
    .set_payload(&b"\x89PNG\r\n"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get("access-control-allow-methods").unwrap(),
    "POST, OPTIONS"
  );

  let sent = api.sent();
  match sent[0].photo() {
    ImageSource::Buffer(file) => assert_eq!(file.bytes(), b"\x89PNG\r\n"),
    other => panic!("expected upload, got {:?}", other),
  }
}

#[actix_web::test]
async fn raw_base64_body_is_decoded() {
  let api = RecordingApi::ok(4);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=T&chatId=1")
    .insert_header(("content-transfer-encoding", "Base64"))
    .set_payload(&b"aGVs\r\nbG8="[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  match api.sent()[0].photo() {
    ImageSource::Buffer(file) => {
      assert_eq!(file.bytes(), b"hello");
      assert_eq!(file.file_name(), "image.png");
    }
    other => panic!("expected upload, got {:?}", other),
  }
}

#[actix_web::test]
async fn raw_base64_body_must_be_valid() {
  let api = RecordingApi::ok(1);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw-extended?botToken=T&chatId=1")
    .insert_header(("content-transfer-encoding", "base64"))
    .set_payload(&b"not*base64"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("InvalidEncoding"));
  assert!(api.sent().is_empty());
}

#[actix_web::test]
async fn raw_empty_body_is_missing_image() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=T&chatId=1")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("MissingImage"));
}

#[actix_web::test]
async fn raw_extended_rejects_non_numeric_thread_id() {
  let api = RecordingApi::ok(1);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw-extended?botToken=T&chatId=1&threadId=abc")
    .set_payload(&b"img"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("InvalidParameter"));
  assert!(body["errorMessage"]
    .as_str()
    .unwrap()
    .contains("threadId must be a number"));
  assert!(api.sent().is_empty());
}

#[actix_web::test]
async fn raw_extended_passes_options() {
  let api = RecordingApi::ok(1);
  let app = app!(state(api.clone(), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw-extended?botToken=T&chatId=1&threadId=12&caption=Daily%20chart")
    .set_payload(&b"img"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let sent = api.sent();
  assert_eq!(sent[0].options().get_thread_id(), Some(12));
  assert_eq!(sent[0].options().get_caption(), Some("Daily chart"));
}

#[actix_web::test]
async fn oversized_body_is_rejected() {
  let api = RecordingApi::ok(1);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(AppState::new(
        api.clone(),
        DefaultsSource::Fixed(Defaults::default()),
        4,
      )))
      .configure(relay::configure),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=T&chatId=1")
    .set_payload(&b"0123456789"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  assert!(api.sent().is_empty());
}

#[actix_web::test]
async fn preflight_and_method_dispatch() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));

  let req = test::TestRequest::default()
    .method(actix_web::http::Method::OPTIONS)
    .uri("/api/send-photo")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get("access-control-allow-methods").unwrap(),
    "GET, POST, OPTIONS"
  );
  assert_eq!(
    resp.headers().get("access-control-allow-headers").unwrap(),
    "Content-Type, Authorization"
  );

  let req = test::TestRequest::get().uri("/api/send-photo").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(
    resp.headers().get("access-control-allow-origin").unwrap(),
    "*"
  );
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("MethodNotAllowed"));

  let req = test::TestRequest::put().uri("/api/send-photo/raw").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn access_logger_wraps_the_app() {
  let api = RecordingApi::ok(1);
  let app = test::init_service(
    App::new()
      .app_data(state(api.clone(), Defaults::default()))
      .wrap(relay::access_logger())
      .configure(relay::configure),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=123:SECRET&chatId=1")
    .set_payload(&b"img"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(api.sent()[0].destination().bot_token(), "123:SECRET");
}

#[actix_web::test]
async fn unreachable_upstream_error_omits_bot_token() {
  let client = TelegramClient::builder()
    .api_base("http://127.0.0.1:1")
    .build()
    .unwrap();
  let app = app!(state(Arc::new(client), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=123:SECRET&chatId=1")
    .set_payload(&b"img"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body = test::read_body(resp).await;
  assert!(!String::from_utf8_lossy(&body).contains("SECRET"));
}

#[actix_web::test]
async fn health_endpoint() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));
  let req = test::TestRequest::get().uri("/health").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], json!("ok"));
}

#[actix_web::test]
async fn upstream_result_ids_round_trip() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/botT/sendPhoto"))
    .and(body_json(json!({"chat_id": "123", "photo": "https://x/y.png"})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "ok": true,
      "result": {"message_id": 42, "chat": {"id": 123}, "date": 1700000000}
    })))
    .expect(1)
    .mount(&server)
    .await;

  let client = TelegramClient::builder()
    .api_base(server.uri())
    .build()
    .unwrap();
  let app = app!(state(Arc::new(client), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .set_json(json!({"botToken": "T", "chatId": "123", "photoUrl": "https://x/y.png"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["messageId"], json!(42));
  assert_eq!(body["chatId"], json!(123));
}

#[actix_web::test]
async fn upstream_forbidden_is_forwarded() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(403).set_body_json(json!({
      "ok": false,
      "error_code": 403,
      "description": "Forbidden: bot was kicked from the group chat"
    })))
    .mount(&server)
    .await;

  let client = TelegramClient::builder()
    .api_base(server.uri())
    .build()
    .unwrap();
  let app = app!(state(Arc::new(client), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo/raw?botToken=T&chatId=1")
    .set_payload(&b"img"[..])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(
    resp.headers().get("access-control-allow-origin").unwrap(),
    "*"
  );

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("UpstreamRejected"));
  assert_eq!(
    body["errorMessage"],
    json!("Forbidden: Bot was blocked by user or kicked from chat")
  );
}

#[actix_web::test]
async fn unreachable_upstream_is_network_error() {
  let client = TelegramClient::builder()
    .api_base("http://127.0.0.1:1")
    .build()
    .unwrap();
  let app = app!(state(Arc::new(client), Defaults::default()));

  let req = test::TestRequest::post()
    .uri("/api/send-photo")
    .set_json(json!({"botToken": "T", "chatId": "1", "photoUrl": "https://x/y.png"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["errorKind"], json!("NetworkError"));
  assert_eq!(
    body["errorMessage"],
    json!("Network error: Unable to reach Telegram API")
  );
}

#[actix_web::test]
async fn repeated_invalid_request_gives_same_error() {
  let app = app!(state(RecordingApi::ok(1), Defaults::default()));

  for _ in 0..3 {
    let req = test::TestRequest::post()
      .uri("/api/send-photo")
      .set_json(json!({"botToken": "T", "photoUrl": "https://x/y.png"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorKind"], json!("MissingCredential"));
  }
}
