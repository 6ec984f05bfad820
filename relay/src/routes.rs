// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::handlers;
use actix_web::{
  dev::HttpServiceFactory,
  http::Method,
  middleware::{DefaultHeaders, Logger},
  web, Route,
};

pub const SEND_PHOTO_PATH: &str = "/api/send-photo";
pub const SEND_PHOTO_MULTIPART_PATH: &str = "/api/send-photo/multipart";
pub const SEND_PHOTO_RAW_PATH: &str = "/api/send-photo/raw";
pub const SEND_PHOTO_RAW_EXTENDED_PATH: &str = "/api/send-photo/raw-extended";
pub const HEALTH_PATH: &str = "/health";

const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Path only: the raw endpoints take `botToken` in the query string.
pub const ACCESS_LOG_FORMAT: &str = r#"%a "%U" %s %b %T"#;

pub fn access_logger() -> Logger {
  Logger::new(ACCESS_LOG_FORMAT)
}

fn cors_headers(methods: &'static str) -> DefaultHeaders {
  DefaultHeaders::new()
    .add(("Access-Control-Allow-Origin", "*"))
    .add(("Access-Control-Allow-Methods", methods))
    .add(("Access-Control-Allow-Headers", ALLOW_HEADERS))
}

/// `send` handles POST, OPTIONS is a no-op preflight, anything else is 405.
/// CORS headers go on every response, errors included.
fn photo_resource(path: &str, methods: &'static str, send: Route) -> impl HttpServiceFactory {
  web::resource(path)
    .route(send)
    .route(web::method(Method::OPTIONS).to(handlers::preflight))
    .default_service(web::to(handlers::method_not_allowed))
    .wrap(cors_headers(methods))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .route(HEALTH_PATH, web::get().to(handlers::health))
    .service(photo_resource(
      SEND_PHOTO_PATH,
      "GET, POST, OPTIONS",
      web::post().to(handlers::send_photo_json),
    ))
    .service(photo_resource(
      SEND_PHOTO_MULTIPART_PATH,
      "POST, OPTIONS",
      web::post().to(handlers::send_photo_multipart),
    ))
    .service(photo_resource(
      SEND_PHOTO_RAW_PATH,
      "POST, OPTIONS",
      web::post().to(handlers::send_photo_raw),
    ))
    .service(photo_resource(
      SEND_PHOTO_RAW_EXTENDED_PATH,
      "POST, OPTIONS",
      web::post().to(handlers::send_photo_raw_extended),
    ));
}
