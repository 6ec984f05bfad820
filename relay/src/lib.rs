// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod body;
mod encoding;
pub mod handlers;
mod normalize;
pub mod response;
pub mod routes;
pub mod state;

pub use response::SubmissionResult;
pub use routes::{access_logger, configure};
pub use state::{AppState, DefaultsSource};
