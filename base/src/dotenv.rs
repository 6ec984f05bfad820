// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

pub(in crate::dotenv) static INIT: Once = Once::new();
pub(in crate::dotenv) static DEFAULT_FILENAME: &str = ".env";

#[derive(Debug, Default)]
pub struct Dotenv {
  vars: HashMap<String, String>,
}

impl Dotenv {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `KEY=value` lines. Blank lines and `#` comments are skipped,
  /// an optional `export ` prefix is accepted and surrounding quotes are
  /// stripped from the value.
  pub fn parse(&mut self, content: &str) -> Result<(), Error> {
    for (line_num, line) in content.lines().enumerate() {
      let trimmed = line.trim();

      if trimmed.is_empty() || trimmed.starts_with('#') {
        continue;
      }

      let (key, value) = Self::parse_line(trimmed).map_err(|err| {
        Error::ConfigError(format!(".env error on line {}: {}", line_num + 1, err))
      })?;
      self.vars.insert(key, value);
    }

    Ok(())
  }

  /// Returns `Ok(false)` when the file does not exist.
  pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, Error> {
    let path = path.as_ref();
    if !path.exists() {
      return Ok(false);
    }

    let content = fs::read_to_string(path)?;
    self.parse(&content)?;
    Ok(true)
  }

  fn parse_line(line: &str) -> Result<(String, String), &'static str> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=').ok_or("missing '='")?;

    let key = key.trim();
    if key.is_empty() {
      return Err("empty key");
    }

    let value = value.trim();
    let value = ['"', '\'']
      .iter()
      .find_map(|q| {
        value
          .strip_prefix(*q)
          .and_then(|v| v.strip_suffix(*q))
      })
      .unwrap_or(value);

    Ok((key.to_string(), value.to_string()))
  }

  /// Exports the parsed variables, leaving already-set ones untouched.
  pub fn set_env_vars(&self) {
    for (key, value) in &self.vars {
      if env::var_os(key).is_none() {
        env::set_var(key, value);
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&String> {
    self.vars.get(key)
  }

  pub fn len(&self) -> usize {
    self.vars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }
}

pub fn load() -> Result<(), Error> {
  let mut result = Ok(());
  INIT.call_once(|| {
    let mut dotenv = Dotenv::new();
    match dotenv.load_from_file(DEFAULT_FILENAME) {
      Ok(true) => {
        debug!("Loaded {} variables from {}", dotenv.len(), DEFAULT_FILENAME);
        dotenv.set_env_vars();
      }
      Ok(false) => debug!("No {} file found", DEFAULT_FILENAME),
      Err(err) => result = Err(err),
    }
  });
  result
}
