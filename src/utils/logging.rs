//! Logger setup driven by the `log_level` config field.

use std::io::Write;
use std::str::FromStr;

use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::{debug, LevelFilter};

use super::error::{Error, Result};

/// Overrides the configured level, using `env_logger` filter syntax.
pub const LOG_ENV: &str = "SENSORFUSION_LOG";
/// `auto`, `always` or `never`.
pub const LOG_STYLE_ENV: &str = "SENSORFUSION_LOG_STYLE";

/// Parse a level name such as `"debug"` or `"off"`, case-insensitively.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| Error::ConfigError(format!("unknown log level {:?}", level)))
}

/// Install the global logger at `level` unless `SENSORFUSION_LOG` says otherwise.
///
/// Only the first successful call installs a logger; later calls still
/// validate `level` and return `Ok`.
pub fn init_logging(level: &str) -> Result<()> {
    let level = parse_level(level)?;
    let env = Env::default()
        .filter_or(LOG_ENV, level.to_string())
        .write_style_or(LOG_STYLE_ENV, "auto");

    let installed = Builder::from_env(env)
        .format(|buf, record| {
            let level = buf.default_styled_level(record.level());
            writeln!(
                buf,
                "{} {:5} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level,
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
        .is_ok();

    if installed {
        debug!("logger installed at {}", level);
    }
    Ok(())
}

/// Initialize test logging (for use in tests)
#[cfg(test)]
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}
