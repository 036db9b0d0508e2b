//! Command implementations for the instinct CLI

pub mod config;
pub mod evolve;
pub mod export;
pub mod import;
pub mod status;

pub use self::config::ConfigArgs;
pub use self::export::ExportArgs;
pub use self::import::ImportArgs;
pub use self::status::StatusArgs;

/// Parse a confidence value in `[0, 1]`.
pub(crate) fn parse_confidence(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not within [0, 1]", value))
    }
}
