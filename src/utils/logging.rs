use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Log target prefix shared by the library and the binary
pub const CRATE_TARGET: &str = "capfilter";

/// Initialize the logger with custom formatting
///
/// `level` applies to this crate's targets; everything else logs at most
/// warnings. `RUST_LOG` is read last and can override both.
pub fn init_logger(level: LevelFilter) {
    let (default_level, crate_level) = target_levels(level);
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target().strip_prefix("capfilter::").unwrap_or(record.target()),
                record.args()
            )
        })
        .filter(None, default_level)
        .filter(Some(CRATE_TARGET), crate_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

/// Levels for other crates and for this crate, given the requested level
pub fn target_levels(level: LevelFilter) -> (LevelFilter, LevelFilter) {
    (level.min(LevelFilter::Warn), level)
}

/// Get log level from string
pub fn get_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_level_is_case_insensitive() {
        assert_eq!(get_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(get_log_level("off"), LevelFilter::Off);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        assert_eq!(get_log_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_other_crates_are_capped_at_warn() {
        assert_eq!(
            target_levels(LevelFilter::Trace),
            (LevelFilter::Warn, LevelFilter::Trace)
        );
        assert_eq!(
            target_levels(LevelFilter::Error),
            (LevelFilter::Error, LevelFilter::Error)
        );
        assert_eq!(target_levels(LevelFilter::Off), (LevelFilter::Off, LevelFilter::Off));
    }

    #[test]
    fn test_crate_target_matches_module_paths() {
        assert!(module_path!().starts_with(CRATE_TARGET));
    }
}
