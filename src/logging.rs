#![cfg(feature = "std")]

use std::env;
use log::{self, LevelFilter, Metadata, Record};

/// Level filter parsed from `BROADSIDE_LOG`.
///
/// The value is a comma separated list of a bare default level and
/// `module=level` directives, e.g. `warn,targeting=trace`. Module names may
/// leave off the `broadside::` prefix. The longest matching module wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    default: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    /// Parse a directive list. Unknown levels are skipped; no default level
    /// means `warn`, so log lines stay out of the way of the board.
    pub fn parse(spec: &str) -> Self {
        let mut filter = LogFilter {
            default: LevelFilter::Warn,
            modules: Vec::new(),
        };
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((module, level)) => {
                    if let Ok(level) = level.trim().parse() {
                        filter.modules.push((module.trim().to_string(), level));
                    }
                }
                None => {
                    if let Ok(level) = part.parse() {
                        filter.default = level;
                    }
                }
            }
        }
        filter
    }

    /// Level that applies to records from `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        let short = target.strip_prefix("broadside::").unwrap_or(target);
        self.modules
            .iter()
            .filter(|(module, _)| is_within(target, module) || is_within(short, module))
            .max_by_key(|(module, _)| module.len())
            .map(|(_, level)| *level)
            .unwrap_or(self.default)
    }

    /// Most verbose level any directive asks for.
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .iter()
            .map(|(_, level)| *level)
            .fold(self.default, Ord::max)
    }
}

fn is_within(target: &str, module: &str) -> bool {
    target == module
        || target
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with("::"))
}

struct StderrLogger {
    filter: LogFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger, filtered by the `BROADSIDE_LOG` environment variable.
pub fn init_logging() {
    let filter = LogFilter::parse(&env::var("BROADSIDE_LOG").unwrap_or_default());
    let level = filter.max_level();
    let _ = log::set_boxed_logger(Box::new(StderrLogger { filter })).map(|()| log::set_max_level(level));
}
