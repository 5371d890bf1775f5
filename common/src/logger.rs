use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
    verbose: AtomicBool,
}

impl Logger {
    fn new(prefix: Option<String>, verbose: bool) -> Self {
        Self {
            prefix,
            verbose: AtomicBool::new(verbose),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        match self.prefix {
            Some(ref prefix) => {
                println!("[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, message)
            }
            None => println!("[{}][{}:{}] {}", timestamp, file_name, line, message),
        }
    }
}

pub fn init_logger(prefix: Option<String>, verbose: bool) {
    let logger = LOGGER.get_or_init(|| Logger::new(prefix, verbose));
    logger.set_verbose(verbose);
}

/// Library code may log before (or without) a binary calling `init_logger`;
/// such messages are dropped so tests stay quiet.
pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

pub fn debug_log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get()
        && logger.is_verbose()
    {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::logger::debug_log(file!(), line!(), &format!($($arg)*))
    };
}
