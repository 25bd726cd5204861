//! Logging configuration for the presale client.
//!
//! Everything goes to stderr so stdout stays free for command output.
//! `PRESALE_LOG` overrides the filter, `PRESALE_LOG_STYLE` (`auto`, `always`,
//! `never`) controls colouring.

use std::io::{self, Write};

use chrono::Local;
use env_logger::fmt::Formatter;
use env_logger::{Builder, Env, Target};
use log::{info, Record};

/// Initialize the logging system
pub fn init_logging(level: &str) {
    let env = Env::default()
        .filter_or("PRESALE_LOG", level)
        .write_style_or("PRESALE_LOG_STYLE", "auto");

    builder(env).target(Target::Stderr).try_init().ok();

    info!("Logging initialized at level: {}", level);
}

fn builder(env: Env) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format(format_record);
    builder
}

fn format_record(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let level = buf.default_styled_level(record.level());
    let mut target_style = buf.style();
    target_style.set_bold(true);

    writeln!(
        buf,
        "{} {:<5} {}: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level,
        target_style.value(record.target()),
        record.args()
    )
}

/// Initialize test logging (for use in tests)
#[cfg(test)]
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{debug, Level, Log};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging("debug");
        init_logging("info");
        debug!("second init must not panic");
    }

    #[test]
    fn test_test_logging() {
        init_test_logging();
        debug!("visible with --nocapture");
    }

    #[test]
    fn test_never_style_writes_plain_text() {
        let captured = Captured::default();
        let env = Env::new()
            .filter_or("PRESALE_TEST_LOG", "info")
            .write_style_or("PRESALE_TEST_LOG_STYLE", "never");
        let logger = builder(env).target(Target::Pipe(Box::new(captured.clone()))).build();

        logger.log(
            &Record::builder()
                .args(format_args!("buy confirmed"))
                .level(Level::Info)
                .target("presale::purchase")
                .build(),
        );
        logger.flush();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(!output.contains('\x1b'), "unexpected escape codes in {:?}", output);
        assert!(output.ends_with("INFO  presale::purchase: buy confirmed\n"), "{:?}", output);
    }
}
