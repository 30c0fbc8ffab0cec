//! Shared test helpers: one-time tracing setup and input fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per process. `RUST_LOG` wins over the
/// `advent=debug` default.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let noisy_modules = ["rayon"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("advent=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Write `content` to `<root>/<puzzle>/<file_name>`, creating the puzzle
/// directory, and return the file path.
pub fn write_puzzle_input(root: &Path, puzzle: &str, file_name: &str, content: &str) -> PathBuf {
    let dir = root.join(puzzle);
    fs::create_dir_all(&dir).expect("create puzzle input dir");
    let path = dir.join(file_name);
    fs::write(&path, content).expect("write puzzle input");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_repeated_calls_when_initialising_then_no_panic() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn given_puzzle_name_when_writing_input_then_lands_in_puzzle_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle_input(dir.path(), "chiton", "input.txt", "1163\n");
        assert_eq!(path, dir.path().join("chiton").join("input.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "1163\n");
    }
}
