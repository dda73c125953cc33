use std::fs::File;
use std::path::PathBuf;

use tracing::warn;

use checkem_core::Config;

/// Warn about missing environment and query files of a board.
///
/// These files are deployed next to the mappings but are not validated;
/// their absence never changes the outcome of a run.
pub fn check_board_files(config: &Config, board: &str) -> Vec<PathBuf> {
    let [queries, test_queries] = config.query_files(board);
    let mut missing = Vec::new();
    for path in [config.environment_file(board), queries, test_queries] {
        if let Err(e) = File::open(&path) {
            warn!(path = %path.display(), error = %e, "board file is not readable");
            missing.push(path);
        }
    }
    missing
}
