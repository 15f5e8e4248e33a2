//! Input-file parsing: one `resource_id min_marker` record per line.

use tracing::warn;

use crate::model::ResourceTask;

/// Parse whitespace-separated `resource_id min_marker` lines into tasks.
///
/// Blank lines are skipped silently. Malformed lines (missing or
/// non-integer marker) are skipped with a diagnostic and never abort the
/// batch. Extra trailing tokens are ignored. Duplicate ids are kept; each
/// produces an independent task.
pub fn parse_tasks(text: &str) -> Vec<ResourceTask> {
    let mut tasks = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else {
            continue;
        };
        let Some(marker) = tokens.next() else {
            warn!(line = idx + 1, "skipping record: missing min marker");
            continue;
        };
        match marker.parse::<i64>() {
            Ok(min_marker) => tasks.push(ResourceTask {
                resource_id: id.to_string(),
                min_marker,
            }),
            Err(_) => {
                warn!(line = idx + 1, marker, "skipping record: min marker is not an integer");
            }
        }
    }
    tasks
}
