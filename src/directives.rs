use std::path::Path;

/// Lines in the job file starting with this prefix are copied into the
/// generated script so sbatch picks them up.
pub const DIRECTIVE_PREFIX: &str = "#SBATCH";

/// Scan the job file for #SBATCH lines and return them verbatim, in
/// file order. This is a pure text scan: the job file is never run,
/// and directive contents are not interpreted. An unreadable file or
/// one with no directives just yields an empty list.
pub fn extract(job_file: &Path) -> Vec<String> {
    match std::fs::read_to_string(job_file) {
        Ok(text) => scan(&text),
        Err(e) => {
            log::debug!("not scanning {job_file:?} for directives: {e}");
            Vec::new()
        }
    }
}

fn scan(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with(DIRECTIVE_PREFIX))
        .map(str::to_owned)
        .collect()
}
