use crate::feed::sample::TelemetrySample;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Reads a JSON-lines telemetry recording, one sample per line. Blank lines
/// and lines starting with `#` are skipped. Samples are returned sorted by
/// timestamp.
pub fn load_replay<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<TelemetrySample>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading telemetry replay {}", path_ref.display()))?;
    parse_replay(&contents)
        .with_context(|| format!("parsing telemetry replay {}", path_ref.display()))
}

pub fn parse_replay(contents: &str) -> anyhow::Result<Vec<TelemetrySample>> {
    let mut samples = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample: TelemetrySample =
            serde_json::from_str(line).with_context(|| format!("line {}", index + 1))?;
        samples.push(sample);
    }
    samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(samples)
}
