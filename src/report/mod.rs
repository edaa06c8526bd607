pub mod json;
pub mod text;

/// Run-wide facts shared by every report file.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub tool_name: String,
    pub tool_version: String,
    pub git_hash: Option<String>,
    pub sample_source: String,
    pub n_samples: usize,
    pub n_benign: usize,
    pub n_malignant: usize,
    pub thresholds: Vec<f64>,
    pub timeout_secs: f64,
}

pub fn format_f64_3(v: f64) -> String {
    format!("{:.3}", v)
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
