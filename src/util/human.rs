/// Default number of decimals when rendering samples: "1.000000"
pub const DEFAULT_PRECISION: usize = 6;

/// Format one sample with a fixed number of decimals: "2.50"
pub fn fmt_sample(v: f64, precision: usize) -> String {
    format!("{:.*}", precision, v)
}

/// Format a list of samples in braces: "{ 1.0, 2.0, 0.0 }"
pub fn fmt_samples(vals: &[f64], precision: usize) -> String {
    if vals.is_empty() {
        return "{ }".to_string();
    }
    let body: Vec<String> = vals.iter().map(|v| fmt_sample(*v, precision)).collect();
    format!("{{ {} }}", body.join(", "))
}

/// Format an optional average; "—" while the window is empty.
pub fn fmt_average(avg: Option<f64>, precision: usize) -> String {
    match avg {
        Some(a) => fmt_sample(a, precision),
        None    => "—".to_string(),
    }
}
