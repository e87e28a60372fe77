//! Display labels for map tooltips and KPI tiles.

use crate::models::{KpiLabels, Kpis};

const MISSING: &str = "N/A";

/// Insert `,` every three digits of an already-formatted integer string.
fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

/// `1234567` -> `1,234,567`
pub fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Round to a whole number and group digits: `412500.4` -> `412,500`.
pub fn thousands_rounded(value: f64) -> String {
    group_digits(&format!("{:.0}", value))
}

/// Tooltip price: `$187.25`.
pub fn price_label(value: f64) -> String {
    format!("${:.2}", value)
}

impl Kpis {
    /// Display strings for the KPI tiles; missing medians show as `N/A`.
    pub fn labels(&self) -> KpiLabels {
        let or_missing = |v: Option<f64>, f: fn(f64) -> String| v.map(f).unwrap_or_else(|| MISSING.to_string());
        KpiLabels {
            total_sales: thousands(self.total_sales),
            median_price_per_sqft: or_missing(self.median_price_per_sqft, |v| format!("${:.0}", v)),
            median_sale_price: or_missing(self.median_sale_price, |v| format!("${}", thousands_rounded(v))),
            median_year_built: or_missing(self.median_year_built, |v| format!("{:.0}", v)),
            median_square_feet: or_missing(self.median_square_feet, thousands_rounded),
        }
    }
}
