use radar_core::domain::radar::{RadarData, RankedModel};
use radar_core::ranking::view::RadarStats;
use std::fmt::Write;

/// Plain-text version of the dashboard's rising-models list.
pub fn render(data: &RadarData, stats: &RadarStats, rising: &[RankedModel]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} | models {} | rising {} | falling {} | fetched {}",
        data.month,
        data.nation,
        stats.total,
        stats.rising,
        stats.falling,
        data.fetched_at.to_rfc3339()
    );

    if rising.is_empty() {
        let _ = writeln!(out, "no rising models match the current filters");
        return out;
    }

    for (i, m) in rising.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. #{:<3} {:<5} {} {} | {} units ({}, {}) | score {:.3}",
            i + 1,
            m.rank,
            rank_badge(m),
            m.brand,
            m.model_name,
            group_thousands(m.sales as i64),
            format_change(m.mom_abs),
            format_percent(m.mom_pct),
            m.score
        );
    }
    out
}

fn rank_badge(m: &RankedModel) -> String {
    match (m.prev_rank, m.rank_change) {
        (None, _) => "NEW".to_string(),
        (Some(_), 0) => "-".to_string(),
        (Some(_), d) if d > 0 => format!("▲{d}"),
        (Some(_), d) => format!("▼{}", d.abs()),
    }
}

fn format_percent(pct: f64) -> String {
    if !pct.is_finite() {
        return "-".to_string();
    }
    let sign = if pct >= 0.0 { "+" } else { "" };
    format!("{sign}{:.1}%", pct * 100.0)
}

fn format_change(n: i64) -> String {
    match n {
        0 => "0".to_string(),
        n if n > 0 => format!("+{}", group_thousands(n)),
        n => group_thousands(n),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use radar_core::domain::radar::{Nation, SalesRecord};
    use radar_core::ranking::pipeline::rank_models;

    #[test]
    fn formats_numbers_like_the_dashboard() {
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-1000), "-1,000");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(format_change(1500), "+1,500");
        assert_eq!(format_change(-20), "-20");
        assert_eq!(format_change(0), "0");
        assert_eq!(format_percent(0.125), "+12.5%");
        assert_eq!(format_percent(-0.5), "-50.0%");
        assert_eq!(format_percent(f64::INFINITY), "-");
    }

    #[test]
    fn renders_badges_and_empty_state() {
        let current = vec![
            SalesRecord::new("현대", "아반떼", 1000),
            SalesRecord::new("기아", "EV3", 900),
        ];
        let baseline = vec![SalesRecord::new("현대", "아반떼", 500)];
        let models = rank_models(&current, &baseline);
        let data = RadarData {
            month: "2024-05".parse().unwrap(),
            nation: Nation::Domestic,
            models: models.clone(),
            fetched_at: Utc::now(),
        };
        let stats = RadarStats::from_models(&models);

        let text = render(&data, &stats, &models);
        assert!(text.starts_with("2024-05 domestic | models 2 | rising 2"));
        assert!(text.contains("NEW"));
        assert!(text.contains("+100.0%"));
        assert!(text.contains("+500"));

        let empty = render(&data, &stats, &[]);
        assert!(empty.contains("no rising models"));
    }
}
