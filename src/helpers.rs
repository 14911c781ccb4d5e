use chrono::{DateTime, Utc};

pub fn human_duration_secs(total_secs: i64) -> String {
    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        format!("{}m{}s", total_secs / 60, total_secs % 60)
    } else if total_secs < 86400 {
        format!("{}h{}m", total_secs / 3600, (total_secs % 3600) / 60)
    } else {
        let days = total_secs / 86400;
        let hours = (total_secs % 86400) / 3600;
        format!("{}d{}h", days, hours)
    }
}

pub fn parse_age(start_time: &Option<String>) -> String {
    let ts = match start_time {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    // RFC 3339, the K8s timestamp format
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        let d = Utc::now() - dt.to_utc();
        return human_duration_secs(d.num_seconds());
    }

    String::new()
}
