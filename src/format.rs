// Display and rough-estimate helpers for minute counts.

use serde::Serialize;

// Calendar days assume 5-day weeks starting on a Monday; a weekend is only
// counted once work continues past it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayEstimate {
    pub work_days: u32,
    pub calendar_days: u32,
}

/// "0m", "45m", "2h", "1h 30m".
pub fn format_duration(minutes: u32) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Coarse number of days needed to get through `total_minutes` at
/// `minutes_per_day`. `None` when the daily budget is zero.
pub fn estimate_days(total_minutes: u32, minutes_per_day: u32) -> Option<DayEstimate> {
    if minutes_per_day == 0 {
        return None;
    }
    let work_days = total_minutes.div_ceil(minutes_per_day);
    let calendar_days = if work_days == 0 {
        0
    } else {
        work_days + 2 * ((work_days - 1) / 5)
    };
    Some(DayEstimate {
        work_days,
        calendar_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(1501), "25h 1m");
    }

    #[test]
    fn estimates_days() {
        assert_eq!(
            estimate_days(0, 240),
            Some(DayEstimate { work_days: 0, calendar_days: 0 })
        );
        assert_eq!(
            estimate_days(300, 240),
            Some(DayEstimate { work_days: 2, calendar_days: 2 })
        );
        // 7 work days = one full week plus two days
        assert_eq!(
            estimate_days(7 * 240, 240),
            Some(DayEstimate { work_days: 7, calendar_days: 9 })
        );
        // a week that ends on Friday is not charged its weekend
        assert_eq!(
            estimate_days(5 * 240, 240),
            Some(DayEstimate { work_days: 5, calendar_days: 5 })
        );
        assert_eq!(
            estimate_days(10 * 240, 240),
            Some(DayEstimate { work_days: 10, calendar_days: 12 })
        );
        assert_eq!(
            estimate_days(6 * 240, 240),
            Some(DayEstimate { work_days: 6, calendar_days: 8 })
        );
        assert_eq!(estimate_days(100, 0), None);
    }
}
