/*
Duration tag matching.
Recognizes the informal duration annotations users write in plan text
and converts them to whole minutes. No estimation happens here: a
fragment either carries a recognizable tag or it does not.
*/

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

// Which syntax produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    DurationTag,      // [duration: 1h30m]
    BracketShorthand, // [1.5h], [45m]
    Parenthetical,    // (45 minutes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMatch {
    pub minutes: u32,
    pub span: Range<usize>, // byte range of the whole tag in the fragment
    pub kind: PatternKind,
}

struct DurationPattern {
    kind: PatternKind,
    regex: Regex,
    to_minutes: fn(&Captures) -> Option<u32>,
}

impl DurationPattern {
    fn new(kind: PatternKind, pattern: &str, to_minutes: fn(&Captures) -> Option<u32>) -> Self {
        Self {
            kind,
            // patterns are literals below, covered by tests
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("bad {kind:?} pattern: {e}")),
            to_minutes,
        }
    }

    fn find(&self, text: &str) -> Option<DurationMatch> {
        self.regex.captures_iter(text).find_map(|caps| {
            let minutes = (self.to_minutes)(&caps)?;
            let whole = caps.get(0)?;
            Some(DurationMatch {
                minutes,
                span: whole.range(),
                kind: self.kind,
            })
        })
    }
}

// Tried in this order; first pattern with a match wins.
static PATTERNS: LazyLock<Vec<DurationPattern>> = LazyLock::new(|| {
    vec![
        DurationPattern::new(
            PatternKind::DurationTag,
            r"(?i)\[\s*duration\s*:\s*(?:(?P<h>\d+)\s*h(?:\s*(?P<hm>\d+)\s*m(?:ins?)?)?|(?P<m>\d+)\s*m(?:ins?)?)\s*\]",
            duration_tag_minutes,
        ),
        DurationPattern::new(
            PatternKind::BracketShorthand,
            r"(?i)\[\s*(?:(?P<h>\d+(?:\.\d+)?)\s*h|(?P<m>\d+)\s*m)\s*\]",
            shorthand_minutes,
        ),
        DurationPattern::new(
            PatternKind::Parenthetical,
            r"(?i)\(\s*(?P<m>\d+)\s*(?:minutes?|mins?)\s*\)",
            parenthetical_minutes,
        ),
    ]
});

fn capture_u32(caps: &Captures, name: &str) -> Option<Option<u32>> {
    match caps.name(name) {
        Some(m) => m.as_str().parse::<u32>().ok().map(Some),
        None => Some(None),
    }
}

fn duration_tag_minutes(caps: &Captures) -> Option<u32> {
    if let Some(hours) = capture_u32(caps, "h")? {
        let extra = capture_u32(caps, "hm")?.unwrap_or(0);
        return hours.checked_mul(60)?.checked_add(extra);
    }
    capture_u32(caps, "m")?
}

fn shorthand_minutes(caps: &Captures) -> Option<u32> {
    if let Some(h) = caps.name("h") {
        return fractional_hours_to_minutes(h.as_str());
    }
    capture_u32(caps, "m")?
}

fn parenthetical_minutes(caps: &Captures) -> Option<u32> {
    capture_u32(caps, "m")?
}

// Longest fraction kept exact in u128 arithmetic
const MAX_FRACTION_DIGITS: usize = 30;

// Decimal hours to minutes, rounded half-up, in integer arithmetic so
// values like 1.025h (61.5 min) are not pulled below the half by f64.
fn fractional_hours_to_minutes(raw: &str) -> Option<u32> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let whole: u128 = whole.parse().ok()?;

    let frac_minutes = if fraction.is_empty() {
        0
    } else {
        if fraction.len() > MAX_FRACTION_DIGITS {
            return None;
        }
        let digits: u128 = fraction.parse().ok()?;
        let scale = 10u128.checked_pow(fraction.len() as u32)?;
        // floor(digits * 60 / scale + 1/2)
        digits
            .checked_mul(120)?
            .checked_add(scale)?
            .checked_div(scale.checked_mul(2)?)?
    };

    let minutes = whole.checked_mul(60)?.checked_add(frac_minutes)?;
    u32::try_from(minutes).ok()
}

/// Find the first recognized duration in `text`.
///
/// Syntaxes are tried in priority order (`[duration: ..]`, then `[Nh]`/`[Nm]`,
/// then `(N minutes)`), so a later syntax is only consulted when every earlier
/// one fails on the whole fragment.
pub fn find_duration(text: &str) -> Option<DurationMatch> {
    let found = PATTERNS.iter().find_map(|p| p.find(text));
    trace!(?found, "find_duration");
    found
}

/// Minutes for the first recognized duration, or `None` when absent.
pub fn parse_duration(text: &str) -> Option<u32> {
    find_duration(text).map(|m| m.minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_tag_forms() {
        assert_eq!(parse_duration("Build [duration: 2h]"), Some(120));
        assert_eq!(parse_duration("Build [duration: 30m]"), Some(30));
        assert_eq!(parse_duration("Build [duration: 1h30m]"), Some(90));
        assert_eq!(parse_duration("Build [Duration : 1h 15m]"), Some(75));
        assert_eq!(parse_duration("Build [DURATION:2H]"), Some(120));
    }

    #[test]
    fn shorthand_forms() {
        assert_eq!(parse_duration("Review [1.5h]"), Some(90));
        assert_eq!(parse_duration("Review [2h]"), Some(120));
        assert_eq!(parse_duration("Review [45m]"), Some(45));
        // 0.01h = 0.6 min, rounds up
        assert_eq!(parse_duration("Tiny [0.01h]"), Some(1));
        // 0.125h = 7.5 min, half rounds up
        assert_eq!(parse_duration("Eighth [0.125h]"), Some(8));
        // exact halves stay halves: 1.025h = 61.5 min
        assert_eq!(parse_duration("Review [1.025h]"), Some(62));
        assert_eq!(parse_duration("Review [4.225h]"), Some(254));
        assert_eq!(parse_duration("Review [16.025h]"), Some(962));
        // just under a half rounds down: 0.0249h = 1.494 min
        assert_eq!(parse_duration("Review [0.0249h]"), Some(1));
    }

    #[test]
    fn fractional_hours_edge_values() {
        assert_eq!(fractional_hours_to_minutes("0.0"), Some(0));
        assert_eq!(fractional_hours_to_minutes("3"), Some(180));
        assert_eq!(fractional_hours_to_minutes("71582788.25"), Some(4_294_967_295));
        assert_eq!(fractional_hours_to_minutes("71582788.3"), None);
        assert_eq!(fractional_hours_to_minutes(&format!("1.{}", "0".repeat(31))), None);
    }

    #[test]
    fn parenthetical_forms() {
        assert_eq!(parse_duration("Call mom (45 minutes)"), Some(45));
        assert_eq!(parse_duration("Stretch (10 min)"), Some(10));
        assert_eq!(parse_duration("Stretch (1 minute)"), Some(1));
    }

    #[test]
    fn priority_order_prefers_duration_tag() {
        let m = find_duration("Mixed (10 min) [2h] [duration: 30m]").unwrap();
        assert_eq!(m.kind, PatternKind::DurationTag);
        assert_eq!(m.minutes, 30);

        let m = find_duration("Mixed (10 min) [2h]").unwrap();
        assert_eq!(m.kind, PatternKind::BracketShorthand);
        assert_eq!(m.minutes, 120);
    }

    #[test]
    fn zero_is_distinct_from_absent() {
        assert_eq!(parse_duration("Placeholder [0m]"), Some(0));
        assert_eq!(parse_duration("Placeholder"), None);
        assert_eq!(parse_duration("Placeholder [soon]"), None);
        assert_eq!(parse_duration("Placeholder (about an hour)"), None);
    }

    #[test]
    fn span_covers_whole_tag() {
        let text = "Setup Environment [duration: 30m]";
        let m = find_duration(text).unwrap();
        assert_eq!(&text[m.span.clone()], "[duration: 30m]");
    }

    #[test]
    fn overflowing_values_are_not_matches() {
        assert_eq!(parse_duration("Forever [duration: 99999999999h]"), None);
        // the overflowing tag is skipped and a later valid one is used
        assert_eq!(parse_duration("[99999999999m] then [20m]"), Some(20));
    }
}
