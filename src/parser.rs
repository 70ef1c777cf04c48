/*
Plan text parsing.
Splits a markdown-like plan into task sections and pulls the duration
tag out of each one. Pure and synchronous: the UI calls this on every
keystroke, so nothing here touches storage or caches across inputs.
*/

use tracing::debug;

use crate::duration::{self, DurationMatch};
use crate::models::{ParseResult, ParseWarning, Task};

// Title line plus the body lines that follow it
struct Section<'a> {
    title_line: &'a str,
    body: Vec<&'a str>,
}

/// Parse plan text into an ordered list of tasks.
///
/// Convention:
/// - A markdown heading (`#` .. `######`) starts a new task; lines up to the
///   next heading are its description. Lines before the first heading are
///   ignored.
/// - Text without any heading is read as a flat list, one task per line.
/// - The duration tag is looked up on the title line first, then on the
///   first description line.
pub fn parse_plan(text: &str) -> ParseResult {
    let sections = split_sections(text);

    let mut tasks = Vec::with_capacity(sections.len());
    let mut warnings = Vec::new();
    let mut total: u32 = 0;

    for (index, section) in sections.into_iter().enumerate() {
        let task = build_task(index, section);

        match task.user_defined_duration_minutes {
            Some(minutes) => total = total.saturating_add(minutes),
            None => warnings.push(ParseWarning {
                task_id: task.id.clone(),
                index,
                message: format!(
                    "Task \"{}\" has no duration tag; add one such as [duration: 1h]",
                    task.title
                ),
            }),
        }

        tasks.push(task);
    }

    debug!(
        tasks = tasks.len(),
        total_minutes = total,
        warnings = warnings.len(),
        "parsed plan"
    );

    ParseResult {
        tasks,
        total_duration_minutes: total,
        warnings,
    }
}

fn build_task(index: usize, section: Section<'_>) -> Task {
    let body = trim_blank_edges(&section.body);

    let title_match = duration::find_duration(section.title_line);
    let minutes = match &title_match {
        Some(m) => Some(m.minutes),
        None => body.first().and_then(|line| duration::parse_duration(line)),
    };

    let mut title = strip_tag(section.title_line, title_match.as_ref());
    if title.is_empty() {
        title = format!("Untitled task {}", index + 1);
    }

    Task {
        id: format!("task-{}", index + 1),
        title,
        description: body.join("\n"),
        user_defined_duration_minutes: minutes,
    }
}

fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some(title) = heading_title(line) {
                sections.push(Section {
                    title_line: title,
                    body: Vec::new(),
                });
                continue;
            }
        }

        // preamble before the first heading is dropped
        if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }

    if sections.is_empty() {
        return flat_list_sections(text);
    }
    sections
}

// No headings at all: every non-blank line is its own task.
fn flat_list_sections(text: &str) -> Vec<Section<'_>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Section {
            title_line: strip_list_marker(line),
            body: Vec::new(),
        })
        .collect()
}

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

// "## Title" -> Some("Title"); "#tag" and "####### x" are not headings.
fn heading_title(line: &str) -> Option<&str> {
    let t = line.trim_start();
    let level = t.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &t[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn strip_list_marker(line: &str) -> &str {
    let mut rest = line;

    if let Some(r) = rest
        .strip_prefix("- ")
        .or_else(|| rest.strip_prefix("* "))
        .or_else(|| rest.strip_prefix("+ "))
    {
        rest = r.trim_start();
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            let after = &rest[digits..];
            if let Some(r) = after.strip_prefix(". ").or_else(|| after.strip_prefix(") ")) {
                rest = r.trim_start();
            }
        }
    }

    for checkbox in ["[ ] ", "[x] ", "[X] "] {
        if let Some(r) = rest.strip_prefix(checkbox) {
            return r.trim_start();
        }
    }
    rest
}

// Remove the matched tag and collapse the whitespace it leaves behind.
fn strip_tag(line: &str, tag: Option<&DurationMatch>) -> String {
    let stripped = match tag {
        Some(m) => format!("{}{}", &line[..m.span.start], &line[m.span.end..]),
        None => line.to_string(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_blank_edges<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].iter().copied().map(str::trim_end).collect(),
        _ => Vec::new(),
    }
}
