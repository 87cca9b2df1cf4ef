//! Terminal output for command results.
//!
//! Layout math (widths, truncation, padding) is done here with
//! `unicode-width` so that wide characters in names do not break the columns.
//! Functions build strings; the handlers decide when to print them.

use chrono::{DateTime, Utc};
use codedrop::api::{CmdMessage, MessageLevel};
use codedrop::model::{FileInfo, FileSummary};
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 80;
const CODE_WIDTH: usize = 6;
const SIZE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn render_file_list(files: &[FileSummary], now: DateTime<Utc>) -> String {
    if files.is_empty() {
        return "No files stored.\n".to_string();
    }

    let name_width = LINE_WIDTH.saturating_sub(CODE_WIDTH + SIZE_WIDTH + TIME_WIDTH);
    let mut output = String::new();

    for file in files {
        let code = format!("{:<width$}", file.code.to_string(), width = CODE_WIDTH);
        let name = truncate_to_width(&file.display_name, name_width);
        let padding = name_width.saturating_sub(name.width());
        let size = format!("{:>width$}", file.human_size, width = SIZE_WIDTH);
        let age = format_time_ago(file.last_modified, now);

        output.push_str(&format!(
            "{}{}{}{}{}\n",
            code.yellow(),
            name,
            " ".repeat(padding),
            size,
            age.dimmed()
        ));
    }

    output
}

pub(super) fn render_info(info: &FileInfo) -> String {
    format!(
        "{}  {}\n{}  {}\n{}  {}\n",
        "Code:".bold(),
        info.code.to_string().yellow(),
        "Name:".bold(),
        info.display_name,
        "Size:".bold(),
        info.human_size
    )
}

pub(super) fn render_text_list(lines: &[String], empty_message: &str) -> String {
    if lines.is_empty() {
        return format!("{}\n", empty_message);
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use codedrop::model::{Code, FileSummary};

    fn plain() {
        colored::control::set_override(false);
    }

    fn summary(
        code: u16,
        stored: &str,
        size: u64,
        age: Duration,
        now: DateTime<Utc>,
    ) -> FileSummary {
        FileSummary::new(Code::new(code).unwrap(), stored, size, now - age)
    }

    #[test]
    fn empty_listing_has_placeholder() {
        plain();
        assert_eq!(render_file_list(&[], Utc::now()), "No files stored.\n");
    }

    #[test]
    fn rows_are_aligned() {
        plain();
        let now = Utc::now();
        let files = vec![
            summary(42, "0042.txt", 10, Duration::minutes(5), now),
            summary(7, "0007.tar.gz", 3 * 1024 * 1024, Duration::days(2), now),
        ];

        let output = render_file_list(&files, now);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0042  file.txt"));
        assert!(lines[1].starts_with("0007  file.tar.gz"));
        assert!(lines[1].contains("3.0 MB"));
        assert_eq!(lines[0].width(), LINE_WIDTH);
        assert_eq!(lines[1].width(), LINE_WIDTH);
    }

    #[test]
    fn long_names_are_truncated() {
        plain();
        let now = Utc::now();
        let long = format!("0001{}.txt", "x".repeat(200));
        let output = render_file_list(&[summary(1, &long, 1, Duration::seconds(3), now)], now);

        assert!(output.contains('…'));
        assert_eq!(output.trim_end_matches('\n').width(), LINE_WIDTH);
    }

    #[test]
    fn truncation_respects_wide_chars() {
        let out = truncate_to_width("日本語のファイル", 7);
        assert!(out.width() <= 7);
        assert!(out.ends_with('…'));
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn info_block_lists_fields() {
        plain();
        let info = FileInfo {
            code: Code::new(815).unwrap(),
            display_name: "file.pdf".into(),
            human_size: "1.5 KB".into(),
        };

        let output = render_info(&info);
        assert!(output.contains("Code:  0815"));
        assert!(output.contains("Name:  file.pdf"));
        assert!(output.contains("Size:  1.5 KB"));
    }
}
