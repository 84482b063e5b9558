//! Renderer (spec §4.9): human (colored, columnar) and porcelain
//! (tab-separated) output for every subcommand.
use colored::Colorize;

use crate::model::Hunk;
use crate::result_mapper::MergeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Human,
    Porcelain,
}

pub struct Renderer {
    pub mode: Mode,
    pub color: bool,
}

impl Renderer {
    pub fn new(mode: Mode, color: bool) -> Self {
        Self { mode, color }
    }

    /// Whether colors should actually be written: the caller decides
    /// TTY/`NO_COLOR`/`--no-color` up front and passes the final verdict in.
    pub fn resolve_color(no_color_flag: bool, stdout_is_tty: bool) -> bool {
        if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        stdout_is_tty
    }

    pub fn render_list(&self, hunks: &[Hunk], oneline: bool) -> String {
        match self.mode {
            Mode::Porcelain => {
                let mut out = String::new();
                for h in hunks {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\t{}\n",
                        h.hash,
                        h.path.to_string_lossy(),
                        h.stable_range.0,
                        h.stable_range.1,
                        h.summary()
                    ));
                }
                out
            }
            Mode::Human => {
                let mut out = String::new();
                for h in hunks {
                    out.push_str(&format!(
                        "{:<7}  {:<40}  {:>5}-{:<5}  {}\n",
                        h.hash,
                        h.path.to_string_lossy(),
                        h.stable_range.0,
                        h.stable_range.1,
                        h.summary()
                    ));
                    if !oneline {
                        for line in &h.body {
                            let text = format!("{}{}", line.tag.prefix(), line.content_str_lossy());
                            out.push_str(&self.colorize_diff_line(line.tag, &text));
                            out.push('\n');
                        }
                    }
                }
                out
            }
        }
    }

    pub fn render_diff(&self, hunks: &[Hunk]) -> String {
        let mut out = String::new();
        for h in hunks {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                h.hash,
                h.path.to_string_lossy(),
                h.stable_range.0,
                h.stable_range.1,
                h.summary()
            ));
            for line in &h.body {
                out.push(line.tag.prefix());
                out.push_str(&line.content_str_lossy());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    fn colorize_diff_line(&self, tag: crate::model::LineTag, text: &str) -> String {
        use crate::model::LineTag;
        if !self.color {
            return text.to_string();
        }
        match tag {
            LineTag::Add => text.green().to_string(),
            LineTag::Del => text.red().to_string(),
            _ => text.normal().to_string(),
        }
    }

    /// `add`/`reset` merge records (spec §6 porcelain table, §4.9 human mode).
    pub fn render_merge_records(&self, verb: &str, records: &[MergeRecord]) -> String {
        let mut out = String::new();
        for r in records {
            match self.mode {
                Mode::Porcelain => {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}",
                        verb,
                        r.applied.join(","),
                        r.result.join(","),
                        r.file
                    ));
                    if !r.consumed.is_empty() {
                        out.push('\t');
                        out.push_str(&r.consumed.join(","));
                    }
                    out.push('\n');
                }
                Mode::Human => {
                    let applied = self.colorize(&r.applied.join(" "), Paint::Applied);
                    let result = self.colorize(&r.result.join(","), Paint::Result);
                    if r.consumed.is_empty() {
                        out.push_str(&format!("{verb} {applied} \u{2192} {result}  {}\n", r.file));
                    } else {
                        let consumed = self.colorize(
                            &r.consumed
                                .iter()
                                .map(|c| format!("+{c}"))
                                .collect::<Vec<_>>()
                                .join(" "),
                            Paint::Consumed,
                        );
                        out.push_str(&format!(
                            "{verb} {applied} {consumed} \u{2192} {result}  {}\n",
                            r.file
                        ));
                    }
                }
            }
        }
        out
    }

    /// `restore`/`stash push` one-line-per-hunk records, no arrow (spec §4.9).
    pub fn render_simple_records(&self, verb: &str, entries: &[(String, String)]) -> String {
        let mut out = String::new();
        for (sha7, file) in entries {
            match self.mode {
                Mode::Porcelain => out.push_str(&format!("{verb}\t{sha7}\t{file}\n")),
                Mode::Human => {
                    let sha7 = self.colorize(sha7, Paint::Result);
                    out.push_str(&format!("{verb} {sha7}  {file}\n"));
                }
            }
        }
        out
    }

    pub fn render_count(&self, count: usize) -> String {
        format!("{count}\n")
    }

    /// `check` rows (spec §6 porcelain table).
    pub fn render_check(&self, rows: &[CheckRow]) -> String {
        let mut out = String::new();
        for row in rows {
            match self.mode {
                Mode::Porcelain => out.push_str(&row.porcelain_line()),
                Mode::Human => out.push_str(&self.colorize_check_row(row)),
            }
        }
        out
    }

    fn colorize_check_row(&self, row: &CheckRow) -> String {
        match row {
            CheckRow::Ok { prefix, sha7, file } => {
                let label = self.colorize("ok", Paint::Result);
                format!("{label:<12}{prefix:<10}{sha7:<10}{file}\n")
            }
            CheckRow::Stale { prefix } => {
                let label = self.colorize("stale", Paint::Consumed);
                format!("{label:<12}{prefix}\n")
            }
            CheckRow::Ambiguous { prefix } => {
                let label = self.colorize("ambiguous", Paint::Applied);
                format!("{label:<12}{prefix}\n")
            }
            CheckRow::Unexpected { sha7, file } => {
                let label = self.colorize("unexpected", Paint::Applied);
                format!("{label:<12}{sha7:<10}{file}\n")
            }
        }
    }

    fn colorize(&self, text: &str, paint: Paint) -> String {
        if !self.color {
            return text.to_string();
        }
        match paint {
            Paint::Applied => text.yellow().to_string(),
            Paint::Consumed => text.dimmed().to_string(),
            Paint::Result => text.green().to_string(),
        }
    }
}

enum Paint {
    Applied,
    Consumed,
    Result,
}

/// One `check` outcome row (spec §6 porcelain table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRow {
    Ok { prefix: String, sha7: String, file: String },
    Stale { prefix: String },
    Ambiguous { prefix: String },
    Unexpected { sha7: String, file: String },
}

impl CheckRow {
    fn porcelain_line(&self) -> String {
        match self {
            CheckRow::Ok { prefix, sha7, file } => format!("ok\t{prefix}\t{sha7}\t{file}\n"),
            CheckRow::Stale { prefix } => format!("stale\t{prefix}\n"),
            CheckRow::Ambiguous { prefix } => format!("ambiguous\t{prefix}\n"),
            CheckRow::Unexpected { sha7, file } => format!("unexpected\t{sha7}\t{file}\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFlags, HunkKind, LineRange, StableSide, View};
    use std::path::PathBuf;

    fn hunk() -> Hunk {
        Hunk {
            path: PathBuf::from("alpha.txt"),
            kind: HunkKind::Modify,
            old_range: LineRange { start: 1, count: 1 },
            new_range: LineRange { start: 1, count: 1 },
            body: vec![],
            header_context: String::new(),
            file_flags: FileFlags::default(),
            view: View::Unstaged,
            hash: "abc1234".to_string(),
            stable_side: StableSide::New,
            stable_range: (1, 1),
        }
    }

    #[test]
    fn porcelain_list_has_five_tab_separated_fields() {
        let r = Renderer::new(Mode::Porcelain, false);
        let out = r.render_list(&[hunk()], true);
        let fields: Vec<&str> = out.trim_end().split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "abc1234");
    }

    #[test]
    fn merge_record_porcelain_has_consumed_field_when_present() {
        let r = Renderer::new(Mode::Porcelain, false);
        let records = vec![MergeRecord {
            applied: vec!["aaa1111".to_string()],
            consumed: vec!["bbb2222".to_string()],
            result: vec!["ccc3333".to_string()],
            file: "alpha.txt".to_string(),
        }];
        let out = r.render_merge_records("staged", &records);
        let fields: Vec<&str> = out.trim_end().split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "staged");
    }

    #[test]
    fn human_merge_record_uses_unicode_arrow() {
        let r = Renderer::new(Mode::Human, false);
        let records = vec![MergeRecord {
            applied: vec!["aaa1111".to_string()],
            consumed: vec![],
            result: vec!["ccc3333".to_string()],
            file: "alpha.txt".to_string(),
        }];
        let out = r.render_merge_records("staged", &records);
        assert!(out.contains('\u{2192}'));
    }

    #[test]
    fn color_resolution_respects_no_color_flag() {
        assert!(!Renderer::resolve_color(true, true));
    }

    #[test]
    fn check_porcelain_rows_match_taxonomy_shapes() {
        let r = Renderer::new(Mode::Porcelain, false);
        let rows = vec![
            CheckRow::Ok {
                prefix: "abc1".to_string(),
                sha7: "abc1234".to_string(),
                file: "a.txt".to_string(),
            },
            CheckRow::Stale {
                prefix: "dead".to_string(),
            },
            CheckRow::Ambiguous {
                prefix: "ab".to_string(),
            },
            CheckRow::Unexpected {
                sha7: "ffff111".to_string(),
                file: "b.txt".to_string(),
            },
        ];
        let out = r.render_check(&rows);
        assert!(out.contains("ok\tabc1\tabc1234\ta.txt\n"));
        assert!(out.contains("stale\tdead\n"));
        assert!(out.contains("ambiguous\tab\n"));
        assert!(out.contains("unexpected\tffff111\tb.txt\n"));
    }
}
