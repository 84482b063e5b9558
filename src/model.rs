//! Canonical hunk model (spec §3).
use std::path::PathBuf;

/// Which two trees a diff is computed between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Index vs worktree.
    Unstaged,
    /// HEAD vs index.
    Staged,
    /// Synthetic all-add diff for an untracked file.
    UntrackedSynth,
}

impl View {
    /// Stable side per spec §3: `+` for UNSTAGED/UNTRACKED-SYNTH, `-` for STAGED.
    pub fn stable_side(self) -> StableSide {
        match self {
            View::Unstaged | View::UntrackedSynth => StableSide::New,
            View::Staged => StableSide::Old,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StableSide {
    Old,
    New,
}

impl StableSide {
    pub fn marker(self) -> char {
        match self {
            StableSide::Old => '-',
            StableSide::New => '+',
        }
    }
}

/// Which content a built patch currently expects to find in the view it is
/// applied against (spec §4.6 rule 3). A forward apply (`add`'s `--cached`,
/// the half of a stash push that builds the scratch index) targets a view
/// that still holds the `-` side's content; a reverse apply (`reset`,
/// `restore`, the worktree half of a stash push) targets a view that
/// already holds the `+` side's content. When a line-spec drops part of a
/// hunk, the dropped ADD/DEL line that matches this side survives as a
/// single context line; the other is omitted outright, instead of emitting
/// both as context (which would claim content the target doesn't hold).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// The natural direction for previewing a hunk drawn from `view` (spec
    /// §6 `diff`): unstaged/untracked hunks read like an `add`, staged
    /// hunks read like a `reset`.
    pub fn for_view(view: View) -> Self {
        match view {
            View::Unstaged | View::UntrackedSynth => Direction::Forward,
            View::Staged => Direction::Reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    Modify,
    NewFile,
    DeletedFile,
    UntrackedNew,
}

/// A line tag, one of the four allowed prefixes (spec §3 invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Add,
    Del,
    NoNewline,
}

impl LineTag {
    pub fn prefix(self) -> char {
        match self {
            LineTag::Context => ' ',
            LineTag::Add => '+',
            LineTag::Del => '-',
            LineTag::NoNewline => '\\',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            ' ' => Some(LineTag::Context),
            '+' => Some(LineTag::Add),
            '-' => Some(LineTag::Del),
            '\\' => Some(LineTag::NoNewline),
            _ => None,
        }
    }
}

/// One body line, original bytes preserved verbatim (no lossy UTF-8
/// conversion until the Renderer, per SPEC_FULL.md §4 / spec §9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub tag: LineTag,
    /// Original bytes *after* the tag byte, without the trailing newline.
    pub content: Vec<u8>,
}

impl BodyLine {
    pub fn new(tag: LineTag, content: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            content: content.into(),
        }
    }

    pub fn content_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFlags {
    pub new_file_mode: Option<String>,
    pub deleted_file_mode: Option<String>,
    pub executable: bool,
}

/// The canonical hunk record (spec §3).
#[derive(Debug, Clone)]
pub struct Hunk {
    pub path: PathBuf,
    pub kind: HunkKind,
    pub old_range: LineRange,
    pub new_range: LineRange,
    pub body: Vec<BodyLine>,
    pub header_context: String,
    pub file_flags: FileFlags,
    pub view: View,
    /// 7 hex char hash, computed once at construction time (§4.3).
    pub hash: String,
    pub stable_side: StableSide,
    /// Inclusive display range on the stable side.
    pub stable_range: (usize, usize),
}

impl Hunk {
    /// The stable-side starting line used both for display and as part of
    /// the hash preimage (spec §4.3).
    pub fn stable_start(view: View, old_range: LineRange, new_range: LineRange) -> usize {
        match view.stable_side() {
            StableSide::New => new_range.start,
            StableSide::Old => old_range.start,
        }
    }

    /// Lines tagged ADD or DEL only — the lines that can be selected by a
    /// line-spec and the lines that feed the hash preimage.
    pub fn change_line_indices(&self) -> Vec<usize> {
        self.body
            .iter()
            .enumerate()
            .filter(|(_, l)| matches!(l.tag, LineTag::Add | LineTag::Del))
            .map(|(i, _)| i)
            .collect()
    }

    /// First changed line, marker retained, leading whitespace of the
    /// content stripped (used by the `list` summary priority rule, spec §6).
    pub fn first_changed_line_summary(&self) -> Option<String> {
        self.body.iter().find_map(|l| match l.tag {
            LineTag::Add | LineTag::Del => {
                let text = l.content_str_lossy();
                Some(format!("{}{}", l.tag.prefix(), text.trim_start()))
            }
            _ => None,
        })
    }

    /// Summary field per spec §6 priority: new file -> deleted -> first
    /// changed line -> header context -> empty.
    pub fn summary(&self) -> String {
        match self.kind {
            HunkKind::NewFile | HunkKind::UntrackedNew => return "new file".to_string(),
            HunkKind::DeletedFile => return "deleted".to_string(),
            HunkKind::Modify => {}
        }
        if let Some(line) = self.first_changed_line_summary() {
            return line;
        }
        if !self.header_context.trim().is_empty() {
            return self.header_context.trim().to_string();
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hunk() -> Hunk {
        Hunk {
            path: PathBuf::from("alpha.txt"),
            kind: HunkKind::Modify,
            old_range: LineRange { start: 1, count: 1 },
            new_range: LineRange { start: 1, count: 1 },
            body: vec![
                BodyLine::new(LineTag::Del, b"hello".to_vec()),
                BodyLine::new(LineTag::Add, b"  hello changed".to_vec()),
            ],
            header_context: String::new(),
            file_flags: FileFlags::default(),
            view: View::Unstaged,
            hash: "abc1234".to_string(),
            stable_side: StableSide::New,
            stable_range: (1, 1),
        }
    }

    #[test]
    fn stable_side_matches_view() {
        assert_eq!(View::Unstaged.stable_side(), StableSide::New);
        assert_eq!(View::UntrackedSynth.stable_side(), StableSide::New);
        assert_eq!(View::Staged.stable_side(), StableSide::Old);
    }

    #[test]
    fn summary_strips_leading_whitespace_but_keeps_marker() {
        let hunk = sample_hunk();
        assert_eq!(hunk.summary(), "-hello");
    }

    #[test]
    fn summary_priority_new_file_before_content() {
        let mut hunk = sample_hunk();
        hunk.kind = HunkKind::NewFile;
        assert_eq!(hunk.summary(), "new file");
    }

    #[test]
    fn summary_falls_back_to_header_context_then_empty() {
        let mut hunk = sample_hunk();
        hunk.body.clear();
        hunk.header_context = "fn foo()".to_string();
        assert_eq!(hunk.summary(), "fn foo()");
        hunk.header_context.clear();
        assert_eq!(hunk.summary(), "");
    }

    #[test]
    fn change_line_indices_skips_context_and_no_newline() {
        let mut hunk = sample_hunk();
        hunk.body.push(BodyLine::new(LineTag::Context, b"ctx".to_vec()));
        hunk.body
            .push(BodyLine::new(LineTag::NoNewline, b" No newline at end of file".to_vec()));
        assert_eq!(hunk.change_line_indices(), vec![0, 1]);
    }
}
