//! GitView (spec §4.1): the only collaborator that talks to git. Shells out
//! to the user's `git` binary for diff/apply/blob reads, and uses `git2` for
//! repository discovery and merge-conflict detection. Grounded on
//! `hunky::git::GitRepo`, which mixes `git2` reads with subprocess `git
//! apply` writes the same way.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{GitHunkError, Result};
use crate::model::View;

/// Which side of a blob read to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Worktree,
    Index,
}

/// Apply direction/target (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Cached,
    Worktree,
    ReverseCached,
    ReverseWorktree,
    CheckReverseWorktree,
}

impl ApplyMode {
    fn args(self) -> Vec<&'static str> {
        match self {
            ApplyMode::Cached => vec!["apply", "--cached"],
            ApplyMode::Worktree => vec!["apply"],
            ApplyMode::ReverseCached => vec!["apply", "--cached", "--reverse"],
            ApplyMode::ReverseWorktree => vec!["apply", "--reverse"],
            ApplyMode::CheckReverseWorktree => vec!["apply", "--check", "--reverse"],
        }
    }

    /// Which side of a composed patch this mode expects the target view to
    /// currently hold (spec §4.6 rule 3, `model::Direction`).
    pub fn direction(self) -> crate::model::Direction {
        match self {
            ApplyMode::Cached | ApplyMode::Worktree => crate::model::Direction::Forward,
            ApplyMode::ReverseCached
            | ApplyMode::ReverseWorktree
            | ApplyMode::CheckReverseWorktree => crate::model::Direction::Reverse,
        }
    }
}

fn scratch_nonce() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

pub struct GitView {
    repo_root: PathBuf,
}

impl GitView {
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Self> {
        let repo = git2::Repository::discover(start.as_ref())
            .map_err(|e| GitHunkError::Git(format!("failed to find git repository: {e}")))?;
        let repo_root = repo
            .workdir()
            .ok_or_else(|| GitHunkError::Git("repository has no working directory".into()))?
            .to_path_buf();
        Ok(Self { repo_root })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// spec §1 Non-goal: 0 hunks reported when the index is mid-merge-conflict.
    pub fn is_merge_conflict(&self) -> bool {
        git2::Repository::open(&self.repo_root)
            .map(|repo| repo.state() == git2::RepositoryState::Merge)
            .unwrap_or(false)
    }

    /// `git diff.context` fallback used when no `-U<n>` is given (spec §6).
    pub fn configured_context_lines(&self) -> usize {
        self.run(&["config", "--get", "diff.context"])
            .ok()
            .and_then(|out| String::from_utf8_lossy(&out).trim().parse().ok())
            .unwrap_or(3)
    }

    /// The unified diff of `view`, optionally restricted to one path.
    pub fn diff(
        &self,
        view: View,
        unified_context: usize,
        file_filter: Option<&Path>,
    ) -> Result<Vec<u8>> {
        let mut args: Vec<String> = vec!["diff".to_string()];
        match view {
            View::Staged => args.push("--cached".to_string()),
            View::Unstaged | View::UntrackedSynth => {}
        }
        args.push(format!("-U{unified_context}"));
        args.push("--no-color".to_string());
        if let Some(path) = file_filter {
            args.push("--".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args_ref)
    }

    /// Untracked, non-ignored files (spec §4.4).
    pub fn untracked_files(&self) -> Result<Vec<PathBuf>> {
        let out = self.run(&["ls-files", "--others", "--exclude-standard", "-z"])?;
        Ok(out
            .split(|&b| b == 0)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| PathBuf::from(String::from_utf8_lossy(chunk).into_owned()))
            .collect())
    }

    /// Raw bytes of a file on the given side.
    pub fn file_bytes(&self, path: &Path, side: Side) -> Result<Vec<u8>> {
        match side {
            Side::Worktree => std::fs::read(self.repo_root.join(path)).map_err(GitHunkError::Io),
            Side::Index => self.run(&["show", &format!(":{}", path.to_string_lossy())]),
        }
    }

    /// True if `path` is executable in the worktree (used to preserve the
    /// executable bit for untracked files going into a stash, spec §4.7).
    #[cfg(unix)]
    pub fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(self.repo_root.join(path))
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    pub fn is_executable(&self, _path: &Path) -> bool {
        false
    }

    /// Applies `patch` in `mode`. On failure, returns the structured
    /// `PatchFailed` error carrying the tool's stderr (spec §4.7).
    pub fn apply(&self, patch: &[u8], mode: ApplyMode) -> Result<()> {
        let mut args = mode.args();
        args.push("--unidiff-zero");
        let mut child = Command::new("git")
            .args(&args)
            .arg("-")
            .current_dir(&self.repo_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GitHunkError::Io)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(patch).map_err(GitHunkError::Io)?;
        }

        let output = child.wait_with_output().map_err(GitHunkError::Io)?;
        if !output.status.success() {
            return Err(GitHunkError::PatchFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// `git stash push`/`pop`, delegated verbatim (spec §4.7).
    pub fn stash_pop(&self) -> Result<()> {
        let out = Command::new("git")
            .args(["stash", "pop"])
            .current_dir(&self.repo_root)
            .output()
            .map_err(GitHunkError::Io)?;
        if !out.status.success() {
            return Err(GitHunkError::Git(
                String::from_utf8_lossy(&out.stderr).into_owned(),
            ));
        }
        Ok(())
    }

    /// The current `HEAD` commit id, or `None` in a brand new repository.
    pub fn head_commit(&self) -> Result<Option<String>> {
        match self.run(&["rev-parse", "--verify", "-q", "HEAD"]) {
            Ok(out) => Ok(Some(String::from_utf8_lossy(&out).trim().to_string())),
            Err(_) => Ok(None),
        }
    }

    /// The current branch name, or `"HEAD"` when detached, for stash commit
    /// messages (spec §4.7).
    pub fn current_branch(&self) -> String {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
            .ok()
            .map(|out| String::from_utf8_lossy(&out).trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "HEAD".to_string())
    }

    /// Path to the real index file, used as the copy source for a scratch
    /// index (spec §4.7 two-diff stash construction).
    fn index_path(&self) -> Result<PathBuf> {
        let out = self.run(&["rev-parse", "--git-path", "index"])?;
        let rel = String::from_utf8_lossy(&out).trim().to_string();
        Ok(self.repo_root.join(rel))
    }

    /// Copies the real index into a fresh scratch file the caller can mutate
    /// via `GIT_INDEX_FILE` without touching the real index.
    pub fn scratch_index_copy(&self) -> Result<PathBuf> {
        let real = self.index_path()?;
        let scratch = std::env::temp_dir().join(format!(
            "git-hunk-index-{}-{}",
            std::process::id(),
            scratch_nonce()
        ));
        if real.exists() {
            std::fs::copy(&real, &scratch).map_err(GitHunkError::Io)?;
        } else {
            // No commits yet: start from an empty index.
            self.run_with_index(&["read-tree", "--empty"], &scratch)?;
        }
        Ok(scratch)
    }

    /// A fresh scratch index starting empty, used to build the stash's
    /// untracked-files tree without reusing whatever is currently staged.
    pub fn scratch_empty_index(&self) -> Result<PathBuf> {
        let scratch = std::env::temp_dir().join(format!(
            "git-hunk-index-{}-{}",
            std::process::id(),
            scratch_nonce()
        ));
        self.run_with_index(&["read-tree", "--empty"], &scratch)?;
        Ok(scratch)
    }

    /// Applies `patch` against the index at `index_path` instead of the real
    /// index, for building the stash's index-side tree without disturbing
    /// what the caller currently has staged.
    pub fn apply_with_index(&self, patch: &[u8], index_path: &Path, mode: ApplyMode) -> Result<()> {
        let mut args = mode.args();
        args.push("--unidiff-zero");
        let mut child = Command::new("git")
            .args(&args)
            .arg("-")
            .env("GIT_INDEX_FILE", index_path)
            .current_dir(&self.repo_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GitHunkError::Io)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(patch).map_err(GitHunkError::Io)?;
        }
        let output = child.wait_with_output().map_err(GitHunkError::Io)?;
        if !output.status.success() {
            return Err(GitHunkError::PatchFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// Stages `paths` (relative to the repo root) into the index at
    /// `index_path`, used to build the stash's untracked-files tree.
    pub fn add_paths_with_index(&self, paths: &[PathBuf], index_path: &Path) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));
        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_with_index(&args_ref, index_path)?;
        Ok(())
    }

    pub fn write_tree_with_index(&self, index_path: &Path) -> Result<String> {
        let out = self.run_with_index(&["write-tree"], index_path)?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    fn run_with_index(&self, args: &[&str], index_path: &Path) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .args(args)
            .env("GIT_INDEX_FILE", index_path)
            .current_dir(&self.repo_root)
            .output()
            .map_err(GitHunkError::Io)?;
        if !output.status.success() {
            return Err(GitHunkError::Git(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }

    /// Creates a commit object without touching any ref, returning its id.
    pub fn commit_tree(&self, tree: &str, parents: &[&str], message: &str) -> Result<String> {
        let mut args = vec!["commit-tree", tree];
        for p in parents {
            args.push("-p");
            args.push(p);
        }
        args.push("-m");
        args.push(message);
        let out = self.run(&args)?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    /// Records `commit` as a new `refs/stash` entry via `git stash store`,
    /// the same plumbing command the native `git stash` porcelain uses.
    pub fn stash_store(&self, commit: &str, message: &str) -> Result<()> {
        self.run(&["stash", "store", "-m", message, commit])?;
        Ok(())
    }

    pub fn remove_worktree_paths(&self, paths: &[PathBuf]) -> Result<()> {
        for p in paths {
            let full = self.repo_root.join(p);
            if full.exists() {
                std::fs::remove_file(full).map_err(GitHunkError::Io)?;
            }
        }
        Ok(())
    }

    pub fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(GitHunkError::Io)?;
        if !output.status.success() {
            return Err(GitHunkError::Git(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TestRepo {
        path: PathBuf,
    }

    impl TestRepo {
        fn new() -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            let path = std::env::temp_dir()
                .join(format!("git-hunk-gitview-tests-{}-{}", std::process::id(), unique));
            fs::create_dir_all(&path).unwrap();
            run(&path, &["init"]);
            run(&path, &["config", "user.name", "Test"]);
            run(&path, &["config", "user.email", "test@example.com"]);
            Self { path }
        }

        fn write(&self, rel: &str, content: &str) {
            fs::write(self.path.join(rel), content).unwrap();
        }

        fn commit_all(&self) {
            run(&self.path, &["add", "."]);
            run(&self.path, &["commit", "-m", "initial"]);
        }
    }

    impl Drop for TestRepo {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn run(path: &Path, args: &[&str]) {
        let out = Command::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .unwrap();
        assert!(out.status.success(), "{:?}", String::from_utf8_lossy(&out.stderr));
    }

    #[test]
    fn discovers_repo_root() {
        let repo = TestRepo::new();
        let view = GitView::discover(&repo.path).unwrap();
        assert_eq!(
            view.repo_root().canonicalize().unwrap(),
            repo.path.canonicalize().unwrap()
        );
    }

    #[test]
    fn untracked_files_lists_new_files_only() {
        let repo = TestRepo::new();
        repo.write("tracked.txt", "a\n");
        repo.commit_all();
        repo.write("untracked.txt", "b\n");

        let view = GitView::discover(&repo.path).unwrap();
        let files = view.untracked_files().unwrap();
        assert_eq!(files, vec![PathBuf::from("untracked.txt")]);
    }

    #[test]
    fn diff_unstaged_shows_worktree_changes() {
        let repo = TestRepo::new();
        repo.write("a.txt", "one\n");
        repo.commit_all();
        repo.write("a.txt", "two\n");

        let view = GitView::discover(&repo.path).unwrap();
        let diff = view.diff(View::Unstaged, 3, None).unwrap();
        let text = String::from_utf8_lossy(&diff);
        assert!(text.contains("a.txt"));
        assert!(text.contains("-one"));
        assert!(text.contains("+two"));
    }

    #[test]
    fn apply_cached_stages_patch() {
        let repo = TestRepo::new();
        repo.write("a.txt", "one\n");
        repo.commit_all();
        repo.write("a.txt", "two\n");

        let view = GitView::discover(&repo.path).unwrap();
        let diff = view.diff(View::Unstaged, 3, None).unwrap();
        view.apply(&diff, ApplyMode::Cached).unwrap();

        let staged = view.diff(View::Staged, 3, None).unwrap();
        assert!(!staged.is_empty());
    }

    #[test]
    fn not_a_merge_by_default() {
        let repo = TestRepo::new();
        repo.write("a.txt", "one\n");
        repo.commit_all();
        let view = GitView::discover(&repo.path).unwrap();
        assert!(!view.is_merge_conflict());
    }
}
