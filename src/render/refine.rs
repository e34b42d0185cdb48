//! Markdown refinement pipeline.
//!
//! Removes structural noise left by slide and page assembly: decorated
//! slide headers, empty bullets, repeated rules, repeated footers, long
//! version lists and excess blank lines. Every pass is a pure function and
//! leaves complete `[[TABLE]]`/`[[DIAGRAM]]` blocks untouched.

use super::block::{map_outside_blocks, protected_lines};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static SLIDE_ECHO_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)##[ \t]*🖼\x{FE0F}?[ \t]*Slide[ \t]+(\d+)[ \t]*:[ \t]*-[ \t]*\d+[ \t]*-[ \t]*$",
    )
    .expect("valid regex")
});

static SLIDE_TITLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)##[ \t]*🖼\x{FE0F}?[ \t]*Slide[ \t]+\d+[ \t]*:[ \t]*(.+?)[ \t]*$")
        .expect("valid regex")
});

static EMPTY_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s*\.?\s*$").expect("valid regex"));

static VERSION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*V\d+\.\d+\s*$").expect("valid regex"));

/// Options for markdown refinement.
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// Rewrite decorated slide headers
    pub normalize_headers: bool,

    /// Drop bullets with no content (or a lone period)
    pub remove_empty_bullets: bool,

    /// Collapse `---` lines separated only by blank lines
    pub collapse_rules: bool,

    /// Strip repeated lines at the end of each heading section
    pub remove_footers: bool,

    /// Collapse long runs of `- V<major>.<minor>` lines
    pub collapse_versions: bool,

    /// Limit consecutive newlines
    pub trim_blank_lines: bool,

    /// Minimum document-wide occurrences for a footer candidate
    pub footer_min_occurrences: usize,

    /// Minimum run length for version collapse
    pub version_run_min: usize,

    /// Maximum consecutive newlines kept by the blank-line trim
    pub max_consecutive_newlines: usize,
}

impl RefineOptions {
    /// All passes enabled with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// All passes disabled.
    pub fn none() -> Self {
        Self {
            normalize_headers: false,
            remove_empty_bullets: false,
            collapse_rules: false,
            remove_footers: false,
            collapse_versions: false,
            trim_blank_lines: false,
            ..Self::default()
        }
    }

    /// Enable or disable one pass.
    pub fn with_pass(mut self, pass: RefinePass, enabled: bool) -> Self {
        match pass {
            RefinePass::SlideHeaders => self.normalize_headers = enabled,
            RefinePass::EmptyBullets => self.remove_empty_bullets = enabled,
            RefinePass::RepeatedRules => self.collapse_rules = enabled,
            RefinePass::RepeatedFooters => self.remove_footers = enabled,
            RefinePass::VersionRuns => self.collapse_versions = enabled,
            RefinePass::BlankLines => self.trim_blank_lines = enabled,
        }
        self
    }

    /// Set the footer occurrence threshold.
    pub fn with_footer_min_occurrences(mut self, n: usize) -> Self {
        self.footer_min_occurrences = n;
        self
    }

    /// Set the version run threshold.
    pub fn with_version_run_min(mut self, n: usize) -> Self {
        self.version_run_min = n;
        self
    }

    /// Set the maximum consecutive newlines.
    pub fn with_max_consecutive_newlines(mut self, n: usize) -> Self {
        self.max_consecutive_newlines = n;
        self
    }

    /// Whether a pass is enabled.
    pub fn is_enabled(&self, pass: RefinePass) -> bool {
        match pass {
            RefinePass::SlideHeaders => self.normalize_headers,
            RefinePass::EmptyBullets => self.remove_empty_bullets,
            RefinePass::RepeatedRules => self.collapse_rules,
            RefinePass::RepeatedFooters => self.remove_footers,
            RefinePass::VersionRuns => self.collapse_versions,
            RefinePass::BlankLines => self.trim_blank_lines,
        }
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            normalize_headers: true,
            remove_empty_bullets: true,
            collapse_rules: true,
            remove_footers: true,
            collapse_versions: true,
            trim_blank_lines: true,
            footer_min_occurrences: 3,
            version_run_min: 5,
            max_consecutive_newlines: 2,
        }
    }
}

/// Refinement passes in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefinePass {
    SlideHeaders,
    EmptyBullets,
    RepeatedRules,
    RepeatedFooters,
    VersionRuns,
    BlankLines,
}

impl RefinePass {
    /// Every pass, in the order the refiner runs them.
    pub const ALL: [RefinePass; 6] = [
        RefinePass::SlideHeaders,
        RefinePass::EmptyBullets,
        RefinePass::RepeatedRules,
        RefinePass::RepeatedFooters,
        RefinePass::VersionRuns,
        RefinePass::BlankLines,
    ];

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            RefinePass::SlideHeaders => "slide-headers",
            RefinePass::EmptyBullets => "empty-bullets",
            RefinePass::RepeatedRules => "repeated-rules",
            RefinePass::RepeatedFooters => "repeated-footers",
            RefinePass::VersionRuns => "version-runs",
            RefinePass::BlankLines => "blank-lines",
        }
    }
}

/// Markdown refinement pipeline.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRefiner {
    options: RefineOptions,
}

impl MarkdownRefiner {
    /// Create a refiner with the given options.
    pub fn new(options: RefineOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RefineOptions {
        &self.options
    }

    /// Run every enabled pass in order and trim the result.
    ///
    /// Blank input is returned unchanged. Each pass runs once, so footers
    /// stacked above a repeated rule need a second call to disappear; see
    /// [`remove_trailing_footers`].
    pub fn refine(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut result = text.to_string();
        for pass in RefinePass::ALL {
            if !self.options.is_enabled(pass) {
                continue;
            }
            let before = result.len();
            result = self.apply(pass, &result);
            log::debug!("refine {}: {} -> {} bytes", pass.name(), before, result.len());
        }

        result.trim().to_string()
    }

    /// Apply a single pass.
    pub fn apply(&self, pass: RefinePass, text: &str) -> String {
        match pass {
            RefinePass::SlideHeaders => normalize_slide_headers(text),
            RefinePass::EmptyBullets => remove_empty_bullets(text),
            RefinePass::RepeatedRules => collapse_repeated_rules(text),
            RefinePass::RepeatedFooters => {
                let candidates = find_footer_candidates(text, self.options.footer_min_occurrences);
                if !candidates.is_empty() {
                    log::debug!("{} footer candidates", candidates.len());
                }
                remove_trailing_footers(text, &candidates)
            }
            RefinePass::VersionRuns => collapse_version_runs(text, self.options.version_run_min),
            RefinePass::BlankLines => limit_newlines(text, self.options.max_consecutive_newlines),
        }
    }
}

/// `## 🖼 Slide N: - N -` becomes `## Slide N`; `## 🖼 Slide N: Title` becomes `## Title`.
pub fn normalize_slide_headers(text: &str) -> String {
    map_outside_blocks(text, |segment| {
        let echo = SLIDE_ECHO_HEADER.replace_all(segment, "${1}## Slide ${2}");
        SLIDE_TITLE_HEADER
            .replace_all(&echo, "${1}## ${2}")
            .into_owned()
    })
}

/// Delete lines that are only a bullet marker, optionally followed by a period.
pub fn remove_empty_bullets(text: &str) -> String {
    let mask = protected_lines(text);
    text.split('\n')
        .zip(mask)
        .filter(|(line, protected)| *protected || !EMPTY_BULLET.is_match(line))
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_rule(line: &str) -> bool {
    line.trim_end() == "---"
}

fn collapse_rules_once(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mask = protected_lines(text);
    let mut out = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        out.push(lines[i]);
        if mask[i] || !is_rule(lines[i]) {
            i += 1;
            continue;
        }

        // swallow every following (blank lines, rule) group
        let mut next = i + 1;
        loop {
            let mut k = next;
            while k < lines.len() && !mask[k] && lines[k].trim().is_empty() {
                k += 1;
            }
            if k < lines.len() && !mask[k] && is_rule(lines[k]) {
                next = k + 1;
            } else {
                break;
            }
        }
        i = next;
    }

    out.join("\n")
}

/// Collapse `---` lines separated only by blank lines into one.
///
/// Iterates to a fixed point; every iteration that changes the text
/// shortens it, so the loop is bounded by the input length.
pub fn collapse_repeated_rules(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = collapse_rules_once(&current);
        if next.len() >= current.len() {
            return current;
        }
        current = next;
    }
}

/// Trimmed non-blank lines outside blocks occurring at least `min_occurrences` times.
pub fn find_footer_candidates(text: &str, min_occurrences: usize) -> HashSet<String> {
    let mask = protected_lines(text);
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for (line, protected) in text.split('\n').zip(mask) {
        let line = line.trim();
        if protected || line.is_empty() {
            continue;
        }
        *counts.entry(line).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= min_occurrences)
        .map(|(line, _)| line.to_string())
        .collect()
}

fn is_section_heading(line: &str) -> bool {
    match line.strip_prefix("##") {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Strip footer candidates from the end of every `##` section.
///
/// The text is split before each top-level heading line; a leading span
/// without a heading is its own section. Each section is trimmed, trailing
/// candidate lines are popped, then trailing blank lines. Sections are
/// re-joined with one blank line. Lines inside blocks are never removed.
///
/// Popping stops at the first blank line, so a candidate separated from
/// the section end by a blank line and another candidate (a footer above
/// the closing `---` of an assembled unit) survives one call and is
/// removed by the next.
pub fn remove_trailing_footers(text: &str, candidates: &HashSet<String>) -> String {
    if candidates.is_empty() {
        return text.to_string();
    }

    let mask = protected_lines(text);
    let mut sections: Vec<Vec<(&str, bool)>> = vec![Vec::new()];
    for (line, protected) in text.split('\n').zip(mask) {
        if !protected && is_section_heading(line) {
            sections.push(Vec::new());
        }
        if let Some(section) = sections.last_mut() {
            section.push((line, protected));
        }
    }

    let mut blocks = Vec::new();
    for mut section in sections {
        while matches!(section.last(), Some((line, false)) if line.trim().is_empty()) {
            section.pop();
        }
        let start = section
            .iter()
            .position(|(line, protected)| *protected || !line.trim().is_empty())
            .unwrap_or(section.len());
        let mut lines: Vec<(String, bool)> = section[start..]
            .iter()
            .map(|(line, protected)| (line.to_string(), *protected))
            .collect();
        if let Some((first, false)) = lines.first_mut() {
            *first = first.trim_start().to_string();
        }
        if let Some((last, false)) = lines.last_mut() {
            *last = last.trim_end().to_string();
        }

        while matches!(lines.last(), Some((line, false)) if candidates.contains(line.trim())) {
            lines.pop();
        }
        while matches!(lines.last(), Some((line, false)) if line.trim().is_empty()) {
            lines.pop();
        }

        if !lines.is_empty() {
            blocks.push(
                lines
                    .into_iter()
                    .map(|(line, _)| line)
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
    }

    if blocks.is_empty() {
        text.to_string()
    } else {
        blocks.join("\n\n")
    }
}

/// Collapse runs of at least `min_run` consecutive `- V<major>.<minor>` lines
/// into `- 버전: <first> ~ <last>`.
pub fn collapse_version_runs(text: &str, min_run: usize) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mask = protected_lines(text);
    let is_version = |i: usize| !mask[i] && VERSION_LINE.is_match(lines[i]);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if is_version(i) {
            let mut j = i + 1;
            while j < lines.len() && is_version(j) {
                j += 1;
            }
            if j - i >= min_run.max(1) {
                out.push(format!(
                    "- 버전: {} ~ {}",
                    version_label(lines[i]),
                    version_label(lines[j - 1])
                ));
                i = j;
                continue;
            }
        }
        out.push(lines[i].to_string());
        i += 1;
    }

    out.join("\n")
}

fn version_label(line: &str) -> String {
    line.trim().replace('-', "").trim().to_string()
}

/// Limit runs of newlines outside blocks to `max` (0 = unlimited).
pub fn limit_newlines(text: &str, max: usize) -> String {
    if max == 0 {
        return text.to_string();
    }
    let re = match Regex::new(&format!(r"\n{{{},}}", max + 1)) {
        Ok(re) => re,
        Err(_) => return text.to_string(),
    };
    let replacement = "\n".repeat(max);
    map_outside_blocks(text, |segment| {
        re.replace_all(segment, replacement.as_str()).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_header_echo() {
        let text = "## 🖼 Slide 3: - 3 -\n\n- body";
        assert_eq!(normalize_slide_headers(text), "## Slide 3\n\n- body");
    }

    #[test]
    fn test_slide_header_title() {
        let text = "## 🖼 Slide 1: Quarterly Review  \n- a";
        assert_eq!(normalize_slide_headers(text), "## Quarterly Review\n- a");
        // variation selector form
        let text = "## 🖼\u{FE0F} Slide 2: 개요";
        assert_eq!(normalize_slide_headers(text), "## 개요");
        // plain headers are left alone
        assert_eq!(normalize_slide_headers("## Slide 2: 개요"), "## Slide 2: 개요");
    }

    #[test]
    fn test_remove_empty_bullets() {
        let text = "- a\n-\n  - .\n- \n-.\n- b";
        assert_eq!(remove_empty_bullets(text), "- a\n- b");
    }

    #[test]
    fn test_collapse_repeated_rules() {
        let text = "a\n---\n\n---\n\n\n---\nb\n---\nc";
        assert_eq!(collapse_repeated_rules(text), "a\n---\nb\n---\nc");
    }

    #[test]
    fn test_rules_with_content_between_are_kept() {
        let text = "---\nx\n---";
        assert_eq!(collapse_repeated_rules(text), text);
    }

    #[test]
    fn test_footer_candidates() {
        let text = "Footer\nx\n  Footer  \ny\nFooter\nx";
        let candidates = find_footer_candidates(text, 3);
        assert_eq!(candidates.len(), 1);
        assert!(candidates.contains("Footer"));
    }

    #[test]
    fn test_remove_trailing_footers() {
        let text = "## A\nbody a\nACME Corp\n## B\nbody b\nACME Corp\n## C\nACME Corp\nbody c\nACME Corp";
        let candidates = find_footer_candidates(text, 3);
        assert_eq!(
            remove_trailing_footers(text, &candidates),
            "## A\nbody a\n\n## B\nbody b\n\n## C\nACME Corp\nbody c"
        );
    }

    #[test]
    fn test_footer_inside_block_is_kept() {
        let text = "## A\n[[TABLE]]\n| x |\n[[/TABLE]]\n## B\n[[TABLE]]\n| x |\n[[/TABLE]]\n## C\n[[TABLE]]\n| x |\n[[/TABLE]]";
        let candidates = find_footer_candidates(text, 3);
        assert!(candidates.is_empty());
        assert_eq!(remove_trailing_footers(text, &candidates), text);
    }

    #[test]
    fn test_version_runs() {
        let four = "- V0.1\n- V0.2\n- V0.3\n- V0.4";
        assert_eq!(collapse_version_runs(four, 5), four);

        let five = "intro\n- V0.1\n- V0.2\n- V0.3\n- V0.4\n- V1.0\noutro";
        assert_eq!(
            collapse_version_runs(five, 5),
            "intro\n- 버전: V0.1 ~ V1.0\noutro"
        );
    }

    #[test]
    fn test_limit_newlines() {
        assert_eq!(limit_newlines("a\n\n\n\nb", 2), "a\n\nb");
        assert_eq!(limit_newlines("a\n\n\n\nb", 0), "a\n\n\n\nb");
    }

    #[test]
    fn test_refine_blank_input() {
        let refiner = MarkdownRefiner::default();
        assert_eq!(refiner.refine(""), "");
        assert_eq!(refiner.refine("  \n "), "  \n ");
    }

    #[test]
    fn test_refine_disabled_passes() {
        let refiner = MarkdownRefiner::new(RefineOptions::none());
        assert_eq!(refiner.refine("  - \n\n\n\nx  "), "- \n\n\n\nx");
    }

    #[test]
    fn test_refine_full() {
        let refiner = MarkdownRefiner::default();
        let text = "## 🖼 Slide 1: - 1 -\n\n- a\n-\n\n---\n\n---\n\n\n\n## 🖼 Slide 2: Plan\n\n- b";
        assert_eq!(
            refiner.refine(text),
            "## Slide 1\n\n- a\n\n---\n\n## Plan\n\n- b"
        );
    }
}
