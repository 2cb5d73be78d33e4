//! Tera rendering engine: [`Page`] enum and [`TemplateEngine`].
//!
//! | Page    | Template               | Output                 |
//! |---------|------------------------|------------------------|
//! | Summary | `index.html.tera`      | `index.html`           |
//! | Diff    | `diff.html.tera`       | `diffs/<key>.html`     |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::{DiffPageContext, ReportContext};
use crate::error::{io_err, RenderError};

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_style.html.tera", include_str!("templates/_partials/style.html.tera")),
    ("shared/_bars.html.tera", include_str!("templates/_partials/bars.html.tera")),
    ("index.html.tera", include_str!("templates/index.html.tera")),
    ("diff.html.tera", include_str!("templates/diff.html.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("template override: {name}");
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    // Log text is untrusted; escape everything rendered into HTML.
    tera.autoescape_on(vec![".html.tera"]);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Report page kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Summary,
    Diff,
}

impl Page {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Summary => "index.html.tera",
            Page::Diff => "diff.html.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering report pages with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded
/// defaults (same relative names, e.g. `diff.html.tera`).
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_overrides(None)
    }

    /// Embedded templates plus any overrides found in `user_template_dir`.
    pub fn with_overrides(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    pub fn render_summary(&self, ctx: &ReportContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(Page::Summary.template_name(), &tera_ctx)?)
    }

    pub fn render_diff(&self, ctx: &DiffPageContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(Page::Diff.template_name(), &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use logdiff_core::types::{ComparisonTask, DiffResult, LineKind, LineRecord, Stats, TaskStatus};

    fn changed_result(pre: &str, post: &str) -> DiffResult {
        DiffResult {
            left: vec![LineRecord::new(LineKind::Changed, pre, 1), LineRecord::empty()],
            right: vec![
                LineRecord::new(LineKind::Changed, post, 1),
                LineRecord::new(LineKind::Added, "tail", 2),
            ],
            stats: Stats { total: 2, added: 1, deleted: 0, changed: 1 },
        }
    }

    #[test]
    fn engine_new_succeeds() {
        TemplateEngine::new().expect("embedded templates should parse");
    }

    #[test]
    fn diff_page_escapes_log_text() {
        let engine = TemplateEngine::new().unwrap();
        let result = changed_result("<script>alert(1)</script>", "a & b");
        let ctx = DiffPageContext::new("10.0.0.1", "pre.log", "post.log", &result, false);
        let html = engine.render_diff(&ctx).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("class=\"added\""));
        assert!(html.contains("class=\"empty\""));
    }

    #[test]
    fn summary_lists_failed_hosts_with_message() {
        let engine = TemplateEngine::new().unwrap();
        let mut ok = ComparisonTask::new("10.0.0.1", "a", "b");
        ok.status = TaskStatus::Completed;
        ok.result = Some(changed_result("x", "y"));
        let mut bad = ComparisonTask::new("10.0.0.2", "c", "d");
        bad.status = TaskStatus::Failed;
        bad.error = Some("source not found: d".to_string());

        let tasks = vec![ok, bad];
        let ctx = ReportContext::from_tasks("/logs", &tasks, Stats::default(), &[], |t| {
            format!("{}.html", t.id)
        });
        let html = engine.render_summary(&ctx).unwrap();
        assert!(html.contains("10.0.0.1"));
        assert!(html.contains("diffs/10.0.0.1.html"));
        assert!(html.contains("source not found: d"));
        assert!(!html.contains("diffs/10.0.0.2.html"));
    }

    #[test]
    fn user_template_overrides_embedded() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("diff.html.tera"), "custom {{ title }}").unwrap();
        let engine = TemplateEngine::with_overrides(Some(dir.path())).unwrap();
        let ctx = DiffPageContext::new("host-a", "l", "r", &DiffResult::default(), false);
        assert_eq!(engine.render_diff(&ctx).unwrap(), "custom host-a");
    }
}
