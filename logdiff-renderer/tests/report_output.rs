use std::path::{Path, PathBuf};

use logdiff_core::{ComparisonTask, ReportFormat, Stats, TaskStatus};
use logdiff_engine::compare_text;
use logdiff_renderer::{write_json, write_report, ReportInput, TemplateEngine};
use tempfile::TempDir;

fn finished_tasks() -> Vec<ComparisonTask> {
    let mut changed = ComparisonTask::new(
        "10.0.0.1",
        "/logs/10.0.0.1_preCheck.log",
        "/logs/10.0.0.1_postCheck.log",
    );
    changed.status = TaskStatus::Completed;
    changed.result = Some(compare_text("hostname r1\nport up\n", "hostname r1\nport down\n"));

    let mut same = ComparisonTask::new(
        "10.0.0.2",
        "/logs/east/10.0.0.2_preCheck.log",
        "/logs/east/10.0.0.2_postCheck.log",
    )
    .with_group("east");
    same.status = TaskStatus::Completed;
    same.result = Some(compare_text("a\n", "a\n"));

    let mut failed = ComparisonTask::new(
        "10.0.0.3",
        "/logs/10.0.0.3_preCheck.log",
        "/logs/10.0.0.3_postCheck.log",
    );
    failed.status = TaskStatus::Failed;
    failed.error = Some("source not found: /logs/10.0.0.3_postCheck.log".to_string());

    vec![changed, same, failed]
}

fn aggregate(tasks: &[ComparisonTask]) -> Stats {
    tasks.iter().filter_map(ComparisonTask::stats).sum()
}

#[test]
fn html_report_writes_index_and_one_page_per_completed_task() {
    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let orphans = vec![PathBuf::from("/logs/10.0.0.9_postCheck.log")];
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &orphans,
    };
    let engine = TemplateEngine::new().expect("engine");

    let written = write_report(out.path(), &input, ReportFormat::Html, false, &engine)
        .expect("write report");

    assert_eq!(written.len(), 3);
    assert_eq!(written[0], out.path().join("index.html"));
    assert!(out.path().join("diffs/10.0.0.1.html").is_file());
    assert!(out.path().join("diffs/10.0.0.2.html").is_file());
    assert!(!out.path().join("diffs/10.0.0.3.html").exists());

    let index = std::fs::read_to_string(out.path().join("index.html")).expect("index");
    assert!(index.contains("diffs/10.0.0.1.html"));
    assert!(index.contains("10.0.0.9_postCheck.log"));
    assert!(index.contains("2 completed, 1 failed"));

    let page = std::fs::read_to_string(out.path().join("diffs/10.0.0.1.html")).expect("page");
    assert!(page.contains("../index.html"));
    assert!(page.contains("port down"));
    assert!(page.contains("class=\"changed\""));
}

#[test]
fn changes_only_hides_identical_lines_on_diff_pages() {
    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    write_report(out.path(), &input, ReportFormat::Html, true, &engine).expect("write report");

    let page = std::fs::read_to_string(out.path().join("diffs/10.0.0.1.html")).expect("page");
    assert!(!page.contains("hostname r1"));
    assert!(page.contains("identical line(s) hidden"));
}

#[test]
fn json_report_summarizes_without_rows() {
    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    let written = write_report(out.path(), &input, ReportFormat::Json, false, &engine)
        .expect("write report");
    assert_eq!(written, vec![out.path().join("report.json")]);

    let raw = std::fs::read_to_string(&written[0]).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(json["aggregate"]["total"], 1);
    assert_eq!(json["aggregate"]["changed"], 1);
    assert_eq!(json["completed"], 2);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["tasks"][1]["group"], "east");
    assert_eq!(json["tasks"][2]["status"], "failed");
    assert!(json["tasks"][2].get("stats").is_none());
    assert!(json["tasks"][0].get("left").is_some());
    assert!(!raw.contains("\"rows\""));
}

#[test]
fn csv_report_has_one_row_per_task() {
    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    let written = write_report(out.path(), &input, ReportFormat::Csv, false, &engine)
        .expect("write report");
    assert_eq!(written, vec![out.path().join("report.csv")]);

    let raw = std::fs::read_to_string(&written[0]).expect("read");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Folder,IP,Status,Changed,Added,Removed",
            "root,10.0.0.1,different,1,0,0",
            "east,10.0.0.2,identical,0,0,0",
            "root,10.0.0.3,failed,,,",
        ]
    );
}

#[test]
fn csv_fields_with_commas_are_quoted() {
    let out = TempDir::new().expect("out");
    let mut task = ComparisonTask::new("10.0.0.5", "a", "b").with_group("lab, rack 2");
    task.status = TaskStatus::Completed;
    task.result = Some(compare_text("x\n", "x\n"));
    let tasks = vec![task];
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    write_report(out.path(), &input, ReportFormat::Csv, false, &engine).expect("write report");

    let raw = std::fs::read_to_string(out.path().join("report.csv")).expect("read");
    assert!(raw.contains("\"lab, rack 2\",10.0.0.5,identical"));
}

#[test]
fn capture_summaries_appear_on_index_and_in_json() {
    let source = TempDir::new().expect("source");
    std::fs::write(
        source.path().join("summary_preCheck.txt"),
        "Devices: 3\n- Reachable: 3\n",
    )
    .expect("pre summary");
    std::fs::write(source.path().join("summary_postCheck.txt"), "Reachable: 2\n")
        .expect("post summary");

    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let input = ReportInput {
        source: source.path(),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    write_report(out.path(), &input, ReportFormat::Html, false, &engine).expect("write html");

    let index = std::fs::read_to_string(out.path().join("index.html")).expect("index");
    assert!(index.contains("Capture summary"));
    assert!(index.contains("<td>Devices</td><td>3</td>"));
    assert!(index.contains("<td>Reachable</td><td>2</td>"));

    let json_path = write_json(out.path(), &input).expect("write json");
    let raw = std::fs::read_to_string(json_path).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(json["summaries"]["pre"][1]["key"], "Reachable");
    assert_eq!(json["summaries"]["post"][0]["value"], "2");
}

#[test]
fn summary_section_is_omitted_without_files() {
    let out = TempDir::new().expect("out");
    let tasks = finished_tasks();
    let input = ReportInput {
        source: Path::new("/logs"),
        tasks: &tasks,
        aggregate: aggregate(&tasks),
        orphans: &[],
    };
    let engine = TemplateEngine::new().expect("engine");
    write_report(out.path(), &input, ReportFormat::Html, false, &engine).expect("write html");

    let index = std::fs::read_to_string(out.path().join("index.html")).expect("index");
    assert!(!index.contains("Capture summary"));
    let json = serde_json::to_value(logdiff_renderer::JsonReport::new(&input)).expect("json");
    assert!(json.get("summaries").is_none());
}
