//! Text and JSON renderings of command results.

use crate::document::LoadedSpec;
use crate::materialize::{EntryKind, LocalReport, RemoteReport};
use crate::store::StoredDocument;
use crate::tree::Node;
use crate::types::Fingerprint;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn ingest_json(fingerprint: &Fingerprint) -> Value {
    json!({ "fingerprint": fingerprint })
}

pub fn list_text(fingerprints: &[Fingerprint]) -> String {
    if fingerprints.is_empty() {
        return "No stored documents.".to_string();
    }
    fingerprints
        .iter()
        .map(|fp| fp.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_json(fingerprints: &[Fingerprint]) -> Value {
    json!({ "documents": fingerprints })
}

pub fn validation_text(stored: &StoredDocument, loaded: &LoadedSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Specification")));
    out.push_str(&format!("  Fingerprint: {}\n", stored.fingerprint));
    if let Some(name) = &stored.document.project_name {
        out.push_str(&format!("  Project: {}\n", name));
    }
    out.push_str(&format!("  Directories: {}\n", loaded.tree.directory_count()));
    out.push_str(&format!("  Files: {}\n", loaded.tree.file_count()));

    if loaded.report.is_clean() {
        out.push_str("  Status: valid\n");
        return out;
    }

    out.push_str(&format!(
        "  Status: valid, {} descriptor(s) skipped\n\n",
        loaded.report.skipped.len()
    ));
    out.push_str(&format!("{}\n\n", format_section_heading("Skipped")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Location", "Problem"]);
    for skipped in &loaded.report.skipped {
        table.add_row(vec![skipped.location.clone(), skipped.error.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn validation_json(stored: &StoredDocument, loaded: &LoadedSpec) -> Value {
    let skipped: Vec<Value> = loaded
        .report
        .skipped
        .iter()
        .map(|s| json!({ "location": s.location, "error": s.error.to_string() }))
        .collect();
    json!({
        "fingerprint": stored.fingerprint,
        "project_name": stored.document.project_name,
        "directories": loaded.tree.directory_count(),
        "files": loaded.tree.file_count(),
        "skipped": skipped,
    })
}

/// Render a subtree with box-drawing guides, directories suffixed with `/`.
pub fn tree_text(node: &Node, label: &str) -> String {
    let mut out = format!("{}\n", label.bold());
    render_children(node, "", &mut out);
    out
}

fn render_children(node: &Node, prefix: &str, out: &mut String) {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        match child {
            Node::Directory { name, .. } => {
                out.push_str(&format!("{}{}{}/\n", prefix, branch, name.blue()));
                render_children(child, &format!("{}{}", prefix, indent), out);
            }
            Node::File { name, content } => {
                out.push_str(&format!(
                    "{}{}{} ({} bytes)\n",
                    prefix,
                    branch,
                    name,
                    content.len()
                ));
            }
        }
    }
}

pub fn tree_json(node: &Node) -> serde_json::Result<Value> {
    serde_json::to_value(node)
}

pub fn local_text(report: &LocalReport) -> String {
    format!(
        "{}\n\n  Root: {}\n  Directories: {}\n  Files: {}\n",
        format_section_heading("Local build"),
        report.root.display(),
        report.directories.len(),
        report.files.len()
    )
}

pub fn local_json(report: &LocalReport) -> Value {
    json!({
        "root": report.root,
        "directories": report.directories,
        "files": report.files,
    })
}

pub fn remote_text(report: &RemoteReport, dry_run: bool) -> String {
    let mut out = String::new();
    let heading = if dry_run { "Publish (dry run)" } else { "Publish" };
    out.push_str(&format!("{}\n\n", format_section_heading(heading)));
    out.push_str(&format!("  Repository: {}\n", report.repository.full_name));
    out.push_str(&format!("  URL: {}\n", report.repository.html_url));
    out.push_str(&format!(
        "  Created: {}  Failed: {}\n\n",
        report.created_count(),
        report.failure_count()
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Kind", "Result"]);
    for outcome in &report.outcomes {
        let kind = match outcome.kind {
            EntryKind::File => "file",
            EntryKind::Placeholder => "placeholder",
        };
        let result = match &outcome.result {
            Ok(()) => "created".to_string(),
            Err(e) => e.to_string(),
        };
        table.add_row(vec![outcome.path.clone(), kind.to_string(), result]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn remote_json(report: &RemoteReport, dry_run: bool) -> Value {
    let outcomes: Vec<Value> = report
        .outcomes
        .iter()
        .map(|o| {
            json!({
                "path": o.path,
                "kind": o.kind,
                "commit_message": o.commit_message,
                "ok": o.result.is_ok(),
                "error": o.result.as_ref().err().map(|e| e.to_string()),
            })
        })
        .collect();
    json!({
        "dry_run": dry_run,
        "repository": report.repository,
        "base_path": report.base_path,
        "created": report.created_count(),
        "failed": report.failure_count(),
        "outcomes": outcomes,
    })
}
