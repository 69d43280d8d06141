//! Schema linting - reports every expression that extraction would drop.
//!
//! Extraction itself never fails on bad metadata; it silently skips it. The
//! linter walks schema files and surfaces each skipped expression with the
//! reason, so authors can find typos before a renderer quietly ignores them:
//! - JSON syntax errors
//! - Unrecognized or malformed expressions
//! - References to undefined properties
//! - Conflicting property groups
//! - Literal values that do not fit their property's type

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::dependency::{OnlyOneDependency, RequiresDependency};
use crate::error::RejectReason;
use crate::grammar::{self, Expression, ExpressionKind};
use crate::groups::{check_group_requests, GroupRequest};
use crate::loader::load_schema;
use crate::schema::SchemaView;
use crate::types::{
    json_type_name, DEPENDENCIES_EXTENSION, IDL_EXTENSIONS, PROPERTY_GROUPS_EXTENSION,
};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/x-dependencies/2")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        total_errors += count(&file_result, Severity::Error);
        total_warnings += count(&file_result, Severity::Warning);
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema file.
///
/// Every object in the document carrying an IDL extension is checked against
/// its own `properties`, so nested schemas (e.g. under `components/schemas`)
/// are covered too.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut diagnostics = Vec::new();
    let display_file = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();

    let schema = match load_schema(file) {
        Ok(s) => s,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!("cannot load schema: {}", e),
            });
            return FileResult {
                file: display_file,
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    check_schema_objects(&schema, file, "", &mut diagnostics);

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: display_file,
        status,
        diagnostics,
    }
}

fn count(result: &FileResult, severity: Severity) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .count()
}

/// Recursively find objects with IDL extensions and check them.
fn check_schema_objects(
    value: &Value,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        Value::Object(map) => {
            if IDL_EXTENSIONS.iter().any(|key| map.contains_key(*key)) {
                if let Ok(view) = SchemaView::new(value) {
                    check_dependencies(&view, file, path, diagnostics);
                    check_groups(&view, file, path, diagnostics);
                }
            }

            for (key, child) in map {
                let child_path = format!("{}/{}", path, pointer_segment(key));
                check_schema_objects(child, file, &child_path, diagnostics);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                let child_path = format!("{}/{}", path, i);
                check_schema_objects(item, file, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}

/// Escape an object key as a JSON Pointer reference token (RFC 6901).
fn pointer_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Check each entry of `x-dependencies`.
fn check_dependencies(
    view: &SchemaView<'_>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let ext_path = format!("{}/{}", path, DEPENDENCIES_EXTENSION);
    let items = match view.extension(DEPENDENCIES_EXTENSION) {
        None => return,
        Some(Value::Array(items)) => items,
        Some(other) => {
            diagnostics.push(shape_warning(file, ext_path, "array", other));
            return;
        }
    };

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}/{}", ext_path, i);
        let Some(spec) = item.as_str() else {
            diagnostics.push(shape_warning(file, item_path, "string", item));
            continue;
        };

        let outcome = match ExpressionKind::classify(spec) {
            Some(ExpressionKind::Requires) => RequiresDependency::parse(spec, view).map(|dep| {
                check_ignored_literals(spec, &dep, file, &item_path, diagnostics);
            }),
            Some(ExpressionKind::OnlyOne) => OnlyOneDependency::parse(spec, view).map(|_| ()),
            Some(ExpressionKind::Group) => Err(RejectReason::WrongKind {
                expected: "IF or OnlyOne",
                found: ExpressionKind::Group.keyword(),
            }),
            None => Err(RejectReason::UnrecognizedKeyword),
        };

        if let Err(reason) = outcome {
            diagnostics.push(rejection(file, item_path, spec, &reason));
        }
    }
}

/// Check each entry of `x-property-groups`, including cross-group conflicts.
fn check_groups(
    view: &SchemaView<'_>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let ext_path = format!("{}/{}", path, PROPERTY_GROUPS_EXTENSION);
    let map = match view.extension(PROPERTY_GROUPS_EXTENSION) {
        None => return,
        Some(Value::Object(map)) => map,
        Some(other) => {
            diagnostics.push(shape_warning(file, ext_path, "object", other));
            return;
        }
    };

    let requests = map.iter().map(|(name, value)| GroupRequest {
        name: name.clone(),
        specification: value.as_str().map(String::from),
    });

    for (request, outcome) in check_group_requests(view, requests) {
        let Err(reason) = outcome else {
            continue;
        };
        let group_path = format!("{}/{}", ext_path, pointer_segment(&request.name));
        match (request.specification.as_deref(), map.get(&request.name)) {
            (Some(spec), _) => diagnostics.push(rejection(file, group_path, spec, &reason)),
            (None, Some(value)) => {
                diagnostics.push(shape_warning(file, group_path, "string", value))
            }
            (None, None) => {}
        }
    }
}

/// Warn about literals that were dropped because they don't fit their property's type.
fn check_ignored_literals(
    spec: &str,
    dependency: &RequiresDependency,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Ok(Expression::Requires(clause)) = grammar::parse(spec) else {
        return;
    };

    let sides = [
        (
            clause.prerequisite_value,
            dependency.prerequisite_value(),
            dependency.prerequisite_key(),
        ),
        (
            clause.dependant_value,
            dependency.dependant_value(),
            dependency.dependant_key(),
        ),
    ];

    for (token, value, key) in sides {
        if let (Some(token), None) = (token, value) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W002".to_string(),
                file: file.to_path_buf(),
                path: path.to_string(),
                message: format!(
                    "value {} does not fit the type of \"{}\" and is ignored",
                    token, key
                ),
            });
        }
    }
}

fn rejection(file: &Path, path: String, spec: &str, reason: &RejectReason) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        code: reason.code().to_string(),
        file: file.to_path_buf(),
        path,
        message: format!("{}: {}", reason, spec),
    }
}

fn shape_warning(file: &Path, path: String, expected: &str, actual: &Value) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warning,
        code: "W001".to_string(),
        file: file.to_path_buf(),
        path,
        message: format!(
            "expected {}, got {}; entry is ignored",
            expected,
            json_type_name(actual)
        ),
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
