use std::path::{Component, Path, PathBuf};
use tracing::Metadata;

/// Where a log call originated.
///
/// Every field is best-effort: anything that cannot be resolved is left
/// empty (or zero for the line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        CallSite {
            file: file.into(),
            line,
            function: function.into(),
        }
    }
}

/// Resolve the call-site of an event from its static metadata.
///
/// `tracing` records no function name, so the `function` column is a
/// stand-in: the name of the innermost span the event was emitted in
/// (`span_name`), or the last segment of the module path when there is no
/// span. Under `#[instrument]` the span name is the function name; for a
/// hand-made span such as `info_span!("request")` the column shows
/// `request`, and outside any span it shows a module name like `handler`.
pub fn resolve(meta: &Metadata<'_>, span_name: Option<&str>, depth: usize) -> CallSite {
    from_parts(meta.file(), meta.line(), meta.module_path(), span_name, depth)
}

pub(crate) fn from_parts(
    file: Option<&str>,
    line: Option<u32>,
    module_path: Option<&str>,
    span_name: Option<&str>,
    depth: usize,
) -> CallSite {
    let function = span_name
        .or_else(|| module_path.and_then(|m| m.rsplit("::").next()))
        .unwrap_or_default();

    CallSite {
        file: file.map(|f| truncate_path(f, depth)).unwrap_or_default(),
        line: line.unwrap_or(0),
        function: function.to_string(),
    }
}

/// Keep only the last `depth` components of `path`. A depth of zero is
/// treated as one, i.e. the base name.
pub fn truncate_path(path: &str, depth: usize) -> String {
    let parts: Vec<&std::ffi::OsStr> = Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let start = parts.len().saturating_sub(depth.max(1));
    parts[start..]
        .iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}
