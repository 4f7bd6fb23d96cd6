// src/check/imports.rs

//! Python import-statement scanner.
//!
//! Line-oriented: recognizes `import a.b [as x][, c.d]` and
//! `from a.b import c [as y][, d]` forms, joining backslash continuations
//! and parenthesized name lists that span lines. Relative bases
//! (`from ..sibling import x`) are resolved against the scanning module's
//! own dotted path. Triple-quoted strings are tracked so import statements
//! quoted inside docstrings are ignored.

use std::sync::LazyLock;

use regex::Regex;

/// A syntactic import with its base resolved to an absolute dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PyImport {
    /// `import a.b` - the target is the module itself.
    Module(String),
    /// `from a.b import c, d` - base module plus the imported names.
    /// The base may be empty when a relative import resolves to the
    /// project root. A name of `*` refers to the base module itself.
    From { module: String, names: Vec<String> },
}

/// Scan `source` for import statements.
///
/// `module` is the dotted path of the file being scanned and
/// `is_package_init` marks an `__init__.py`, whose relative imports anchor
/// at the module itself rather than its parent. Relative imports that
/// escape the project root are dropped.
pub fn scan_imports(source: &str, module: &str, is_package_init: bool) -> Vec<PyImport> {
    static IMPORT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\s*import\s+(.+)$").unwrap());
    static FROM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\s*from\s+([.\w]+)\s+import\s+(.+)$").unwrap());
    static DOTTED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*$").unwrap());
    static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());

    let mut imports = Vec::new();

    for line in logical_lines(source) {
        if let Some(caps) = FROM_RE.captures(&line) {
            let base = &caps[1];
            let Some(resolved) = resolve_base(base, module, is_package_init) else {
                continue;
            };
            let names: Vec<String> = caps[2]
                .replace(['(', ')'], " ")
                .split(',')
                .filter_map(|item| {
                    let token = item.split_whitespace().next()?;
                    (token == "*" || NAME_RE.is_match(token)).then(|| token.to_string())
                })
                .collect();
            if !names.is_empty() {
                imports.push(PyImport::From {
                    module: resolved,
                    names,
                });
            }
        } else if let Some(caps) = IMPORT_RE.captures(&line) {
            for item in caps[1].split(',') {
                let Some(token) = item.split_whitespace().next() else {
                    continue;
                };
                if DOTTED_RE.is_match(token) {
                    imports.push(PyImport::Module(token.to_string()));
                }
            }
        }
    }

    imports
}

/// Resolve a possibly-relative import base to an absolute dotted path.
///
/// One leading dot anchors at the scanning module's package; each further
/// dot climbs one level. `None` means the import climbs past the project
/// root and cannot refer to project code.
fn resolve_base(base: &str, module: &str, is_package_init: bool) -> Option<String> {
    let rest = base.trim_start_matches('.');
    let dots = base.len() - rest.len();
    if dots == 0 {
        return Some(base.to_string());
    }

    let mut anchor: Vec<&str> = if module.is_empty() {
        Vec::new()
    } else {
        module.split('.').collect()
    };
    if !is_package_init {
        anchor.pop();
    }
    for _ in 1..dots {
        if anchor.pop().is_none() {
            return None;
        }
    }

    if !rest.is_empty() {
        anchor.extend(rest.split('.'));
    }
    Some(anchor.join("."))
}

/// Assemble physical lines into logical statements: comments stripped,
/// backslash continuations and open parenthesized import lists joined,
/// triple-quoted string bodies skipped.
fn logical_lines(source: &str) -> Vec<String> {
    const DELIMS: [&str; 2] = ["\"\"\"", "'''"];

    let physical: Vec<&str> = source.lines().collect();
    let mut logical = Vec::new();
    let mut open_delim: Option<&str> = None;
    let mut i = 0;

    while i < physical.len() {
        let mut rest = physical[i];
        i += 1;

        if let Some(delim) = open_delim {
            // Resume scanning after the closing delimiter; the remainder
            // may itself open another string.
            match rest.split_once(delim) {
                Some((_, after)) => {
                    open_delim = None;
                    rest = after;
                }
                None => continue,
            }
        }

        // A line that is nothing but a comment cannot affect string state.
        if rest.trim_start().starts_with('#') {
            continue;
        }

        for delim in DELIMS {
            if rest.matches(delim).count() % 2 == 1 {
                open_delim = Some(delim);
            }
        }
        if open_delim.is_some() {
            continue;
        }

        let mut line = strip_comment(rest).trim_end().to_string();
        while line.ends_with('\\') && i < physical.len() {
            line.pop();
            line.push(' ');
            line.push_str(strip_comment(physical[i]).trim());
            i += 1;
        }

        let trimmed = line.trim_start();
        if (trimmed.starts_with("from ") || trimmed.starts_with("import "))
            && line.contains('(')
            && !line.contains(')')
        {
            while i < physical.len() {
                let cont = strip_comment(physical[i]);
                i += 1;
                line.push(' ');
                line.push_str(cont.trim());
                if cont.contains(')') {
                    break;
                }
            }
        }

        logical.push(line);
    }

    logical
}

// Import statements cannot contain string literals, so a bare '#' always
// starts a comment on the lines this scanner cares about.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
