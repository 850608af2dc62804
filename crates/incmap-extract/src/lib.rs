//! Include-directive extraction with deterministic local-header filtering.
//!
//! This crate intentionally keeps only the textual matcher for
//! `#include`-like directives so higher-tier crates can compose it without
//! filesystem or receipt dependencies.

#![forbid(unsafe_code)]

const KEYWORD: &str = "#include";

/// Extract local include targets from raw file text.
///
/// Preserves first-occurrence order and retains duplicates; deduplication
/// happens later when targets are collapsed into dependency sets. A
/// directive is the keyword, at least one whitespace character, then a
/// target delimited by `"..."` or `<...>` (a mismatched closing delimiter
/// is tolerated). Anything that does not match this shape is silently
/// skipped, since comments or macros may resemble but not be includes.
pub fn extract_includes(text: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find(KEYWORD) {
        rest = &rest[at + KEYWORD.len()..];
        let Some((target, tail)) = read_target(rest) else {
            continue;
        };
        if is_local_header(target) {
            targets.push(target.to_string());
        }
        rest = tail;
    }
    targets
}

/// Returns true when a candidate passes the textual header filter: ends in
/// `.h`, not path-rooted, not under the `sys/` prefix. The rule is purely
/// textual, so a bare library header like `stdio.h` passes too; targets
/// that never resolve to a scanned file stay out of the leveling universe
/// downstream.
pub fn is_local_header(target: &str) -> bool {
    target.ends_with(".h") && !target.starts_with('/') && !target.starts_with("sys/")
}

/// Parse the delimited target after the keyword. Returns the target and the
/// unconsumed tail, or `None` when the directive shape does not match.
fn read_target(after: &str) -> Option<(&str, &str)> {
    let stripped = after.trim_start();
    // The keyword must be followed by whitespace, or this is some other
    // token like `#includex`.
    if stripped.len() == after.len() {
        return None;
    }
    let open = stripped.chars().next()?;
    if open != '"' && open != '<' {
        return None;
    }
    let body = &stripped[open.len_utf8()..];
    let close = body.find(['"', '>'])?;
    if close == 0 {
        return None;
    }
    Some((&body[..close], &body[close + 1..]))
}
