//! Rendering of resolved versions into text.
//!
//! Everything here is pure: no I/O, no clock, so the same input always
//! produces byte-identical output.

use crate::core::{MarkerError, ResolvedVersion};

pub const START_MARKER: &str = "<!-- VERSIONS_START -->";
pub const END_MARKER: &str = "<!-- VERSIONS_END -->";

/// One `owner/repo@tag` line per action, sorted by identifier.
///
/// Each line ends with a newline; repeated identifiers keep their first entry.
pub fn render_list(versions: &[ResolvedVersion]) -> String {
    let mut sorted: Vec<&ResolvedVersion> = versions.iter().collect();
    sorted.sort_by_key(|v| v.action.sort_key());
    sorted.dedup_by(|a, b| a.action.id().eq_ignore_ascii_case(&b.action.id()));

    sorted.iter().map(|v| format!("{}\n", v)).collect()
}

/// The version list wrapped in a fenced code block
pub fn render_block(versions: &[ResolvedVersion]) -> String {
    format!("```\n{}```\n", render_list(versions))
}

/// Replace the marker region of `existing` with the rendered block.
///
/// Both markers and everything outside them are kept as-is.
pub fn render(existing: &str, versions: &[ResolvedVersion]) -> Result<String, MarkerError> {
    splice(existing, &render_block(versions))
}

/// Replace the text between the markers with `"\n" + block`
pub fn splice(existing: &str, block: &str) -> Result<String, MarkerError> {
    let (region_start, region_end) = marker_region(existing)?;

    let mut output = String::with_capacity(existing.len() + block.len());
    output.push_str(&existing[..region_start]);
    output.push('\n');
    output.push_str(block);
    output.push_str(&existing[region_end..]);
    Ok(output)
}

/// Byte range strictly between the end of the start marker and the start of the end marker
fn marker_region(text: &str) -> Result<(usize, usize), MarkerError> {
    let start = text.find(START_MARKER);
    let end = text.find(END_MARKER);

    let (start, end) = match (start, end) {
        (None, _) => return Err(MarkerError::MissingStart),
        (Some(_), None) => return Err(MarkerError::MissingEnd),
        (Some(start), Some(end)) => (start, end),
    };

    if text.matches(START_MARKER).count() > 1 || text.matches(END_MARKER).count() > 1 {
        return Err(MarkerError::Duplicate);
    }

    if end < start + START_MARKER.len() {
        return Err(MarkerError::OutOfOrder);
    }

    Ok((start + START_MARKER.len(), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Origin, RefType, TrackedAction};

    fn version(id: &str, tag: &str) -> ResolvedVersion {
        ResolvedVersion::new(
            TrackedAction::parse(id, Origin::Explicit).unwrap(),
            tag,
            RefType::Tag,
        )
    }

    const README: &str = "# Actions\n\nIntro text.\n\n<!-- VERSIONS_START -->\nstale\n<!-- VERSIONS_END -->\n\nFooter.\n";

    #[test]
    fn test_render_list_sorted() {
        let list = render_list(&[version("actions/checkout", "v6"), version("actions/cache", "v5")]);
        assert_eq!(list, "actions/cache@v5\nactions/checkout@v6\n");
    }

    #[test]
    fn test_render_list_case_insensitive_order() {
        let list = render_list(&[
            version("astral-sh/setup-uv", "v6"),
            version("Actions/setup-node", "v4"),
            version("actions/cache", "v5"),
        ]);
        assert_eq!(
            list,
            "actions/cache@v5\nActions/setup-node@v4\nastral-sh/setup-uv@v6\n"
        );
    }

    #[test]
    fn test_render_list_drops_duplicates() {
        let list = render_list(&[
            version("actions/cache", "v5"),
            version("actions/cache", "v4"),
        ]);
        assert_eq!(list, "actions/cache@v5\n");
    }

    #[test]
    fn test_render_list_empty() {
        assert_eq!(render_list(&[]), "");
        assert_eq!(render_block(&[]), "```\n```\n");
    }

    #[test]
    fn test_render_replaces_region() {
        let out = render(
            README,
            &[version("actions/checkout", "v6"), version("actions/cache", "v5")],
        )
        .unwrap();

        assert_eq!(
            out,
            "# Actions\n\nIntro text.\n\n<!-- VERSIONS_START -->\n```\nactions/cache@v5\nactions/checkout@v6\n```\n<!-- VERSIONS_END -->\n\nFooter.\n"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let versions = [version("actions/checkout", "v6")];
        let once = render(README, &versions).unwrap();
        let twice = render(&once, &versions).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_render_preserves_outside_content() {
        let out = render(README, &[version("actions/checkout", "v6")]).unwrap();

        let (before, after) = README.split_once("stale\n").unwrap();
        let before = before.trim_end_matches('\n');
        assert!(out.starts_with(before));
        assert!(out.ends_with(after));
    }

    #[test]
    fn test_render_markers_on_same_line() {
        let doc = "a <!-- VERSIONS_START --><!-- VERSIONS_END --> b";
        let out = render(doc, &[version("actions/cache", "v5")]).unwrap();
        assert_eq!(
            out,
            "a <!-- VERSIONS_START -->\n```\nactions/cache@v5\n```\n<!-- VERSIONS_END --> b"
        );
    }

    #[test]
    fn test_render_missing_start() {
        let doc = "text\n<!-- VERSIONS_END -->\n";
        assert_eq!(render(doc, &[]), Err(MarkerError::MissingStart));
    }

    #[test]
    fn test_render_missing_end() {
        let doc = "<!-- VERSIONS_START -->\ntext\n";
        assert_eq!(render(doc, &[]), Err(MarkerError::MissingEnd));
    }

    #[test]
    fn test_render_missing_both() {
        assert_eq!(render("plain", &[]), Err(MarkerError::MissingStart));
    }

    #[test]
    fn test_render_out_of_order() {
        let doc = "<!-- VERSIONS_END -->\n<!-- VERSIONS_START -->\n";
        assert_eq!(render(doc, &[]), Err(MarkerError::OutOfOrder));
    }

    #[test]
    fn test_render_duplicate_markers() {
        let doc = "<!-- VERSIONS_START -->\n<!-- VERSIONS_END -->\n<!-- VERSIONS_START -->\n<!-- VERSIONS_END -->\n";
        assert_eq!(render(doc, &[]), Err(MarkerError::Duplicate));
    }
}
