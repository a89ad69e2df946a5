//! Indented outline text, the plain-text form of a map.
//!
//! One topic per line, indented four spaces (or one tab) per level below
//! the root. This is the same shape [`MindMap::outline_text`] writes, so
//! `serialize(parse(text)?) == text` for any outline the session produced.

use anyhow::{Result, bail};

use crate::map::session::{MindMap, Settings};

const INDENT: &str = "    ";

/// One line of an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub label: String,
}

/// Parse outline text.
///
/// Blank lines are skipped. The first topic must be unindented and is the
/// only one allowed at depth 0; every other line may go at most one level
/// deeper than the line before it.
pub fn parse(input: &str) -> Result<Vec<OutlineEntry>> {
    let mut entries: Vec<OutlineEntry> = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line_num = i + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let depth = indent_depth(raw, line_num)?;
        let label = raw.trim().to_string();

        match entries.last() {
            None if depth != 0 => {
                bail!("the first topic must not be indented (line {})", line_num)
            }
            Some(_) if depth == 0 => bail!(
                "second top-level topic `{}` at line {}: an outline has one root",
                label,
                line_num
            ),
            Some(prev) if depth > prev.depth + 1 => bail!(
                "topic `{}` at line {} is indented more than one level below its parent",
                label,
                line_num
            ),
            _ => {}
        }
        entries.push(OutlineEntry { depth, label });
    }

    if entries.is_empty() {
        bail!("outline has no topics");
    }
    Ok(entries)
}

pub fn serialize(entries: &[OutlineEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&INDENT.repeat(entry.depth));
        out.push_str(&entry.label);
        out.push('\n');
    }
    out
}

/// Outline entries of `map`, root first, children in path order.
pub fn from_map(map: &MindMap) -> Vec<OutlineEntry> {
    map.outline_rows(false)
        .into_iter()
        .map(|(node, depth)| OutlineEntry {
            depth,
            label: node.label.clone(),
        })
        .collect()
}

/// Build a new map from parsed entries. Children are added in the order
/// they appear, so they receive paths `1`, `2`, ... under their parent.
pub fn to_map(entries: &[OutlineEntry], settings: Settings) -> Result<MindMap> {
    let Some((root, rest)) = entries.split_first() else {
        bail!("outline has no topics");
    };
    let mut map = MindMap::new(&root.label, settings);
    let Some(root_id) = map.root().map(|n| n.id.clone()) else {
        bail!("failed to create root topic `{}`", root.label);
    };

    // ids of the most recent topic at each depth
    let mut ancestors = vec![root_id];
    for entry in rest {
        ancestors.truncate(entry.depth);
        let Some(parent) = ancestors.last() else {
            bail!("topic `{}` has no parent", entry.label);
        };
        let Some(id) = map.add_child(parent, &entry.label) else {
            bail!("failed to add topic `{}`", entry.label);
        };
        ancestors.push(id);
    }
    Ok(map)
}

fn indent_depth(line: &str, line_num: usize) -> Result<usize> {
    let mut depth = 0;
    let mut spaces = 0;
    for ch in line.chars() {
        match ch {
            '\t' if spaces == 0 => depth += 1,
            ' ' => {
                spaces += 1;
                if spaces == INDENT.len() {
                    depth += 1;
                    spaces = 0;
                }
            }
            '\t' => bail!("mixed tabs and spaces in indentation at line {}", line_num),
            _ => break,
        }
    }
    if spaces != 0 {
        bail!(
            "indentation at line {} is not a multiple of {} spaces",
            line_num,
            INDENT.len()
        );
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Project
    Research
        Papers
        Interviews
    Build
        Prototype
";

    #[test]
    fn parse_reads_depths_and_labels() {
        let entries = parse(SAMPLE).unwrap();
        let depths: Vec<usize> = entries.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 1, 2]);
        assert_eq!(entries[3].label, "Interviews");
    }

    #[test]
    fn serialize_parse_roundtrip() {
        assert_eq!(serialize(&parse(SAMPLE).unwrap()), SAMPLE);
    }

    #[test]
    fn tabs_count_as_one_level() {
        let entries = parse("Root\n\tA\n\t\tB\n").unwrap();
        assert_eq!(entries[2].depth, 2);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let entries = parse("Root\n\n    A\n   \n").unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn rejects_malformed_outlines() {
        assert!(parse("").is_err());
        assert!(parse("    Root\n").is_err());
        assert!(parse("Root\nOther root\n").is_err());
        assert!(parse("Root\n        Too deep\n").is_err());
        assert!(parse("Root\n  Two spaces\n").is_err());
        assert!(parse("Root\n  \tMixed\n").is_err());
    }

    #[test]
    fn error_names_the_line() {
        let err = parse("Root\n    A\n          B\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn to_map_rebuilds_the_tree() {
        let map = to_map(&parse(SAMPLE).unwrap(), Settings::default()).unwrap();
        assert_eq!(map.nodes().len(), 6);
        assert_eq!(map.outline_text(), SAMPLE);

        let paths: Vec<String> = map
            .outline_rows(false)
            .iter()
            .map(|(n, _)| n.path.to_string())
            .collect();
        assert_eq!(paths, vec!["1", "1.1", "1.1.1", "1.1.2", "1.2", "1.2.1"]);
    }

    #[test]
    fn map_outline_roundtrip() {
        let map = to_map(&parse(SAMPLE).unwrap(), Settings::default()).unwrap();
        let text = serialize(&from_map(&map));
        let again = to_map(&parse(&text).unwrap(), Settings::default()).unwrap();
        assert_eq!(again.outline_text(), map.outline_text());
    }

    #[test]
    fn single_root_outline() {
        let map = to_map(&parse("Alone\n").unwrap(), Settings::default()).unwrap();
        assert_eq!(map.nodes().len(), 1);
        assert_eq!(map.root().map(|n| n.label.as_str()), Some("Alone"));
    }
}
