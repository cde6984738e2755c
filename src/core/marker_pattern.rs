/*
 * Recognizes `@do:` and `@bookmark:` markers inside a single line of source text.
 *
 * Every supported comment syntax is one entry in `COMMENT_SYNTAXES`. Each entry is a
 * pattern template in which `{kw}` stands for the marker keyword; the table is
 * compiled once per marker kind and consumed by a single matching loop, so
 * supporting another comment style means adding a row, not a branch.
 */
use crate::core::models::MarkerKind;
use once_cell::sync::Lazy;
use regex::Regex;

// Ordered by priority: for a given marker kind the first syntax that matches wins.
const COMMENT_SYNTAXES: &[(&str, &str)] = &[
    // `// @do: text` (PHP, JS, TS ...). Text runs to end of line.
    ("line-comment", r"//\s*@{kw}:\s*(.+)"),
    // `{{-- @do: text --}}` (Blade templates). Text runs to the closing delimiter.
    ("template-comment", r"\{\{--\s*@{kw}:\s*(.+)\s*--\}\}"),
];

struct CompiledSyntax {
    name: &'static str,
    kind: MarkerKind,
    regex: Regex,
}

// Grouped by kind first, then by syntax priority.
static COMPILED_SYNTAXES: Lazy<Vec<CompiledSyntax>> = Lazy::new(|| {
    MarkerKind::ALL
        .iter()
        .flat_map(|&kind| {
            COMMENT_SYNTAXES.iter().map(move |&(name, template)| {
                let pattern = template.replace("{kw}", kind.keyword());
                CompiledSyntax {
                    name,
                    kind,
                    regex: Regex::new(&pattern).unwrap(),
                }
            })
        })
        .collect()
});

/*
 * A marker found on a line. `syntax` names the comment style that produced it,
 * which is only of interest for diagnostics.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub kind: MarkerKind,
    pub syntax: &'static str,
    pub description: String,
}

/*
 * Returns the markers present on `line`, at most one per marker kind, `Do` before
 * `Bookmark`. Kinds are checked independently, so a line containing both markers
 * yields two matches. A marker followed only by whitespace produces a match with an
 * empty description.
 */
pub fn match_line(line: &str) -> Vec<MarkerMatch> {
    let mut matches = Vec::new();
    for kind in MarkerKind::ALL {
        let first_hit = COMPILED_SYNTAXES
            .iter()
            .filter(|syntax| syntax.kind == kind)
            .find_map(|syntax| {
                syntax.regex.captures(line).map(|caps| MarkerMatch {
                    kind,
                    syntax: syntax.name,
                    description: caps[1].trim().to_string(),
                })
            });
        if let Some(found) = first_hit {
            matches.push(found);
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> MarkerMatch {
        let mut found = match_line(line);
        assert_eq!(found.len(), 1, "Expected exactly one match for {line:?}, got {found:?}");
        found.remove(0)
    }

    #[test]
    fn test_line_comment_do_marker() {
        let m = single("    // @do: refactor this loop  ");
        assert_eq!(m.kind, MarkerKind::Do);
        assert_eq!(m.description, "refactor this loop");
        assert_eq!(m.syntax, "line-comment");
    }

    #[test]
    fn test_line_comment_bookmark_marker_with_loose_whitespace() {
        let m = single("$x = 1; //@bookmark:entry point");
        assert_eq!(m.kind, MarkerKind::Bookmark);
        assert_eq!(m.description, "entry point");
    }

    #[test]
    fn test_template_comment_markers() {
        let m = single("<div>{{-- @do: translate labels --}}</div>");
        assert_eq!(m.kind, MarkerKind::Do);
        assert_eq!(m.description, "translate labels");
        assert_eq!(m.syntax, "template-comment");

        let m = single("{{--@bookmark:   layout root   --}}");
        assert_eq!(m.kind, MarkerKind::Bookmark);
        assert_eq!(m.description, "layout root");
    }

    #[test]
    fn test_line_comment_wins_over_template_for_same_kind() {
        let m = single("// @do: first {{-- @do: second --}}");
        assert_eq!(m.syntax, "line-comment");
        assert_eq!(m.description, "first {{-- @do: second --}}");
    }

    #[test]
    fn test_both_kinds_on_one_line() {
        let found = match_line("// @do: ship it // @bookmark: release");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, MarkerKind::Do);
        assert_eq!(found[0].description, "ship it // @bookmark: release");
        assert_eq!(found[1].kind, MarkerKind::Bookmark);
        assert_eq!(found[1].description, "release");
    }

    #[test]
    fn test_non_matching_lines() {
        for line in [
            "",
            "plain code();",
            "// a normal comment",
            "// @Do: wrong case",
            "// @done: not the keyword",
            "@do: missing comment opener",
            "# @bookmark: hash comments are not supported",
            "{{-- @do: unterminated template",
            "// @do:",
        ] {
            assert!(match_line(line).is_empty(), "Unexpected match for {line:?}");
        }
    }

    #[test]
    fn test_whitespace_only_description_is_kept_as_empty() {
        let m = single("// @bookmark:    ");
        assert_eq!(m.kind, MarkerKind::Bookmark);
        assert_eq!(m.description, "");
    }
}
