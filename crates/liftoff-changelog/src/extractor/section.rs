//! Changelog section scanning

use liftoff_core::commit_types::CHANGELOG_HEADING;

/// An open fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// The fence a line opens, if any
    fn opened_by(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        if len < 3 || (marker == '`' && trimmed[len..].contains('`')) {
            return None;
        }
        Some(Self { marker, len })
    }

    /// A closing line uses the same marker, at least as many times, and
    /// nothing else
    fn is_closed_by(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let len = trimmed.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && len == trimmed.len()
    }

    fn closing_line(&self) -> String {
        self.marker.to_string().repeat(self.len)
    }
}

/// Follows fenced code blocks line by line
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    /// Feed the next line; true when it opens or closes a block
    pub(crate) fn update(&mut self, line: &str) -> bool {
        match self.open {
            Some(fence) if fence.is_closed_by(line) => {
                self.open = None;
                true
            }
            Some(_) => false,
            None => {
                self.open = Fence::opened_by(line);
                self.open.is_some()
            }
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Forget the open block, returning the line that would close it
    pub(crate) fn close(&mut self) -> Option<String> {
        self.open.take().map(|fence| fence.closing_line())
    }
}

/// Whether a line is an h1 or h2 heading
fn is_top_level_heading(line: &str) -> bool {
    line.starts_with("# ") || line.starts_with("## ")
}

/// Text following the `## Changelog` heading, up to the next top-level
/// heading outside a code fence, trimmed
pub fn changelog_section(body: &str) -> Option<String> {
    let mut lines = body.lines();
    lines.find(|line| line.trim() == CHANGELOG_HEADING)?;

    let mut section = Vec::new();
    let mut fences = FenceTracker::default();

    for line in lines {
        let fence_line = fences.update(line);
        if !fence_line && !fences.is_open() && is_top_level_heading(line.trim_start()) {
            break;
        }
        section.push(line);
    }

    Some(section.join("\n").trim().to_string())
}

/// Split a changelog section into bullet items
///
/// A line starting with `- ` (after indentation) begins a new item unless it
/// sits inside a fenced code block; every other line continues the current
/// item. Text before the first bullet is ignored. A code block left open at
/// the end is closed, so every item renders as balanced markdown.
pub fn changelog_items(section: &str) -> Vec<String> {
    let mut items: Vec<Vec<&str>> = Vec::new();
    let mut fences = FenceTracker::default();

    for line in section.lines() {
        let was_open = fences.is_open();
        let fence_line = fences.update(line);

        if !was_open && !fence_line {
            if let Some(rest) = line.trim_start().strip_prefix("- ") {
                items.push(vec![rest]);
                continue;
            }
        }

        if let Some(current) = items.last_mut() {
            current.push(line);
        }
    }

    let mut items: Vec<String> = items
        .into_iter()
        .map(|lines| lines.join("\n").trim().to_string())
        .collect();

    if let (Some(closing), Some(last)) = (fences.close(), items.last_mut()) {
        last.push('\n');
        last.push_str(&closing);
    }

    items.into_iter().filter(|item| !item.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "
## Changelog

- feat(ui-components): Added new responsive table component 
```html
<ds-table>
   ...
</ds-table>
```
- fix(ui-components): Resolved button focus state accessibility issue
- refactor(api-client!): Completely rewrote authentication flow
- chore(api-client): Updated dependencies and improved test coverage
- fix(utils): Corrected date formatting in exported reports
- chore(utils): Removed unused helper functions    
";

    #[test]
    fn test_changelog_section() {
        let section = changelog_section(BODY).unwrap();
        let expected = "- feat(ui-components): Added new responsive table component 
```html
<ds-table>
   ...
</ds-table>
```
- fix(ui-components): Resolved button focus state accessibility issue
- refactor(api-client!): Completely rewrote authentication flow
- chore(api-client): Updated dependencies and improved test coverage
- fix(utils): Corrected date formatting in exported reports
- chore(utils): Removed unused helper functions";
        assert_eq!(section, expected);
    }

    #[test]
    fn test_changelog_items() {
        let items = changelog_items(&changelog_section(BODY).unwrap());
        assert_eq!(items.len(), 6);
        assert!(items[0].starts_with("feat(ui-components): Added new responsive table component"));
        assert!(items[0].ends_with("</ds-table>\n```"));
        assert_eq!(items[5], "chore(utils): Removed unused helper functions");
    }

    #[test]
    fn test_bullets_inside_fence_are_content() {
        let section = "- feat(cli): add flag\n```md\n- not an item\n## not a heading\n```\n- fix(cli): other";
        let items = changelog_items(section);
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("- not an item"));
    }

    #[test]
    fn test_section_stops_at_next_heading() {
        let body = "## Changelog\n- feat: one\n\n## Notes\n- not part of changelog";
        assert_eq!(changelog_section(body).unwrap(), "- feat: one");
        assert!(changelog_section("no heading here").is_none());
    }

    #[test]
    fn test_indented_items() {
        let body = "## Changelog
        - feat(package-a): Some description
        - chore(package-a,package-b): Some description 2";
        let items = changelog_items(&changelog_section(body).unwrap());
        assert_eq!(
            items,
            vec![
                "feat(package-a): Some description".to_string(),
                "chore(package-a,package-b): Some description 2".to_string(),
            ]
        );
    }

    #[test]
    fn test_fence_closes_only_on_matching_marker() {
        let body = "## Changelog\n- feat(a): docs\n```md\n~~~\n## Usage\n~~~\n```\n- fix(a): y";
        let items = changelog_items(&changelog_section(body).unwrap());
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("## Usage"));
        assert_eq!(items[1], "fix(a): y");

        let longer = "- feat(a): nested\n````md\n```js\n- inside\n```\n````\n- fix(a): after";
        assert_eq!(changelog_items(longer).len(), 2);
    }

    #[test]
    fn test_unclosed_fence_is_closed_at_end() {
        let section = changelog_section("## Changelog\n- feat(pkg-a): add X\n```js\nconst a = 1;").unwrap();
        let items = changelog_items(&section);
        assert_eq!(items, vec!["feat(pkg-a): add X\n```js\nconst a = 1;\n```".to_string()]);

        let tilde = changelog_items("- fix(a): y\n~~~~\ncode");
        assert_eq!(tilde, vec!["fix(a): y\n~~~~\ncode\n~~~~".to_string()]);
    }

    #[test]
    fn test_fence_tracker() {
        let mut fences = FenceTracker::default();
        assert!(!fences.update("``` not a fence because of ` inside"));
        assert!(fences.update("```rust"));
        assert!(!fences.update("```js"));
        assert!(fences.is_open());
        assert!(fences.update("  ```  "));
        assert!(!fences.is_open());
        assert_eq!(fences.close(), None);
    }
}
