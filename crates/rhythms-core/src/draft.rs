//! Working standup document: three ordered bullet lists.
//!
//! Bullets are stored fully formatted (`- [title](url)` or `- text`, with a
//! trailing ` [?]` marker for unverified carry-overs). Insertion order is
//! significant and preserved across merges; deduplication happens only at
//! insertion time, existing bullets are never reordered or removed.

use serde::{Deserialize, Serialize};

use crate::types::Section;

/// Literal prefix emitted on the terminal output of a cycle.
pub const FINAL_MARKER: &str = "FINAL STANDUP:";

/// Trailing marker for bullets whose provenance is uncertain.
pub const VERIFY_MARKER: &str = "[?]";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub accomplishments: Vec<String>,
    pub blockers: Vec<String>,
    pub plans: Vec<String>,
}

impl Draft {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Accomplishments => &self.accomplishments,
            Section::Blockers => &self.blockers,
            Section::Plans => &self.plans,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Accomplishments => &mut self.accomplishments,
            Section::Blockers => &mut self.blockers,
            Section::Plans => &mut self.plans,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }

    pub fn bullet_count(&self) -> usize {
        Section::ALL.iter().map(|s| self.section(*s).len()).sum()
    }

    /// Append a formatted bullet unless an existing bullet in the section has
    /// the same normalized text or the same url. Returns whether it was added.
    pub fn push_unique(&mut self, section: Section, bullet: String) -> bool {
        let (new_text, new_url) = bullet_parts(&bullet);
        let new_norm = normalize_for_match(&new_text);

        let exists = self.section(section).iter().any(|existing| {
            let (text, url) = bullet_parts(existing);
            if normalize_for_match(&text) == new_norm {
                return true;
            }
            matches!((&url, &new_url), (Some(a), Some(b)) if a == b)
        });

        if exists {
            return false;
        }
        self.section_mut(section).push(bullet);
        true
    }

    /// Render the fixed three-section document shape.
    pub fn render(&self) -> String {
        let mut out = String::from("# Standup Summary");
        for section in Section::ALL {
            out.push('\n');
            out.push_str(section.heading());
            for bullet in self.section(section) {
                out.push('\n');
                out.push_str(bullet);
            }
        }
        out
    }

    /// Render the terminal, approved form of the document.
    pub fn render_final(&self) -> String {
        format!("{FINAL_MARKER}\n{}", self.render())
    }
}

/// Split a formatted bullet into its display text and url (if linked).
///
/// `- [Fix login bug](https://x/pull/2) [?]` -> `("Fix login bug", Some(url))`
pub fn bullet_parts(bullet: &str) -> (String, Option<String>) {
    let mut rest = bullet.trim();
    if let Some(stripped) = rest.strip_prefix("- ").or_else(|| rest.strip_prefix("* ")) {
        rest = stripped.trim_start();
    }
    if let Some(stripped) = rest.strip_suffix(VERIFY_MARKER) {
        rest = stripped.trim_end();
    }

    if let Some(inner) = rest.strip_prefix('[')
        && let Some((title, link)) = inner.split_once("](")
        && let Some(url) = link.strip_suffix(')')
        && !url.is_empty()
    {
        return (title.to_string(), Some(url.to_string()));
    }

    (rest.to_string(), None)
}

/// Case- and whitespace-insensitive form used for duplicate and carry-over
/// matching.
pub fn normalize_for_match(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let mut draft = Draft::default();
        draft.accomplishments.push("- [Fix login bug](https://github.com/acme/app/pull/2)".into());
        draft.plans.push("- Review open PRs".into());

        assert_eq!(
            draft.render(),
            "# Standup Summary\n\
             ## Accomplishments\n\
             - [Fix login bug](https://github.com/acme/app/pull/2)\n\
             ## Blockers\n\
             ## Plans\n\
             - Review open PRs"
        );
    }

    #[test]
    fn test_render_empty_draft_keeps_all_sections() {
        let rendered = Draft::default().render();
        assert!(rendered.starts_with("# Standup Summary"));
        assert!(rendered.contains("## Accomplishments"));
        assert!(rendered.contains("## Blockers"));
        assert!(rendered.contains("## Plans"));
    }

    #[test]
    fn test_render_final_prefixes_marker() {
        let rendered = Draft::default().render_final();
        assert!(rendered.starts_with("FINAL STANDUP:\n# Standup Summary"));
    }

    #[test]
    fn test_push_unique_appends_in_order() {
        let mut draft = Draft::default();
        assert!(draft.push_unique(Section::Plans, "- first".into()));
        assert!(draft.push_unique(Section::Plans, "- second".into()));
        assert_eq!(draft.plans, vec!["- first", "- second"]);
    }

    #[test]
    fn test_push_unique_rejects_whitespace_variant() {
        let mut draft = Draft::default();
        assert!(draft.push_unique(Section::Blockers, "- waiting for test computer".into()));
        assert!(!draft.push_unique(Section::Blockers, "-  Waiting  for test computer".into()));
        assert_eq!(draft.blockers.len(), 1);
    }

    #[test]
    fn test_push_unique_rejects_same_url_different_title() {
        let mut draft = Draft::default();
        assert!(draft.push_unique(
            Section::Accomplishments,
            "- [Fix login bug](https://x/pull/2)".into()
        ));
        assert!(!draft.push_unique(
            Section::Accomplishments,
            "- [fix the login bug properly](https://x/pull/2)".into()
        ));
        assert_eq!(draft.accomplishments.len(), 1);
    }

    #[test]
    fn test_push_unique_same_text_allowed_across_sections() {
        let mut draft = Draft::default();
        assert!(draft.push_unique(Section::Plans, "- Ship release".into()));
        assert!(draft.push_unique(Section::Accomplishments, "- Ship release".into()));
    }

    #[test]
    fn test_bullet_parts_linked() {
        let (text, url) = bullet_parts("- [Fix login bug](https://x/pull/2)");
        assert_eq!(text, "Fix login bug");
        assert_eq!(url.as_deref(), Some("https://x/pull/2"));
    }

    #[test]
    fn test_bullet_parts_plain_with_verify_marker() {
        let (text, url) = bullet_parts("- API Endpoint Unavailable [?]");
        assert_eq!(text, "API Endpoint Unavailable");
        assert_eq!(url, None);
    }

    #[test]
    fn test_bullet_parts_linked_with_verify_marker() {
        let (text, url) = bullet_parts("- [Upgrade CI runners](https://x/issues/9) [?]");
        assert_eq!(text, "Upgrade CI runners");
        assert_eq!(url.as_deref(), Some("https://x/issues/9"));
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(
            normalize_for_match("  API   Endpoint\tUnavailable "),
            "api endpoint unavailable"
        );
    }

    #[test]
    fn test_draft_serde_roundtrip() {
        let mut draft = Draft::default();
        draft.blockers.push("- waiting on infra".into());
        let json = serde_json::to_string(&draft).unwrap();
        let parsed: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
    }
}
