//! Draft Synthesizer: pure, idempotent merge of categorized records into the
//! three-section draft.

use rhythms_core::{ActivityRecord, Draft, VERIFY_MARKER};

/// Format one record as a draft bullet: `- [title](url)` when linked,
/// plain `- title` otherwise, with a trailing verification marker for
/// records of uncertain provenance.
pub fn format_bullet(record: &ActivityRecord) -> String {
    let mut bullet = if record.url.is_empty() {
        format!("- {}", record.title)
    } else {
        format!("- [{}]({})", record.title, record.url)
    };
    if record.needs_verification {
        bullet.push(' ');
        bullet.push_str(VERIFY_MARKER);
    }
    bullet
}

/// Merge `records` into `existing`. Existing bullets are never reordered or
/// removed; a record is skipped when its normalized text or url already
/// appears in the target section, appended otherwise. Re-merging the same
/// records is a no-op.
pub fn synthesize(existing: Draft, records: &[ActivityRecord]) -> Draft {
    let mut draft = existing;
    for record in records {
        draft.push_unique(record.category.section(), format_bullet(record));
    }
    draft
}
