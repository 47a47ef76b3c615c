//! Character → guild assignment.
//!
//! Each repeat of a character goes to the next guild in priority order, so
//! no guild is asked for the same emoji twice on one message. Once every
//! guild has been used the last one is reused; validated input never gets
//! that far.

use std::collections::HashMap;

use reactext_types::charmap;
use reactext_types::{ReactionDirective, SpaceMembership};
use tracing::warn;

/// Plan one reaction per character of `upper_text`.
///
/// `spaces` must already be sorted by registry priority. Characters whose
/// emoji is missing from the chosen guild are skipped.
pub fn plan(upper_text: &str, spaces: &[SpaceMembership]) -> Vec<ReactionDirective> {
    let Some(last) = spaces.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut usage: HashMap<char, usize> = HashMap::new();
    let mut directives = Vec::with_capacity(upper_text.len());

    for c in upper_text.chars() {
        let Some(name) = charmap::emoji_name(c) else {
            warn!("No emoji mapped for {:?}, skipping", c);
            continue;
        };

        let used = usage.get(&c).copied().unwrap_or(0);
        let space = &spaces[used.min(last)];

        let Some(emoji) = space.emoji(name) else {
            warn!(
                "Emoji {} not found in guild {}, skipping {:?}",
                name, space.space_id, c
            );
            continue;
        };

        directives.push(ReactionDirective {
            character: c,
            space_id: space.space_id,
            emoji: emoji.clone(),
        });
        usage.insert(c, used + 1);
    }

    directives
}
