use crate::types::Reaction;

/// Returns an `@login` mention for every reaction whose content is exactly
/// `emoji`, in the order the reactions were given.
///
/// Repeat reactors are not collapsed: each matching record yields one
/// mention.
pub fn mentions(reactions: &[Reaction], emoji: &str) -> Vec<String> {
    reactions
        .iter()
        .filter(|reaction| reaction.content == emoji)
        .map(|reaction| format!("@{}", reaction.user.login))
        .collect()
}

/// Builds the comment tagging everyone who reacted with `emoji`.
///
/// Returns `None` when nobody matched, which means there is nothing to
/// post. A non-empty `message` is placed on its own line above the
/// mentions.
pub fn create_comment_body(
    reactions: &[Reaction],
    emoji: &str,
    message: Option<&str>,
) -> Option<String> {
    let mentions = mentions(reactions, emoji);
    if mentions.is_empty() {
        return None;
    }

    let tagged = mentions.join(" ");
    match message.filter(|m| !m.is_empty()) {
        Some(message) => Some(format!("{}\n{}", message, tagged)),
        None => Some(tagged),
    }
}
