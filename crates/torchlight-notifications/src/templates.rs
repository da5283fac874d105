//! Message templates.
//!
//! Spoiler-sensitive kinds use a fixed subject and preview so nothing about
//! the episode shows up in an inbox list or lock screen. Only the body
//! carries details.

use std::collections::BTreeMap;

use serde::Serialize;
use torchlight_core::outbox::NotificationKind;

/// A notification rendered for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    /// Subject line.
    pub subject: String,
    /// Short preview shown before the message is opened.
    pub preview: String,
    /// Full text.
    pub body: String,
}

struct Template {
    subject: &'static str,
    preview: &'static str,
    body: &'static str,
}

fn template(kind: NotificationKind) -> Template {
    match kind {
        NotificationKind::PickConfirmation => Template {
            subject: "Your episode {episode_number} pick is in",
            preview: "You picked {contestant_name} in {league_name}.",
            body: "Your pick of {contestant_name} for episode {episode_number} in \
                   {league_name} is saved. You can change it until picks lock.",
        },
        NotificationKind::AutoPickAlert => Template {
            subject: "We made your episode {episode_number} pick",
            preview: "{contestant_name} was picked for you in {league_name}.",
            body: "No pick was submitted before the deadline, so {contestant_name}, the \
                   first active contestant on your {league_name} roster, was picked for \
                   you for episode {episode_number}.",
        },
        NotificationKind::EliminationAlert => Template {
            subject: "There's news about your roster",
            preview: "Open to see what changed after the latest episode.",
            body: "Only {remaining_contestant} is still in the game on your \
                   {league_name} roster.",
        },
        NotificationKind::TorchSnuffed => Template {
            subject: "There's news about your league",
            preview: "Open to see what changed after the latest episode.",
            body: "Every contestant on your {league_name} roster has been voted out. \
                   Your torch has been snuffed.",
        },
    }
}

/// Replaces each `{name}` placeholder with its variable. Unknown
/// placeholders render as empty text.
fn fill(text: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                if let Some(value) = variables.get(&after[..end]) {
                    out.push_str(value);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders a notification of `kind` with its template variables.
#[must_use]
pub fn render(kind: NotificationKind, variables: &BTreeMap<String, String>) -> RenderedMessage {
    let template = template(kind);
    if kind.is_spoiler_sensitive() {
        return RenderedMessage {
            subject: template.subject.to_owned(),
            preview: template.preview.to_owned(),
            body: fill(template.body, variables),
        };
    }
    RenderedMessage {
        subject: fill(template.subject, variables),
        preview: fill(template.preview, variables),
        body: fill(template.body, variables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_pick_confirmation_fills_every_part() {
        let message = render(
            NotificationKind::PickConfirmation,
            &vars(&[
                ("contestant_name", "Parvati"),
                ("episode_number", "4"),
                ("league_name", "Heroes"),
            ]),
        );

        assert_eq!(message.subject, "Your episode 4 pick is in");
        assert_eq!(message.preview, "You picked Parvati in Heroes.");
        assert!(message.body.contains("Parvati for episode 4 in Heroes"));
    }

    #[test]
    fn test_spoiler_sensitive_subject_and_preview_ignore_payload() {
        // Arrange
        let first = vars(&[("league_name", "Heroes"), ("remaining_contestant", "Sandra")]);
        let second = vars(&[("league_name", "Villains"), ("remaining_contestant", "Russell")]);

        for kind in [NotificationKind::EliminationAlert, NotificationKind::TorchSnuffed] {
            // Act
            let a = render(kind, &first);
            let b = render(kind, &second);

            // Assert
            assert_eq!(a.subject, b.subject);
            assert_eq!(a.preview, b.preview);
            for text in [&a.subject, &a.preview] {
                assert!(!text.contains("Heroes"));
                assert!(!text.contains("Sandra"));
            }
        }
    }

    #[test]
    fn test_spoiler_body_carries_details() {
        let message = render(
            NotificationKind::EliminationAlert,
            &vars(&[("league_name", "Heroes"), ("remaining_contestant", "Sandra")]),
        );

        assert_eq!(
            message.body,
            "Only Sandra is still in the game on your Heroes roster."
        );
    }

    #[test]
    fn test_missing_variables_render_empty() {
        assert_eq!(fill("a{missing}b", &BTreeMap::new()), "ab");
        assert_eq!(fill("open {brace", &BTreeMap::new()), "open {brace");
    }
}
