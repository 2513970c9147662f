//! Flattening a conversation into a model-readable transcript

use super::Message;

/// Render messages as one `Role: content` line each, in input order.
///
/// Content is copied verbatim. `Message::Unknown` produces no line.
pub fn format_history(messages: &[Message]) -> String {
    let mut transcript = String::new();
    for msg in messages {
        let (label, content) = match msg {
            Message::System { content } => ("System", content),
            Message::User { content } => ("User", content),
            Message::Assistant { content, .. } => ("Assistant", content),
            Message::ToolResult { content, .. } => ("Tool use", content),
            Message::Unknown => continue,
        };
        transcript.push_str(label);
        transcript.push_str(": ");
        transcript.push_str(content);
        transcript.push('\n');
    }
    transcript
}
