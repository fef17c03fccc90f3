//! Usage line rendering.

use crate::registry::CommandDescriptor;

/// Render the usage lines shown to an actor who misused a command.
///
/// The first line is `/{alias}` followed by the flag fragment and the
/// descriptor's usage text; the description follows as its own line
/// when present.
pub(crate) fn usage_lines(matched_alias: &str, descriptor: &CommandDescriptor) -> Vec<String> {
    let mut line = format!("/{matched_alias}");
    let flags = descriptor.flags().usage_fragment();
    if !flags.is_empty() {
        line.push(' ');
        line.push_str(&flags);
    }
    if !descriptor.usage().is_empty() {
        line.push(' ');
        line.push_str(descriptor.usage());
    }

    let mut lines = vec![line];
    if !descriptor.description().is_empty() {
        lines.push(descriptor.description().to_string());
    }
    lines
}
