//! Help listings

use crate::messages::{render, Messages};
use crate::node::{CommandNode, Outcome, Rejection};
use crate::principal::Principal;

/// Lines of the help listing for `node` as seen by `principal`
///
/// A header naming the node, then one entry per child the principal may see,
/// in insertion order. A leaf lists its own usage.
pub fn render_help(node: &CommandNode, principal: &dyn Principal, messages: &Messages) -> Vec<String> {
    let mut lines = vec![render(
        &messages.help_header,
        &[("command", node.qualified_name())],
    )];

    if node.has_children() {
        lines.extend(
            node.children()
                .iter()
                .filter(|child| child.is_visible_to(principal))
                .map(|child| entry_line(child, messages)),
        );
    } else {
        lines.push(entry_line(node, messages));
    }

    lines
}

fn entry_line(node: &CommandNode, messages: &Messages) -> String {
    let mut line = render(
        &messages.help_entry,
        &[("command", node.qualified_name()), ("args", node.usage_args())],
    )
    .trim_end()
    .to_string();

    if let Some(description) = node.description() {
        line.push_str(&render(
            &messages.help_description,
            &[("description", description)],
        ));
    }
    line
}

pub(crate) fn send_help(node: &CommandNode, principal: &dyn Principal, messages: &Messages) -> Outcome {
    if let Some(permission) = node.help_permission() {
        if !principal.has_permission(permission) {
            principal.send_message(&messages.unknown_command);
            return Outcome::Rejected(Rejection::NoPermission);
        }
    }

    for line in render_help(node, principal, messages) {
        principal.send_message(&line);
    }
    Outcome::Help
}
