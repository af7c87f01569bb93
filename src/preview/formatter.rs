use crate::resolver::ExecutionStep;

/// Formats resolved execution orders into human-readable previews
pub struct PreviewFormatter;

impl PreviewFormatter {
    /// One line per step, indented by branch depth and prefixed with the
    /// branch label that led to it.
    pub fn format<'a>(steps: impl IntoIterator<Item = ExecutionStep<'a>>) -> String {
        steps
            .into_iter()
            .map(|step| Self::format_step(&step))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a single step, e.g. `  [qualified] sales_notify (notification): Notify Sales`.
    pub fn format_step(step: &ExecutionStep) -> String {
        let indent = "  ".repeat(step.depth());
        let branch = step
            .incoming_condition()
            .map(|c| format!("[{}] ", c))
            .unwrap_or_default();
        format!(
            "{}{}{} ({}): {}",
            indent, branch, step.node.id, step.node.node_type, step.node.label
        )
    }
}
