//! Terminal rendering for research runs.
//!
//! Pure string builders; the dispatch layer decides when to print them.

pub mod style;

use crate::pipeline::NO_SNIPPETS_MESSAGE;
use crate::search::SearchSnippet;
use crate::session::SessionHistory;

/// Indent a block of text by four spaces, keeping interior newlines.
fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The numbered snippet panel shown after retrieval.
pub fn render_snippets(snippets: &[SearchSnippet]) -> String {
    let mut lines = vec![format!("  {}", style::header("Collected Research Snippets"))];
    for (idx, snippet) in snippets.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "  {}",
            style::accent(format!("Snippet {}", idx + 1))
        ));
        if let Some(title) = snippet.title() {
            lines.push(format!("    {}", style::dim(title)));
        }
        if let Some(link) = snippet.url() {
            lines.push(format!("    {}", style::url(link)));
        }
        lines.push(indent(&snippet.text()));
    }
    lines.join("\n")
}

/// The drafted answer panel.
pub fn render_answer(answer: &str) -> String {
    format!(
        "  {}\n\n{}",
        style::header("Final Drafted Answer"),
        indent(answer)
    )
}

/// Warning shown when a run retrieved nothing to draft from.
pub fn render_no_snippets() -> String {
    format!("  {}", style::yellow(NO_SNIPPETS_MESSAGE))
}

/// The recent-drafts panel, newest first.
pub fn render_history(history: &SessionHistory) -> String {
    if history.is_empty() {
        return format!("  {}", style::dim("No drafts yet."));
    }
    let mut lines = vec![format!("  {}", style::header("Previous Drafts"))];
    for (number, entry) in history.recent() {
        lines.push(String::new());
        lines.push(format!("  {}", style::accent(format!("Draft #{number}"))));
        lines.push(format!("    {} {}", style::cyan("Query:"), entry.query));
        lines.push(format!("    {} {}", style::cyan("Answer:"), entry.answer));
    }
    lines.join("\n")
}
