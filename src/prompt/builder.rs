use super::engine::TeraEngine;
use crate::search::SearchSnippet;
use tera::Context;

/// The fixed drafting template. Wording is part of the product surface;
/// change it deliberately, not in passing.
const DRAFTING_TEMPLATE: &str = "\
You are a highly skilled research assistant AI.

Based on the research snippets below, write a clear, factual, and well-organized answer to the user's question.

Question:
{{ query }}

Research Snippets:
{{ research }}

Answer:
";

const DRAFTING_NAME: &str = "drafting";

/// Engine with the drafting template registered.
pub fn drafting_engine() -> Result<TeraEngine, tera::Error> {
    let mut engine = TeraEngine::new();
    engine.add_template(DRAFTING_NAME, DRAFTING_TEMPLATE)?;
    Ok(engine)
}

/// Fill the drafting template with the user's question and the assembled
/// research context.
pub fn build_drafting_prompt(
    engine: &TeraEngine,
    query: &str,
    research: &str,
) -> Result<String, tera::Error> {
    let mut ctx = Context::new();
    ctx.insert("query", query);
    ctx.insert("research", research);
    engine.render(DRAFTING_NAME, &ctx)
}

/// Join snippet texts with a blank line, preserving retrieval order: N
/// snippets produce exactly N-1 separators.
pub fn assemble_research_context(snippets: &[SearchSnippet]) -> String {
    snippets
        .iter()
        .map(SearchSnippet::text)
        .collect::<Vec<_>>()
        .join("\n\n")
}
