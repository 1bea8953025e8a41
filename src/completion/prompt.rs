// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt construction for answers and question rewriting

use crate::chat::ChatTurn;
use crate::search::ChunkRecord;

fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role().as_str(), turn.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt that rewrites a follow-up question into a standalone search query
pub fn build_summary_prompt(history: &[ChatTurn], question: &str) -> String {
    format!(
        "Based on the chat history below and the question, generate a query that extends \
the question with the chat history provided. The query should be in natural language. \
Answer with only the query. Do not add any explanation.\n\n\
<chat_history>\n{}\n</chat_history>\n<question>\n{}\n</question>",
        format_history(history),
        question
    )
}

/// Prompt that answers a question from retrieved chunks
///
/// `history` is empty when chat history is disabled for the session.
pub fn build_answer_prompt(question: &str, chunks: &[ChunkRecord], history: &[ChatTurn]) -> String {
    let context = chunks
        .iter()
        .map(|c| format!("[{}] {}", c.relative_path, c.chunk))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = String::from(
        "You are an expert assistant that extracts information from the CONTEXT provided \
between <context> and </context> tags. Be concise and do not hallucinate. \
If you do not have the information just say so. \
Do not mention the CONTEXT used in your answer.\n\n",
    );

    if !history.is_empty() {
        prompt.push_str("When answering, take into account the CHAT HISTORY between \
<chat_history> and </chat_history> tags.\n<chat_history>\n");
        prompt.push_str(&format_history(history));
        prompt.push_str("\n</chat_history>\n");
    }

    prompt.push_str("<context>\n");
    prompt.push_str(&context);
    prompt.push_str("\n</context>\n<question>\n");
    prompt.push_str(question);
    prompt.push_str("\n</question>\nAnswer:");
    prompt
}
