//! Tool outputs

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::{KnowledgeBaseSummary, SearchResult};

/// Characters of each result's content included in the text rendering
pub const RENDERED_CONTENT_LIMIT: usize = 500;

/// Output of `ListKnowledgeBases`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseList {
    pub knowledge_bases: Vec<KnowledgeBaseSummary>,
}

/// Output of `SearchKnowledgeBase`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchKnowledgeBaseOutput {
    pub result: SearchResult,
}

/// Output of `AutoSearchKnowledgeBase`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSearchKnowledgeBaseOutput {
    pub selected_kb: String,
    pub selection_score: u32,
    pub result: SearchResult,
}

/// Output of any tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    List(KnowledgeBaseList),
    Search(SearchKnowledgeBaseOutput),
    AutoSearch(AutoSearchKnowledgeBaseOutput),
}

impl ToolOutput {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Human-readable rendering, used for tool-call text content
    pub fn render_text(&self) -> String {
        match self {
            Self::List(list) => {
                let mut lines = vec!["Available knowledge bases:".to_string()];

                for kb in &list.knowledge_bases {
                    lines.push(format!("- {}: {}", kb.name, kb.description));
                }

                lines.join("\n")
            }
            Self::Search(output) => render_search(None, &output.result),
            Self::AutoSearch(output) => render_search(Some(&output.selected_kb), &output.result),
        }
    }
}

fn render_search(selected: Option<&str>, result: &SearchResult) -> String {
    let mut lines = Vec::new();

    if let Some(name) = selected {
        lines.push(format!("Selected knowledge base: {}", name));
    }

    lines.push(format!("Searched [{}]", result.kb_name()));
    lines.push(format!("Query: {}", result.query()));
    lines.push(format!("Hits: {}", result.count()));

    for (i, item) in result.results().iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("--- Result {} (score: {:.3}) ---", i + 1, item.score));
        lines.push(format!("Source: {}", item.source));
        lines.push(truncate_content(&item.content, RENDERED_CONTENT_LIMIT));
    }

    lines.join("\n")
}

/// Cut on a character boundary, marking the cut with an ellipsis
fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::SearchResultItem;

    #[test]
    fn test_list_serialization() {
        let output = ToolOutput::List(KnowledgeBaseList {
            knowledge_bases: vec![KnowledgeBaseSummary {
                name: "faq".to_string(),
                description: "FAQ".to_string(),
            }],
        });

        assert_eq!(
            output.to_value(),
            serde_json::json!({"knowledgeBases": [{"name": "faq", "description": "FAQ"}]})
        );
    }

    #[test]
    fn test_auto_search_serialization() {
        let output = ToolOutput::AutoSearch(AutoSearchKnowledgeBaseOutput {
            selected_kb: "product_docs".to_string(),
            selection_score: 3,
            result: SearchResult::new("product_docs", "Auth", "login", vec![]),
        });

        let json = output.to_value();
        assert_eq!(json["selectedKb"], "product_docs");
        assert_eq!(json["selectionScore"], 3);
        assert_eq!(json["result"]["kbName"], "product_docs");
    }

    #[test]
    fn test_render_text() {
        let output = ToolOutput::Search(SearchKnowledgeBaseOutput {
            result: SearchResult::new(
                "faq",
                "FAQ",
                "reset password",
                vec![SearchResultItem::new("Use the reset link.", 0.8123, "s3://kb/faq.md")],
            ),
        });

        let text = output.render_text();
        assert!(text.contains("Searched [faq]"));
        assert!(text.contains("Hits: 1"));
        assert!(text.contains("(score: 0.812)"));
        assert!(text.contains("Source: s3://kb/faq.md"));
    }

    #[test]
    fn test_render_text_caps_long_content() {
        let long = "認".repeat(RENDERED_CONTENT_LIMIT + 20);
        let output = ToolOutput::Search(SearchKnowledgeBaseOutput {
            result: SearchResult::new(
                "product_docs",
                "Auth",
                "認証",
                vec![SearchResultItem::new(long.clone(), 0.5, "s3://docs/long.md")],
            ),
        });

        let text = output.render_text();
        let expected = format!("{}...", "認".repeat(RENDERED_CONTENT_LIMIT));

        assert!(text.ends_with(&expected));
        assert!(!text.contains(&long));

        // structured output keeps the full chunk
        assert_eq!(
            output.to_value()["result"]["results"][0]["content"],
            serde_json::json!(long)
        );
    }

    #[test]
    fn test_truncate_content_keeps_short_text() {
        assert_eq!(truncate_content("short", 10), "short");
        assert_eq!(truncate_content("abcdef", 3), "abc...");
        assert_eq!(truncate_content("abc", 3), "abc");
    }
}
