//! Rendering of check results for the terminal.

use index::SourceLocation;
use serde_json::json;
use std::fmt::Write;
use textmatch_core::checker::StrategyMatches;

/// One JSON object per checked paragraph: analyzer name -> match list.
pub fn to_json(results: &[StrategyMatches]) -> anyhow::Result<String> {
    let mut map = serde_json::Map::new();
    for result in results {
        map.insert(
            result.kind.name().to_string(),
            serde_json::to_value(&result.matches)?,
        );
    }
    Ok(json!(map).to_string())
}

pub fn render_text(results: &[StrategyMatches]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(
            out,
            "{}: {} match(es)",
            result.kind,
            result.matches.len()
        );
        for location in &result.matches {
            let _ = writeln!(out, "  {}", render_location(location));
        }
    }
    // Trailing newline comes from the caller's writeln.
    out.pop();
    out
}

fn render_location(location: &SourceLocation) -> String {
    match &location.text {
        Some(text) => format!(
            "{} (paragraph {}, checkpoint {}): {}",
            location.article, location.paragraph, location.checkpoint, text
        ),
        None => format!(
            "{} (paragraph {}, checkpoint {})",
            location.article, location.paragraph, location.checkpoint
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textmatch_core::analyzer::ContentAnalyzerKind;

    fn sample() -> Vec<StrategyMatches> {
        vec![
            StrategyMatches {
                kind: ContentAnalyzerKind::Simple,
                matches: vec![SourceLocation {
                    article: "doc".to_string(),
                    paragraph: 1,
                    checkpoint: 0,
                    text: Some("matched text".to_string()),
                }],
            },
            StrategyMatches {
                kind: ContentAnalyzerKind::BagOfWords,
                matches: vec![],
            },
        ]
    }

    #[test]
    fn json_output_maps_analyzer_names_to_match_lists() {
        let rendered = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["simple"][0]["article"], "doc");
        assert_eq!(value["bag_of_words"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn text_output_lists_every_strategy() {
        let rendered = render_text(&sample());
        assert!(rendered.contains("simple: 1 match(es)"));
        assert!(rendered.contains("doc (paragraph 1, checkpoint 0): matched text"));
        assert!(rendered.contains("bag_of_words: 0 match(es)"));
    }
}
