use lazy_static::lazy_static;
use serde_json::{Map, Value, json};
use storage::models::{ExampleData, Extraction};

use crate::error::ExtractorError;

type Result<T> = std::result::Result<T, ExtractorError>;

pub const ATTRIBUTE_SUFFIX: &str = "_attributes";
pub const EXTRACTIONS_KEY: &str = "extractions";

lazy_static! {
    static ref DEMONSTRATION_EXAMPLES: Vec<ExampleData> = vec![ExampleData::new(
        "The company faces regulatory risks.",
        vec![
            Extraction::new("item", "The company faces regulatory risks")
                .with_attribute("category", "Legal"),
        ],
    )];
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Turns the user's topic and field list into the model instruction.
    ///
    /// Both strings are inserted verbatim.
    pub fn instruction(topic: &str, fields: &str) -> String {
        format!("Extract '{}'. Fields: {}.", topic, fields)
    }

    /// The single worked example sent with every audit.
    pub fn demonstration_examples() -> Vec<ExampleData> {
        DEMONSTRATION_EXAMPLES.clone()
    }

    pub fn few_shot_prompt(
        description: &str,
        examples: &[ExampleData],
        chunk: &str,
    ) -> Result<String> {
        let mut prompt = String::new();
        prompt.push_str(description);
        prompt.push_str("\n\n");

        if !examples.is_empty() {
            prompt.push_str("Examples\n");
            for example in examples {
                prompt.push_str(&format!(
                    "Q: {}\nA: ```json\n{}\n```\n\n",
                    example.text,
                    Self::format_answer(&example.extractions)?
                ));
            }
        }

        prompt.push_str(&format!("Q: {}\nA: ", chunk));
        Ok(prompt)
    }

    /// Renders extractions in the shape the model is asked to answer with:
    /// `{"extractions": [{"<class>": "<text>", "<class>_attributes": {..}}]}`.
    pub fn format_answer(extractions: &[Extraction]) -> Result<String> {
        let entries: Vec<Value> = extractions
            .iter()
            .map(|extraction| {
                let mut entry = Map::new();
                entry.insert(
                    extraction.extraction_class.clone(),
                    Value::String(extraction.extraction_text.clone()),
                );
                entry.insert(
                    format!("{}{}", extraction.extraction_class, ATTRIBUTE_SUFFIX),
                    json!(extraction.attributes),
                );
                Value::Object(entry)
            })
            .collect();

        Ok(serde_json::to_string_pretty(
            &json!({ EXTRACTIONS_KEY: entries }),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_instruction_from_topic_and_fields() {
        assert_eq!(
            PromptBuilder::instruction("Risk Factors", "category, summary, impact"),
            "Extract 'Risk Factors'. Fields: category, summary, impact."
        );
    }

    #[test]
    fn instruction_passes_user_text_through_untouched() {
        assert_eq!(
            PromptBuilder::instruction("it's <b>", ""),
            "Extract 'it's <b>'. Fields: ."
        );
    }

    #[test]
    fn demonstration_example_is_fixed() {
        let examples = PromptBuilder::demonstration_examples();
        assert_eq!(examples.len(), 1);

        let example = &examples[0];
        assert_eq!(example.text, "The company faces regulatory risks.");
        assert_eq!(example.extractions.len(), 1);
        assert_eq!(example.extractions[0].extraction_class, "item");
        assert_eq!(
            example.extractions[0].attributes.get("category").map(String::as_str),
            Some("Legal")
        );
    }

    #[test]
    fn answer_uses_class_keyed_entries() {
        let answer =
            PromptBuilder::format_answer(&PromptBuilder::demonstration_examples()[0].extractions)
                .unwrap();
        let value: Value = serde_json::from_str(&answer).unwrap();

        assert_eq!(
            value["extractions"][0]["item"],
            "The company faces regulatory risks"
        );
        assert_eq!(value["extractions"][0]["item_attributes"]["category"], "Legal");
    }

    #[test]
    fn prompt_ends_with_the_open_question() {
        let prompt = PromptBuilder::few_shot_prompt(
            "Extract 'Risk Factors'. Fields: category.",
            &PromptBuilder::demonstration_examples(),
            "Interest rates may rise.",
        )
        .unwrap();

        assert!(prompt.starts_with("Extract 'Risk Factors'. Fields: category.\n\nExamples\n"));
        assert!(prompt.contains("Q: The company faces regulatory risks.\nA: ```json\n"));
        assert!(prompt.ends_with("Q: Interest rates may rise.\nA: "));
    }

    #[test]
    fn prompt_without_examples_skips_header() {
        let prompt = PromptBuilder::few_shot_prompt("Find dates.", &[], "May 5").unwrap();
        assert_eq!(prompt, "Find dates.\n\nQ: May 5\nA: ");
    }
}
