use storage::models::Extraction;
use tracing::warn;

pub struct ExtractionValidator;

impl ExtractionValidator {
    /// Drops extractions without a class or text and reports ungrounded ones.
    pub fn validate(extractions: Vec<Extraction>) -> (Vec<Extraction>, ValidationReport) {
        let mut report = ValidationReport::default();
        let mut kept = Vec::with_capacity(extractions.len());

        for (index, extraction) in extractions.into_iter().enumerate() {
            if extraction.extraction_class.trim().is_empty() {
                report
                    .warnings
                    .push(format!("Dropped extraction {}: empty class", index));
                continue;
            }
            if extraction.extraction_text.trim().is_empty() {
                report.warnings.push(format!(
                    "Dropped '{}' extraction {}: empty text",
                    extraction.extraction_class, index
                ));
                continue;
            }
            if !extraction.is_grounded() {
                report.warnings.push(format!(
                    "'{}' extraction '{}' could not be located in the source text",
                    extraction.extraction_class, extraction.extraction_text
                ));
            }
            kept.push(extraction);
        }

        (kept, report)
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use storage::models::CharInterval;

    use super::*;

    fn grounded(class: &str, text: &str) -> Extraction {
        let mut extraction = Extraction::new(class, text);
        extraction.char_interval = Some(CharInterval::new(0, text.len()));
        extraction
    }

    #[test]
    fn keeps_valid_extractions_in_order() {
        let (kept, report) = ExtractionValidator::validate(vec![
            grounded("item", "first"),
            grounded("item", "second"),
        ]);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].extraction_text, "second");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn drops_blank_class_or_text() {
        let (kept, report) = ExtractionValidator::validate(vec![
            grounded(" ", "orphan"),
            grounded("item", ""),
            grounded("item", "kept"),
        ]);

        assert_eq!(kept.len(), 1);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn ungrounded_extractions_are_kept_with_warning() {
        let (kept, report) =
            ExtractionValidator::validate(vec![Extraction::new("item", "floating")]);

        assert_eq!(kept.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("floating"));
    }
}
