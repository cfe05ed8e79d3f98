//! Domain validation for generated records.
//!
//! Generation capabilities return typed records, but a model can still hand
//! back values that violate domain bounds (an inverted age range, three plot
//! beats, a gap in page numbering). [`Validate`] is the schema check applied
//! at the capability boundary before a record enters the pipeline.

use crate::{
    Brief, IllustratedPage, PlotStructure, Prose, ProsePage, ProseSetup, RenderedBook,
    RenderedPage, VisualDirection, VisualStyleGuide, MAX_PAGE_COUNT, MAX_PLOT_BEATS,
    MIN_PAGE_COUNT, MIN_PLOT_BEATS,
};

/// Schema validation for a generated record.
pub trait Validate {
    /// Artifact kind name used in violation messages.
    fn kind_name(&self) -> &'static str;

    /// Check domain bounds; the message names the specific violation so a
    /// repair pass can correct it.
    fn validate(&self) -> Result<(), String>;
}

/// Check that `numbers` is exactly 1..=len with no gaps or duplicates.
fn check_contiguous(numbers: impl Iterator<Item = u32>, what: &str) -> Result<(), String> {
    for (index, number) in numbers.enumerate() {
        let expected = index as u32 + 1;
        if number != expected {
            return Err(format!(
                "{} out of order: expected {} at position {}, found {}",
                what, expected, index, number
            ));
        }
    }
    Ok(())
}

impl Validate for Brief {
    fn kind_name(&self) -> &'static str {
        "brief"
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.age_range.min > self.age_range.max {
            return Err(format!(
                "age range inverted: min {} > max {}",
                self.age_range.min, self.age_range.max
            ));
        }
        if !(MIN_PAGE_COUNT..=MAX_PAGE_COUNT).contains(&self.page_count) {
            return Err(format!(
                "page_count {} outside {}..={}",
                self.page_count, MIN_PAGE_COUNT, MAX_PAGE_COUNT
            ));
        }
        if self.characters.is_empty() {
            return Err("cast list is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for PlotStructure {
    fn kind_name(&self) -> &'static str {
        "plot"
    }

    fn validate(&self) -> Result<(), String> {
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        if !(MIN_PLOT_BEATS..=MAX_PLOT_BEATS).contains(&self.beats.len()) {
            return Err(format!(
                "{} beats outside {}..={}",
                self.beats.len(),
                MIN_PLOT_BEATS,
                MAX_PLOT_BEATS
            ));
        }
        if let Some(beat) = self.beats.iter().find(|b| b.description.trim().is_empty()) {
            return Err(format!("beat '{}' has an empty description", beat.purpose));
        }
        Ok(())
    }
}

impl Validate for ProseSetup {
    fn kind_name(&self) -> &'static str {
        "prose-setup"
    }

    fn validate(&self) -> Result<(), String> {
        if self.logline.trim().is_empty() {
            return Err("logline is empty".to_string());
        }
        if self.theme.trim().is_empty() {
            return Err("theme is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for ProsePage {
    fn kind_name(&self) -> &'static str {
        "prose-page"
    }

    fn validate(&self) -> Result<(), String> {
        if self.page_number == 0 {
            return Err("page_number must start at 1".to_string());
        }
        if self.text.trim().is_empty() {
            return Err(format!("page {} text is empty", self.page_number));
        }
        if self.image_concept.trim().is_empty() {
            return Err(format!("page {} image concept is empty", self.page_number));
        }
        Ok(())
    }
}

impl Validate for Prose {
    fn kind_name(&self) -> &'static str {
        "prose"
    }

    fn validate(&self) -> Result<(), String> {
        self.setup.validate()?;
        for page in &self.pages {
            page.validate()?;
        }
        check_contiguous(self.pages.iter().map(|p| p.page_number), "prose pages")
    }
}

impl Validate for VisualStyleGuide {
    fn kind_name(&self) -> &'static str {
        "style-guide"
    }

    fn validate(&self) -> Result<(), String> {
        if self.art_direction.genre.trim().is_empty() {
            return Err("art direction genre is empty".to_string());
        }
        if self.art_direction.medium.trim().is_empty() {
            return Err("art direction medium is empty".to_string());
        }
        if self.setting.location.trim().is_empty() {
            return Err("setting location is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for IllustratedPage {
    fn kind_name(&self) -> &'static str {
        "illustrated-page"
    }

    fn validate(&self) -> Result<(), String> {
        if self.page_number == 0 {
            return Err("page_number must start at 1".to_string());
        }
        if self.beats.is_empty() {
            return Err(format!("page {} has no illustration beats", self.page_number));
        }
        check_contiguous(
            self.beats.iter().map(|b| b.order),
            &format!("page {} beats", self.page_number),
        )
    }
}

impl Validate for VisualDirection {
    fn kind_name(&self) -> &'static str {
        "visuals"
    }

    fn validate(&self) -> Result<(), String> {
        self.style_guide.validate()?;
        for page in &self.illustrated_pages {
            page.validate()?;
        }
        check_contiguous(
            self.illustrated_pages.iter().map(|p| p.page_number),
            "illustrated pages",
        )
    }
}

impl Validate for RenderedPage {
    fn kind_name(&self) -> &'static str {
        "rendered-page"
    }

    fn validate(&self) -> Result<(), String> {
        if self.page_number == 0 {
            return Err("page_number must start at 1".to_string());
        }
        Ok(())
    }
}

impl Validate for RenderedBook {
    fn kind_name(&self) -> &'static str {
        "book"
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        check_contiguous(self.pages.iter().map(|p| p.page_number), "rendered pages")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgeRange, Character};

    fn valid_brief() -> Brief {
        Brief::builder()
            .title("The Fog Lighthouse")
            .arc("arc")
            .setting("harbor")
            .age_range(AgeRange::new(4, 7))
            .page_count(8u32)
            .characters(vec![Character {
                name: "Fen".to_string(),
                description: "A firefly".to_string(),
            }])
            .build()
            .unwrap()
    }

    #[test]
    fn valid_brief_passes() {
        assert!(valid_brief().validate().is_ok());
    }

    #[test]
    fn inverted_age_range_is_named_in_violation() {
        let mut brief = valid_brief();
        brief.age_range = AgeRange::new(9, 4);
        let violation = brief.validate().unwrap_err();
        assert!(violation.contains("age range inverted"));
    }

    #[test]
    fn page_count_bounds_are_enforced() {
        let mut brief = valid_brief();
        brief.page_count = 40;
        assert!(brief.validate().is_err());
        brief.page_count = 7;
        assert!(brief.validate().is_err());
        brief.page_count = 32;
        assert!(brief.validate().is_ok());
    }

    #[test]
    fn gap_in_page_numbers_is_rejected() {
        let prose = Prose {
            setup: ProseSetup {
                logline: "l".to_string(),
                theme: "t".to_string(),
                style_notes: None,
            },
            pages: vec![
                ProsePage {
                    page_number: 1,
                    summary: "s".to_string(),
                    text: "text".to_string(),
                    image_concept: "c".to_string(),
                },
                ProsePage {
                    page_number: 3,
                    summary: "s".to_string(),
                    text: "text".to_string(),
                    image_concept: "c".to_string(),
                },
            ],
        };
        let violation = prose.validate().unwrap_err();
        assert!(violation.contains("expected 2"));
    }
}
