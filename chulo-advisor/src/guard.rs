use chulo_catalog::SpoilageRisk;
use std::ops::Range;

use crate::error::AdvisorUnavailable;
use crate::models::{PriceDirection, PricingRequest, PricingResponse};

const LOWERING: &[&str] = &[
    "lower the price",
    "lowering the price",
    "reduce the price",
    "reducing the price",
    "decrease the price",
    "cut the price",
    "drop the price",
    "mark down",
    "price cut",
    "price reduction",
];

const RAISING: &[&str] = &[
    "raise the price",
    "raising the price",
    "increase the price",
    "increasing the price",
    "mark up",
    "price increase",
    "price hike",
];

const HOLDING: &[&str] = &[
    "hold the price",
    "keep the price",
    "leave the price",
    "maintain the price",
];

/// Word stems that count as stating the direction
fn direction_stems(direction: PriceDirection) -> &'static [&'static str] {
    match direction {
        PriceDirection::Lower => &["lower", "reduc", "decreas", "cut", "drop", "discount", "markdown", "mark down", "cheaper"],
        PriceDirection::Raise => &["raise", "increas", "higher", "premium", "mark up", "markup"],
        PriceDirection::Hold => &["hold", "keep", "unchanged", "maintain", "same"],
    }
}

fn phrases(direction: PriceDirection) -> &'static [&'static str] {
    match direction {
        PriceDirection::Raise => RAISING,
        PriceDirection::Lower => LOWERING,
        PriceDirection::Hold => HOLDING,
    }
}

fn contradicting_phrases(direction: PriceDirection) -> impl Iterator<Item = &'static str> {
    let (a, b) = match direction {
        PriceDirection::Raise => (LOWERING, HOLDING),
        PriceDirection::Lower => (RAISING, HOLDING),
        PriceDirection::Hold => (RAISING, LOWERING),
    };
    a.iter().chain(b.iter()).copied()
}

/// Start offsets of every occurrence of `needle`, overlapping ones included
fn occurrences<'a>(text: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.char_indices()
        .map(|(start, _)| start)
        .filter(move |&start| !needle.is_empty() && text[start..].starts_with(needle))
}

/// Byte ranges where `name` occurs in `text` as a whole word
fn name_spans(text: &str, name: &str) -> Vec<Range<usize>> {
    occurrences(text, name)
        .map(|start| start..start + name.len())
        .filter(|span| {
            let before = text[..span.start].chars().next_back();
            let after = text[span.end..].chars().next();
            !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
        })
        .collect()
}

/// True if `needle` occurs somewhere other than entirely inside a product name
fn mentions(text: &str, needle: &str, names: &[Range<usize>]) -> bool {
    occurrences(text, needle).any(|start| {
        let end = start + needle.len();
        !names.iter().any(|span| span.start <= start && end <= span.end)
    })
}

/// Reject suggestions no caller should see.
///
/// Applies to every backend: the price must be positive, the reasoning must
/// state the direction the price actually moves and must not claim another,
/// and a high-spoilage item may never be raised.
pub fn check_response(request: &PricingRequest, response: &PricingResponse) -> Result<(), AdvisorUnavailable> {
    let price = response.suggested_price;
    if !price.is_finite() || price <= 0.0 {
        return Err(AdvisorUnavailable::Malformed(format!(
            "suggestedPrice must be a positive number, got {}",
            price
        )));
    }

    if response.reasoning.trim().is_empty() {
        return Err(AdvisorUnavailable::Malformed("reasoning is empty".to_string()));
    }

    let direction = response.direction(request.current_price());

    if request.spoilage_risk() == SpoilageRisk::High && direction == PriceDirection::Raise {
        return Err(AdvisorUnavailable::Inconsistent(format!(
            "price raised from {} to {} on a high-spoilage product",
            request.current_price(),
            price
        )));
    }

    // Product names are free text and may contain any of the phrases
    let reasoning = response.reasoning.to_lowercase();
    let names = name_spans(&reasoning, &request.product_name().to_lowercase());

    if let Some(phrase) = contradicting_phrases(direction).find(|p| mentions(&reasoning, p, &names)) {
        return Err(AdvisorUnavailable::Inconsistent(format!(
            "reasoning says \"{}\" but the suggestion is to {} the price",
            phrase, direction
        )));
    }

    let stated = direction_stems(direction)
        .iter()
        .chain(phrases(direction))
        .any(|needle| mentions(&reasoning, needle, &names));
    if !stated {
        return Err(AdvisorUnavailable::Inconsistent(format!(
            "reasoning never says to {} the price",
            direction
        )));
    }

    Ok(())
}
