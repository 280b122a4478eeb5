//! Keyword-based triage that points a free-text complaint at a specialty.

use crate::errors::{BookingError, BookingResult};
use crate::models::symptom::SymptomAssessment;

pub const DEFAULT_SPECIALIZATION: &str = "General Physician";

/// Checked in order; the first keyword found in the complaint wins.
const SYMPTOM_KEYWORDS: &[(&str, &str)] = &[
    ("heart", "Cardiologist"),
    ("chest", "Cardiologist"),
    ("beat", "Cardiologist"),
    ("palpitation", "Cardiologist"),
    ("breathing", "Cardiologist"),
    ("tooth", "Dentist"),
    ("gum", "Dentist"),
    ("jaw", "Dentist"),
    ("cavity", "Dentist"),
    ("oral", "Dentist"),
    ("skin", "Dermatologist"),
    ("rash", "Dermatologist"),
    ("itch", "Dermatologist"),
    ("acne", "Dermatologist"),
    ("spot", "Dermatologist"),
    ("bone", "Orthopedic"),
    ("joint", "Orthopedic"),
    ("fracture", "Orthopedic"),
    ("knee", "Orthopedic"),
    ("back", "Orthopedic"),
    ("muscle", "Orthopedic"),
    ("stomach", "Gastroenterologist"),
    ("digest", "Gastroenterologist"),
    ("vomit", "Gastroenterologist"),
    ("belly", "Gastroenterologist"),
    ("acid", "Gastroenterologist"),
    ("gas", "Gastroenterologist"),
    ("fever", "General Physician"),
    ("cold", "General Physician"),
    ("flu", "General Physician"),
    ("headache", "General Physician"),
    ("weakness", "General Physician"),
];

/// Suggests a specialty for a symptom description.
pub fn analyze(symptoms: &str) -> BookingResult<SymptomAssessment> {
    let text = symptoms.trim().to_lowercase();
    if text.is_empty() {
        return Err(BookingError::Validation(
            "Please provide a description of your symptoms".to_string(),
        ));
    }

    let assessment = SYMPTOM_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(keyword, specialization)| SymptomAssessment {
            specialization: specialization.to_string(),
            matched_keyword: Some(keyword.to_string()),
            message: format!(
                "Your mention of '{}' suggests you should see a {}.",
                keyword, specialization
            ),
        })
        .unwrap_or_else(|| SymptomAssessment {
            specialization: DEFAULT_SPECIALIZATION.to_string(),
            matched_keyword: None,
            message: "Based on your symptoms, we recommend a general checkup.".to_string(),
        });

    Ok(assessment)
}
