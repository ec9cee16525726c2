//! Resume and cover-letter form data, as the browser form submits it.
//!
//! Field names are camelCase on the wire. Every field has a default so a
//! partially filled form deserializes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    /// Human label used in download file names.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "Cover Letter",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalSkillsRow {
    pub category: String,
    pub technologies: String,
}

impl TechnicalSkillsRow {
    pub fn is_blank(&self) -> bool {
        self.category.trim().is_empty() && self.technologies.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalSkills {
    pub headers: Vec<String>,
    pub rows: Vec<TechnicalSkillsRow>,
}

impl Default for TechnicalSkills {
    fn default() -> Self {
        Self {
            headers: vec!["Skill Category".to_string(), "Technologies/Tools".to_string()],
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalExperience {
    pub position: String,
    pub company: String,
    pub start_year: String,
    pub end_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<String>,
    pub key_accomplishments: Vec<String>,
    pub experience_summary: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub qualification: String,
    pub institution: String,
    pub year_completed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub name: String,
    pub position: String,
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub name: String,
    pub professional_summary: String,
    pub skills_and_abilities: Vec<String>,
    pub include_technical_skills: bool,
    pub technical_skills: TechnicalSkills,
    pub professional_experience: Vec<ProfessionalExperience>,
    pub education: Vec<Education>,
    pub include_hobbies: bool,
    pub hobbies: Vec<String>,
    pub include_references: bool,
    pub references: Vec<Reference>,
}

impl FormData {
    /// Preview and download both need a name on the document.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterData {
    pub recipient_name: String,
    pub company: String,
    pub location: String,
    pub position: String,
    pub subtitle: String,
    pub content: Vec<String>,
}

/// Everything the form holds: the resume fields plus the optional letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInput {
    pub form_data: FormData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_data: Option<CoverLetterData>,
}

impl DocumentInput {
    /// Reads a `{ formData, coverLetterData }` JSON file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_deserialize_camel_case_payload() {
        let payload = json!({
            "formData": {
                "name": "Ada",
                "professionalSummary": "Engineer.",
                "includeTechnicalSkills": true,
                "technicalSkills": {
                    "headers": ["Area", "Tools"],
                    "rows": [{ "category": "Lang", "technologies": "Rust" }]
                },
                "professionalExperience": [{
                    "position": "Dev",
                    "company": "Acme",
                    "startYear": "2020",
                    "endYear": "",
                    "startMonth": "March",
                    "keyAccomplishments": ["Shipped"],
                    "experienceSummary": ["Did things."]
                }]
            },
            "coverLetterData": { "recipientName": "Ms. Parker", "content": ["Hello."] }
        });

        let input: DocumentInput = serde_json::from_value(payload).unwrap();
        assert_eq!(input.form_data.name, "Ada");
        assert_eq!(input.form_data.technical_skills.headers[1], "Tools");
        let job = &input.form_data.professional_experience[0];
        assert_eq!(job.start_month.as_deref(), Some("March"));
        assert_eq!(job.end_month, None);
        assert_eq!(
            input.cover_letter_data.unwrap().recipient_name,
            "Ms. Parker"
        );
    }

    #[test]
    fn test_partial_form_uses_defaults() {
        let input: DocumentInput = serde_json::from_str(r#"{"formData":{"name":"Ada"}}"#).unwrap();
        assert!(input.form_data.professional_experience.is_empty());
        assert_eq!(input.form_data.technical_skills.headers.len(), 2);
        assert!(input.cover_letter_data.is_none());
    }

    #[test]
    fn test_has_name_rejects_whitespace() {
        let mut form = FormData {
            name: "   ".to_string(),
            ..FormData::default()
        };
        assert!(!form.has_name());
        form.name = "Ada".to_string();
        assert!(form.has_name());
    }

    #[test]
    fn test_blank_skills_row() {
        assert!(TechnicalSkillsRow::default().is_blank());
        let row = TechnicalSkillsRow {
            category: " ".to_string(),
            technologies: "Rust".to_string(),
        };
        assert!(!row.is_blank());
    }

    #[test]
    fn test_document_kind_labels_and_wire_names() {
        assert_eq!(DocumentKind::CoverLetter.label(), "Cover Letter");
        assert_eq!(
            serde_json::to_string(&DocumentKind::CoverLetter).unwrap(),
            "\"cover-letter\""
        );
    }

    #[test]
    fn test_from_path_reads_and_reports_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"formData":{{"name":"Ada","hobbies":["Chess"]}}}}"#).unwrap();
        let input = DocumentInput::from_path(file.path()).unwrap();
        assert_eq!(input.form_data.hobbies, vec!["Chess".to_string()]);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{ not json").unwrap();
        assert!(matches!(
            DocumentInput::from_path(broken.path()),
            Err(AppError::Json(_))
        ));
        assert!(matches!(
            DocumentInput::from_path(Path::new("/nonexistent/doc.json")),
            Err(AppError::Io(_))
        ));
    }
}
