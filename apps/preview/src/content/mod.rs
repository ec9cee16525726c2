//! Content flattening: turns the form into the ordered block list the
//! paginator consumes.
//!
//! Free-text paragraphs (professional summary, experience summaries, letter
//! body) become one splittable `<p>` block each. Everything else (headings,
//! lists, tables, labelled groups) is kept together. Blank fields render the
//! same placeholders the form shows, so an empty form still previews.

use chrono::NaiveDate;
use quick_xml::escape::escape;

use crate::layout::block::ContentBlock;
use crate::models::document::{
    CoverLetterData, DocumentInput, DocumentKind, FormData, ProfessionalExperience,
};
use crate::render::format_date_range;

const NAME_PLACEHOLDER: &str = "Your Name Here";
const RECIPIENT_PLACEHOLDER: &str = "Hiring Manager";

/// Escaped `value`, or `placeholder` when the field is blank.
fn text_or(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        escape(placeholder).into_owned()
    } else {
        escape(value.trim()).into_owned()
    }
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn list_items<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(|s| format!("<li>{}</li>", escape(s))).collect()
}

/// "October 18, 2026".
pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Blocks for whichever document `kind` names. A missing letter renders with
/// every letter field blank.
pub fn document_blocks(kind: DocumentKind, input: &DocumentInput, date: NaiveDate) -> Vec<ContentBlock> {
    match kind {
        DocumentKind::Resume => resume_blocks(&input.form_data),
        DocumentKind::CoverLetter => {
            let letter = input.cover_letter_data.clone().unwrap_or_default();
            cover_letter_blocks(&input.form_data, &letter, date)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

pub fn resume_blocks(form: &FormData) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::keep_together(format!("<h1>{}</h1>", text_or(&form.name, NAME_PLACEHOLDER))),
        ContentBlock::keep_together("<h2>Professional Summary</h2>"),
        ContentBlock::splittable(format!(
            "<p>{}</p>",
            text_or(
                &form.professional_summary,
                "Enter your professional summary here..."
            )
        )),
        ContentBlock::keep_together("<h2>Skills &amp; Abilities</h2>"),
    ];

    let skills = list_items(non_blank(&form.skills_and_abilities));
    blocks.push(ContentBlock::keep_together(if skills.is_empty() {
        "<ul><li>Add your skills and abilities...</li></ul>".to_string()
    } else {
        format!("<ul>{skills}</ul>")
    }));

    if let Some(table) = technical_skills_section(form) {
        blocks.push(ContentBlock::keep_together(table));
    }

    if !form.professional_experience.is_empty() {
        blocks.push(ContentBlock::keep_together("<h2>Professional Experience</h2>"));
        for job in &form.professional_experience {
            blocks.push(ContentBlock::keep_together(experience_item(job)));
            blocks.extend(
                non_blank(&job.experience_summary)
                    .map(|summary| ContentBlock::splittable(format!("<p>{}</p>", escape(summary)))),
            );
        }
    }

    let education: String = form
        .education
        .iter()
        .map(|edu| {
            format!(
                "<div class=\"education-item\"><strong>{} - {}</strong><br><span class=\"date-range\">Completed: {}</span></div>",
                text_or(&edu.qualification, "Qualification"),
                text_or(&edu.institution, "Institution"),
                text_or(&edu.year_completed, "20XX"),
            )
        })
        .collect();
    blocks.push(ContentBlock::keep_together(format!(
        "<div class=\"section\"><h2>Education</h2>{education}</div>"
    )));

    if form.include_hobbies {
        let hobbies: String = non_blank(&form.hobbies)
            .map(|h| format!("<p>{}</p>", escape(h)))
            .collect();
        if !hobbies.is_empty() {
            blocks.push(ContentBlock::keep_together(format!(
                "<div class=\"section\"><h2>Hobbies</h2>{hobbies}</div>"
            )));
        }
    }

    blocks.push(ContentBlock::keep_together(references_section(form)));
    blocks
}

fn technical_skills_section(form: &FormData) -> Option<String> {
    if !form.include_technical_skills {
        return None;
    }
    let rows: String = form
        .technical_skills
        .rows
        .iter()
        .filter(|row| !row.is_blank())
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                text_or(&row.category, "Category"),
                text_or(&row.technologies, "Technologies list"),
            )
        })
        .collect();
    if rows.is_empty() {
        return None;
    }
    let headers: String = form
        .technical_skills
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    Some(format!(
        "<div class=\"section\"><h2>Technical Skills</h2><table><thead><tr>{headers}</tr></thead><tbody>{rows}</tbody></table></div>"
    ))
}

fn experience_item(job: &ProfessionalExperience) -> String {
    let dates = format!(
        "({} - {})",
        format_date_range(&job.start_year, job.start_month.as_deref()),
        format_date_range(&job.end_year, job.end_month.as_deref()),
    );
    let accomplishments = list_items(non_blank(&job.key_accomplishments));
    let accomplishments = if accomplishments.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"key-accomplishments\"><h4>Key Accomplishments:</h4><ul>{accomplishments}</ul></div>"
        )
    };
    format!(
        "<div class=\"experience-item\"><h3>{}</h3><h4><span class=\"institution\">{}</span> <span class=\"date-range\">{}</span></h4>{accomplishments}</div>",
        text_or(&job.position, "Position Title"),
        text_or(&job.company, "Company Name"),
        escape(&dates),
    )
}

fn references_section(form: &FormData) -> String {
    let references: String = form
        .references
        .iter()
        .filter(|r| {
            !(r.name.trim().is_empty() && r.position.trim().is_empty() && r.contact.trim().is_empty())
        })
        .map(|r| {
            format!(
                "<div><div><strong>{}</strong> - {}</div>{}<p></p></div>",
                text_or(&r.name, "Reference Name"),
                text_or(&r.position, "Position"),
                text_or(&r.contact, "Contact Info"),
            )
        })
        .collect();
    let body = if form.include_references && !references.is_empty() {
        references
    } else {
        "<p>References available upon request.</p>".to_string()
    };
    format!("<div class=\"section\"><h2>References</h2>{body}</div>")
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

pub fn cover_letter_blocks(
    form: &FormData,
    letter: &CoverLetterData,
    date: NaiveDate,
) -> Vec<ContentBlock> {
    let name = text_or(&form.name, NAME_PLACEHOLDER);
    let recipient = text_or(&letter.recipient_name, RECIPIENT_PLACEHOLDER);

    let subtitle = if letter.subtitle.trim().is_empty() {
        String::new()
    } else {
        format!("<div class=\"subtitle\">{}</div>", escape(letter.subtitle.trim()))
    };

    let mut blocks = vec![
        ContentBlock::keep_together(format!("<h1>{name}</h1>{subtitle}")),
        ContentBlock::keep_together(format!(
            "<p>{}</p><p><strong>{recipient}</strong><br>{}<br>{}</p><p><strong>Dear {recipient},</strong></p>",
            format_letter_date(date),
            text_or(&letter.company, "Company Name"),
            text_or(&letter.location, "Location"),
        )),
    ];

    blocks.extend(letter.content.iter().enumerate().map(|(i, paragraph)| {
        let placeholder = format!("Paragraph {} content goes here...", i + 1);
        ContentBlock::splittable(format!(
            "<p style=\"text-align: justify;\">{}</p>",
            text_or(paragraph, &placeholder)
        ))
    }));

    blocks.push(ContentBlock::keep_together(format!(
        "<p style=\"margin-top: 2em;\">Sincerely,</p><p><strong>{name}</strong></p>"
    )));
    blocks
}
