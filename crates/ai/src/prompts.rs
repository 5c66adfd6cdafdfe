//! Fixed prompt templates for the five text operations.
//!
//! Templates are rendered with tera; the wording is part of each operation's
//! contract only insofar as the documented output shape goes, so every
//! template ends with the JSON contract the structured invocation validates.

use tera::{Context, Tera};

use quotecraft_core::quotation::{QuotationRequest, Tone};

use crate::llm::GenerationError;

pub const GENERATE_QUOTATION: &str = "generate_quotation";
pub const ADJUST_TONE: &str = "adjust_tone";
pub const SUGGEST_ADD_ONS: &str = "suggest_add_ons";
pub const FORMAT_PDF: &str = "format_quotation_pdf";
pub const GENERATE_EMAIL_BODY: &str = "generate_email_body";

const GENERATE_QUOTATION_TEMPLATE: &str = r#"On behalf of {{ your_company_name }}, generate a detailed and human-sounding quotation based on the following client input. Include:

- A warm introduction
- Service Breakdown
- Deliverables
- Timeline
- Pricing Estimate
- Terms & Conditions
- Conclusion

Use proper HTML formatting with headings and a human tone. Avoid sounding like an AI. Do not invent data.

Client Name: {{ client_name }}
Client's Company Name: {{ client_company_name }}
Project Description: {{ project_description }}
Services Required: {{ services_required }}
Timeline: {{ timeline }}
Budget Range: {{ budget_range }}
Special Requirements: {{ special_requirements }}
Preferred Tone: {{ preferred_tone }}
Add-ons: {{ add_ons }}

Respond with a single JSON object of the form {"quotation": "<the generated quotation as HTML markup>"}."#;

const ADJUST_TONE_TEMPLATE: &str = r#"You are a business communication expert. Adjust the following quotation to match the specified tone. Keep every section and all factual content intact; only the style may change.

Quotation: {{ quotation }}

Tone: {{ tone }}

Respond with a single JSON object of the form {"adjustedQuotation": "<the quotation with the adjusted tone>"}."#;

const SUGGEST_ADD_ONS_TEMPLATE: &str = r#"Based on the following project description, suggest relevant add-on services that could enhance the quotation. Provide add-ons that would benefit the client.

Project Description: {{ project_description }}

Consider add-ons like:
- Ongoing Support
- Maintenance
- Training
- Premium Features
- Expedited Delivery
- Custom Design

Respond with a single JSON object of the form {"addOnSuggestions": ["<suggestion>", "..."]}. An empty array is acceptable when nothing fits."#;

const FORMAT_PDF_TEMPLATE: &str = r#"You are a professional document designer. Take the following raw quotation HTML content and reformat it into a clean, well-structured HTML document suitable for converting to a PDF.

The output must be a single block of HTML content. Do NOT include <html>, <head>, or <body> tags.

Use clear headings (<h2>, <h3>), paragraphs (<p>), lists (<ul>, <li>), and bold text (<strong>) to improve readability. Ensure all the original information is present. The structure should flow from introduction to services, timeline, pricing, and conclusion.

Client Name: {{ client_name }}
Company Name: {{ company_name }}

Raw Quotation Content:
{{ quotation_html }}

Respond with a single JSON object of the form {"formattedHtml": "<the reformatted HTML>"}."#;

const GENERATE_EMAIL_BODY_TEMPLATE: &str = r#"Generate a short, friendly and professional message to accompany a business quotation for a client.

Address the client, {{ client_name }}, by name. Mention that the quotation from {{ your_company_name }} is attached and that you are looking forward to their response. Keep it under 100 words.

Project Description: {{ project_description }}

Respond with a single JSON object of the form {"emailBody": "<the message>"}."#;

fn render(
    template_id: &'static str,
    template: &str,
    context: &Context,
) -> Result<String, GenerationError> {
    Tera::one_off(template, context, false)
        .map_err(|err| GenerationError::Template { template_id, detail: err.to_string() })
}

/// Optional intake fields are presented to the model as the literal `None`.
/// This default exists only here; the schema keeps the fields truly optional.
fn field_or_none(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => "None",
    }
}

pub fn generate_quotation_prompt(input: &QuotationRequest) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("client_name", &input.client_name);
    context.insert("client_company_name", &input.client_company_name);
    context.insert("your_company_name", &input.your_company_name);
    context.insert("project_description", &input.project_description);
    context.insert("services_required", &input.services_required);
    context.insert("timeline", &input.timeline);
    context.insert("budget_range", &input.budget_range);
    context.insert(
        "special_requirements",
        field_or_none(input.special_requirements.as_deref()),
    );
    context.insert("preferred_tone", input.preferred_tone.as_str());
    context.insert("add_ons", field_or_none(input.add_ons.as_deref()));

    render(GENERATE_QUOTATION, GENERATE_QUOTATION_TEMPLATE, &context)
}

pub fn adjust_tone_prompt(quotation: &str, tone: Tone) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("quotation", quotation);
    context.insert("tone", tone.as_str());

    render(ADJUST_TONE, ADJUST_TONE_TEMPLATE, &context)
}

pub fn suggest_add_ons_prompt(project_description: &str) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("project_description", project_description);

    render(SUGGEST_ADD_ONS, SUGGEST_ADD_ONS_TEMPLATE, &context)
}

pub fn format_pdf_prompt(
    quotation_html: &str,
    client_name: &str,
    company_name: &str,
) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("quotation_html", quotation_html);
    context.insert("client_name", client_name);
    context.insert("company_name", company_name);

    render(FORMAT_PDF, FORMAT_PDF_TEMPLATE, &context)
}

pub fn generate_email_body_prompt(
    client_name: &str,
    your_company_name: &str,
    project_description: &str,
) -> Result<String, GenerationError> {
    let mut context = Context::new();
    context.insert("client_name", client_name);
    context.insert("your_company_name", your_company_name);
    context.insert("project_description", project_description);

    render(GENERATE_EMAIL_BODY, GENERATE_EMAIL_BODY_TEMPLATE, &context)
}

#[cfg(test)]
mod tests {
    use quotecraft_core::quotation::{QuotationRequest, Tone};

    use super::{adjust_tone_prompt, generate_quotation_prompt, suggest_add_ons_prompt};

    fn request_fixture() -> QuotationRequest {
        QuotationRequest {
            client_name: "Jane Doe".to_string(),
            client_company_name: "Acme Inc.".to_string(),
            your_company_name: "Studio X".to_string(),
            project_description: "Redesign the marketing website".to_string(),
            services_required: "Web Design, SEO".to_string(),
            timeline: "4 weeks".to_string(),
            budget_range: "$5,000-$8,000".to_string(),
            special_requirements: None,
            preferred_tone: Tone::Friendly,
            add_ons: Some(String::new()),
        }
    }

    #[test]
    fn quotation_prompt_interpolates_all_fields() {
        let prompt = generate_quotation_prompt(&request_fixture()).expect("render");
        assert!(prompt.contains("Client Name: Jane Doe"));
        assert!(prompt.contains("On behalf of Studio X"));
        assert!(prompt.contains("Budget Range: $5,000-$8,000"));
        assert!(prompt.contains("Preferred Tone: Friendly"));
    }

    #[test]
    fn absent_optional_fields_render_as_literal_none() {
        let prompt = generate_quotation_prompt(&request_fixture()).expect("render");
        assert!(prompt.contains("Special Requirements: None"));
        // Empty-after-trim behaves like absent.
        assert!(prompt.contains("Add-ons: None"));
    }

    #[test]
    fn provided_optional_fields_are_passed_through() {
        let mut request = request_fixture();
        request.add_ons = Some("Ongoing maintenance".to_string());
        let prompt = generate_quotation_prompt(&request).expect("render");
        assert!(prompt.contains("Add-ons: Ongoing maintenance"));
    }

    #[test]
    fn tone_prompt_names_the_requested_tone() {
        let prompt = adjust_tone_prompt("<p>body</p>", Tone::Formal).expect("render");
        assert!(prompt.contains("Tone: Formal"));
        assert!(prompt.contains("<p>body</p>"));
    }

    #[test]
    fn prompts_state_the_json_contract() {
        let prompt = suggest_add_ons_prompt("Redesign the marketing website").expect("render");
        assert!(prompt.contains(r#"{"addOnSuggestions""#));
    }
}
