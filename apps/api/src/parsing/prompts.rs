// Resume parsing prompt template.
// The extracted resume text is appended verbatim after the schema.

pub const RESUME_PARSE_PROMPT: &str = r#"Extract the following details from the resume and return them in a valid JSON format with these exact field names:
{
  "fileName": "Optional: Original file name (e.g., JohnDoe_Resume.pdf)",
  "name": "Full Name",
  "email": "Email Address",
  "phone": "Phone Number",
  "yearsOfExperience": number,
  "keySkills": ["skill1", "skill2"],
  "educationSummary": "Education details",
  "workHistory": [
    {
      "company": "Company Name",
      "position": "Job Title",
      "duration": "Time period (e.g., 2018 - 2022)",
      "description": "Job description or key responsibilities"
    }
  ]
}

Resume Text: "#;

/// Builds the prompt for one resume. The text is not escaped.
pub fn build_resume_prompt(resume_text: &str) -> String {
    let mut prompt = String::with_capacity(RESUME_PARSE_PROMPT.len() + resume_text.len());
    prompt.push_str(RESUME_PARSE_PROMPT);
    prompt.push_str(resume_text);
    prompt
}
