// Resume import LLM prompt templates.
// All prompts for the portfolio module are defined here.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a precise resume-to-portfolio converter. \
Extract the candidate's information into structured JSON. \
You MUST respond with a single JSON object — no markdown fences, no explanations. \
Never invent facts that are not in the resume. \
Omit any top-level key you cannot fill from the resume.";

pub const RESUME_PARSE_PROMPT: &str = r#"Convert the following resume into a portfolio JSON object.

RESUME:
{resume_text}

OUTPUT SCHEMA (return exactly this structure; every key is optional):
{
  "header": { "name": "string", "tagline": "string?", "displayPicture": "url?" },
  "about": { "markdown": "string — a short professional summary" },
  "experience": [
    { "company": "string", "role": "string", "start": "YYYY or YYYY-MM",
      "end": "YYYY or YYYY-MM — omit if current", "location": "string?",
      "highlights": ["string"] }
  ],
  "education": [
    { "institution": "string", "degree": "string?", "start": "YYYY", "end": "YYYY?" }
  ],
  "skills": ["string"],
  "socials": [ { "platform": "github" | "linkedin" | "email" | "website" | "string", "url": "string" } ],
  "footer": { "text": "string" }
}

RULES:
1. Copy dates as written, normalized to YYYY or YYYY-MM.
2. Keep experience in the resume's order (most recent first if stated).
3. Use the resume's own wording for highlights; do not embellish.
4. Return ONLY the JSON object — nothing else, no code fences."#;

/// Prompt variant for binary documents: the resume travels alongside the
/// prompt as a document content block instead of inline text.
pub const RESUME_PARSE_DOCUMENT_PROMPT: &str = r#"Convert the attached resume into a portfolio JSON object.

Follow the same schema and rules:
{
  "header": { "name": "string", "tagline": "string?", "displayPicture": "url?" },
  "about": { "markdown": "string — a short professional summary" },
  "experience": [
    { "company": "string", "role": "string", "start": "YYYY or YYYY-MM",
      "end": "YYYY or YYYY-MM — omit if current", "location": "string?",
      "highlights": ["string"] }
  ],
  "education": [
    { "institution": "string", "degree": "string?", "start": "YYYY", "end": "YYYY?" }
  ],
  "skills": ["string"],
  "socials": [ { "platform": "github" | "linkedin" | "email" | "website" | "string", "url": "string" } ],
  "footer": { "text": "string" }
}

Omit any key you cannot fill. Return ONLY the JSON object — no code fences."#;
