//! Cleanup and structural validation of generated text

use regex::Regex;
use shared::{ValidationReport, ValidationStatus};

use crate::core::templates::{marker_variants, Template};
use crate::types::RawResponse;

/// Cleans provider output and checks it against a template's section markers
///
/// Cleanup is applied until the text stops changing, which makes
/// `validate` idempotent over its own output.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    preamble: Regex,
    prompt_echo: Regex,
    trailing_note: Regex,
    disclaimer: Regex,
    blank_run: Regex,
}

impl PostProcessor {
    pub fn new() -> Self {
        Self {
            preamble: Regex::new(
                r"(?i)^(?:(?:sure|certainly|of course|absolutely)\b.*|here(?:'s| is| are)\b.*:)\s*$",
            )
            .expect("valid preamble pattern"),
            prompt_echo: Regex::new(r"(?i)^generate .+ with the following details")
                .expect("valid echo pattern"),
            trailing_note: Regex::new(r"(?i)^note\s*:").expect("valid note pattern"),
            disclaimer: Regex::new(r"(?i)^disclaimer\s*:").expect("valid disclaimer pattern"),
            blank_run: Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid blank-run pattern"),
        }
    }

    /// Cleaned text and the structural verdict for it
    pub fn validate(&self, response: &RawResponse, template: &Template) -> (String, ValidationReport) {
        let text = self.clean(&response.text, template);

        let missing_sections: Vec<String> = template
            .required_sections
            .iter()
            .filter(|section| !text.lines().any(|line| line_has_section(line, section)))
            .map(|section| section.to_string())
            .collect();

        let status = if text.is_empty() || response.truncated || !missing_sections.is_empty() {
            ValidationStatus::Partial
        } else {
            ValidationStatus::Complete
        };

        (
            text,
            ValidationReport {
                status,
                missing_sections,
                truncated: response.truncated,
            },
        )
    }

    /// Apply every cleanup rule until a pass leaves the text unchanged
    pub fn clean(&self, raw: &str, template: &Template) -> String {
        let mut current = raw.to_string();
        loop {
            let next = self.clean_once(&current, template);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn clean_once(&self, raw: &str, template: &Template) -> String {
        let text = raw.replace("\r\n", "\n");
        let text = unwrap_code_fence(text.trim());
        let text = self.drop_preamble(text);
        let text = self.drop_prompt_echo(text, template);
        let text = self.drop_trailing_note(text, template);
        self.blank_run.replace_all(text.trim(), "\n\n").trim().to_string()
    }

    fn drop_preamble<'a>(&self, text: &'a str) -> &'a str {
        let mut rest = text.trim_start();
        while let Some((first, tail)) = split_first_line(rest) {
            if !self.preamble.is_match(first.trim()) {
                break;
            }
            rest = tail.trim_start();
        }
        rest
    }

    fn drop_prompt_echo<'a>(&self, text: &'a str, template: &Template) -> &'a str {
        let Some((first, tail)) = split_first_line(text) else {
            return text;
        };
        if !self.prompt_echo.is_match(first.trim()) {
            return text;
        }

        // keep from the first line that carries a section marker
        let mut offset = 0;
        for line in tail.split_inclusive('\n') {
            if template
                .required_sections
                .iter()
                .any(|section| line_has_section(line, section))
            {
                return &tail[offset..];
            }
            offset += line.len();
        }
        tail
    }

    /// Disclaimers always go; a "Note:" only once the document has been signed off
    fn drop_trailing_note<'a>(&self, text: &'a str, template: &Template) -> &'a str {
        let trimmed = text.trim_end();
        let Some(split) = trimmed.rfind("\n\n") else {
            return text;
        };
        let (body, last_paragraph) = (&trimmed[..split], strip_decoration(&trimmed[split..]));

        let signed_off = || {
            body.lines()
                .any(|line| template.sign_off.iter().any(|closing| line_has_marker(line, closing)))
        };
        if self.disclaimer.is_match(last_paragraph)
            || (self.trailing_note.is_match(last_paragraph) && signed_off())
        {
            body
        } else {
            text
        }
    }
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the line opens with `section` or one of its accepted variants
pub fn line_has_section(line: &str, section: &str) -> bool {
    line_has_marker(line, section)
        || marker_variants(section)
            .iter()
            .any(|variant| line_has_marker(line, variant))
}

/// Whether the line opens with `section`, ignoring markdown decoration and case
pub fn line_has_marker(line: &str, section: &str) -> bool {
    let candidate = strip_decoration(line).to_lowercase();
    match candidate.strip_prefix(&section.to_lowercase()) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '#' | '*' | '_' | '>' | '-' | '+' | '•')
    })
}

fn split_first_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    Some(text.split_once('\n').unwrap_or((text, "")))
}

/// Inner text of a response wrapped entirely in one ``` fence
fn unwrap_code_fence(text: &str) -> &str {
    if !text.starts_with("```") || !text.ends_with("```") || text.len() < 6 {
        return text;
    }
    let Some((_, body)) = text.split_once('\n') else {
        return text;
    };
    match body.rfind("```") {
        Some(end) if !body[..end].contains("```") => body[..end].trim(),
        _ => text,
    }
}
