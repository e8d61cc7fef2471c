//! Tutor prompt template registry.
//!
//! Each `TutorOperation` is one HTTP route and one hand-written prompt.
//! Rendering is pure string formatting: the topic is inserted exactly as
//! received, no trimming or escaping. The templates ask the model for a specific
//! markdown structure (bold headers, A–E choices, cloze cards, decision
//! arrows); that structure lives entirely in the text below.

use std::fmt;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Every study-material operation the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorOperation {
    /// Step 1 high-yield topic summary.
    Step1Pathophys,
    /// Step 1 cloze flashcards.
    Step1Anki,
    /// Step 1 foundational-science MCQs.
    Step1Questions,
    /// Step 2 CK clinical overview.
    Step2Overview,
    /// Step 2 CK clinical-vignette MCQs.
    Step2Questions,
    DifferentialBuilder,
    ManagementTree,
    CaseBreakdown,
    VignetteBreakdown,
    QuickDifferential,
    AnkiGenerator,
    /// Free-form question, passed through with a thin wrapper.
    AskAnything,
}

/// A prompt pair ready to hand to the completion gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub operation: TutorOperation,
    pub system: &'static str,
    pub user: String,
}

/// Client-side topic problems, detected before any upstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Topic must not be empty")]
    EmptyTopic,
    #[error("Topic too long ({actual} chars, max {max})")]
    TopicTooLong { max: usize, actual: usize },
}

impl TutorOperation {
    /// All operations, in route-table order.
    pub fn all() -> &'static [TutorOperation] {
        &[
            Self::Step1Pathophys,
            Self::Step1Anki,
            Self::Step1Questions,
            Self::Step2Overview,
            Self::Step2Questions,
            Self::DifferentialBuilder,
            Self::ManagementTree,
            Self::CaseBreakdown,
            Self::VignetteBreakdown,
            Self::QuickDifferential,
            Self::AnkiGenerator,
            Self::AskAnything,
        ]
    }

    /// Stable identifier, also the route path without the leading slash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Step1Pathophys => "step1-pathophys",
            Self::Step1Anki => "step1-anki",
            Self::Step1Questions => "step1-questions",
            Self::Step2Overview => "step2-overview",
            Self::Step2Questions => "step2-questions",
            Self::DifferentialBuilder => "differential-builder",
            Self::ManagementTree => "management-tree",
            Self::CaseBreakdown => "case-breakdown",
            Self::VignetteBreakdown => "vignette-breakdown",
            Self::QuickDifferential => "quick-differential",
            Self::AnkiGenerator => "anki-generator",
            Self::AskAnything => "ask-anything",
        }
    }

    /// HTTP route for this operation.
    pub fn route(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// System instruction sent alongside the user prompt.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Step1Questions => STEP1_ITEM_WRITER,
            Self::Step2Questions => STEP2_ITEM_WRITER,
            Self::VignetteBreakdown => USMLE_TUTOR,
            _ => MEDICAL_TUTOR_SYSTEM,
        }
    }

    /// Validate the topic and render this operation's prompt pair.
    ///
    /// `max_chars = None` accepts a topic of any length.
    pub fn render(
        &self,
        topic: &str,
        max_chars: Option<usize>,
    ) -> Result<RenderedPrompt, TemplateError> {
        validate_topic(topic, max_chars)?;
        Ok(RenderedPrompt {
            operation: *self,
            system: self.system_prompt(),
            user: self.user_prompt(topic),
        })
    }

    fn user_prompt(&self, topic: &str) -> String {
        match self {
            Self::Step1Pathophys => format!(
                "Summarize the pathophysiology, clinical features, diagnosis, treatment, \
key buzzwords, mnemonic, and example presentation of {topic} for USMLE Step 1.\n\
Respond in markdown with bold section headers."
            ),
            Self::Step1Anki => format!(
                "Create 5 Anki-style Cloze flashcards for USMLE Step 1 about {topic} \
using the {CLOZE} format."
            ),
            Self::Step1Questions => format!(
                "{STEP1_ITEM_WRITER}\n\n\
Using the following topic: {topic}\n\n\
Write TWO board-style foundational science MCQs that include:\n\
- Header: \"#GPT (Foundational)\"\n\
- Clinical vignette\n\
- One of these lead-ins: \"Which of the following is the most likely cause/mechanism/etc?\"\n\
- 5 homogeneous answer choices labeled A–E\n\
- The correct answer labeled only in the explanation (do not mark above)\n\
- A 2–3 sentence tutor-style explanation of how to approach the question\n\
- A markdown table comparing why each incorrect answer is wrong and what clinical clue would have made it correct\n\
- A summary of why the correct answer is right\n\
- Label the tested competency and writing principle used\n\
- End each question with '---'\n\n\
Make sure each question tests foundational understanding (e.g. enzymes, pathophysiology, \
mechanisms, cytokines, lesions).\n\
Format in Markdown."
            ),
            Self::Step2Overview => format!(
                "Give a clinical overview of {topic} for USMLE Step 2 CK including presentation, \
key labs/imaging, diagnosis, and first-line treatment.\n\
Respond in markdown with bolded section titles."
            ),
            Self::Step2Questions => format!(
                "{STEP2_ITEM_WRITER}\n\n\
Using the following topic: {topic}\n\n\
Write TWO clinical vignette MCQs that include:\n\
- Header: \"#GPT (Clinical)\"\n\
- Clinical scenario with labs/imaging if needed\n\
- Lead-in such as \"What is the next best step in management?\" or \"What is the most appropriate pharmacotherapy?\"\n\
- 5 answer choices labeled A–E\n\
- Correct answer explained (but not marked in the choices)\n\
- A 2–3 sentence tutor-style explanation of the reasoning process\n\
- A markdown table explaining why the other 4 answer choices are incorrect\n\
- A brief educational summary explaining why the correct answer is best\n\
- Label the clinical competency tested and writing principles used\n\
- End each question with '---'\n\n\
Ensure questions follow NBME exam standards and resemble actual USMLE practice questions.\n\
Format in Markdown."
            ),
            Self::DifferentialBuilder => format!(
                "A patient presents with: {topic}\n\
Generate:\n\
- Top 5 differential diagnoses\n\
- Key distinguishing clinical features for each\n\
- Classic USMLE buzzwords\n\
- One-liner diagnosis clue per condition\n\
Respond in markdown with bold headers."
            ),
            Self::ManagementTree => format!(
                "Create a simplified USMLE Step 2 CK management algorithm for: {topic}.\n\
Include:\n\
- Initial steps\n\
- Key labs/imaging\n\
- First-line treatment\n\
- Escalation steps\n\
- When to refer or hospitalize\n\
Use bullet points with bold headers and arrows (→) to show decision flow."
            ),
            Self::CaseBreakdown => format!(
                "Break down the following case topic for a USMLE Step 2 CK student: {topic}\n\
Include:\n\
- Likely Diagnosis\n\
- Key clinical clues\n\
- Diagnostic steps\n\
- Management steps\n\
- High-yield teaching point\n\
- 2 Anki-style cloze flashcards\n\
Respond in markdown."
            ),
            Self::VignetteBreakdown => format!(
                "{USMLE_TUTOR} A student presents this case:\n\
{topic}\n\
Provide:\n\
- Key Buzzwords\n\
- Diagnosis\n\
- Pathophysiology\n\
- Next Step in Management (USMLE-style)\n\
- High-Yield Pearl\n\
- Anki-style Flashcards in cloze {CLOZE} format\n\
Respond in markdown."
            ),
            Self::QuickDifferential => format!(
                "Topic: {topic}\n\
Generate:\n\
- 5 most likely differential diagnoses\n\
- Key distinguishing clinical features for each\n\
- One-liner USMLE-style diagnosis clues\n\
- Mnemonic if applicable\n\
Respond in markdown."
            ),
            Self::AnkiGenerator => format!(
                "Topic: {topic}\n\
Create 5 Anki-style cards in the following format:\n\
- Question:\n\
- Answer:\n\
- Explanation:\n\
- Tag: [e.g., Path, Immuno, Nephro]\n\
Use concise language suitable for Step 1/2 review."
            ),
            Self::AskAnything => format!(
                "The user asks: {topic}\n\
Please provide a thoughtful, helpful answer. Use markdown formatting if needed."
            ),
        }
    }
}

impl fmt::Display for TutorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════
// System prompts
// ═══════════════════════════════════════════════════════════

pub const MEDICAL_TUTOR_SYSTEM: &str = "You are a helpful medical tutor.";

const STEP1_ITEM_WRITER: &str = "You are an NBME item writer for the USMLE Step 1 exam.";

const STEP2_ITEM_WRITER: &str = "You are an NBME item writer for the USMLE Step 2 CK exam.";

const USMLE_TUTOR: &str = "You are a USMLE tutor.";

/// Anki cloze deletion markup.
const CLOZE: &str = "{{c1::...}}";

// ═══════════════════════════════════════════════════════════
// Topic validation
// ═══════════════════════════════════════════════════════════

/// Reject blank topics and, when a cap is configured, over-long ones.
///
/// Whitespace only matters for the blank check; the topic itself is
/// rendered untouched.
pub fn validate_topic(topic: &str, max_chars: Option<usize>) -> Result<(), TemplateError> {
    if topic.trim().is_empty() {
        return Err(TemplateError::EmptyTopic);
    }
    if let Some(max) = max_chars {
        let actual = topic.chars().count();
        if actual > max {
            return Err(TemplateError::TopicTooLong { max, actual });
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
