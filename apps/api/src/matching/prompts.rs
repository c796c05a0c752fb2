// Prompt construction for candidate rationale generation.

use crate::matching::ranker::display_score;

/// System prompt for rationale generation: plain prose, no lists.
pub const SUMMARY_SYSTEM: &str = "You are an experienced technical recruiter. \
    Write plain prose only. \
    Do NOT use bullet points, headings, or markdown. \
    Do NOT invent experience that is not in the resume.";

/// Rationale prompt. Inputs are inserted verbatim in a single pass, so text
/// that looks like a placeholder is never expanded.
pub fn build_summary_prompt(job_description: &str, resume_text: &str, score: f64) -> String {
    format!(
        "Job Description:\n{job_description}\n\n\
         Candidate Resume:\n{resume_text}\n\n\
         Similarity Score: {}\n\n\
         Given the above, write a concise 3-4 sentence summary explaining why this candidate could be a great fit for the role. \
         Use the similarity score to help clarify and distinguish the candidate's fit: \
         be confident when the score is high and hedge honestly when it is low.",
        display_score(score)
    )
}
