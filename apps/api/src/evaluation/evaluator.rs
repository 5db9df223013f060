//! Evaluation pipeline: validate → extract → analyze → ask the model → parse → present.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::missing_keywords;
use crate::errors::AppError;
use crate::evaluation::prompts::build_prompt;
use crate::evaluation::reply::{parse_reply, MatchScore, ModelReply};
use crate::extraction::ExtractorRegistry;
use crate::llm_client::TextGenerator;

/// Scores at or above this percentage are a good match.
pub const GOOD_MATCH_THRESHOLD: f64 = 70.0;

const GOOD_MATCH_HEADLINE: &str = "This resume matches the job description!";
const POOR_MATCH_HEADLINE: &str = "This resume does not match the job description.";
const NO_MATCH_HEADLINE: &str = "Sorry, your skills do not match the requirements";

const NO_TIPS: &[&str] = &[];

const POOR_MATCH_TIPS: &[&str] = &[
    "Incorporate the missing keywords from the job description into your resume.",
    "Tailor your resume to better highlight your skills and experience relevant to the job.",
];

const NO_MATCH_TIPS: &[&str] = &[
    "Incorporate the missing keywords from the job description into your resume.",
    "Tailor your resume to highlight relevant skills, experience, and accomplishments.",
    "Ensure your resume is clear, concise, and well-organized.",
    "Review and proofread your resume to eliminate any errors.",
];

/// One uploaded resume file, alive only for the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub file_name: Option<String>,
    pub media_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationRequest {
    pub job_description: String,
    pub resumes: Vec<UploadedResume>,
}

impl EvaluationRequest {
    /// Enforces exactly one resume and a non-blank job description.
    /// Returns the lower-cased job description and the single resume.
    pub fn validate(self) -> Result<(String, UploadedResume), AppError> {
        let mut resumes = self.resumes;
        if resumes.is_empty() {
            return Err(AppError::Validation("Please upload your resume".to_string()));
        }
        if resumes.len() > 1 {
            return Err(AppError::Validation(
                "Please upload only one file at a time.".to_string(),
            ));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide the Job Description".to_string(),
            ));
        }
        let resume = resumes.remove(0);
        Ok((self.job_description.to_lowercase(), resume))
    }
}

/// Pipeline stages, recorded on log events as `stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingInput,
    Extracting,
    Analyzing,
    AwaitingModelResponse,
    Parsed,
    Presenting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitingInput => "awaiting_input",
            Stage::Extracting => "extracting",
            Stage::Analyzing => "analyzing",
            Stage::AwaitingModelResponse => "awaiting_model_response",
            Stage::Parsed => "parsed",
            Stage::Presenting => "presenting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    GoodMatch,
    PoorMatch,
    /// The model answered with the `N/A` sentinel.
    NoMatch,
}

/// Feedback for one evaluated resume.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub headline: String,
    pub match_percentage: Option<f64>,
    /// `match_percentage / 100`, for progress bars.
    pub progress: Option<f64>,
    /// The model's reply verbatim. Only shown for numeric scores.
    pub raw_response: Option<String>,
    pub model_missing_keywords: Vec<String>,
    /// Local gap analysis: job-description words absent from the resume.
    pub missing_keywords: Vec<String>,
    pub tips: Vec<String>,
}

impl Evaluation {
    fn present(evaluation_id: Uuid, reply: ModelReply, missing_keywords: Vec<String>) -> Self {
        let (verdict, match_percentage) = match reply.score {
            MatchScore::NotApplicable => (Verdict::NoMatch, None),
            MatchScore::Percent(p) if p >= GOOD_MATCH_THRESHOLD => (Verdict::GoodMatch, Some(p)),
            MatchScore::Percent(p) => (Verdict::PoorMatch, Some(p)),
        };

        let (headline, tips) = match verdict {
            Verdict::GoodMatch => (GOOD_MATCH_HEADLINE, NO_TIPS),
            Verdict::PoorMatch => (POOR_MATCH_HEADLINE, POOR_MATCH_TIPS),
            Verdict::NoMatch => (NO_MATCH_HEADLINE, NO_MATCH_TIPS),
        };

        Evaluation {
            evaluation_id,
            evaluated_at: Utc::now(),
            verdict,
            headline: headline.to_string(),
            match_percentage,
            progress: match_percentage.map(|p| p / 100.0),
            raw_response: match_percentage.map(|_| reply.raw),
            model_missing_keywords: reply.missing_keywords,
            missing_keywords,
            tips: tips.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Runs one evaluation end to end. Every failure after validation is fatal
/// for the request; nothing is retried.
pub async fn evaluate(
    request: EvaluationRequest,
    extractors: &ExtractorRegistry,
    generator: &dyn TextGenerator,
) -> Result<Evaluation, AppError> {
    let evaluation_id = Uuid::new_v4();
    run(evaluation_id, request, extractors, generator)
        .instrument(info_span!("evaluation", %evaluation_id))
        .await
}

async fn run(
    evaluation_id: Uuid,
    request: EvaluationRequest,
    extractors: &ExtractorRegistry,
    generator: &dyn TextGenerator,
) -> Result<Evaluation, AppError> {
    let (job_text, resume) = request.validate().inspect_err(|e| {
        info!(stage = %Stage::AwaitingInput, "Rejected evaluation request: {e}");
    })?;

    info!(
        stage = %Stage::Extracting,
        media_type = %resume.media_type,
        file_name = resume.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = resume.bytes.len(),
        "Extracting resume text"
    );
    let resume_text = extractors.extract(&resume.bytes, &resume.media_type)?;

    info!(stage = %Stage::Analyzing, chars = resume_text.len(), "Analyzing resume");
    let local_missing = missing_keywords(&job_text, &resume_text);
    let prompt = build_prompt(&resume_text, &job_text);

    info!(stage = %Stage::AwaitingModelResponse, "Requesting ATS evaluation");
    let response_text = generator.generate(&prompt).await?;

    let reply = parse_reply(&response_text).inspect_err(|e| {
        warn!(stage = %Stage::Parsed, outcome = "parse_error", "Unusable model reply: {e}");
    })?;
    let outcome = match reply.score {
        MatchScore::Percent(_) => "match_found",
        MatchScore::NotApplicable => "sentinel",
    };
    info!(stage = %Stage::Parsed, outcome, "Model reply parsed");

    let evaluation = Evaluation::present(evaluation_id, reply, local_missing);
    info!(
        stage = %Stage::Presenting,
        verdict = ?evaluation.verdict,
        match_percentage = ?evaluation.match_percentage,
        "Evaluation complete"
    );
    Ok(evaluation)
}
