// ATS evaluation prompt. The reply shape requested at the end is what
// `reply::parse_reply` reads back.

const ATS_INSTRUCTIONS: &str = "\
As an experienced Applicant Tracking System (ATS) analyst,
with profound knowledge in technology, software engineering, data science,
and big data engineering, your role involves evaluating resumes against job descriptions.
Recognizing the competitive job market, provide top-notch assistance for resume improvement.
Your goal is to analyze the resume against the given job description,
assign a percentage match based on key criteria, and pinpoint missing keywords accurately.";

const ATS_REPLY_FORMAT: &str = r#"I want the response in one single string having the structure
"Job Description Match":"%", "Missing Keywords":""
If the resume cannot be evaluated against the description, use "Job Description Match":"N/A"."#;

/// Fills the resume and job description into the ATS instruction block.
/// Inputs are inserted verbatim, in a single pass.
pub fn build_prompt(resume_text: &str, job_text: &str) -> String {
    format!(
        "\n{ATS_INSTRUCTIONS}\nresume:{resume_text}\ndescription:{job_text}\n{ATS_REPLY_FORMAT}\n"
    )
}
