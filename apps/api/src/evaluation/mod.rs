// Resume evaluation: prompt construction, model reply parsing and the
// request pipeline that ties extraction, keyword analysis and the model together.
// All model calls go through llm_client::TextGenerator.

pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod reply;
