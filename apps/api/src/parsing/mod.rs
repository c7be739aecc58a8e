// Resume parsing: PDF text extraction, Gemini prompt, response normalization.
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
