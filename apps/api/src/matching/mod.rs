// Resume matching: normalize → embed → rank → summarize → assemble.
// Summary generation goes through llm_client only.

pub mod assembler;
pub mod embedding;
pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
pub mod summary;

#[cfg(test)]
pub mod testing;
