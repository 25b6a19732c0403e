//! # newsdeck Pipeline
//!
//! Turns one article into a render-ready card deck:
//!
//! ```text
//! ArticleRecord
//!   → ContentGenerationOrchestrator   (providers, then extractive fallback;
//!                                      tag keywords, then title tokens)
//!   → FieldNormalizer                 (per-field contracts)
//!   → FactExtractionChain             (AI facts, then pattern extraction)
//!   → ImageAllocator                  (source images, generation, pool-fill)
//!   → DeckAssembler                   (7-card base, 5/9-card variants)
//! ```
//!
//! Nothing here fails: every step has a fallback, and [`DeckPipeline::run`]
//! always returns a complete [`DeckOutput`].

pub mod assembler;
pub mod category;
pub mod contract;
pub mod facts;
pub mod headline;
pub mod images;
pub mod keywords;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod quote;
pub mod suffix;
mod text;

pub use assembler::{DeckAssembler, DeckInputs, parse_before_after};
pub use category::{detect_category, extract_badge};
pub use contract::{CONTRACTS, FieldContract, FieldContracts, SentenceFinal};
pub use facts::{FactExtractionChain, FactSource};
pub use headline::process_headline;
pub use images::{ImageAllocation, ImageAllocator, SlotFailure};
pub use keywords::{fallback_keywords, parse_keywords};
pub use normalize::FieldNormalizer;
pub use orchestrator::{
    AttemptFailure, ContentGenerationOrchestrator, ExtractiveFallback, GenerationOutcome,
    GenerationSource, KeywordOutcome, parse_generation,
};
pub use pipeline::{DeckOutput, DeckPipeline, GenerationReport};
pub use quote::process_quote;
