//! # newsdeck Core
//!
//! Domain types, traits, and error definitions for the newsdeck pipeline,
//! which turns one news article into a fixed-topology card deck.
//! This crate has **zero framework dependencies**: it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! External generation services are defined as traits here. Implementations
//! live in `newsdeck-providers`; the pipeline only ever sees the traits, so
//! tests can swap in scripted providers.

pub mod article;
pub mod content;
pub mod deck;
pub mod error;
pub mod fact;
pub mod image;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use article::{ArticleRecord, GenerationOptions, LengthMode, SpeechStyle};
pub use content::{NormalizedCardContent, ProsCons, RawFact, RawGenerationResult, RawKeyFact, RawProsCons};
pub use deck::{BeforeAfterChart, CardDeck, CardRecord, CardType, DeckBadge, DeckSize};
pub use error::ProviderError;
pub use fact::{FactEntry, KeyFactContent};
pub use image::{ImageSlotAssignment, PLACEHOLDER_IMAGE, SLOT_COUNT, is_real_image};
pub use provider::{ImageProvider, TextProvider, TextRequest, TextResponse};
