//! Generation provider implementations for newsdeck.
//!
//! Text providers implement `newsdeck_core::TextProvider`; the image provider
//! implements `newsdeck_core::ImageProvider`. The router builds the
//! configured set from `AppConfig`.

pub mod gemini;
pub mod openai_compat;
pub mod openai_images;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use openai_images::OpenAiImageProvider;
pub use router::{ProviderSet, TextSlot, build_from_config};
