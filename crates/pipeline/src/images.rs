//! ImageAllocator: exactly seven image references, one per slot.
//!
//! Source images fill slots in order. Slots still lacking a real image may be
//! generated one at a time, with a fixed delay between requests. Pool-fill
//! then reuses real images cyclically so no slot stays empty; the placeholder
//! appears only when no real image exists at all.

use newsdeck_core::{ImageProvider, ImageSlotAssignment, PLACEHOLDER_IMAGE, SLOT_COUNT, is_real_image};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A slot whose generation attempt failed. The slot is left to pool-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFailure {
    /// 0-based slot index
    pub slot: usize,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ImageAllocation {
    pub assignment: ImageSlotAssignment,
    /// Slots filled by generation
    pub generated: Vec<usize>,
    pub failures: Vec<SlotFailure>,
}

pub struct ImageAllocator {
    provider: Option<Arc<dyn ImageProvider>>,
    delay: Duration,
    timeout: Duration,
}

impl ImageAllocator {
    pub fn new(provider: Option<Arc<dyn ImageProvider>>, delay: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            delay,
            timeout,
        }
    }

    /// Source images and pool-fill only.
    pub fn without_generation() -> Self {
        Self::new(None, Duration::ZERO, Duration::from_secs(60))
    }

    /// Assign images to all seven slots.
    ///
    /// `candidates` are the article's images in order; `prompts` are the
    /// per-slot generation prompts.
    pub async fn allocate(&self, candidates: &[String], prompts: &[String; SLOT_COUNT]) -> ImageAllocation {
        let mut slots: [String; SLOT_COUNT] =
            std::array::from_fn(|i| candidates.get(i).cloned().unwrap_or_default());

        let needed: Vec<usize> = (0..SLOT_COUNT).filter(|&i| !is_real_image(&slots[i])).collect();
        let mut generated = Vec::new();
        let mut failures = Vec::new();

        match &self.provider {
            Some(provider) if !needed.is_empty() => {
                info!(
                    provider = %provider.name(),
                    needed = needed.len(),
                    "Generating images for empty slots"
                );
                for (n, &slot) in needed.iter().enumerate() {
                    if n > 0 {
                        tokio::time::sleep(self.delay).await;
                    }
                    match self.generate_one(provider.as_ref(), &prompts[slot]).await {
                        Ok(url) => {
                            slots[slot] = url;
                            generated.push(slot);
                        }
                        Err(error) => {
                            warn!(slot = slot + 1, error = %error, "Image generation failed, leaving slot to pool-fill");
                            slots[slot].clear();
                            failures.push(SlotFailure { slot, error });
                        }
                    }
                }
            }
            Some(_) => {}
            None if !needed.is_empty() => {
                info!(needed = needed.len(), "Image generation unavailable, using pool-fill only");
            }
            None => {}
        }

        let assignment = pool_fill(slots);
        ImageAllocation {
            assignment,
            generated,
            failures,
        }
    }

    async fn generate_one(&self, provider: &dyn ImageProvider, prompt: &str) -> Result<String, String> {
        match tokio::time::timeout(self.timeout, provider.generate(prompt)).await {
            Ok(Ok(url)) if is_real_image(&url) => Ok(url.trim().to_string()),
            Ok(Ok(_)) => Err("provider returned no usable image URL".into()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {}s", self.timeout.as_secs())),
        }
    }
}

/// Fill every slot lacking a real image from the pool of real images, cycling
/// by slot index. An empty pool yields the placeholder everywhere, including
/// over inline `data:` candidates.
pub fn pool_fill(slots: [String; SLOT_COUNT]) -> ImageSlotAssignment {
    let pool: Vec<String> = slots.iter().filter(|s| is_real_image(s)).cloned().collect();

    let filled = std::array::from_fn(|i| {
        if is_real_image(&slots[i]) {
            slots[i].clone()
        } else if pool.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            pool[i % pool.len()].clone()
        }
    });
    ImageSlotAssignment::from_slots(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsdeck_core::ProviderError;
    use std::sync::Mutex;

    /// Returns a URL per call, or fails on the listed call numbers.
    struct ScriptedImages {
        calls: Mutex<Vec<String>>,
        fail_on: Vec<usize>,
    }

    impl ScriptedImages {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageProvider for ScriptedImages {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(prompt.to_string());
                calls.len()
            };
            if self.fail_on.contains(&n) {
                Err(ProviderError::Network("connection reset".into()))
            } else {
                Ok(format!("https://gen.example/{n}.png"))
            }
        }
    }

    struct HangingImages;

    #[async_trait]
    impl ImageProvider for HangingImages {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("https://never.example/x.png".into())
        }
    }

    fn prompts() -> [String; SLOT_COUNT] {
        std::array::from_fn(|i| format!("prompt {}", i + 1))
    }

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://src.example/{i}.jpg")).collect()
    }

    fn assert_complete(assignment: &ImageSlotAssignment) {
        assert_eq!(assignment.len(), 7);
        assert!(assignment.iter().all(|s| !s.trim().is_empty()));
    }

    #[tokio::test]
    async fn no_images_no_credential_all_placeholder() {
        let out = ImageAllocator::without_generation().allocate(&[], &prompts()).await;
        assert_complete(&out.assignment);
        assert!(out.assignment.iter().all(|s| s == PLACEHOLDER_IMAGE));
        assert_eq!(out.assignment.placeholder_count(), 7);
    }

    #[tokio::test]
    async fn pool_fill_cycles_by_index() {
        let out = ImageAllocator::without_generation()
            .allocate(&urls(3), &prompts())
            .await;
        let slots: Vec<&str> = out.assignment.iter().collect();
        assert_eq!(slots[0], "https://src.example/1.jpg");
        assert_eq!(slots[2], "https://src.example/3.jpg");
        // slot 3 -> pool[3 % 3], slot 5 -> pool[5 % 3]
        assert_eq!(slots[3], "https://src.example/1.jpg");
        assert_eq!(slots[5], "https://src.example/3.jpg");
        assert_eq!(out.assignment.placeholder_count(), 0);
    }

    #[tokio::test]
    async fn inline_data_counts_as_empty() {
        let candidates = vec!["data:image/png;base64,AAAA".to_string(), "https://src.example/a.jpg".into()];
        let out = ImageAllocator::without_generation()
            .allocate(&candidates, &prompts())
            .await;
        assert!(out.assignment.iter().all(|s| s == "https://src.example/a.jpg"));
    }

    #[test]
    fn lone_inline_data_becomes_placeholder() {
        let mut slots: [String; SLOT_COUNT] = Default::default();
        slots[0] = "data:image/png;base64,AAAA".into();
        let assignment = pool_fill(slots);
        assert!(assignment.iter().all(|s| s == PLACEHOLDER_IMAGE));
        assert_eq!(assignment.placeholder_count(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_is_sequential_with_delay() {
        let provider = Arc::new(ScriptedImages::new(vec![]));
        let allocator = ImageAllocator::new(
            Some(provider.clone()),
            Duration::from_millis(800),
            Duration::from_secs(60),
        );

        let start = tokio::time::Instant::now();
        let out = allocator.allocate(&urls(4), &prompts()).await;

        assert_eq!(provider.call_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(1600));
        assert_eq!(out.generated, vec![4, 5, 6]);
        assert_eq!(out.assignment.get(0), "https://src.example/1.jpg");
        assert_eq!(out.assignment.get(4), "https://gen.example/1.png");
        let seen = provider.calls.lock().unwrap().clone();
        assert_eq!(seen, vec!["prompt 5", "prompt 6", "prompt 7"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_slot_is_pool_filled_not_retried() {
        let provider = Arc::new(ScriptedImages::new(vec![2]));
        let allocator = ImageAllocator::new(Some(provider.clone()), Duration::from_millis(10), Duration::from_secs(60));

        let out = allocator.allocate(&urls(4), &prompts()).await;

        assert_eq!(provider.call_count(), 3);
        assert_eq!(out.generated, vec![4, 6]);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].slot, 5);
        // pool = [src1..src4, gen1, gen3]; slot 5 -> pool[5 % 6]
        assert_eq!(out.assignment.get(5), "https://gen.example/3.png");
        assert_complete(&out.assignment);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_provider_times_out_per_slot() {
        let allocator = ImageAllocator::new(
            Some(Arc::new(HangingImages)),
            Duration::from_millis(800),
            Duration::from_secs(5),
        );
        let out = allocator.allocate(&urls(6), &prompts()).await;
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.assignment.get(6), "https://src.example/1.jpg");
    }

    #[tokio::test]
    async fn cover_source_image_never_replaced() {
        let provider = Arc::new(ScriptedImages::new(vec![]));
        let allocator = ImageAllocator::new(Some(provider.clone()), Duration::ZERO, Duration::from_secs(60));
        let out = allocator.allocate(&urls(1), &prompts()).await;
        assert_eq!(out.assignment.get(0), "https://src.example/1.jpg");
        assert_eq!(provider.call_count(), 6);
        assert_eq!(out.assignment.placeholder_count(), 0);
    }
}
