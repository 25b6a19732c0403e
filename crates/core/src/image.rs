//! The seven image slots of the canonical deck.

use serde::{Deserialize, Serialize};

/// Number of image slots in the canonical deck.
pub const SLOT_COUNT: usize = 7;

/// Neutral gradient shown only when no real image exists anywhere.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%221080%22%20height%3D%221350%22%3E%3Cdefs%3E%3ClinearGradient%20id%3D%22g%22%20x1%3D%220%25%22%20y1%3D%220%25%22%20x2%3D%22100%25%22%20y2%3D%22100%25%22%3E%3Cstop%20offset%3D%220%25%22%20style%3D%22stop-color%3A%23e2e8f0%22%2F%3E%3Cstop%20offset%3D%22100%25%22%20style%3D%22stop-color%3A%23cbd5e1%22%2F%3E%3C%2FlinearGradient%3E%3C%2Fdefs%3E%3Crect%20width%3D%22100%25%22%20height%3D%22100%25%22%20fill%3D%22url(%23g)%22%2F%3E%3C%2Fsvg%3E";

/// A fetchable image: non-blank and not inline `data:`.
pub fn is_real_image(reference: &str) -> bool {
    let reference = reference.trim();
    !reference.is_empty() && !reference.starts_with("data:")
}

/// Exactly seven non-empty image references, one per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSlotAssignment([String; SLOT_COUNT]);

impl ImageSlotAssignment {
    /// Only the allocator builds assignments; it guarantees no slot is blank.
    pub fn from_slots(slots: [String; SLOT_COUNT]) -> Self {
        Self(slots)
    }

    /// Image for a 0-based slot index.
    pub fn get(&self, index: usize) -> &str {
        &self.0[index % SLOT_COUNT]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn placeholder_count(&self) -> usize {
        self.0.iter().filter(|s| s.as_str() == PLACEHOLDER_IMAGE).count()
    }

    pub fn len(&self) -> usize {
        SLOT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_image_detection() {
        assert!(is_real_image("https://img.example.com/a.jpg"));
        assert!(!is_real_image("   "));
        assert!(!is_real_image(PLACEHOLDER_IMAGE));
        assert!(!is_real_image("data:image/png;base64,AAAA"));
    }

    #[test]
    fn assignment_serializes_as_array() {
        let slots = std::array::from_fn(|i| format!("https://x/{i}.jpg"));
        let assignment = ImageSlotAssignment::from_slots(slots);
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json.as_array().unwrap().len(), SLOT_COUNT);
        assert_eq!(assignment.get(8), "https://x/1.jpg");
        assert_eq!(assignment.placeholder_count(), 0);
    }
}
