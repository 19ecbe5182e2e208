//! Bone weight spans

/// Bone index marking an unused influence slot
pub const NO_BONE: u8 = 0xFF;

/// Total weight of a fully bound vertex
pub const FULL_WEIGHT: u16 = 0xFF;

/// One bone's contribution to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoneInfluence {
    /// Bone index
    pub bone: u8,
    /// Weight in 1/255 units
    pub weight: u8,
}

/// Bone influences shared by a run of consecutive vertices.
///
/// The run covers `start..end`; a vertex has at most four influences whose
/// weights sum to no more than [`FULL_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VertexWeight {
    /// First vertex of the run
    pub start: usize,
    /// One past the last vertex of the run
    pub end: usize,
    /// Influences, strongest slot first as stored
    pub influences: Vec<BoneInfluence>,
}

impl VertexWeight {
    /// Whether `vertex` falls inside the run
    pub fn contains(&self, vertex: usize) -> bool {
        (self.start..self.end).contains(&vertex)
    }

    /// Weight of the first influence, zero when there is none
    pub fn primary_weight(&self) -> u8 {
        self.influences.first().map_or(0, |i| i.weight)
    }

    /// Sum of all influence weights
    pub fn total_weight(&self) -> u16 {
        self.influences.iter().map(|i| u16::from(i.weight)).sum()
    }

    /// Same influences moved to cover `start..end`
    pub fn with_span(&self, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            influences: self.influences.clone(),
        }
    }
}

/// Find the span covering `vertex`
pub fn find_weight(weights: &[VertexWeight], vertex: usize) -> Option<&VertexWeight> {
    weights.iter().find(|w| w.contains(vertex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_lookup() {
        let weights = [
            VertexWeight {
                start: 0,
                end: 3,
                influences: vec![BoneInfluence { bone: 1, weight: 0xFF }],
            },
            VertexWeight {
                start: 3,
                end: 4,
                influences: vec![
                    BoneInfluence { bone: 2, weight: 0x80 },
                    BoneInfluence { bone: 5, weight: 0x7F },
                ],
            },
        ];

        assert_eq!(find_weight(&weights, 2).map(|w| w.start), Some(0));
        assert_eq!(find_weight(&weights, 3).map(|w| w.total_weight()), Some(0xFF));
        assert!(find_weight(&weights, 4).is_none());
        assert_eq!(weights[1].with_span(9, 10).influences, weights[1].influences);
    }
}
