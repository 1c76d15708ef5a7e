//! Stock label encoder backed by an ordered class-label table.

use super::{InferenceError, LabelEncoder};

/// Bidirectional mapping between class indices and labels, fixed at
/// construction. Index `i` maps to the `i`-th label given to [`new`].
///
/// [`new`]: StaticLabelEncoder::new
pub struct StaticLabelEncoder {
    classes: Vec<String>,
}

impl StaticLabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of a label, if it is a known class. Exact-match.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

impl LabelEncoder for StaticLabelEncoder {
    fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<String>, InferenceError> {
        indices
            .iter()
            .map(|&index| {
                self.classes
                    .get(index)
                    .cloned()
                    .ok_or(InferenceError::UnknownClassIndex {
                        index,
                        known: self.classes.len(),
                    })
            })
            .collect()
    }
}
