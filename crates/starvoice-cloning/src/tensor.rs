//! Opaque numeric tensors produced by the voice-cloning model

use serde::{Deserialize, Serialize};

use crate::error::CloningError;

/// A dense f32 tensor with row-major data
///
/// The pipeline never interprets the values; it only moves them between the
/// model serving endpoint and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    /// Dimension sizes
    pub shape: Vec<usize>,
    /// Row-major element data
    pub data: Vec<f32>,
}

impl Tensor {
    /// Serialize to the storable byte form (MessagePack)
    pub fn to_bytes(&self) -> Result<Vec<u8>, CloningError> {
        rmp_serde::to_vec_named(self).map_err(|e| CloningError::Serialization(e.to_string()))
    }

    /// Deserialize from the storable byte form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CloningError> {
        rmp_serde::from_slice(bytes).map_err(|e| CloningError::Serialization(e.to_string()))
    }

    /// Total number of elements the shape describes
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip() {
        let tensor = Tensor {
            shape: vec![2, 3],
            data: vec![0.5, -1.25, 3.0, 0.0, 42.0, -0.001],
        };

        let bytes = tensor.to_bytes().unwrap();
        let restored = Tensor::from_bytes(&bytes).unwrap();

        assert_eq!(restored, tensor);
        assert_eq!(restored.element_count(), 6);
    }

    #[test]
    fn test_garbage_bytes_fail_deserialization() {
        assert!(matches!(
            Tensor::from_bytes(&[0xff, 0x00, 0x13]),
            Err(CloningError::Serialization(_))
        ));
    }
}
