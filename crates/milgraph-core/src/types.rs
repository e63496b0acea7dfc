//! Core types for tensor shapes, element types, and constant payloads.

/// Element type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    F32,
    F64,
    I32,
    I64,
    U8,
    Bool,
}

/// Tensor shape, either fully known or not yet inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorShape {
    /// All dimensions are known.
    Static(Vec<usize>),

    /// Shape has not been inferred.
    Unknown,
}

impl TensorShape {
    /// Shape of a rank-0 scalar.
    pub fn scalar() -> Self {
        TensorShape::Static(Vec::new())
    }
}

/// Raw element storage of a constant payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    Bool(Vec<bool>),
}

impl TensorData {
    /// Get the number of elements in this tensor data.
    pub fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::F64(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I64(v) => v.len(),
            TensorData::U8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    /// Check if this tensor data is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the data type implied by the storage variant.
    pub fn dtype(&self) -> DataType {
        match self {
            TensorData::F32(_) => DataType::F32,
            TensorData::F64(_) => DataType::F64,
            TensorData::I32(_) => DataType::I32,
            TensorData::I64(_) => DataType::I64,
            TensorData::U8(_) => DataType::U8,
            TensorData::Bool(_) => DataType::Bool,
        }
    }

    /// Read element `index` widened to `f64`.
    ///
    /// Returns `None` for out-of-range indices and for boolean storage, which
    /// has no numeric interpretation.
    pub fn element_f64(&self, index: usize) -> Option<f64> {
        match self {
            TensorData::F32(v) => v.get(index).map(|&x| f64::from(x)),
            TensorData::F64(v) => v.get(index).copied(),
            TensorData::I32(v) => v.get(index).map(|&x| f64::from(x)),
            TensorData::I64(v) => v.get(index).map(|&x| x as f64),
            TensorData::U8(v) => v.get(index).map(|&x| f64::from(x)),
            TensorData::Bool(_) => None,
        }
    }
}

/// A tensor value known at compile time.
///
/// Bundles data, shape, and dtype. The payload of a constant `Var`.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorValue {
    /// The raw tensor data.
    pub data: TensorData,

    /// The shape of the tensor (dimensions).
    pub shape: Vec<usize>,

    /// The data type of the tensor.
    pub dtype: DataType,
}

impl TensorValue {
    /// Create a new TensorValue with data, shape, and dtype.
    ///
    /// # Panics
    ///
    /// Panics if the data length doesn't match the shape product, or the
    /// storage variant doesn't match `dtype`.
    pub fn new(data: TensorData, shape: Vec<usize>, dtype: DataType) -> Self {
        let expected_len: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_len,
            "Data length {} doesn't match shape {:?} (product = {})",
            data.len(),
            shape,
            expected_len
        );
        assert_eq!(
            data.dtype(),
            dtype,
            "Data type {:?} doesn't match declared dtype {:?}",
            data.dtype(),
            dtype
        );
        Self { data, shape, dtype }
    }

    /// Create a rank-0 TensorValue (shape = []).
    pub fn scalar(data: TensorData) -> Self {
        let dtype = data.dtype();
        Self::new(data, vec![], dtype)
    }

    /// Create a rank-1 TensorValue from a vector, inferring shape and dtype.
    pub fn from_vec(data: TensorData) -> Self {
        let dtype = data.dtype();
        let len = data.len();
        Self::new(data, vec![len], dtype)
    }

    /// Get the number of elements in this tensor value.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if this tensor value is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The static shape of this value.
    pub fn tensor_shape(&self) -> TensorShape {
        TensorShape::Static(self.shape.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "doesn't match shape")]
    fn test_tensor_value_new_validates_shape() {
        TensorValue::new(
            TensorData::F32(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            vec![2, 4],
            DataType::F32,
        );
    }

    #[test]
    #[should_panic(expected = "doesn't match declared dtype")]
    fn test_tensor_value_new_validates_dtype() {
        TensorValue::new(TensorData::I32(vec![1]), vec![1], DataType::F32);
    }

    #[test]
    fn test_element_f64_widening() {
        assert_eq!(TensorData::I64(vec![3]).element_f64(0), Some(3.0));
        assert_eq!(TensorData::U8(vec![7]).element_f64(0), Some(7.0));
        assert_eq!(TensorData::F32(vec![0.5]).element_f64(1), None);
        assert_eq!(TensorData::Bool(vec![true]).element_f64(0), None);
    }

    #[test]
    fn test_scalar_and_vec_constructors() {
        let s = TensorValue::scalar(TensorData::F64(vec![2.5]));
        assert!(s.shape.is_empty());
        assert_eq!(s.len(), 1);
        assert_eq!(s.dtype, DataType::F64);

        let v = TensorValue::from_vec(TensorData::I32(vec![1, 2, 3]));
        assert_eq!(v.shape, vec![3]);
        assert_eq!(v.tensor_shape(), TensorShape::Static(vec![3]));
    }
}
