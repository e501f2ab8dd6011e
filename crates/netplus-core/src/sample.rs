//! Sample kinds, kind-tagged sample values and typed ring storage.
//!
//! Every signal stores exactly one [`SampleKind`]. Blocks that know the kind
//! of their ports use the typed [`SampleValue`] API; kind-agnostic blocks
//! (sinks, generic sources) go through the [`Sample`] enum.
//!
//! Storage is a tagged union of typed vectors ([`SampleStorage`]) so that
//! allocation and release always go through the same owned `Vec`.

use core::fmt;
use core::ops::Range;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Element type stored by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// One bit per sample, stored as a byte holding 0 or 1.
    Binary,
    /// Signed 32-bit integer samples.
    Integer,
    /// Double precision real samples.
    Real,
    /// Double precision complex samples (in-phase, quadrature).
    Complex,
}

impl SampleKind {
    /// Size in bytes of one sample on disk and in memory.
    pub const fn size_bytes(self) -> usize {
        match self {
            SampleKind::Binary => 1,
            SampleKind::Integer => 4,
            SampleKind::Real => 8,
            SampleKind::Complex => 16,
        }
    }

    /// All sample kinds, in declaration order.
    pub const ALL: [SampleKind; 4] = [
        SampleKind::Binary,
        SampleKind::Integer,
        SampleKind::Real,
        SampleKind::Complex,
    ];
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleKind::Binary => "binary",
            SampleKind::Integer => "integer",
            SampleKind::Real => "real",
            SampleKind::Complex => "complex",
        };
        f.write_str(name)
    }
}

/// A single sample tagged with its kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    /// A bit (0 or 1).
    Binary(u8),
    /// An integer sample.
    Integer(i32),
    /// A real sample.
    Real(f64),
    /// A complex sample.
    Complex(Complex64),
}

impl Sample {
    /// Returns the kind of this sample.
    pub fn kind(&self) -> SampleKind {
        match self {
            Sample::Binary(_) => SampleKind::Binary,
            Sample::Integer(_) => SampleKind::Integer,
            Sample::Real(_) => SampleKind::Real,
            Sample::Complex(_) => SampleKind::Complex,
        }
    }

    /// Appends the little-endian encoding of this sample to `out`.
    pub fn encode_le(&self, out: &mut Vec<u8>) {
        match self {
            Sample::Binary(v) => v.encode_le(out),
            Sample::Integer(v) => v.encode_le(out),
            Sample::Real(v) => v.encode_le(out),
            Sample::Complex(v) => v.encode_le(out),
        }
    }

    /// Decodes one sample of `kind` from exactly `kind.size_bytes()` bytes.
    ///
    /// Returns `None` if `bytes` has the wrong length.
    pub fn decode_le(kind: SampleKind, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != kind.size_bytes() {
            return None;
        }
        Some(match kind {
            SampleKind::Binary => Sample::Binary(u8::decode_le(bytes)),
            SampleKind::Integer => Sample::Integer(i32::decode_le(bytes)),
            SampleKind::Real => Sample::Real(f64::decode_le(bytes)),
            SampleKind::Complex => Sample::Complex(Complex64::decode_le(bytes)),
        })
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i32 {}
    impl Sealed for f64 {}
    impl Sealed for num_complex::Complex64 {}
}

/// A concrete Rust type that can be stored in a signal.
///
/// Implemented for `u8` (binary), `i32` (integer), `f64` (real) and
/// [`Complex64`] (complex). The trait is sealed.
pub trait SampleValue: Copy + private::Sealed {
    /// The kind tag matching this type.
    const KIND: SampleKind;

    /// Borrows the typed slice if `storage` holds this kind.
    fn slice(storage: &SampleStorage) -> Option<&[Self]>;

    /// Mutably borrows the typed slice if `storage` holds this kind.
    fn slice_mut(storage: &mut SampleStorage) -> Option<&mut [Self]>;

    /// Wraps the value into a [`Sample`].
    fn into_sample(self) -> Sample;

    /// Unwraps a [`Sample`] of the matching kind.
    fn from_sample(sample: Sample) -> Option<Self>;

    /// Appends the little-endian encoding to `out`.
    fn encode_le(&self, out: &mut Vec<u8>);

    /// Decodes from exactly `Self::KIND.size_bytes()` bytes.
    fn decode_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_sample {
    ($ty:ty, $variant:ident) => {
        impl SampleValue for $ty {
            const KIND: SampleKind = SampleKind::$variant;

            fn slice(storage: &SampleStorage) -> Option<&[Self]> {
                match storage {
                    SampleStorage::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(storage: &mut SampleStorage) -> Option<&mut [Self]> {
                match storage {
                    SampleStorage::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_sample(self) -> Sample {
                Sample::$variant(self)
            }

            fn from_sample(sample: Sample) -> Option<Self> {
                match sample {
                    Sample::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn encode_le(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn decode_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

impl_scalar_sample!(u8, Binary);
impl_scalar_sample!(i32, Integer);
impl_scalar_sample!(f64, Real);

impl SampleValue for Complex64 {
    const KIND: SampleKind = SampleKind::Complex;

    fn slice(storage: &SampleStorage) -> Option<&[Self]> {
        match storage {
            SampleStorage::Complex(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(storage: &mut SampleStorage) -> Option<&mut [Self]> {
        match storage {
            SampleStorage::Complex(v) => Some(v),
            _ => None,
        }
    }

    fn into_sample(self) -> Sample {
        Sample::Complex(self)
    }

    fn from_sample(sample: Sample) -> Option<Self> {
        match sample {
            Sample::Complex(v) => Some(v),
            _ => None,
        }
    }

    fn encode_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.re.to_le_bytes());
        out.extend_from_slice(&self.im.to_le_bytes());
    }

    fn decode_le(bytes: &[u8]) -> Self {
        let (re, im) = bytes.split_at(8);
        Complex64::new(f64::decode_le(re), f64::decode_le(im))
    }
}

/// Fixed-size typed storage backing one ring buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleStorage {
    /// Bit storage.
    Binary(Vec<u8>),
    /// Integer storage.
    Integer(Vec<i32>),
    /// Real storage.
    Real(Vec<f64>),
    /// Complex storage.
    Complex(Vec<Complex64>),
}

impl SampleStorage {
    /// Allocates zeroed storage of `len` samples of `kind`.
    pub fn new(kind: SampleKind, len: usize) -> Self {
        match kind {
            SampleKind::Binary => SampleStorage::Binary(vec![0; len]),
            SampleKind::Integer => SampleStorage::Integer(vec![0; len]),
            SampleKind::Real => SampleStorage::Real(vec![0.0; len]),
            SampleKind::Complex => SampleStorage::Complex(vec![Complex64::new(0.0, 0.0); len]),
        }
    }

    /// Returns the kind of the stored samples.
    pub fn kind(&self) -> SampleKind {
        match self {
            SampleStorage::Binary(_) => SampleKind::Binary,
            SampleStorage::Integer(_) => SampleKind::Integer,
            SampleStorage::Real(_) => SampleKind::Real,
            SampleStorage::Complex(_) => SampleKind::Complex,
        }
    }

    /// Returns the number of sample slots.
    pub fn len(&self) -> usize {
        match self {
            SampleStorage::Binary(v) => v.len(),
            SampleStorage::Integer(v) => v.len(),
            SampleStorage::Real(v) => v.len(),
            SampleStorage::Complex(v) => v.len(),
        }
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads slot `idx` as a tagged sample.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    pub fn get(&self, idx: usize) -> Sample {
        match self {
            SampleStorage::Binary(v) => Sample::Binary(v[idx]),
            SampleStorage::Integer(v) => Sample::Integer(v[idx]),
            SampleStorage::Real(v) => Sample::Real(v[idx]),
            SampleStorage::Complex(v) => Sample::Complex(v[idx]),
        }
    }

    /// Writes a tagged sample into slot `idx`.
    ///
    /// Returns false (and writes nothing) if the sample kind does not match.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    pub fn set(&mut self, idx: usize, sample: Sample) -> bool {
        match (self, sample) {
            (SampleStorage::Binary(v), Sample::Binary(s)) => v[idx] = s,
            (SampleStorage::Integer(v), Sample::Integer(s)) => v[idx] = s,
            (SampleStorage::Real(v), Sample::Real(s)) => v[idx] = s,
            (SampleStorage::Complex(v), Sample::Complex(s)) => v[idx] = s,
            _ => return false,
        }
        true
    }

    /// Appends the little-endian encoding of the slots in `range` to `out`.
    pub fn encode_range(&self, range: Range<usize>, out: &mut Vec<u8>) {
        out.reserve(range.len() * self.kind().size_bytes());
        match self {
            SampleStorage::Binary(v) => out.extend_from_slice(&v[range]),
            SampleStorage::Integer(v) => v[range].iter().for_each(|s| s.encode_le(out)),
            SampleStorage::Real(v) => v[range].iter().for_each(|s| s.encode_le(out)),
            SampleStorage::Complex(v) => v[range].iter().for_each(|s| s.encode_le(out)),
        }
    }
}
