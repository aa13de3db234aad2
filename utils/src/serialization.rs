//! Serde support for [arkworks](http://arkworks.rs/) types.
//!
//! Field elements are encoded with their canonical compressed encoding
//! ([CanonicalSerialize]) and handed to serde as a byte string, so that
//! human-readable formats and binary formats see the same bytes.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde_with::Bytes;

/// Use [SerdeAs] with [serde_with] to (de)serialize types that implement
/// [CanonicalSerialize] and [CanonicalDeserialize], or containers of them.
///
/// ```ignore
/// #[serde_as]
/// #[derive(Serialize, Deserialize)]
/// struct Params<F: PrimeField> {
///     #[serde_as(as = "Vec<cipher_utils::serialization::SerdeAs>")]
///     constants: Vec<F>,
/// }
/// ```
pub struct SerdeAs;

impl<T> serde_with::SerializeAs<T> for SerdeAs
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(val: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut bytes = vec![];
        val.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;

        Bytes::serialize_as(&bytes, serializer)
    }
}

impl<'de, T> serde_with::DeserializeAs<'de, T> for SerdeAs
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        T::deserialize_compressed(&mut &bytes[..]).map_err(serde::de::Error::custom)
    }
}
