//! Query string codec
//!
//! Encodes and decodes structured query parameters using bracket notation:
//!
//! - `key=value` for scalars and booleans (`true`/`false`)
//! - `key[]=v1&key[]=v2` for arrays (never indexed `key[0]=`)
//! - `key[sub]=value` for nested mappings
//!
//! Decoding is the inverse for everything the encoder produces. Indexed
//! array notation from external sources (`key[0]=a&key[1]=b`) decodes to an
//! array, so re-encoding normalizes it to empty-bracket notation.

mod codec;
mod value;

pub use codec::{decode, encode, merge, normalize};
pub use value::{QueryMap, QueryValue};
