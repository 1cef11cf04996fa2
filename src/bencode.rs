//! Bencode encoding and decoding ([BEP-3]).
//!
//! Every file this crate touches is bencoded: `.torrent` metainfo, Deluge's
//! aggregate `torrents.fastresume`, rTorrent's session sidecars and the
//! fastresume records produced for the target client.
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ```
//! use qbmigrate::bencode::{decode, encode, DictBuilder, Value};
//!
//! let value = decode(b"d3:cow3:moo4:spami7ee").unwrap();
//! assert_eq!(value.get(b"cow").and_then(Value::as_str), Some("moo"));
//! assert_eq!(value.int(b"spam"), Some(7));
//!
//! // Keys are always written in sorted order, whatever the insertion order.
//! let dict = DictBuilder::new()
//!     .int("zeta", 1)
//!     .str("alpha", "a")
//!     .build();
//! assert_eq!(encode(&dict).unwrap(), b"d5:alpha1:a4:zetai1ee");
//! ```
//!
//! # Error Handling
//!
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::InvalidInteger`] - Malformed integer (e.g., leading zeros)
//! - [`BencodeError::UnexpectedChar`] - Unexpected character in input
//! - [`BencodeError::NonStringKey`] - Dictionary key that is not a byte string
//! - [`BencodeError::UnsortedKey`] - Dictionary keys out of order or repeated
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded (max 64 levels)
//! - [`BencodeError::TrailingData`] - Extra data after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::decode;
pub use encode::{encode, encode_to};
pub use error::BencodeError;
pub use value::{DictBuilder, Value};
