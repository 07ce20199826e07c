//! Binary property list decoding and macOS `ShadowHashData` extraction.

/// Apple `bplist00` decoding, value model, and XML fallback reading.
pub mod plist;
/// PBKDF2-SHA512 hash extraction from macOS account plists.
pub mod shadow;
