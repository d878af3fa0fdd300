// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hashed identifiers used by compiled prototypes.

use serde::{Deserialize, Serialize};
use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Words that cannot be used verbatim as endpoint names
const RESERVED_WORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// 32-bit hash of a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier(pub u32);

impl Identifier {
    /// X position of a blend space vertex
    pub const X: Identifier = Identifier::from_name("X");
    /// Y position of a blend space vertex
    pub const Y: Identifier = Identifier::from_name("Y");
    /// Blend space lerp time along X
    pub const LERP_SECONDS_PER_UNIT_X: Identifier = Identifier::from_name("LerpSecondsPerUnitX");
    /// Blend space lerp time along Y
    pub const LERP_SECONDS_PER_UNIT_Y: Identifier = Identifier::from_name("LerpSecondsPerUnitY");

    /// Hash a name (FNV-1a)
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Turn an arbitrary display name into a valid identifier
pub fn make_safe_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .filter_map(|c| match c {
            ' ' | ',' | '.' | '/' | ';' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Name of a pin or node as it appears in compiled endpoints
pub fn endpoint_name(name: &str) -> String {
    make_safe_identifier(&name.replace(' ', ""))
}
