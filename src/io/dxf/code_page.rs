//! `$DWGCODEPAGE` names to `encoding_rs` encodings.
//!
//! Only files before AC1021 declare a meaningful code page; newer files are
//! UTF-8 and the reader never asks.

use ahash::AHashMap;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;

/// Code page numbers as written after `ANSI_` or `DOS`
static CODE_PAGES: Lazy<AHashMap<u16, &'static Encoding>> = Lazy::new(|| {
    let mut map = AHashMap::new();
    map.insert(874, encoding_rs::WINDOWS_874);
    map.insert(932, encoding_rs::SHIFT_JIS);
    map.insert(936, encoding_rs::GBK);
    map.insert(949, encoding_rs::EUC_KR);
    map.insert(950, encoding_rs::BIG5);
    map.insert(1250, encoding_rs::WINDOWS_1250);
    map.insert(1251, encoding_rs::WINDOWS_1251);
    map.insert(1252, encoding_rs::WINDOWS_1252);
    map.insert(1253, encoding_rs::WINDOWS_1253);
    map.insert(1254, encoding_rs::WINDOWS_1254);
    map.insert(1255, encoding_rs::WINDOWS_1255);
    map.insert(1256, encoding_rs::WINDOWS_1256);
    map.insert(1257, encoding_rs::WINDOWS_1257);
    map.insert(1258, encoding_rs::WINDOWS_1258);
    // DOS pages map to the nearest Windows page of the same script
    map.insert(437, encoding_rs::WINDOWS_1252);
    map.insert(850, encoding_rs::WINDOWS_1252);
    map.insert(852, encoding_rs::WINDOWS_1250);
    map.insert(855, encoding_rs::IBM866);
    map.insert(857, encoding_rs::WINDOWS_1254);
    map.insert(860, encoding_rs::WINDOWS_1252);
    map.insert(861, encoding_rs::WINDOWS_1252);
    map.insert(863, encoding_rs::WINDOWS_1252);
    map.insert(865, encoding_rs::WINDOWS_1252);
    map.insert(866, encoding_rs::IBM866);
    map.insert(869, encoding_rs::WINDOWS_1253);
    map
});

/// Encoding of a `$DWGCODEPAGE` value such as `ANSI_1252` or `dos866`.
///
/// `None` means no transcoding: UTF-8 and plain ASCII. Names which are
/// neither a known code page nor a WHATWG encoding label fall back to
/// Windows-1252.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase();
    if matches!(name.as_str(), "ascii" | "utf-8" | "utf8" | "unicode") {
        return None;
    }
    let number = name
        .strip_prefix("ansi_")
        .or_else(|| name.strip_prefix("dos"))
        .or_else(|| name.strip_prefix("cp"))
        .and_then(|n| n.parse::<u16>().ok());
    if let Some(encoding) = number.and_then(|n| CODE_PAGES.get(&n)) {
        return Some(*encoding);
    }
    let encoding = match name.as_str() {
        "korean" | "johab" => encoding_rs::EUC_KR,
        "iso8859-1" | "iso_8859-1" => encoding_rs::WINDOWS_1252,
        other => Encoding::for_label(other.replace('_', "-").as_bytes())
            .unwrap_or(encoding_rs::WINDOWS_1252),
    };
    (encoding != encoding_rs::UTF_8).then_some(encoding)
}
