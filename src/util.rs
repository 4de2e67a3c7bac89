//! Small shared helpers: hex rendering and selectivity ordering.

use std::fmt;

/// Writes a bracketed hex dump; `None` positions render as a wildcard.
///
/// Output shape: `[0x61, 0x62, .., 0x63]`.
pub fn write_hex<I>(f: &mut fmt::Formatter<'_>, syms: I) -> fmt::Result
where
    I: IntoIterator<Item = Option<u8>>,
{
    f.write_str("[")?;
    let mut first = true;
    for sym in syms {
        if !first {
            f.write_str(", ")?;
        }
        first = false;
        match sym {
            Some(b) => write!(f, "0x{:02x}", b)?,
            None => f.write_str("..")?,
        }
    }
    f.write_str("]")
}

/// Renders raw bytes in the same bracketed hex form.
pub fn hex_bytes(bytes: &[u8]) -> String {
    struct Hex<'a>(&'a [u8]);
    impl fmt::Display for Hex<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_hex(f, self.0.iter().map(|&b| Some(b)))
        }
    }
    Hex(bytes).to_string()
}

/// Compares two documents by selectivity (`size / required`), ascending.
///
/// Exact integer comparison via cross-multiplication: `a_size / a_req <
/// b_size / b_req` iff `a_size * b_req < b_size * a_req`. More selective
/// documents (small ratio) sort first so candidate builds fail fast.
pub fn selectivity_cmp(
    a_size: u64,
    a_required: u32,
    b_size: u64,
    b_required: u32,
) -> std::cmp::Ordering {
    let lhs = u128::from(a_size) * u128::from(b_required);
    let rhs = u128::from(b_size) * u128::from(a_required);
    lhs.cmp(&rhs)
}
