use constant_time_eq::constant_time_eq;

/// Compare two byte slices in constant time. Length mismatch returns false
/// immediately; lengths are not secret here.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    constant_time_eq(a, b)
}
