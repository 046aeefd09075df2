//! Wi-Fi frequency classification.

/// Band class for a primary channel frequency in MHz.
pub fn freq_code(freq_mhz: u32) -> &'static str {
    match freq_mhz {
        2401..=2494 => "2.4",
        5150..=5924 => "5",
        5926..=7124 => "6",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_classes() {
        assert_eq!(freq_code(2412), "2.4");
        assert_eq!(freq_code(2494), "2.4");
        assert_eq!(freq_code(5180), "5");
        assert_eq!(freq_code(5924), "5");
        assert_eq!(freq_code(5955), "6");
        assert_eq!(freq_code(7124), "6");
    }

    #[test]
    fn out_of_range_is_unknown() {
        assert_eq!(freq_code(2400), "unknown");
        assert_eq!(freq_code(5925), "unknown");
        assert_eq!(freq_code(900), "unknown");
    }
}
