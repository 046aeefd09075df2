//! Static EARFCN / NR-ARFCN band and frequency resolution tables.
//!
//! Derived from 3GPP TS 36.101 (LTE) and TS 38.104 (NR) channel raster
//! assignments. NR bands overlap, so resolution takes a region bitmask
//! and disambiguates toward the narrowest band consistent with it.

// ──────────────────────────────────────────────
// Regions
// ──────────────────────────────────────────────

pub const REGION_NAR: u16 = 1;
pub const REGION_EU: u16 = 2;
pub const REGION_EMEA: u16 = 6;
pub const REGION_JAPAN: u16 = 8;
pub const REGION_CHINA: u16 = 16;
pub const REGION_APAC: u16 = 56;
pub const REGION_NTN: u16 = 64;
pub const REGION_UNKNOWN: u16 = 128;
pub const REGION_GLOBAL: u16 = 255;

// ──────────────────────────────────────────────
// Tables
// ──────────────────────────────────────────────

/// (band, earfcn low, earfcn high, downlink base frequency in MHz)
static LTE_TABLE: &[(u16, u32, u32, f64)] = &[
    (1, 0, 599, 2110.0),
    (2, 600, 1199, 1930.0),
    (3, 1200, 1949, 1805.0),
    (4, 1950, 2399, 2110.0),
    (5, 2400, 2649, 869.0),
    (6, 2650, 2749, 875.0),
    (7, 2750, 3449, 2620.0),
    (8, 3450, 3799, 925.0),
    (9, 3800, 4149, 1844.9),
    (10, 4150, 4749, 2110.0),
    (11, 4750, 4949, 1475.9),
    (12, 5010, 5179, 729.0),
    (13, 5180, 5279, 746.0),
    (14, 5280, 5379, 758.0),
    (17, 5730, 5849, 734.0),
    (18, 5850, 5999, 860.0),
    (19, 6000, 6149, 875.0),
    (20, 6150, 6449, 791.0),
    (21, 6450, 6599, 1495.9),
    (22, 6600, 7399, 3510.0),
    (23, 7500, 7699, 2180.0),
    (24, 7700, 8039, 1525.0),
    (25, 8040, 8689, 1930.0),
    (26, 8690, 9039, 859.0),
    (27, 9040, 9209, 852.0),
    (28, 9210, 9659, 758.0),
    (29, 9660, 9769, 717.0),
    (30, 9770, 9869, 2350.0),
    (31, 9870, 9919, 462.5),
    (32, 9920, 10359, 1452.0),
    (33, 36000, 36199, 1900.0),
    (34, 36200, 36349, 2010.0),
    (35, 36350, 36949, 1850.0),
    (36, 36950, 37549, 1930.0),
    (37, 37550, 37749, 1910.0),
    (38, 37750, 38249, 2570.0),
    (39, 38250, 38649, 1880.0),
    (40, 38650, 39649, 2300.0),
    (41, 39650, 41589, 2496.0),
    (42, 41590, 43589, 3400.0),
    (43, 43590, 45589, 3600.0),
    (44, 45590, 46589, 703.0),
    (45, 46590, 46789, 1447.0),
    (46, 46790, 54539, 5150.0),
    (47, 54540, 55239, 5855.0),
    (48, 55240, 56739, 3550.0),
    (49, 56740, 58239, 3550.0),
    (50, 58240, 59089, 1432.0),
    (51, 59090, 59139, 1427.0),
    (52, 59140, 60139, 3300.0),
    (53, 60140, 60254, 2483.5),
    (65, 65536, 66435, 2110.0),
    (66, 66436, 67335, 2110.0),
    (67, 67336, 67535, 738.0),
    (68, 67536, 67835, 753.0),
    (69, 67836, 68335, 2570.0),
    (70, 68336, 68585, 1995.0),
    (71, 68586, 68935, 617.0),
    (72, 68936, 68985, 461.0),
    (73, 68986, 69035, 460.0),
    (74, 69036, 69465, 1475.0),
    (75, 69466, 70315, 1432.0),
    (76, 70316, 70365, 1427.0),
    (85, 70366, 70545, 728.0),
    (87, 70546, 70595, 420.0),
    (88, 70596, 70645, 422.0),
    (252, 255144, 256143, 5150.0),
    (255, 260894, 262143, 5725.0),
];

/// (band, nrarfcn low, nrarfcn high, region bitmask)
static NR_TABLE: &[(u16, u32, u32, u16)] = &[
    (1, 422000, 434000, REGION_GLOBAL),
    (2, 386000, 398000, REGION_NAR),
    (3, 361000, 376000, REGION_GLOBAL),
    (5, 173800, 178800, REGION_GLOBAL),
    (7, 524000, 538000, REGION_EMEA),
    (8, 185000, 192000, REGION_GLOBAL),
    (12, 145800, 149200, REGION_NAR),
    (13, 149200, 151200, REGION_NAR),
    (14, 151600, 153600, REGION_NAR),
    (18, 172000, 175000, REGION_JAPAN),
    (20, 158200, 164200, REGION_EMEA),
    (24, 305000, 311800, REGION_NAR),
    (25, 386000, 399000, REGION_NAR),
    (26, 171800, 178800, REGION_NAR),
    (28, 151600, 160600, REGION_APAC | REGION_EU),
    (29, 143400, 145600, REGION_NAR),
    (30, 470000, 472000, REGION_NAR),
    (31, 92500, 93500, REGION_GLOBAL),
    (34, 402000, 405000, REGION_EMEA),
    (38, 514000, 524000, REGION_EMEA),
    (39, 376000, 384000, REGION_CHINA),
    (40, 460000, 480000, REGION_APAC),
    (41, 499200, 537999, REGION_GLOBAL),
    (46, 743334, 795000, REGION_GLOBAL),
    (47, 790334, 795000, REGION_GLOBAL),
    (48, 636667, 646666, REGION_GLOBAL),
    (50, 286400, 303400, REGION_EU),
    (51, 285400, 286400, REGION_EU),
    (53, 496700, 499000, REGION_UNKNOWN),
    (54, 334000, 335000, REGION_UNKNOWN),
    (65, 422000, 440000, REGION_GLOBAL),
    (66, 422000, 440000, REGION_NAR),
    (67, 147600, 151600, REGION_EMEA),
    (70, 399000, 404000, REGION_NAR),
    (71, 123400, 130400, REGION_NAR),
    (72, 92200, 93200, REGION_EMEA),
    (74, 295000, 303600, REGION_EMEA),
    (75, 286400, 303400, REGION_EU),
    (76, 285400, 286400, REGION_EU),
    (77, 620000, 680000, REGION_UNKNOWN),
    (78, 620000, 653333, REGION_UNKNOWN),
    (79, 693334, 733333, REGION_UNKNOWN),
    (85, 145600, 149200, REGION_NAR),
    (90, 499200, 538000, REGION_GLOBAL),
    (91, 285400, 286400, REGION_NAR),
    (92, 286400, 303400, REGION_NAR),
    (93, 285400, 286400, REGION_NAR),
    (94, 286400, 303400, REGION_NAR),
    (96, 795000, 875000, REGION_NAR),
    (100, 183880, 185000, REGION_UNKNOWN),
    (101, 380000, 382000, REGION_UNKNOWN),
    (102, 795000, 828333, REGION_UNKNOWN),
    (104, 828334, 875000, REGION_UNKNOWN),
    (105, 122400, 130400, REGION_UNKNOWN),
    (106, 187000, 188000, REGION_UNKNOWN),
    (109, 286400, 303400, REGION_UNKNOWN),
    (254, 496700, 500000, REGION_NTN),
    (255, 305000, 311800, REGION_NTN),
    (256, 434000, 440000, REGION_NTN),
    (257, 2054166, 2104165, REGION_GLOBAL),
    (258, 2016667, 2070832, REGION_GLOBAL),
    (259, 2270833, 2337499, REGION_GLOBAL),
    (260, 2229166, 2279165, REGION_GLOBAL),
    (261, 2070833, 2084999, REGION_NAR),
    (262, 2399166, 2415832, REGION_NAR),
    (263, 2564083, 2794243, REGION_GLOBAL),
];

/// (base frequency MHz, step MHz per raster point, nrarfcn low, nrarfcn high)
static NR_FREQ_TABLE: &[(f64, f64, u32, u32)] = &[
    (0.0, 0.005, 0, 599999),
    (3000.0, 0.015, 600000, 2016666),
    (24250.08, 0.06, 2016667, 3279165),
];

// ──────────────────────────────────────────────
// Resolution
// ──────────────────────────────────────────────

/// LTE band number for an EARFCN, 0 when outside every assignment.
pub fn earfcn_to_band(earfcn: u32) -> u16 {
    for &(band, low, high, _) in LTE_TABLE {
        if low <= earfcn && earfcn <= high {
            return band;
        }
    }
    0
}

/// LTE downlink center frequency in MHz, 0.0 when outside every
/// assignment.
pub fn earfcn_to_freq(earfcn: u32) -> f64 {
    for &(_, low, high, base) in LTE_TABLE {
        if low <= earfcn && earfcn <= high {
            return base + 0.1 * (earfcn - low) as f64;
        }
    }
    0.0
}

/// NR band number for an NR-ARFCN under the given region.
///
/// Bands overlap heavily, so all assignments covering the raster point
/// and visible from `region` (or region-unknown) are candidates; the
/// narrowest assignment wins when it agrees with the region or is
/// global, otherwise it is discarded and selection repeats.
pub fn nrarfcn_to_band(nrarfcn: u32, region: u16) -> Option<u16> {
    let mut candidates: Vec<(u16, u16, u32)> = NR_TABLE
        .iter()
        .filter(|&&(_, low, high, reg)| {
            low <= nrarfcn && nrarfcn <= high && (region & reg != 0 || reg == REGION_UNKNOWN)
        })
        .map(|&(band, low, high, reg)| (band, reg, high - low))
        .collect();

    while candidates.len() > 1 {
        let narrowest = candidates
            .iter()
            .copied()
            .min_by_key(|&(_, _, width)| width)?;
        if narrowest.1 == REGION_GLOBAL || narrowest.1 == region {
            candidates = vec![narrowest];
        } else {
            candidates.retain(|&(band, _, _)| band != narrowest.0);
        }
    }
    candidates.first().map(|&(band, _, _)| band)
}

/// NR center frequency in MHz from the global frequency raster,
/// rounded to kHz. 0.0 when outside the raster.
pub fn nrarfcn_to_freq(nrarfcn: u32) -> f64 {
    for &(base, step, low, high) in NR_FREQ_TABLE {
        if low <= nrarfcn && nrarfcn <= high {
            let freq = base + step * (nrarfcn - low) as f64;
            return (freq * 1000.0).round() / 1000.0;
        }
    }
    0.0
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earfcn_band_edges() {
        assert_eq!(earfcn_to_band(0), 1);
        assert_eq!(earfcn_to_band(599), 1);
        assert_eq!(earfcn_to_band(600), 2);
        assert_eq!(earfcn_to_band(5110), 12);
        assert_eq!(earfcn_to_band(262143), 255);
    }

    #[test]
    fn earfcn_outside_all_bands() {
        assert_eq!(earfcn_to_band(5000), 0);
        assert_eq!(earfcn_to_freq(5000), 0.0);
        assert_eq!(earfcn_to_band(999999), 0);
    }

    #[test]
    fn earfcn_freq_interpolates_from_band_base() {
        assert_eq!(earfcn_to_freq(0), 2110.0);
        assert_eq!(earfcn_to_freq(300), 2110.0 + 0.1 * 300.0);
        assert_eq!(earfcn_to_freq(600), 1930.0);
    }

    #[test]
    fn nrarfcn_unique_band() {
        // 390000 falls in n2 and n25, both NAR; n2 is narrower.
        assert_eq!(nrarfcn_to_band(390000, REGION_NAR), Some(2));
        // 175000 is covered by n5/n26 (NAR view): n26 is wider.
        assert_eq!(nrarfcn_to_band(173900, REGION_GLOBAL), Some(5));
    }

    #[test]
    fn nrarfcn_prefers_region_match_over_width() {
        // 640000 sits in n48/n77/n78; n48 is narrowest and global.
        assert_eq!(nrarfcn_to_band(640000, REGION_NAR), Some(48));
        // 630000 sits in n77/n78 (unknown-region): the narrower n78
        // does not agree with NAR and is not global, so it is dropped
        // and n77 remains.
        assert_eq!(nrarfcn_to_band(630000, REGION_NAR), Some(77));
    }

    #[test]
    fn nrarfcn_outside_all_bands() {
        assert_eq!(nrarfcn_to_band(3_000_000, REGION_GLOBAL), None);
    }

    #[test]
    fn nrarfcn_freq_rasters() {
        assert_eq!(nrarfcn_to_freq(0), 0.0);
        assert_eq!(nrarfcn_to_freq(600000), 3000.0);
        assert_eq!(nrarfcn_to_freq(600002), 3000.03);
        assert_eq!(nrarfcn_to_freq(4_000_000), 0.0);
    }
}
