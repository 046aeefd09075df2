//! Flattening of nested sigcap records into fixed-width CSV rows.
//!
//! Array-valued sections (LTE cells, NR cells, unconnected Wi-Fi APs)
//! have no fixed arity, so export runs in two passes: a preprocess pass
//! folds every record into [`ColumnMaxima`], which then fixes the
//! header width, and the process pass emits one row per record padded
//! to that width. Missing values render as `NaN` (numeric columns) or
//! `N/A` (text columns); absence is never an error here.

use serde_json::Value;

use crate::band::{earfcn_to_band, earfcn_to_freq, nrarfcn_to_band, nrarfcn_to_freq, REGION_GLOBAL};
use crate::record::{is_primary, network_type, operator_name};
use crate::wifi::freq_code;

/// Android reports this for signal fields it could not measure.
const SIGNAL_UNAVAILABLE: f64 = 2147483647.0;

const WIFI_CLASSES: [&str; 3] = ["2.4", "5", "6"];

// ──────────────────────────────────────────────
// Column maxima
// ──────────────────────────────────────────────

/// Maximum observed counts of the variable-arity record sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMaxima {
    pub lte: usize,
    pub nr: usize,
    pub wifi_24: usize,
    pub wifi_5: usize,
    pub wifi_6: usize,
}

impl ColumnMaxima {
    /// Fold one record into the maxima.
    pub fn observe(&mut self, record: &Value) {
        self.lte = self.lte.max(array_field(record, "cell_info").len());
        self.nr = self.nr.max(array_field(record, "nr_info").len());

        let mut counts = [0usize; 3];
        for ap in unconnected_aps(record) {
            match class_index(ap) {
                Some(i) => counts[i] += 1,
                None => continue,
            }
        }
        self.wifi_24 = self.wifi_24.max(counts[0]);
        self.wifi_5 = self.wifi_5.max(counts[1]);
        self.wifi_6 = self.wifi_6.max(counts[2]);
    }

    /// Clamp the maxima to user-requested caps. A single Wi-Fi cap
    /// applies to every band class.
    pub fn clamp(&mut self, max_lte: Option<usize>, max_nr: Option<usize>, max_wifi: Option<usize>) {
        if let Some(cap) = max_lte {
            self.lte = self.lte.min(cap);
        }
        if let Some(cap) = max_nr {
            self.nr = self.nr.min(cap);
        }
        if let Some(cap) = max_wifi {
            self.wifi_24 = self.wifi_24.min(cap);
            self.wifi_5 = self.wifi_5.min(cap);
            self.wifi_6 = self.wifi_6.min(cap);
        }
    }

    fn wifi_class_max(&self, class: &str) -> usize {
        match class {
            "2.4" => self.wifi_24,
            "5" => self.wifi_5,
            _ => self.wifi_6,
        }
    }

    /// Number of non-primary cell column groups: the primary (or first)
    /// cell has its own fixed columns.
    fn lte_others(&self) -> usize {
        self.lte.saturating_sub(1)
    }

    fn nr_others(&self) -> usize {
        self.nr.saturating_sub(1)
    }
}

// ──────────────────────────────────────────────
// Header
// ──────────────────────────────────────────────

const BASE_COLUMNS: [&str; 15] = [
    "sigcap_version",
    "android_version",
    "is_debug",
    "uuid",
    "device_name",
    "timestamp",
    "latitude",
    "longitude",
    "altitude",
    "hor_acc",
    "ver_acc",
    "operator",
    "network_type",
    "override_network_type",
    "radio_type",
];

const LTE_PRIMARY_COLUMNS: [&str; 12] = [
    "lte_primary_pci",
    "lte_primary_ci",
    "lte_primary_earfcn",
    "lte_primary_band",
    "lte_primary_freq_mhz",
    "lte_primary_width_mhz",
    "lte_primary_rsrp_dbm",
    "lte_primary_rsrq_db",
    "lte_primary_cqi",
    "lte_primary_rssi_dbm",
    "lte_primary_rssnr_db",
    "lte_primary_timing",
];

const LTE_OTHER_FIELDS: [&str; 7] = [
    "pci", "earfcn", "band", "freq_mhz", "rsrp_dbm", "rsrq_db", "rssi_dbm",
];

const NR_FIRST_COLUMNS: [&str; 12] = [
    "nr_first_is_primary",
    "nr_first_pci",
    "nr_first_nci",
    "nr_first_arfcn",
    "nr_first_band",
    "nr_first_freq_mhz",
    "nr_first_ss_rsrp_dbm",
    "nr_first_ss_rsrq_db",
    "nr_first_ss_sinr_db",
    "nr_first_csi_rsrp_dbm",
    "nr_first_csi_rsrq_db",
    "nr_first_csi_sinr_db",
];

const NR_OTHER_FIELDS: [&str; 6] = [
    "pci", "arfcn", "band", "freq_mhz", "ss_rsrp_dbm", "ss_rsrq_db",
];

const WIFI_CONNECTED_COLUMNS: [&str; 9] = [
    "wifi_connected_ssid",
    "wifi_connected_bssid",
    "wifi_connected_primary_freq_mhz",
    "wifi_connected_center_freq_mhz",
    "wifi_connected_bw_mhz",
    "wifi_connected_rssi_dbm",
    "wifi_connected_standard",
    "wifi_connected_tx_link_speed_mbps",
    "wifi_connected_rx_link_speed_mbps",
];

const WIFI_OTHER_FIELDS: [&str; 6] = [
    "ssid", "bssid", "primary_freq_mhz", "bw_mhz", "rssi_dbm", "standard",
];

/// Build the CSV header for the given maxima.
pub fn header(maxima: &ColumnMaxima) -> Vec<String> {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();

    columns.push("lte_count".to_string());
    columns.extend(LTE_PRIMARY_COLUMNS.iter().map(|c| c.to_string()));
    for i in 1..=maxima.lte_others() {
        for field in LTE_OTHER_FIELDS {
            columns.push(format!("lte_other{}_{}", i, field));
        }
    }

    columns.push("nr_count".to_string());
    columns.extend(NR_FIRST_COLUMNS.iter().map(|c| c.to_string()));
    for i in 1..=maxima.nr_others() {
        for field in NR_OTHER_FIELDS {
            columns.push(format!("nr_other{}_{}", i, field));
        }
    }

    columns.extend(WIFI_CONNECTED_COLUMNS.iter().map(|c| c.to_string()));
    for class in WIFI_CLASSES {
        columns.push(format!("wifi_{}_other_count", class));
        for i in 1..=maxima.wifi_class_max(class) {
            for field in WIFI_OTHER_FIELDS {
                columns.push(format!("wifi_{}_other{}_{}", class, i, field));
            }
        }
    }
    columns
}

// ──────────────────────────────────────────────
// Row flattening
// ──────────────────────────────────────────────

/// Flatten one record to a row matching `header(maxima)`.
pub fn flatten_record(record: &Value, maxima: &ColumnMaxima) -> Vec<String> {
    let mut row = Vec::new();

    row.push(text_cell(record.get("version")));
    row.push(text_cell(record.get("androidVersion")));
    row.push(text_cell(record.get("isDebug")));
    row.push(text_cell(record.get("uuid")));
    row.push(text_cell(record.get("deviceName")));
    row.push(text_cell(record.get("datetimeIso")));
    let location = record.get("location");
    for field in ["latitude", "longitude", "altitude", "hor_acc", "ver_acc"] {
        row.push(signal_cell(location.and_then(|l| l.get(field))));
    }
    row.push(operator_name(record));
    row.push(network_type(record));
    row.push(text_cell(record.get("overrideNetworkType")));
    row.push(text_cell(record.get("phoneType")));

    flatten_lte(record, maxima, &mut row);
    flatten_nr(record, maxima, &mut row);
    flatten_wifi(record, maxima, &mut row);
    row
}

fn flatten_lte(record: &Value, maxima: &ColumnMaxima, row: &mut Vec<String>) {
    let cells = array_field(record, "cell_info");
    row.push(cells.len().to_string());

    let primary = cells.iter().find(|c| is_primary(c));
    match primary {
        Some(cell) => {
            row.push(signal_cell(cell.get("pci")));
            row.push(signal_cell(cell.get("ci")));
            row.push(signal_cell(cell.get("earfcn")));
            let (band, freq) = lte_band_cells(cell);
            row.push(band);
            row.push(freq);
            row.push(width_mhz_cell(cell.get("width")));
            row.push(signal_cell(cell.get("rsrp")));
            row.push(signal_cell(cell.get("rsrq")));
            row.push(signal_cell(cell.get("cqi")));
            row.push(signal_cell(cell.get("rssi")));
            row.push(signal_cell(cell.get("rssnr")));
            row.push(signal_cell(cell.get("timing")));
        }
        None => pad(row, &["NaN", "NaN", "NaN", "N/A", "NaN", "NaN", "NaN", "NaN", "NaN", "NaN", "NaN", "NaN"]),
    }

    let mut others: Vec<&Value> = cells.iter().filter(|c| !is_primary(c)).collect();
    // Keep the strongest cells when the column cap truncates.
    others.sort_by(|a, b| sort_key(a, "rsrp").total_cmp(&sort_key(b, "rsrp")));
    others.truncate(maxima.lte_others());
    for cell in &others {
        row.push(signal_cell(cell.get("pci")));
        row.push(signal_cell(cell.get("earfcn")));
        let (band, freq) = lte_band_cells(cell);
        row.push(band);
        row.push(freq);
        row.push(signal_cell(cell.get("rsrp")));
        row.push(signal_cell(cell.get("rsrq")));
        row.push(signal_cell(cell.get("rssi")));
    }
    for _ in others.len()..maxima.lte_others() {
        pad(row, &["NaN", "NaN", "N/A", "NaN", "NaN", "NaN", "NaN"]);
    }
}

fn flatten_nr(record: &Value, maxima: &ColumnMaxima, row: &mut Vec<String>) {
    let cells = array_field(record, "nr_info");
    row.push(cells.len().to_string());

    // The serving cell when one is flagged, otherwise the first entry.
    let first = cells.iter().find(|c| is_primary(c)).or_else(|| cells.first());
    match first {
        Some(cell) => {
            row.push(is_primary(cell).to_string());
            row.push(signal_cell(cell.get("nrPci")));
            row.push(signal_cell(cell.get("nci")));
            row.push(signal_cell(cell.get("nrarfcn")));
            let (band, freq) = nr_band_cells(cell);
            row.push(band);
            row.push(freq);
            row.push(signal_cell(cell.get("ssRsrp")));
            row.push(signal_cell(cell.get("ssRsrq")));
            row.push(signal_cell(cell.get("ssSinr")));
            row.push(signal_cell(cell.get("csiRsrp")));
            row.push(signal_cell(cell.get("csiRsrq")));
            row.push(signal_cell(cell.get("csiSinr")));
        }
        None => pad(row, &["N/A", "NaN", "NaN", "NaN", "N/A", "NaN", "NaN", "NaN", "NaN", "NaN", "NaN", "NaN"]),
    }

    let mut others: Vec<&Value> = cells
        .iter()
        .filter(|c| !first.is_some_and(|f| std::ptr::eq(*c, f)))
        .collect();
    others.sort_by(|a, b| sort_key(a, "ssRsrp").total_cmp(&sort_key(b, "ssRsrp")));
    others.truncate(maxima.nr_others());
    for cell in &others {
        row.push(signal_cell(cell.get("nrPci")));
        row.push(signal_cell(cell.get("nrarfcn")));
        let (band, freq) = nr_band_cells(cell);
        row.push(band);
        row.push(freq);
        row.push(signal_cell(cell.get("ssRsrp")));
        row.push(signal_cell(cell.get("ssRsrq")));
    }
    for _ in others.len()..maxima.nr_others() {
        pad(row, &["NaN", "NaN", "N/A", "NaN", "NaN", "NaN"]);
    }
}

fn flatten_wifi(record: &Value, maxima: &ColumnMaxima, row: &mut Vec<String>) {
    let aps = array_field(record, "wifi_info");

    let connected = aps
        .iter()
        .find(|ap| ap.get("connected").and_then(Value::as_bool) == Some(true));
    match connected {
        Some(ap) => {
            row.push(text_cell(ap.get("ssid")));
            row.push(text_cell(ap.get("bssid")));
            row.push(signal_cell(ap.get("primaryFreq")));
            row.push(center_freq_cell(ap));
            row.push(width_cell(ap.get("width")));
            row.push(signal_cell(ap.get("rssi")));
            row.push(text_cell(ap.get("standard")));
            row.push(signal_cell(ap.get("txLinkSpeed")));
            row.push(signal_cell(ap.get("rxLinkSpeed")));
        }
        None => pad(row, &["N/A", "N/A", "NaN", "NaN", "NaN", "NaN", "N/A", "NaN", "NaN"]),
    }

    for (index, class) in WIFI_CLASSES.iter().enumerate() {
        let mut members: Vec<&Value> = unconnected_aps(record)
            .filter(|ap| class_index(ap) == Some(index))
            .collect();
        row.push(members.len().to_string());
        members.truncate(maxima.wifi_class_max(class));
        for ap in &members {
            row.push(text_cell(ap.get("ssid")));
            row.push(text_cell(ap.get("bssid")));
            row.push(signal_cell(ap.get("primaryFreq")));
            row.push(width_cell(ap.get("width")));
            row.push(signal_cell(ap.get("rssi")));
            row.push(text_cell(ap.get("standard")));
        }
        for _ in members.len()..maxima.wifi_class_max(class) {
            pad(row, &["N/A", "N/A", "NaN", "NaN", "NaN", "N/A"]);
        }
    }
}

// ──────────────────────────────────────────────
// Cell helpers
// ──────────────────────────────────────────────

fn array_field<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn unconnected_aps(record: &Value) -> impl Iterator<Item = &Value> {
    array_field(record, "wifi_info")
        .iter()
        .filter(|ap| ap.get("connected").and_then(Value::as_bool) != Some(true))
}

fn class_index(ap: &Value) -> Option<usize> {
    let freq = ap.get("primaryFreq").and_then(Value::as_u64)? as u32;
    WIFI_CLASSES.iter().position(|c| *c == freq_code(freq))
}

fn text_cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

fn signal_cell(value: Option<&Value>) -> String {
    match value.and_then(Value::as_f64) {
        Some(n) if n != SIGNAL_UNAVAILABLE => format_number(n),
        _ => "NaN".to_string(),
    }
}

/// Channel width reported in kHz, exported in MHz.
fn width_mhz_cell(value: Option<&Value>) -> String {
    match value.and_then(Value::as_f64) {
        Some(khz) if khz != SIGNAL_UNAVAILABLE => format_number(khz / 1000.0),
        _ => "NaN".to_string(),
    }
}

/// Wi-Fi width, already in MHz; zero means unreported.
fn width_cell(value: Option<&Value>) -> String {
    match value.and_then(Value::as_f64) {
        Some(mhz) if mhz > 0.0 => format_number(mhz),
        _ => "NaN".to_string(),
    }
}

fn center_freq_cell(ap: &Value) -> String {
    for key in ["centerFreq1", "centerFreq0", "primaryFreq"] {
        if let Some(freq) = ap.get(key).and_then(Value::as_f64) {
            if freq != 0.0 {
                return format_number(freq);
            }
        }
    }
    "NaN".to_string()
}

fn lte_band_cells(cell: &Value) -> (String, String) {
    match cell.get("earfcn").and_then(Value::as_u64) {
        Some(earfcn) => {
            let earfcn = earfcn as u32;
            (
                earfcn_to_band(earfcn).to_string(),
                format_number(earfcn_to_freq(earfcn)),
            )
        }
        None => ("N/A".to_string(), "NaN".to_string()),
    }
}

fn nr_band_cells(cell: &Value) -> (String, String) {
    match cell.get("nrarfcn").and_then(Value::as_u64) {
        Some(nrarfcn) => {
            let nrarfcn = nrarfcn as u32;
            let band = match nrarfcn_to_band(nrarfcn, REGION_GLOBAL) {
                Some(band) => format!("n{}", band),
                None => "N/A".to_string(),
            };
            (band, format_number(nrarfcn_to_freq(nrarfcn)))
        }
        None => ("N/A".to_string(), "NaN".to_string()),
    }
}

fn sort_key(cell: &Value, key: &str) -> f64 {
    cell.get(key).and_then(Value::as_f64).unwrap_or(f64::INFINITY)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn pad(row: &mut Vec<String>, cells: &[&str]) {
    row.extend(cells.iter().map(|c| c.to_string()));
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
