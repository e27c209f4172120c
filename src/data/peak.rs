//! Peak records and the result table.

/// One detected peak.
#[derive(Clone, Debug, PartialEq)]
pub struct PeakRecord {
    /// Time of the peak sample.
    pub timestamp: f64,

    /// 1-based position in the original series.
    pub index: usize,

    /// Original, unadjusted value at the peak.
    pub peak_amplitude: f64,

    /// Seconds since the previous reported peak (`None` for the first).
    pub peak_period: Option<f64>,

    /// Marked-event value at the peak.
    pub marked_event: f64,
}

/// C-compatible peak record for FFI.
///
/// `peak_period` is NaN for the first record.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CPeakRecord {
    pub timestamp: f64,
    pub index: usize,
    pub peak_amplitude: f64,
    pub peak_period: f64,
    pub marked_event: f64,
}

impl From<&PeakRecord> for CPeakRecord {
    fn from(p: &PeakRecord) -> Self {
        CPeakRecord {
            timestamp: p.timestamp,
            index: p.index,
            peak_amplitude: p.peak_amplitude,
            peak_period: p.peak_period.unwrap_or(f64::NAN),
            marked_event: p.marked_event,
        }
    }
}

/// Ordered table of detected peaks, ascending by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeakTable {
    records: Vec<PeakRecord>,
}

impl PeakTable {
    pub(crate) fn new(records: Vec<PeakRecord>) -> Self {
        Self { records }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[PeakRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeakRecord> {
        self.records.iter()
    }

    /// 1-based indices of all rows.
    pub fn indices(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.index).collect()
    }

    /// Inter-peak periods, skipping the first row.
    pub fn periods(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.peak_period).collect()
    }

    /// Mean inter-peak period in seconds, if at least two peaks exist.
    pub fn mean_period(&self) -> Option<f64> {
        let periods = self.periods();
        if periods.is_empty() {
            None
        } else {
            Some(periods.iter().sum::<f64>() / periods.len() as f64)
        }
    }
}

impl<'a> IntoIterator for &'a PeakTable {
    type Item = &'a PeakRecord;
    type IntoIter = std::slice::Iter<'a, PeakRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
