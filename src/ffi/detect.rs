//! FFI functions for peak detection.

use super::types::{AccpStatus, CDetectConfig, CPeakArray};
use crate::config::DetectConfig;
use crate::data::{rolling_mean, InputSeries};
use crate::runtime::Detector;

/// Default detection options.
#[no_mangle]
pub extern "C" fn accp_config_default() -> CDetectConfig {
    CDetectConfig::default()
}

/// Detect peaks in one series.
///
/// `marked_events` may be null, in which case every sample is eligible.
/// On success `out_peaks` owns a new array that must be released with
/// `accp_peaks_free`. On failure `out_peaks` is set to an empty array.
///
/// # Safety
/// `timestamps`, `values` and (if non-null) `marked_events` must point to
/// `len` elements. `config` may be null for defaults.
#[no_mangle]
pub unsafe extern "C" fn accp_detect_peaks(
    timestamps: *const f64,
    values: *const f64,
    marked_events: *const f64,
    len: usize,
    config: *const CDetectConfig,
    out_peaks: *mut CPeakArray,
) -> AccpStatus {
    if timestamps.is_null() || values.is_null() || out_peaks.is_null() {
        return AccpStatus::NullPointer;
    }
    *out_peaks = CPeakArray::empty();

    let t = std::slice::from_raw_parts(timestamps, len).to_vec();
    let v = std::slice::from_raw_parts(values, len).to_vec();

    let series = if marked_events.is_null() {
        InputSeries::new("ffi", t, v)
    } else {
        let m = std::slice::from_raw_parts(marked_events, len).to_vec();
        InputSeries::with_marked_events("ffi", t, v, m)
    };
    let series = match series {
        Ok(s) => s,
        Err(err) => return AccpStatus::from(&err),
    };

    let cfg = if config.is_null() {
        DetectConfig::default()
    } else {
        DetectConfig::from(&*config)
    };

    let result = Detector::new(&cfg).and_then(|detector| detector.detect(&series));
    match result {
        Ok(table) => {
            *out_peaks = CPeakArray::from_table(&table);
            AccpStatus::Ok
        }
        Err(err) => AccpStatus::from(&err),
    }
}

/// Free a peak array.
///
/// # Safety
/// Peaks must have been filled by `accp_detect_peaks` or be zeroed.
#[no_mangle]
pub unsafe extern "C" fn accp_peaks_free(peaks: *mut CPeakArray) {
    if peaks.is_null() {
        return;
    }

    let arr = &*peaks;
    if !arr.data.is_null() && arr.capacity > 0 {
        let _ = Vec::from_raw_parts(arr.data, arr.len, arr.capacity);
    }

    (*peaks).data = std::ptr::null_mut();
    (*peaks).len = 0;
    (*peaks).capacity = 0;
}

/// Centered rolling mean with partial windows at the edges.
///
/// # Safety
/// `data` must have `len` elements, `out` must have room for `out_len >= len`.
#[no_mangle]
pub unsafe extern "C" fn accp_rolling_mean(
    data: *const f64,
    len: usize,
    window: usize,
    out: *mut f64,
    out_len: usize,
) -> AccpStatus {
    if data.is_null() || out.is_null() {
        return AccpStatus::NullPointer;
    }
    if window == 0 || out_len < len {
        return AccpStatus::InvalidArgument;
    }

    let slice = std::slice::from_raw_parts(data, len);
    let result = rolling_mean(slice, window);
    for (i, v) in result.iter().enumerate() {
        *out.add(i) = *v;
    }
    AccpStatus::Ok
}
