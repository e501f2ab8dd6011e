//! Property-based tests for netplus-core signal buffers.
//!
//! Tests ring FIFO ordering, bounded storage, and the completeness of
//! incremental persistence under skip offsets and save caps, using proptest
//! for randomized put/get schedules.

use std::path::Path;

use netplus_core::{
    Continuity, HEADER_TERMINATOR, SampleBuffer, SampleValue, SignalHeader, SignalType,
};
use proptest::prelude::*;

fn real_buffer(capacity: usize) -> SampleBuffer {
    SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), capacity)
}

/// Splits a signal file into its decoded header and saved reals.
fn read_signal(path: &Path) -> (SignalHeader, Vec<f64>) {
    let bytes = std::fs::read(path).unwrap();
    let marker = HEADER_TERMINATOR.as_bytes();
    let end = bytes
        .windows(marker.len())
        .position(|w| w == marker)
        .unwrap();
    let header = SignalHeader::decode(std::str::from_utf8(&bytes[..end]).unwrap()).unwrap();
    let data = bytes[end + marker.len()..]
        .chunks(8)
        .map(f64::decode_le)
        .collect();
    (header, data)
}

/// Streams `total` values through `buf`, writing in bursts of `burst` and
/// reading everything available after each burst. Returns what was read.
fn stream(buf: &mut SampleBuffer, total: usize, burst: usize) -> Vec<f64> {
    let mut next = 0usize;
    let mut read = Vec::with_capacity(total);
    while next < total {
        let n = burst.min(buf.available_to_write()).min(total - next);
        for _ in 0..n {
            buf.put(next as f64).unwrap();
            next += 1;
        }
        while buf.available_to_read() > 0 {
            read.push(buf.get::<f64>().unwrap());
        }
    }
    read
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any interleaving of puts and gets that respects capacity reads back
    /// exactly what was written, in order.
    #[test]
    fn ring_is_fifo(
        capacity in 1usize..16,
        ops in prop::collection::vec(any::<bool>(), 1..400),
    ) {
        let mut buf = real_buffer(capacity);
        let mut next_put = 0u64;
        let mut next_get = 0u64;
        for put in ops {
            if put && buf.available_to_write() > 0 {
                buf.put(next_put as f64).unwrap();
                next_put += 1;
            } else if !put && buf.available_to_read() > 0 {
                prop_assert_eq!(buf.get::<f64>().unwrap(), next_get as f64);
                next_get += 1;
            }
            prop_assert_eq!(buf.available_to_read() as u64, next_put - next_get);
            prop_assert_eq!(buf.available_to_read() + buf.available_to_write(), capacity);
            prop_assert_eq!(buf.capacity(), capacity);
        }
    }

    /// Saved data is the produced stream minus the skipped prefix, truncated
    /// at the cap, with no gaps or duplicates. Reads are unaffected.
    #[test]
    fn persistence_is_complete(
        capacity in 1usize..12,
        total in 0usize..200,
        burst in 1usize..12,
        skip in 0u64..40,
        cap in prop::option::of(0u64..150),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real_buffer(capacity).with_file_name("S0.sgn").with_save_offset(skip);
        buf.set_max_samples_to_save(cap);
        buf.open_file(&path).unwrap();

        let read = stream(&mut buf, total, burst);
        buf.close().unwrap();

        let expected_read: Vec<f64> = (0..total).map(|i| i as f64).collect();
        prop_assert_eq!(read, expected_read);

        let mut expected: Vec<f64> = (0..total).skip(skip as usize).map(|i| i as f64).collect();
        if let Some(cap) = cap {
            expected.truncate(cap as usize);
        }
        let (header, saved) = read_signal(&path);
        prop_assert_eq!(header.first_saved_sample, skip);
        prop_assert_eq!(buf.samples_saved(), expected.len() as u64);
        prop_assert_eq!(saved, expected);
    }
}

#[test]
fn whole_rings_are_saved_before_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("S0.sgn");
    let mut buf = real_buffer(4).with_file_name("S0.sgn");
    buf.open_file(&path).unwrap();

    stream(&mut buf, 12, 4);
    assert_eq!(buf.samples_saved(), 12);
    buf.close().unwrap();

    let (header, saved) = read_signal(&path);
    assert_eq!(header.signal_type, "TimeDiscreteAmplitudeContinuousReal");
    assert_eq!(header.sample_size, 8);
    assert_eq!(saved, (0..12).map(f64::from).collect::<Vec<_>>());
}
