//! Streaming sample buffer with incremental persistence.
//!
//! A [`SampleBuffer`] is a fixed-capacity ring holding the samples of one
//! signal that have been produced but not yet consumed. Producers write with
//! [`put`](SampleBuffer::put) bounded by
//! [`available_to_write`](SampleBuffer::available_to_write); consumers read
//! with [`get`](SampleBuffer::get) bounded by
//! [`available_to_read`](SampleBuffer::available_to_read).
//!
//! # Occupancy
//!
//! Empty and full are decided from the explicit occupancy
//! `samples_written - samples_read`, never from cursor equality: when the
//! cursors coincide the ring is either empty or full and only the counters
//! can tell which.
//!
//! # Persistence
//!
//! When saving is enabled and a file is attached, every time the write cursor
//! wraps to 0 the ring that was just filled is appended to the file. The
//! first [`save offset`](SampleBuffer::set_save_offset) samples of the stream
//! are never written, and at most
//! [`max_samples_to_save`](SampleBuffer::set_max_samples_to_save) samples are.
//! Neither limit affects the live data flow. The partially filled ring left
//! at the end of a run is appended by [`flush_pending`](SampleBuffer::flush_pending).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::graph::SignalId;
use crate::persist::{SignalHeader, SignalWriter};
use crate::sample::{Sample, SampleKind, SampleStorage, SampleValue};
use crate::signal_type::SignalType;

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Ring capacity used when a signal is created without an explicit length.
pub const DEFAULT_BUFFER_LENGTH: usize = 512;

/// Default optical carrier wavelength (C band), metres.
pub const DEFAULT_CENTRAL_WAVELENGTH: f64 = 1550e-9;

/// Timing and carrier metadata of a signal.
///
/// The three periods are kept consistent: changing any one recomputes the
/// others, as do wavelength and frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalTiming {
    symbol_period: f64,
    sampling_period: f64,
    samples_per_symbol: f64,
    central_wavelength: f64,
    central_frequency: f64,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            symbol_period: 1.0,
            sampling_period: 1.0,
            samples_per_symbol: 1.0,
            central_wavelength: DEFAULT_CENTRAL_WAVELENGTH,
            central_frequency: SPEED_OF_LIGHT / DEFAULT_CENTRAL_WAVELENGTH,
        }
    }
}

impl SignalTiming {
    /// Symbol period in seconds.
    pub fn symbol_period(&self) -> f64 {
        self.symbol_period
    }

    /// Sampling period in seconds.
    pub fn sampling_period(&self) -> f64 {
        self.sampling_period
    }

    /// Samples per symbol (`symbol_period / sampling_period`).
    pub fn samples_per_symbol(&self) -> f64 {
        self.samples_per_symbol
    }

    /// Central wavelength in metres.
    pub fn central_wavelength(&self) -> f64 {
        self.central_wavelength
    }

    /// Central frequency in hertz.
    pub fn central_frequency(&self) -> f64 {
        self.central_frequency
    }

    /// Sets the symbol period and recomputes samples per symbol.
    pub fn set_symbol_period(&mut self, period: f64) {
        self.symbol_period = period;
        self.samples_per_symbol = self.symbol_period / self.sampling_period;
    }

    /// Sets the sampling period and recomputes samples per symbol.
    pub fn set_sampling_period(&mut self, period: f64) {
        self.sampling_period = period;
        self.samples_per_symbol = self.symbol_period / self.sampling_period;
    }

    /// Sets samples per symbol, keeping the sampling period and
    /// recomputing the symbol period.
    pub fn set_samples_per_symbol(&mut self, samples: f64) {
        self.samples_per_symbol = samples;
        self.symbol_period = self.samples_per_symbol * self.sampling_period;
    }

    /// Sets the central wavelength and recomputes the central frequency.
    pub fn set_central_wavelength(&mut self, wavelength: f64) {
        self.central_wavelength = wavelength;
        self.central_frequency = SPEED_OF_LIGHT / wavelength;
    }

    /// Sets the central frequency and recomputes the central wavelength.
    pub fn set_central_frequency(&mut self, frequency: f64) {
        self.central_frequency = frequency;
        self.central_wavelength = SPEED_OF_LIGHT / frequency;
    }
}

/// Fixed-capacity ring buffer carrying one signal between blocks.
///
/// # Example
///
/// ```rust
/// use netplus_core::{SampleBuffer, SignalType};
///
/// let mut bits = SampleBuffer::new(SignalType::binary(), 4);
/// bits.put(1u8).unwrap();
/// bits.put(0u8).unwrap();
/// assert_eq!(bits.available_to_read(), 2);
/// assert_eq!(bits.get::<u8>().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct SampleBuffer {
    id: SignalId,
    signal_type: SignalType,
    storage: SampleStorage,
    write_cursor: usize,
    read_cursor: usize,
    samples_written: u64,
    samples_read: u64,
    timing: SignalTiming,
    file_name: Option<String>,
    save: bool,
    save_offset: u64,
    skip_remaining: u64,
    max_samples_to_save: Option<u64>,
    samples_saved: u64,
    /// Position in the current ring up to which samples were saved or skipped.
    segment_handled: usize,
    writer: Option<SignalWriter>,
    path: Option<PathBuf>,
    scratch: Vec<u8>,
}

impl SampleBuffer {
    /// Creates an empty buffer of `capacity` samples of the given type.
    ///
    /// Saving is off until a file name is set.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(signal_type: SignalType, capacity: usize) -> Self {
        assert!(capacity > 0, "Signal buffer capacity must be > 0");
        Self {
            id: SignalId::sentinel(),
            signal_type,
            storage: SampleStorage::new(signal_type.sample_kind(), capacity),
            write_cursor: 0,
            read_cursor: 0,
            samples_written: 0,
            samples_read: 0,
            timing: SignalTiming::default(),
            file_name: None,
            save: false,
            save_offset: 0,
            skip_remaining: 0,
            max_samples_to_save: None,
            samples_saved: 0,
            segment_handled: 0,
            writer: None,
            path: None,
            scratch: Vec::new(),
        }
    }

    /// Creates a buffer with [`DEFAULT_BUFFER_LENGTH`] slots.
    pub fn with_default_capacity(signal_type: SignalType) -> Self {
        Self::new(signal_type, DEFAULT_BUFFER_LENGTH)
    }

    /// Sets the file name and enables saving.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.set_file_name(file_name);
        self
    }

    /// Skips the first `samples` samples of the stream when saving.
    pub fn with_save_offset(mut self, samples: u64) -> Self {
        self.set_save_offset(samples);
        self
    }

    /// Caps the number of saved samples.
    pub fn with_max_samples_to_save(mut self, max: u64) -> Self {
        self.set_max_samples_to_save(Some(max));
        self
    }

    /// Sets the symbol period (see [`SignalTiming::set_symbol_period`]).
    pub fn with_symbol_period(mut self, period: f64) -> Self {
        self.timing.set_symbol_period(period);
        self
    }

    /// Sets the sampling period (see [`SignalTiming::set_sampling_period`]).
    pub fn with_sampling_period(mut self, period: f64) -> Self {
        self.timing.set_sampling_period(period);
        self
    }

    pub(crate) fn set_id(&mut self, id: SignalId) {
        self.id = id;
    }

    /// Returns the handle of this signal in its bank.
    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Returns the signal type.
    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    /// Returns the kind of the stored samples.
    pub fn sample_kind(&self) -> SampleKind {
        self.signal_type.sample_kind()
    }

    /// Returns the ring capacity.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    // --- Ring state ---

    /// Number of samples written but not yet read.
    pub fn occupancy(&self) -> usize {
        (self.samples_written - self.samples_read) as usize
    }

    /// Number of samples ready to be read.
    pub fn available_to_read(&self) -> usize {
        self.occupancy()
    }

    /// Number of samples that can be written without overrunning unread data.
    pub fn available_to_write(&self) -> usize {
        self.capacity() - self.occupancy()
    }

    /// Returns true if no samples are waiting to be read.
    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }

    /// Returns true if every slot holds an unread sample.
    pub fn is_full(&self) -> bool {
        self.occupancy() == self.capacity()
    }

    /// Next slot to be written.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Next slot to be read.
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Total samples ever written.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Total samples ever read.
    pub fn samples_read(&self) -> u64 {
        self.samples_read
    }

    // --- Sample access ---

    /// Writes one sample.
    ///
    /// Fails with [`Error::Overrun`] when full, [`Error::SampleKindMismatch`]
    /// when `T` is not the stored kind, or [`Error::Persistence`] when the
    /// ring wraps and the completed ring cannot be appended to the file.
    pub fn put<T: SampleValue>(&mut self, value: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::Overrun { signal: self.id });
        }
        let found = self.sample_kind();
        let slots = T::slice_mut(&mut self.storage).ok_or(Error::SampleKindMismatch {
            signal: self.id,
            expected: T::KIND,
            found,
        })?;
        slots[self.write_cursor] = value;
        self.advance_write()
    }

    /// Writes one kind-tagged sample.
    pub fn put_sample(&mut self, sample: Sample) -> Result<()> {
        if self.is_full() {
            return Err(Error::Overrun { signal: self.id });
        }
        if !self.storage.set(self.write_cursor, sample) {
            return Err(Error::SampleKindMismatch {
                signal: self.id,
                expected: sample.kind(),
                found: self.sample_kind(),
            });
        }
        self.advance_write()
    }

    /// Reads one sample.
    ///
    /// Fails with [`Error::Underrun`] when empty or
    /// [`Error::SampleKindMismatch`] when `T` is not the stored kind.
    pub fn get<T: SampleValue>(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Underrun { signal: self.id });
        }
        let slots = T::slice(&self.storage).ok_or(Error::SampleKindMismatch {
            signal: self.id,
            expected: T::KIND,
            found: self.sample_kind(),
        })?;
        let value = slots[self.read_cursor];
        self.advance_read();
        Ok(value)
    }

    /// Reads one kind-tagged sample.
    pub fn get_sample(&mut self) -> Result<Sample> {
        if self.is_empty() {
            return Err(Error::Underrun { signal: self.id });
        }
        let value = self.storage.get(self.read_cursor);
        self.advance_read();
        Ok(value)
    }

    /// Reads every available sample as kind-tagged values.
    pub fn drain_samples(&mut self) -> Vec<Sample> {
        let mut out = Vec::with_capacity(self.occupancy());
        while let Ok(sample) = self.get_sample() {
            out.push(sample);
        }
        out
    }

    fn advance_write(&mut self) -> Result<()> {
        self.write_cursor += 1;
        self.samples_written += 1;
        if self.write_cursor == self.capacity() {
            self.write_cursor = 0;
            let start = self.segment_handled;
            self.segment_handled = 0;
            self.save_range(start, self.capacity())?;
        }
        Ok(())
    }

    fn advance_read(&mut self) {
        self.read_cursor += 1;
        if self.read_cursor == self.capacity() {
            self.read_cursor = 0;
        }
        self.samples_read += 1;
    }

    // --- Persistence ---

    /// Sets the file name and enables saving.
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = Some(file_name.into());
        self.save = true;
    }

    /// Returns the configured file name.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Enables or disables saving.
    ///
    /// A signal with saving enabled but no file name gets a default name
    /// when the system opens its files.
    pub fn set_save(&mut self, save: bool) {
        self.save = save;
    }

    /// Returns true if saving is enabled.
    pub fn is_saved(&self) -> bool {
        self.save
    }

    /// Number of leading samples of the stream that are never saved.
    ///
    /// Takes effect for samples not yet handed to the file; set it before
    /// the run starts.
    pub fn set_save_offset(&mut self, samples: u64) {
        self.save_offset = samples;
        self.skip_remaining = samples;
    }

    /// Returns the configured save offset.
    pub fn save_offset(&self) -> u64 {
        self.save_offset
    }

    /// Offset within the current ring of the next sample eligible for saving.
    ///
    /// Equals the capacity when the whole current ring will be skipped.
    pub fn pending_save_offset(&self) -> usize {
        let offset = self.segment_handled as u64 + self.skip_remaining;
        offset.min(self.capacity() as u64) as usize
    }

    /// Caps the total number of saved samples; `None` saves everything.
    pub fn set_max_samples_to_save(&mut self, max: Option<u64>) {
        self.max_samples_to_save = max;
    }

    /// Returns the save cap.
    pub fn max_samples_to_save(&self) -> Option<u64> {
        self.max_samples_to_save
    }

    /// Total samples appended to the file.
    pub fn samples_saved(&self) -> u64 {
        self.samples_saved
    }

    /// Builds the file header describing this signal.
    pub fn header(&self) -> SignalHeader {
        SignalHeader {
            signal_type: self.signal_type.label(),
            sample_kind: self.sample_kind(),
            sample_size: self.sample_kind().size_bytes(),
            symbol_period: self.timing.symbol_period(),
            sampling_period: self.timing.sampling_period(),
            samples_per_symbol: self.timing.samples_per_symbol(),
            central_wavelength: self.timing.central_wavelength(),
            central_frequency: self.timing.central_frequency(),
            first_saved_sample: self.save_offset,
        }
    }

    /// Creates the file at `path`, writes the header and starts saving.
    ///
    /// Samples already written before the file was opened are not saved.
    pub fn open_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let writer = SignalWriter::create(path, &self.header())?;
        self.path = Some(writer.path().to_path_buf());
        self.writer = Some(writer);
        self.segment_handled = self.write_cursor;
        Ok(())
    }

    /// Returns true while a file is attached.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Path of the file this signal was saved to, kept after closing.
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends the partially filled current ring to the file.
    ///
    /// Idempotent: samples are handed to the file at most once.
    pub fn flush_pending(&mut self) -> Result<()> {
        if self.write_cursor > self.segment_handled {
            let start = self.segment_handled;
            self.segment_handled = self.write_cursor;
            self.save_range(start, self.write_cursor)?;
        }
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Flushes the pending tail and closes the file.
    ///
    /// The file is closed even if the final flush fails.
    pub fn close(&mut self) -> Result<()> {
        let flushed = self.flush_pending();
        let finished = match self.writer.take() {
            Some(writer) => writer.finish(),
            None => Ok(()),
        };
        flushed.and(finished)
    }

    /// Hands ring slots `start..end` to the file, honouring skip and cap.
    fn save_range(&mut self, start: usize, end: usize) -> Result<()> {
        if !self.save || end <= start {
            return Ok(());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let skip = self.skip_remaining.min((end - start) as u64);
        self.skip_remaining -= skip;
        let from = start + skip as usize;
        let mut count = (end - from) as u64;
        if let Some(max) = self.max_samples_to_save {
            count = count.min(max.saturating_sub(self.samples_saved));
        }
        if count == 0 {
            return Ok(());
        }
        self.scratch.clear();
        self.storage
            .encode_range(from..from + count as usize, &mut self.scratch);
        writer.append(&self.scratch)?;
        self.samples_saved += count;
        Ok(())
    }

    // --- Timing ---

    /// Returns the timing metadata.
    pub fn timing(&self) -> SignalTiming {
        self.timing
    }

    /// Replaces the timing metadata.
    pub fn set_timing(&mut self, timing: SignalTiming) {
        self.timing = timing;
    }

    /// Symbol period in seconds.
    pub fn symbol_period(&self) -> f64 {
        self.timing.symbol_period()
    }

    /// Sampling period in seconds.
    pub fn sampling_period(&self) -> f64 {
        self.timing.sampling_period()
    }

    /// Samples per symbol.
    pub fn samples_per_symbol(&self) -> f64 {
        self.timing.samples_per_symbol()
    }

    /// Central wavelength in metres.
    pub fn central_wavelength(&self) -> f64 {
        self.timing.central_wavelength()
    }

    /// Central frequency in hertz.
    pub fn central_frequency(&self) -> f64 {
        self.timing.central_frequency()
    }

    /// See [`SignalTiming::set_symbol_period`].
    pub fn set_symbol_period(&mut self, period: f64) {
        self.timing.set_symbol_period(period);
    }

    /// See [`SignalTiming::set_sampling_period`].
    pub fn set_sampling_period(&mut self, period: f64) {
        self.timing.set_sampling_period(period);
    }

    /// See [`SignalTiming::set_samples_per_symbol`].
    pub fn set_samples_per_symbol(&mut self, samples: f64) {
        self.timing.set_samples_per_symbol(samples);
    }

    /// See [`SignalTiming::set_central_wavelength`].
    pub fn set_central_wavelength(&mut self, wavelength: f64) {
        self.timing.set_central_wavelength(wavelength);
    }

    /// See [`SignalTiming::set_central_frequency`].
    pub fn set_central_frequency(&mut self, frequency: f64) {
        self.timing.set_central_frequency(frequency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::HEADER_TERMINATOR;
    use crate::signal_type::Continuity;

    fn real(capacity: usize) -> SampleBuffer {
        SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), capacity)
    }

    /// Returns the raw sample bytes of a signal file.
    fn file_data(path: &Path) -> Vec<u8> {
        let bytes = std::fs::read(path).unwrap();
        let marker = HEADER_TERMINATOR.as_bytes();
        let end = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap();
        bytes[end + marker.len()..].to_vec()
    }

    fn reals(bytes: &[u8]) -> Vec<f64> {
        bytes.chunks(8).map(f64::decode_le).collect()
    }

    #[test]
    fn fifo_order_across_wrap() {
        let mut buf = real(3);
        for round in 0..5 {
            buf.put(round as f64).unwrap();
            buf.put(round as f64 + 0.5).unwrap();
            assert_eq!(buf.get::<f64>().unwrap(), round as f64);
            assert_eq!(buf.get::<f64>().unwrap(), round as f64 + 0.5);
        }
        assert!(buf.is_empty());
        assert_eq!(buf.samples_written(), 10);
    }

    #[test]
    fn full_and_empty_with_coinciding_cursors() {
        let mut buf = real(4);
        for i in 0..4 {
            buf.put(i as f64).unwrap();
        }
        assert_eq!(buf.write_cursor(), buf.read_cursor());
        assert!(buf.is_full());
        assert!(!buf.is_empty());
        assert_eq!(buf.available_to_write(), 0);

        for _ in 0..4 {
            buf.get::<f64>().unwrap();
        }
        assert_eq!(buf.write_cursor(), buf.read_cursor());
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.available_to_write(), 4);
    }

    #[test]
    fn underrun_and_overrun() {
        let mut buf = real(1);
        assert!(matches!(buf.get::<f64>(), Err(Error::Underrun { .. })));
        buf.put(1.0).unwrap();
        assert!(matches!(buf.put(2.0), Err(Error::Overrun { .. })));
        assert_eq!(buf.get::<f64>().unwrap(), 1.0);
    }

    #[test]
    fn kind_mismatch() {
        let mut buf = real(2);
        assert!(matches!(
            buf.put(1u8),
            Err(Error::SampleKindMismatch {
                expected: SampleKind::Binary,
                found: SampleKind::Real,
                ..
            })
        ));
        assert!(matches!(
            buf.put_sample(Sample::Integer(1)),
            Err(Error::SampleKindMismatch { .. })
        ));
        buf.put(1.0).unwrap();
        assert!(matches!(buf.get::<i32>(), Err(Error::SampleKindMismatch { .. })));
        assert_eq!(buf.available_to_read(), 1);
    }

    #[test]
    fn tagged_access_roundtrip() {
        let mut buf = SampleBuffer::new(SignalType::integer(), 2);
        buf.put_sample(Sample::Integer(-4)).unwrap();
        buf.put(7i32).unwrap();
        assert_eq!(buf.drain_samples(), vec![Sample::Integer(-4), Sample::Integer(7)]);
    }

    #[test]
    fn storage_never_grows() {
        let mut buf = real(8);
        for i in 0..10_000 {
            buf.put(i as f64).unwrap();
            buf.get::<f64>().unwrap();
        }
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.storage.len(), 8);
    }

    #[test]
    fn timing_setters_stay_consistent() {
        let mut buf = real(1);
        buf.set_sampling_period(0.25);
        buf.set_symbol_period(1.0);
        assert_eq!(buf.samples_per_symbol(), 4.0);

        buf.set_samples_per_symbol(8.0);
        assert_eq!(buf.sampling_period(), 0.25);
        assert_eq!(buf.symbol_period(), 2.0);

        buf.set_central_wavelength(1300e-9);
        assert!((buf.central_frequency() - SPEED_OF_LIGHT / 1300e-9).abs() < 1.0);
        buf.set_central_frequency(193.1e12);
        assert!((buf.central_wavelength() - SPEED_OF_LIGHT / 193.1e12).abs() < 1e-18);
    }

    #[test]
    fn default_carrier_is_c_band() {
        let buf = real(1);
        assert_eq!(buf.central_wavelength(), DEFAULT_CENTRAL_WAVELENGTH);
        assert_eq!(buf.central_frequency(), SPEED_OF_LIGHT / DEFAULT_CENTRAL_WAVELENGTH);
    }

    #[test]
    fn saves_each_completed_ring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(4).with_file_name("S0.sgn");
        buf.open_file(&path).unwrap();

        for i in 0..8 {
            buf.put(i as f64).unwrap();
            buf.get::<f64>().unwrap();
        }
        assert_eq!(buf.samples_saved(), 8);
        buf.close().unwrap();
        assert_eq!(reals(&file_data(&path)), (0..8).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn skip_offset_drops_leading_samples_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(4).with_file_name("S0.sgn").with_save_offset(3);
        buf.open_file(&path).unwrap();
        assert_eq!(buf.pending_save_offset(), 3);

        for i in 0..8 {
            buf.put(i as f64).unwrap();
            buf.get::<f64>().unwrap();
        }
        assert_eq!(buf.pending_save_offset(), 0);
        buf.close().unwrap();
        assert_eq!(reals(&file_data(&path)), vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn skip_offset_larger_than_ring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(2).with_file_name("S0.sgn").with_save_offset(5);
        buf.open_file(&path).unwrap();
        assert_eq!(buf.pending_save_offset(), 2);

        for i in 0..8 {
            buf.put(i as f64).unwrap();
            buf.get::<f64>().unwrap();
        }
        buf.close().unwrap();
        assert_eq!(reals(&file_data(&path)), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn cap_stops_saving_but_not_streaming() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(4).with_file_name("S0.sgn").with_max_samples_to_save(6);
        buf.open_file(&path).unwrap();

        let mut read = Vec::new();
        for i in 0..20 {
            buf.put(i as f64).unwrap();
            read.push(buf.get::<f64>().unwrap());
        }
        buf.close().unwrap();
        assert_eq!(read, (0..20).map(f64::from).collect::<Vec<_>>());
        assert_eq!(buf.samples_saved(), 6);
        assert_eq!(reals(&file_data(&path)), (0..6).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn flush_pending_saves_tail_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(4).with_file_name("S0.sgn");
        buf.open_file(&path).unwrap();

        for i in 0..6 {
            buf.put(i as f64).unwrap();
        }
        buf.flush_pending().unwrap();
        buf.flush_pending().unwrap();
        assert_eq!(buf.samples_saved(), 6);

        // The tail already handed over must not be written again on wrap.
        buf.get::<f64>().unwrap();
        buf.get::<f64>().unwrap();
        buf.put(6.0).unwrap();
        buf.put(7.0).unwrap();
        buf.close().unwrap();
        assert!(!buf.is_open());
        assert_eq!(buf.file_path(), Some(path.as_path()));
        assert_eq!(reals(&file_data(&path)), (0..8).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn unsaved_signal_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut buf = real(2);
        buf.open_file(&path).unwrap();
        for i in 0..4 {
            buf.put(i as f64).unwrap();
            buf.get::<f64>().unwrap();
        }
        buf.close().unwrap();
        assert!(file_data(&path).is_empty());
        assert_eq!(buf.samples_saved(), 0);
    }

    #[test]
    fn header_reflects_metadata() {
        let buf = SampleBuffer::new(SignalType::binary(), 2)
            .with_symbol_period(1e-9)
            .with_sampling_period(1e-9)
            .with_save_offset(7);
        let header = buf.header();
        assert_eq!(header.signal_type, "Binary");
        assert_eq!(header.sample_kind, SampleKind::Binary);
        assert_eq!(header.sample_size, 1);
        assert_eq!(header.samples_per_symbol, 1.0);
        assert_eq!(header.first_saved_sample, 7);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        let _ = real(0);
    }
}
