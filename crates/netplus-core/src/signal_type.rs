//! Signal type tags.
//!
//! A signal's type is a [`SampleKind`] plus two orthogonal continuity tags
//! (time and amplitude) and a bandpass flag. Capability checks go through
//! the tags rather than through distinct types.

use serde::{Deserialize, Serialize};

use crate::sample::SampleKind;

/// Whether a signal dimension is sampled/quantised or continuous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continuity {
    /// Sampled (time) or quantised (amplitude).
    Discrete,
    /// Continuous, approximated by dense samples.
    Continuous,
}

/// The type of a signal: what it stores and how its values should be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignalType {
    kind: SampleKind,
    time: Continuity,
    amplitude: Continuity,
    bandpass: bool,
}

impl SignalType {
    /// Creates a signal type with explicit tags.
    pub const fn new(kind: SampleKind, time: Continuity, amplitude: Continuity) -> Self {
        Self {
            kind,
            time,
            amplitude,
            bandpass: false,
        }
    }

    /// A binary (bit) signal: time-discrete, amplitude-discrete.
    pub const fn binary() -> Self {
        Self::new(SampleKind::Binary, Continuity::Discrete, Continuity::Discrete)
    }

    /// A time-discrete, amplitude-discrete integer signal.
    pub const fn integer() -> Self {
        Self::new(SampleKind::Integer, Continuity::Discrete, Continuity::Discrete)
    }

    /// A time-discrete real signal with the given amplitude continuity.
    pub const fn time_discrete_real(amplitude: Continuity) -> Self {
        Self::new(SampleKind::Real, Continuity::Discrete, amplitude)
    }

    /// A time-discrete complex signal with the given amplitude continuity.
    pub const fn time_discrete_complex(amplitude: Continuity) -> Self {
        Self::new(SampleKind::Complex, Continuity::Discrete, amplitude)
    }

    /// A time-continuous real signal with the given amplitude continuity.
    pub const fn time_continuous_real(amplitude: Continuity) -> Self {
        Self::new(SampleKind::Real, Continuity::Continuous, amplitude)
    }

    /// A time-continuous complex signal with the given amplitude continuity.
    pub const fn time_continuous_complex(amplitude: Continuity) -> Self {
        Self::new(SampleKind::Complex, Continuity::Continuous, amplitude)
    }

    /// An optical bandpass signal: complex envelope around a central wavelength.
    pub const fn bandpass() -> Self {
        Self {
            kind: SampleKind::Complex,
            time: Continuity::Continuous,
            amplitude: Continuity::Continuous,
            bandpass: true,
        }
    }

    /// Returns the stored sample kind.
    pub fn sample_kind(&self) -> SampleKind {
        self.kind
    }

    /// Returns the time continuity tag.
    pub fn time(&self) -> Continuity {
        self.time
    }

    /// Returns the amplitude continuity tag.
    pub fn amplitude(&self) -> Continuity {
        self.amplitude
    }

    /// Returns true for time-discrete signals.
    pub fn is_time_discrete(&self) -> bool {
        self.time == Continuity::Discrete
    }

    /// Returns true for amplitude-discrete signals.
    pub fn is_amplitude_discrete(&self) -> bool {
        self.amplitude == Continuity::Discrete
    }

    /// Returns true for optical bandpass signals.
    pub fn is_bandpass(&self) -> bool {
        self.bandpass
    }

    /// The type label written into signal file headers.
    ///
    /// Binary and bandpass signals have short labels; everything else spells
    /// out its tags, e.g. `TimeDiscreteAmplitudeContinuousReal`.
    pub fn label(&self) -> String {
        if self.bandpass {
            return "BandpassSignal".to_string();
        }
        if self.kind == SampleKind::Binary {
            return "Binary".to_string();
        }
        let time = match self.time {
            Continuity::Discrete => "TimeDiscrete",
            Continuity::Continuous => "TimeContinuous",
        };
        let amplitude = match self.amplitude {
            Continuity::Discrete => "AmplitudeDiscrete",
            Continuity::Continuous => "AmplitudeContinuous",
        };
        let kind = match self.kind {
            SampleKind::Binary => "Binary",
            SampleKind::Integer => "Integer",
            SampleKind::Real => "Real",
            SampleKind::Complex => "Complex",
        };
        format!("{time}{amplitude}{kind}")
    }
}
