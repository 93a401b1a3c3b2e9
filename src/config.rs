//! Synth settings passed by value from the host.
//!
//! Field names and defaults match the JSON the web front end exchanges,
//! e.g. `{"frequency": 50, "useBitcrusher": true, "bitcrusher": {"bitDepth": 6}}`.

use serde::{Deserialize, Serialize};

use crate::dsp::bitcrusher::BitcrusherParams;
use crate::error::{NoteError, SettingsError};
use crate::notes::{self, NoteFrequencyTable, PitchClass};

/// Oscillator shapes offered by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Raw bitcrusher controls as the host stores them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BitcrusherSettings {
    pub bit_depth: f64,
    pub sample_rate_reduction: f64,
}

impl Default for BitcrusherSettings {
    fn default() -> Self {
        BitcrusherSettings {
            bit_depth: BitcrusherParams::DEFAULT_BIT_DEPTH as f64,
            sample_rate_reduction: BitcrusherParams::DEFAULT_SAMPLE_RATE_REDUCTION as f64,
        }
    }
}

impl BitcrusherSettings {
    /// Kernel params, rounded and clamped into range.
    pub fn params(&self) -> BitcrusherParams {
        BitcrusherParams::from_host(self.bit_depth, self.sample_rate_reduction)
    }
}

/// Everything the front end controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthSettings {
    /// Oscillator frequency in Hz.
    pub frequency: f64,
    /// Selected pitch class, sharp spelling (e.g. "A", "C#").
    pub note: String,
    pub octave: i32,
    /// Output gain [0, 1].
    pub gain: f64,
    pub waveform: Waveform,
    pub use_bitcrusher: bool,
    pub bitcrusher: BitcrusherSettings,
}

impl Default for SynthSettings {
    fn default() -> Self {
        SynthSettings {
            frequency: 50.0,
            note: "A".to_string(),
            octave: 4,
            gain: 0.5,
            waveform: Waveform::Sine,
            use_bitcrusher: false,
            bitcrusher: BitcrusherSettings::default(),
        }
    }
}

impl SynthSettings {
    /// Parse settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(SettingsError::InvalidField {
                field: "frequency",
                reason: format!("must be a non-negative number, got {}", self.frequency),
            });
        }
        if !(0.0..=1.0).contains(&self.gain) {
            return Err(SettingsError::InvalidField {
                field: "gain",
                reason: format!("must be within [0, 1], got {}", self.gain),
            });
        }
        if PitchClass::from_name(&self.note).is_none() {
            return Err(SettingsError::InvalidField {
                field: "note",
                reason: format!("unknown pitch class '{}'", self.note),
            });
        }
        if !(notes::MIN_OCTAVE..=notes::MAX_OCTAVE).contains(&self.octave) {
            return Err(SettingsError::InvalidField {
                field: "octave",
                reason: format!(
                    "must be within [{}, {}], got {}",
                    notes::MIN_OCTAVE,
                    notes::MAX_OCTAVE,
                    self.octave
                ),
            });
        }
        Ok(())
    }

    /// Bitcrusher params when the effect is switched on.
    pub fn active_bitcrusher(&self) -> Option<BitcrusherParams> {
        self.use_bitcrusher.then(|| self.bitcrusher.params())
    }

    /// Frequency of the selected note and octave.
    pub fn note_frequency(&self, table: &NoteFrequencyTable) -> Result<f64, NoteError> {
        let pitch_class = PitchClass::from_name(&self.note).ok_or_else(|| NoteError::UnknownNote {
            name: format!("{}{}", self.note, self.octave),
        })?;
        table.frequency_of(pitch_class, self.octave)
    }

    /// Name of the note closest to the current frequency.
    pub fn closest_note<'t>(&self, table: &'t NoteFrequencyTable) -> Result<&'t str, NoteError> {
        notes::closest_note(self.frequency, table)
    }
}
