//! Note frequency table and nearest-note lookup (12-TET, A4 = 440 Hz).

use std::fmt;

use once_cell::sync::Lazy;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::NoteError;

/// Reference frequency of A4.
pub const A4_FREQUENCY: f64 = 440.0;
/// Lowest octave in the table.
pub const MIN_OCTAVE: i32 = 0;
/// Highest octave in the table.
pub const MAX_OCTAVE: i32 = 9;

const SEMITONES_PER_OCTAVE: i32 = 12;

/// The twelve pitch classes, in ascending order from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Position within the octave, C = 0 .. B = 11.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sharp-spelled name, e.g. `"C#"`.
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a sharp-spelled pitch class name.
    pub fn from_name(name: &str) -> Option<PitchClass> {
        PitchClass::ALL.into_iter().find(|pc| pc.name() == name)
    }

    /// Semitones from A4 to this pitch class in `octave`.
    pub fn semitones_from_a4(self, octave: i32) -> i32 {
        self.index() as i32 - PitchClass::A.index() as i32 + (octave - 4) * SEMITONES_PER_OCTAVE
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split a note name such as `"A#5"` into its pitch class and octave.
pub fn parse_note_name(name: &str) -> Option<(PitchClass, i32)> {
    let split = name.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let (pitch, octave) = name.split_at(split);
    let pitch_class = PitchClass::from_name(pitch)?;
    let octave: i32 = octave.parse().ok()?;
    Some((pitch_class, octave))
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    pub pitch_class: PitchClass,
    pub octave: i32,
    /// Pitch class followed by octave, e.g. `"C#3"`.
    pub name: String,
    /// Frequency in Hz, rounded to two decimals.
    pub frequency: f64,
}

impl NoteEntry {
    /// Build the equal-tempered entry for a pitch class and octave.
    pub fn equal_tempered(pitch_class: PitchClass, octave: i32) -> Self {
        let semitones = pitch_class.semitones_from_a4(octave);
        let frequency = A4_FREQUENCY * 2.0_f64.powf(semitones as f64 / 12.0);
        NoteEntry {
            pitch_class,
            octave,
            name: format!("{pitch_class}{octave}"),
            frequency: round_to_hundredths(frequency),
        }
    }

    /// Signed distance of `frequency` from this note, in cents.
    ///
    /// `None` for non-positive or non-finite input.
    pub fn cents_from(&self, frequency: f64) -> Option<f64> {
        if frequency <= 0.0 || !frequency.is_finite() {
            return None;
        }
        Some(1200.0 * (frequency / self.frequency).log2())
    }
}

/// Round half away from zero to two decimal places.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Immutable note-name to frequency table.
///
/// Entries are kept in canonical order: octave ascending, then pitch class
/// ascending. Lookups that can tie resolve to the first entry in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFrequencyTable {
    entries: Vec<NoteEntry>,
}

impl NoteFrequencyTable {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, NoteEntry> {
        self.entries.iter()
    }

    /// Frequency of a note by name, e.g. `"A4"`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.frequency)
    }

    /// Frequency of a pitch class in a given octave.
    pub fn frequency_of(&self, pitch_class: PitchClass, octave: i32) -> Result<f64, NoteError> {
        self.entries
            .iter()
            .find(|e| e.pitch_class == pitch_class && e.octave == octave)
            .map(|e| e.frequency)
            .ok_or_else(|| NoteError::UnknownNote {
                name: format!("{pitch_class}{octave}"),
            })
    }

    /// The entry whose frequency is closest to `frequency`.
    ///
    /// Scans in canonical order and only replaces the best match on a
    /// strictly smaller difference, so ties go to the earlier entry.
    pub fn nearest(&self, frequency: f64) -> Result<&NoteEntry, NoteError> {
        let first = self.entries.first().ok_or(NoteError::EmptyTable)?;
        let mut best = first;
        let mut best_diff = f64::INFINITY;

        for entry in &self.entries {
            let diff = (entry.frequency - frequency).abs();
            if diff < best_diff {
                best_diff = diff;
                best = entry;
            }
        }

        Ok(best)
    }
}

impl FromIterator<NoteEntry> for NoteFrequencyTable {
    fn from_iter<I: IntoIterator<Item = NoteEntry>>(iter: I) -> Self {
        NoteFrequencyTable {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NoteFrequencyTable {
    type Item = &'a NoteEntry;
    type IntoIter = std::slice::Iter<'a, NoteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as a `{ "C0": 16.35, ... }` map in canonical order.
impl Serialize for NoteFrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.frequency)?;
        }
        map.end()
    }
}

/// Build the 120-entry table covering octaves 0 through 9.
pub fn build_frequency_table() -> NoteFrequencyTable {
    (MIN_OCTAVE..=MAX_OCTAVE)
        .flat_map(|octave| {
            PitchClass::ALL
                .into_iter()
                .map(move |pc| NoteEntry::equal_tempered(pc, octave))
        })
        .collect()
}

static FREQUENCY_TABLE: Lazy<NoteFrequencyTable> = Lazy::new(build_frequency_table);

/// The shared table, built on first use.
pub fn frequency_table() -> &'static NoteFrequencyTable {
    &FREQUENCY_TABLE
}

/// Name of the note in `table` closest to `frequency`.
///
/// Any frequency is accepted, including zero and negatives.
pub fn closest_note(frequency: f64, table: &NoteFrequencyTable) -> Result<&str, NoteError> {
    table.nearest(frequency).map(|e| e.name.as_str())
}
