pub mod config;
pub mod dsp;
pub mod error;
pub mod notes;

use crate::config::SynthSettings;
use crate::dsp::bitcrusher::{self, BitcrusherParams};
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Report a recoverable problem to the host's console.
fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{message}");
}

/// WASM-exposed: return the bitsynth-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: the full note table as a `{ "C0": 16.35, ... }` object.
#[wasm_bindgen]
pub fn note_frequency_table() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(notes::frequency_table())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: name of the note closest to `frequency`.
#[wasm_bindgen]
pub fn closest_note_name(frequency: f64) -> Result<String, JsValue> {
    notes::closest_note(frequency, notes::frequency_table())
        .map(str::to_string)
        .map_err(|e| {
            warn(&format!("closest_note_name({frequency}): {e}"));
            JsValue::from_str(&format!("{e}"))
        })
}

/// WASM-exposed: frequency of a note name such as `"A#5"`.
#[wasm_bindgen]
pub fn note_name_frequency(name: &str) -> Option<f64> {
    notes::frequency_table().get(name)
}

/// WASM-exposed: AudioWorklet parameter descriptors for the bitcrusher.
#[wasm_bindgen]
pub fn bitcrusher_parameter_descriptors() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&BitcrusherParams::descriptors())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed bitcrusher for an AudioWorklet's `process()` callback.
///
/// Holds only the current controls; the worklet calls `process` once per
/// channel per quantum.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct BitcrusherProcessor {
    params: BitcrusherParams,
}

#[wasm_bindgen]
impl BitcrusherProcessor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BitcrusherProcessor {
        BitcrusherProcessor::default()
    }

    /// Build from a settings JSON blob. Invalid JSON falls back to defaults.
    pub fn from_settings(json: &str) -> BitcrusherProcessor {
        match SynthSettings::from_json(json) {
            Ok(settings) => BitcrusherProcessor {
                params: settings.bitcrusher.params(),
            },
            Err(e) => {
                warn(&format!("bitcrusher settings rejected, using defaults: {e}"));
                BitcrusherProcessor::default()
            }
        }
    }

    pub fn set_bit_depth(&mut self, bit_depth: f64) {
        self.params =
            BitcrusherParams::from_host(bit_depth, self.params.sample_rate_reduction() as f64);
    }

    pub fn set_sample_rate_reduction(&mut self, sample_rate_reduction: f64) {
        self.params =
            BitcrusherParams::from_host(self.params.bit_depth() as f64, sample_rate_reduction);
    }

    pub fn bit_depth(&self) -> u32 {
        self.params.bit_depth()
    }

    pub fn sample_rate_reduction(&self) -> u32 {
        self.params.sample_rate_reduction()
    }

    /// Crush one channel. Returns `true` to keep the worklet alive.
    pub fn process(&self, input: &[f32], output: &mut [f32]) -> bool {
        bitcrusher::crush(input, output, self.params);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processor_defaults() {
        let p = BitcrusherProcessor::new();
        assert_eq!(p.bit_depth(), 8);
        assert_eq!(p.sample_rate_reduction(), 4);
    }

    #[test]
    fn processor_setters_clamp() {
        let mut p = BitcrusherProcessor::new();
        p.set_bit_depth(0.0);
        p.set_sample_rate_reduction(99.0);
        assert_eq!(p.bit_depth(), 1);
        assert_eq!(p.sample_rate_reduction(), 16);
    }

    #[test]
    fn processor_from_settings() {
        let p = BitcrusherProcessor::from_settings(
            r#"{"bitcrusher": {"bitDepth": 2, "sampleRateReduction": 2}}"#,
        );
        assert_eq!((p.bit_depth(), p.sample_rate_reduction()), (2, 2));

        let p = BitcrusherProcessor::from_settings("{");
        assert_eq!((p.bit_depth(), p.sample_rate_reduction()), (8, 4));
    }

    #[test]
    fn processor_crushes_one_channel() {
        let mut p = BitcrusherProcessor::new();
        p.set_bit_depth(2.0);
        p.set_sample_rate_reduction(2.0);

        let input = [0.3f32, -0.9, -0.3, 0.9];
        let mut output = [0.0f32; 4];
        assert!(p.process(&input, &mut output));
        assert_eq!(output, [0.25, 0.25, -0.25, -0.25]);
    }

    #[test]
    fn note_lookups_use_shared_table() {
        assert_eq!(closest_note_name(440.0).unwrap(), "A4");
        assert_eq!(note_name_frequency("A4"), Some(440.0));
        assert_eq!(note_name_frequency("Z9"), None);
    }

    #[test]
    fn version_is_set() {
        assert_eq!(core_version(), VERSION);
    }
}
