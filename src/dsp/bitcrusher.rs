//! Bitcrusher: bit-depth quantization with sample-and-hold rate reduction.
//!
//! Runs inside the audio callback: no allocation, no locks, no state
//! carried between quanta. The only memory is the last emitted sample,
//! held in a local while one buffer is scanned.

use serde::Serialize;

/// Per-quantum bitcrusher controls.
///
/// Both values are always within `[MIN, MAX]`; every constructor clamps,
/// so the kernel never has to re-check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitcrusherParams {
    bit_depth: u32,
    sample_rate_reduction: u32,
}

impl BitcrusherParams {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 16;
    pub const DEFAULT_BIT_DEPTH: u32 = 8;
    pub const DEFAULT_SAMPLE_RATE_REDUCTION: u32 = 4;

    /// Create params, clamping both controls into `[1, 16]`.
    pub fn new(bit_depth: u32, sample_rate_reduction: u32) -> Self {
        Self {
            bit_depth: bit_depth.clamp(Self::MIN, Self::MAX),
            sample_rate_reduction: sample_rate_reduction.clamp(Self::MIN, Self::MAX),
        }
    }

    /// Build params from raw host automation values.
    ///
    /// Values are rounded to the nearest integer and clamped. A non-finite
    /// value falls back to that control's default.
    pub fn from_host(bit_depth: f64, sample_rate_reduction: f64) -> Self {
        Self::new(
            host_control(bit_depth, Self::DEFAULT_BIT_DEPTH),
            host_control(sample_rate_reduction, Self::DEFAULT_SAMPLE_RATE_REDUCTION),
        )
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    pub fn sample_rate_reduction(&self) -> u32 {
        self.sample_rate_reduction
    }

    /// Quantization step size: `0.5^bit_depth`.
    #[inline]
    pub fn step(&self) -> f64 {
        0.5_f64.powi(self.bit_depth as i32)
    }

    /// Descriptors for the two host-automatable controls, in registration order.
    pub fn descriptors() -> [ParameterDescriptor; 2] {
        [
            ParameterDescriptor {
                name: "bitDepth",
                default_value: Self::DEFAULT_BIT_DEPTH as f64,
                min_value: Self::MIN as f64,
                max_value: Self::MAX as f64,
            },
            ParameterDescriptor {
                name: "sampleRateReduction",
                default_value: Self::DEFAULT_SAMPLE_RATE_REDUCTION as f64,
                min_value: Self::MIN as f64,
                max_value: Self::MAX as f64,
            },
        ]
    }
}

impl Default for BitcrusherParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BIT_DEPTH, Self::DEFAULT_SAMPLE_RATE_REDUCTION)
    }
}

fn host_control(value: f64, default: u32) -> u32 {
    if !value.is_finite() {
        return default;
    }
    value
        .round()
        .clamp(BitcrusherParams::MIN as f64, BitcrusherParams::MAX as f64) as u32
}

/// Describes one automatable control the way an AudioWorklet host expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub default_value: f64,
    pub min_value: f64,
    pub max_value: f64,
}

/// Snap a sample to the nearest multiple of `step`.
///
/// Uses `floor(x / step + 0.5)`, not `round`: a negative sample exactly
/// half a step below a level goes up, not away from zero.
#[inline]
pub fn quantize(sample: f32, step: f64) -> f32 {
    (step * (sample as f64 / step + 0.5).floor()) as f32
}

/// Crush one channel from `input` into `output`.
///
/// The first sample of every run of `sample_rate_reduction` samples is
/// quantized; the rest of the run repeats the previous output sample.
/// Only `min(input.len(), output.len())` samples are written.
pub fn crush(input: &[f32], output: &mut [f32], params: BitcrusherParams) {
    let step = params.step();
    let hold = params.sample_rate_reduction as usize;
    let mut held = 0.0f32;

    for (i, (out, &sample)) in output.iter_mut().zip(input).enumerate() {
        if i % hold == 0 {
            held = quantize(sample, step);
        }
        *out = held;
    }
}

/// Crush one channel in place.
pub fn crush_in_place(buffer: &mut [f32], params: BitcrusherParams) {
    let step = params.step();
    let hold = params.sample_rate_reduction as usize;
    let mut held = 0.0f32;

    for (i, sample) in buffer.iter_mut().enumerate() {
        if i % hold == 0 {
            held = quantize(*sample, step);
        }
        *sample = held;
    }
}

/// Multi-channel bitcrusher processor.
///
/// Holds no audio state; the params for each quantum are passed in by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bitcrusher;

impl Bitcrusher {
    pub fn new() -> Self {
        Bitcrusher
    }

    /// Process one quantum. Each `(inputs[c], outputs[c])` pair is crushed
    /// independently; extra channels on either side are left untouched.
    ///
    /// Returns `true` to tell the host the processor should stay alive.
    pub fn process(
        &self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        params: BitcrusherParams,
    ) -> bool {
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            crush(input, output, params);
        }
        true
    }
}
