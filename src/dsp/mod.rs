//! DSP: real-time audio processing.
//!
//! Everything here runs inside the host's audio callback, whether that is a
//! WebAudio AudioWorklet (via WASM) or a native audio thread.

pub mod bitcrusher;
