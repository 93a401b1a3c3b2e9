//! Property-based tests for the bitcrusher kernel and note resolver.
//!
//! ```bash
//! cargo test --test properties
//! ```

use proptest::prelude::*;

use bitsynth_core::dsp::bitcrusher::{crush, quantize, Bitcrusher, BitcrusherParams};
use bitsynth_core::error::NoteError;
use bitsynth_core::notes::{build_frequency_table, closest_note, NoteFrequencyTable};

/// Audio samples in the nominal [-1, 1] range.
fn sample() -> impl Strategy<Value = f32> {
    -1.0f32..=1.0f32
}

fn buffer() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(sample(), 0..512)
}

fn params() -> impl Strategy<Value = BitcrusherParams> {
    (1u32..=16, 1u32..=16).prop_map(|(bits, hold)| BitcrusherParams::new(bits, hold))
}

// ============================================================================
// Bitcrusher
// ============================================================================

proptest! {
    /// A quantized sample stays within half a step of the input.
    #[test]
    fn quantized_within_half_step(x in sample(), bits in 1u32..=16) {
        let step = BitcrusherParams::new(bits, 1).step();
        let q = quantize(x, step) as f64;
        prop_assert!(
            (q - x as f64).abs() <= step / 2.0 + 1e-12,
            "bits={} x={} q={}", bits, x, q
        );
    }

    /// Quantized values land exactly on a multiple of the step.
    #[test]
    fn quantized_on_grid(x in sample(), bits in 1u32..=16) {
        let step = BitcrusherParams::new(bits, 1).step();
        let levels = quantize(x, step) as f64 / step;
        prop_assert_eq!(levels, levels.round());
    }

    /// Every run of `r` outputs is constant and equals the quantized first input.
    #[test]
    fn runs_hold_first_quantized_sample(input in buffer(), p in params()) {
        let mut output = vec![0.0f32; input.len()];
        crush(&input, &mut output, p);

        let r = p.sample_rate_reduction() as usize;
        for (run_in, run_out) in input.chunks(r).zip(output.chunks(r)) {
            let expected = quantize(run_in[0], p.step());
            prop_assert!(run_out.iter().all(|&s| s == expected));
        }
    }

    /// Output length always equals input length.
    #[test]
    fn length_preserved(input in buffer(), p in params()) {
        let mut output = vec![0.0f32; input.len()];
        let alive = Bitcrusher::new().process(&[&input[..]], &mut [&mut output[..]], p);
        prop_assert!(alive);
        prop_assert_eq!(output.len(), input.len());
    }

    /// Raw host values never produce params outside [1, 16].
    #[test]
    fn host_params_always_in_range(bits in any::<f64>(), hold in any::<f64>()) {
        let p = BitcrusherParams::from_host(bits, hold);
        prop_assert!((1..=16).contains(&p.bit_depth()));
        prop_assert!((1..=16).contains(&p.sample_rate_reduction()));
    }
}

// ============================================================================
// Note resolver
// ============================================================================

proptest! {
    /// The chosen note is never farther away than any other entry.
    #[test]
    fn closest_note_is_minimal(f in -1000.0f64..30000.0) {
        let table = build_frequency_table();
        let name = closest_note(f, &table).unwrap();
        let chosen = table.get(name).unwrap();
        for entry in &table {
            prop_assert!((chosen - f).abs() <= (entry.frequency - f).abs());
        }
    }

    /// Any query against an empty table is a precondition failure.
    #[test]
    fn empty_table_always_errors(f in any::<f64>()) {
        let table = NoteFrequencyTable::empty();
        prop_assert_eq!(closest_note(f, &table), Err(NoteError::EmptyTable));
    }
}

#[test]
fn every_table_entry_resolves_to_itself() {
    let table = build_frequency_table();
    assert_eq!(table.len(), 120);
    for entry in &table {
        assert_eq!(closest_note(entry.frequency, &table), Ok(entry.name.as_str()));
    }
}

#[test]
fn empty_buffer_produces_empty_output() {
    let mut output: Vec<f32> = Vec::new();
    crush(&[], &mut output, BitcrusherParams::default());
    assert!(output.is_empty());
}
