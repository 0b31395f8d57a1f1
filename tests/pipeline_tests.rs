// tests/pipeline_tests.rs
//! End-to-end restoration runs

use audiovive_core::config::{ProfileStrategy, RestorationConfig};
use audiovive_core::processing::{compute_snr, reduce_noise, RestorationPipeline};
use audiovive_core::signal::{synth, SignalBuffer};
use audiovive_core::{ProcessingStage, RestoreError};

const SR: u32 = 16000;

/// 0.5 s of noise, then a 440 Hz tone in the same noise; returns (noisy, clean reference)
fn noisy_tone(seed: u64) -> (SignalBuffer, SignalBuffer) {
    let lead = SR as usize / 2;
    let total = 2 * SR as usize;
    let tone = synth::sine(440.0, 0.5, 1.5, SR).unwrap();
    let reference = synth::delayed(&tone, lead, total);
    let noise = synth::white_noise(0.05, total, SR, seed).unwrap();
    (synth::mix(&reference, &noise), reference)
}

#[test]
fn test_snr_improves_on_stationary_noise() {
    let (noisy, reference) = noisy_tone(42);
    let pipeline = RestorationPipeline::new(RestorationConfig::default()).unwrap();
    let outcome = pipeline.run(&noisy).unwrap();

    let before = compute_snr(&reference, &noisy.difference(&reference).unwrap()).unwrap();
    let after = compute_snr(&reference, &outcome.cleaned.difference(&reference).unwrap()).unwrap();
    assert!(after >= before + 3.0, "before {:.2} dB, after {:.2} dB", before, after);
}

#[test]
fn test_report_stays_within_tolerance_on_textbook_case() {
    // both report figures share the residual, so the cleaned figure can only
    // trail the original one by the power removed from the tone itself
    let (noisy, _) = noisy_tone(7);
    let outcome = RestorationPipeline::new(RestorationConfig::default())
        .unwrap()
        .run(&noisy)
        .unwrap();
    let report = outcome.report;
    assert!(report.snr_before_db.is_finite() && report.snr_after_db.is_finite());
    assert!(
        report.snr_after_db >= report.snr_before_db - 1.0,
        "{}",
        report
    );
}

#[test]
fn test_hum_and_hiss_removed_together() {
    let (noisy, reference) = noisy_tone(3);
    let hum = synth::sine(60.0, 0.2, 2.0, SR).unwrap();
    let recording = synth::mix(&noisy, &hum);

    let cleaned = reduce_noise(&recording).unwrap();
    assert_eq!(cleaned.len(), recording.len());

    let residual_in = recording.difference(&reference).unwrap().mean_power();
    let residual_out = cleaned.difference(&reference).unwrap().mean_power();
    assert!(residual_out < residual_in * 0.25);
}

#[test]
fn test_runs_are_independent_and_repeatable() {
    let (noisy, _) = noisy_tone(11);
    let pipeline = RestorationPipeline::new(RestorationConfig::default()).unwrap();
    let first = pipeline.run(&noisy).unwrap();
    let second = pipeline.run(&noisy).unwrap();
    assert_eq!(first.cleaned, second.cleaned);
    assert_eq!(first.report, second.report);
}

#[test]
fn test_batch_matches_sequential_and_keeps_order() {
    let pipeline = RestorationPipeline::new(RestorationConfig::default()).unwrap();
    let inputs = vec![
        noisy_tone(1).0,
        SignalBuffer::new(Vec::new(), SR).unwrap(),
        noisy_tone(2).0,
    ];

    let batch = pipeline.run_batch(&inputs);
    assert_eq!(batch.len(), 3);

    assert!(matches!(
        batch[1],
        Err(RestoreError::EmptyInput { stage: ProcessingStage::NotchFilter })
    ));
    for i in [0, 2] {
        let sequential = pipeline.run(&inputs[i]).unwrap();
        let parallel = batch[i].as_ref().unwrap();
        assert_eq!(parallel.cleaned, sequential.cleaned);
        assert_eq!(parallel.report, sequential.report);
    }
}

#[test]
fn test_signal_shorter_than_profile_window() {
    // whole recording becomes the profile; output must still line up
    let short = synth::white_noise(0.1, 3000, SR, 5).unwrap();
    let outcome = RestorationPipeline::new(RestorationConfig::default())
        .unwrap()
        .run(&short)
        .unwrap();
    assert_eq!(outcome.cleaned.len(), 3000);
    assert_eq!(outcome.stats.profile_len, 3000);
}

#[test]
fn test_explicit_range_profile() {
    let (noisy, _) = noisy_tone(8);
    let mut config = RestorationConfig::default();
    config.noise_profile.strategy = ProfileStrategy::Range {
        start_s: 0.1,
        end_s: 0.4,
    };
    let outcome = RestorationPipeline::new(config).unwrap().run(&noisy).unwrap();
    assert_eq!(outcome.stats.profile_offset, 1600);
    assert_eq!(outcome.stats.profile_len, 4800);
}

#[test]
fn test_tunables_flow_through() {
    let config = RestorationConfig::from_tunables(50.0, 20.0, 0.25, 0.5);
    let pipeline = RestorationPipeline::new(config).unwrap();
    assert_eq!(pipeline.config().notch.target_freq_hz, 50.0);
    assert_eq!(pipeline.config().denoise.attenuation_strength, 0.5);

    let (noisy, _) = noisy_tone(9);
    assert_eq!(pipeline.run(&noisy).unwrap().stats.profile_len, 4000);
}
