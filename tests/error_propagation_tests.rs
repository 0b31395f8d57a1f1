// tests/error_propagation_tests.rs
//! Error propagation and handling tests
//!
//! Each stage must fail at the point it detects a problem, tag the error with
//! its stage, and leave nothing partially applied.

use audiovive_core::codec::{decode, InputFormat};
use audiovive_core::config::{ConfigLoader, DenoiseConfig, RestorationConfig};
use audiovive_core::processing::{
    apply_notch, compute_snr, NotchFilter, RestorationPipeline, SnrReport, SpectralDenoiser,
};
use audiovive_core::signal::{synth, SignalBuffer};
use audiovive_core::visual::{Comparison, PlotKind};
use audiovive_core::{ProcessingStage, RestoreError};

fn assert_stage(err: &RestoreError, stage: ProcessingStage) {
    assert_eq!(err.stage(), Some(stage), "unexpected stage for {:?}", err);
}

/// Invalid parameters are reported before any sample is processed
#[test]
fn test_invalid_parameters_by_stage() {
    let err = NotchFilter::new(30000.0, 30.0, 44100).unwrap_err();
    assert!(err.is_parameter_error());
    assert_stage(&err, ProcessingStage::NotchFilter);
    assert!(err.to_string().contains("Nyquist"));

    let err = SpectralDenoiser::new(DenoiseConfig::with_strength(1.01)).err().unwrap();
    assert!(err.is_parameter_error());
    assert_stage(&err, ProcessingStage::SpectralDenoise);
    assert!(err.to_string().starts_with("[PARAM]"));

    let err = RestorationPipeline::new(RestorationConfig::from_tunables(60.0, -30.0, 0.5, 1.0))
        .err()
        .unwrap();
    assert!(err.is_parameter_error());
    assert_stage(&err, ProcessingStage::NotchFilter);

    let err = RestorationPipeline::new(RestorationConfig::from_tunables(60.0, 30.0, -0.5, 1.0))
        .err()
        .unwrap();
    assert_stage(&err, ProcessingStage::NoiseProfile);
}

/// The notch fails on empty input while the denoiser treats an empty profile as a no-op
#[test]
fn test_empty_input_policy_differs_by_stage() {
    let empty = SignalBuffer::new(Vec::new(), 8000).unwrap();
    let err = apply_notch(&empty, 60.0, 30.0).unwrap_err();
    assert!(matches!(err, RestoreError::EmptyInput { stage: ProcessingStage::NotchFilter }));
    assert!(err.to_string().starts_with("[DATA]"));

    let denoised = audiovive_core::processing::denoise(
        &empty,
        &audiovive_core::processing::extract_noise_profile(&empty, 0.5).unwrap(),
        1.0,
    )
    .unwrap();
    assert!(denoised.is_empty());
}

#[test]
fn test_length_mismatch_reported_by_evaluation() {
    let a = synth::sine(100.0, 0.5, 0.1, 8000).unwrap();
    let b = a.slice_samples(0, a.len() - 1);

    let err = compute_snr(&a, &b).unwrap_err();
    assert_stage(&err, ProcessingStage::SnrEvaluation);
    let err = SnrReport::evaluate(&a, &b).unwrap_err();
    assert!(matches!(err, RestoreError::LengthMismatch { .. }));
    assert!(Comparison::build(&a, &b, PlotKind::Spectrogram).is_err());
}

#[test]
fn test_decode_errors_name_the_container() {
    let err = decode(b"definitely not audio", InputFormat::Wav).unwrap_err();
    assert_stage(&err, ProcessingStage::Decode);
    let msg = err.to_string();
    assert!(msg.starts_with("[DECODE]"));
    assert!(msg.contains("wav"));
}

#[test]
fn test_config_errors() {
    let err = ConfigLoader::load_file("/nonexistent/audiovive.toml").unwrap_err();
    assert_stage(&err, ProcessingStage::Configuration);
    assert!(err.to_string().contains("not found"));

    let zero_rate = SignalBuffer::new(vec![0.0; 4], 0).unwrap_err();
    assert!(zero_rate.is_parameter_error());
}

/// Errors convert cleanly into boxed errors for callers that surface a single message
#[test]
fn test_errors_box_for_callers() {
    fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let signal = synth::sine(100.0, 0.5, 0.1, 8000)?;
        apply_notch(&signal, 8000.0, 30.0)?;
        Ok(())
    }
    let message = run().unwrap_err().to_string();
    assert!(message.contains("target_freq_hz"));
}
