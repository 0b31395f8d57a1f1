// src/config/constants.rs
//! Pipeline-wide constants and configuration defaults

/// Notch filter constants
pub mod notch {
    /// North American mains frequency
    pub const DEFAULT_TARGET_FREQ_HZ: f32 = 60.0;
    /// Narrow enough to leave neighbouring program material alone
    pub const DEFAULT_QUALITY_FACTOR: f32 = 30.0;
    /// Fundamental only
    pub const DEFAULT_HARMONICS: u32 = 1;
    /// Upper bound on cascaded harmonic notches
    pub const MAX_HARMONICS: u32 = 16;
    /// European mains
    pub const POWERLINE_FREQ_50HZ: f32 = 50.0;
    /// North American mains
    pub const POWERLINE_FREQ_60HZ: f32 = 60.0;

    /// Pre-roll length used to prime the biquad state, in filter time constants
    pub const PRIME_TIME_CONSTANTS: f64 = 5.0;
}

/// Noise profile constants
pub mod profile {
    /// Length of the leading noise-only segment
    pub const DEFAULT_DURATION_SECS: f64 = 0.5;
}

/// Spectral subtraction constants
pub mod denoise {
    /// Full subtraction of the estimated noise magnitude
    pub const DEFAULT_ATTENUATION_STRENGTH: f32 = 1.0;
    /// Identity
    pub const MIN_ATTENUATION_STRENGTH: f32 = 0.0;
    /// Full subtraction
    pub const MAX_ATTENUATION_STRENGTH: f32 = 1.0;
    /// FFT length in samples
    pub const DEFAULT_FRAME_SIZE: usize = 2048;
    /// Frame advance in samples, a quarter frame
    pub const DEFAULT_HOP_SIZE: usize = 512;
    /// Smallest accepted frame
    pub const MIN_FRAME_SIZE: usize = 16;
    /// Largest accepted frame
    pub const MAX_FRAME_SIZE: usize = 65536;
    /// Bins may be driven all the way to zero
    pub const DEFAULT_SPECTRAL_FLOOR: f32 = 0.0;

    /// Overlap-add positions whose summed squared window falls below this are left silent
    pub const WINDOW_SUM_EPSILON: f32 = 1e-8;
}

/// Signal-to-noise evaluation constants
pub mod snr {
    /// Added to the noise power so a silent residual never divides by zero
    pub const NOISE_POWER_EPSILON: f64 = 1e-10;
}

/// Export constants
pub mod export {
    /// WAV sample width
    pub const DEFAULT_BIT_DEPTH: u16 = 16;
    /// WAV sample widths the encoder accepts
    pub const SUPPORTED_BIT_DEPTHS: &[u16] = &[16, 24];
    /// MP3 constant bitrate
    pub const DEFAULT_BITRATE_KBPS: u32 = 192;
    /// Lowest MP3 bitrate accepted
    pub const MIN_BITRATE_KBPS: u32 = 32;
    /// Highest MP3 bitrate accepted
    pub const MAX_BITRATE_KBPS: u32 = 320;
}

/// Decoded input constants
pub mod input {
    /// Recommended upload ceiling; larger files are processed with a warning
    pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;
}

/// Visualization constants
pub mod visual {
    /// Spectrogram FFT length
    pub const DEFAULT_FFT_SIZE: usize = 2048;
    /// Spectrogram frame advance
    pub const DEFAULT_HOP_SIZE: usize = 512;
    /// Dynamic range kept below the loudest cell
    pub const DEFAULT_TOP_DB: f32 = 80.0;
    /// Magnitude floor before taking the logarithm
    pub const AMPLITUDE_MIN: f32 = 1e-5;
    /// Envelope buckets for long waveforms
    pub const DEFAULT_MAX_WAVEFORM_POINTS: usize = 4000;
}

/// Configuration loading constants
pub mod paths {
    /// Prefix for environment overrides, e.g. `AUDIOVIVE_DENOISE__FRAME_SIZE`
    pub const ENV_PREFIX: &str = "AUDIOVIVE";
    /// Nesting separator in environment variable names
    pub const ENV_SEPARATOR: &str = "__";
    /// File picked up from the working directory when present
    pub const DEFAULT_CONFIG_FILE: &str = "audiovive.toml";
}
