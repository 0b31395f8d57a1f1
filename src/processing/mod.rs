// src/processing/mod.rs
//! Signal processing stages for audio restoration

pub mod evaluation;
pub mod filters;
pub mod noise_reduction;
pub mod pipeline;
pub mod stft;
pub mod windowing;

pub use evaluation::*;
pub use filters::{apply_notch, Filter, NotchFilter};
pub use noise_reduction::*;
pub use pipeline::*;
pub use stft::Stft;
pub use windowing::*;
