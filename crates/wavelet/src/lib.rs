//! # nsi-wavelet
//!
//! Amplitude-normalized complex Morlet wavelet transform for extracellular
//! field-potential analysis.
//!
//! ## Analysis Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Signal::new(samples, dt)?"] -->|"validate"| B["Signal"]
//!     F["FrequencySet::linear / geometric / band"] --> C
//!     B -->|"cwt(data, &freqs, &config)?"| C["CwtMatrix"]
//!     C --> D[".mean_magnitude()"]
//!     C --> E[".max_magnitude()"]
//! ```
//!
//! ## Kernel
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | wavelet | `exp(i·2πft) · exp(-0.5·(2πft/w0)²)` |
//! | half-width | `round(√2·w0 / (π·f) / dt)` samples |
//! | normalization | `(w0 / (2·√(2π)·f)) · (1 + exp(-w0²/2)) / dt` |
//!
//! ## Quick Start
//!
//! ```ignore
//! use nsi_wavelet::{CwtConfig, FrequencySet, Signal, cwt};
//!
//! let signal = Signal::new(samples, 1e-3)?;
//! let freqs = FrequencySet::linear(50.0, 300.0, 5)?;
//! let matrix = cwt(signal.as_slice(), &freqs, &CwtConfig::new(signal.dt()))?;
//! let envelope = matrix.mean_magnitude();
//! ```

mod cwt;
mod error;
mod frequency;
mod kernel;
mod series;

pub use cwt::{CwtConfig, CwtMatrix, cwt};
pub use error::WaveletError;
pub use frequency::FrequencySet;
pub use kernel::{DEFAULT_W0, MorletKernel, morlet, morlet_decay, norm_constant};
pub use series::Signal;
