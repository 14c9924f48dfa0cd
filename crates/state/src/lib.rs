//! # nsi-state
//!
//! Network State Index of a single extracellular field-potential channel:
//! a continuous measure of whether the local network is in a rhythmic
//! (synchronized) or an activated (desynchronized) state, plus the time
//! points where that measure is locally stable.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Signal"] -->|"build_power_envelope(&signal, &EnvelopeConfig)?"| B["PowerEnvelope (pLFP, p0)"]
//!     B -->|"rhythmicity(&env, &IndexConfig)?"| C["RhythmicityFeatures"]
//!     C -->|"network_state_index(..)?"| D["NSI series"]
//!     D -->|"validate_states(..)?"| E["StateValidation"]
//!     B -.->|"compute_nsi / recompute_nsi"| F["NetworkStateIndex"]
//!     A -.->|"analyze(&signal, &NsiConfig)?"| G["NsiAnalysis"]
//! ```
//!
//! ## Sign convention
//!
//! | NSI | State |
//! |-----|-------|
//! | `> 0` | activated: envelope above baseline without low-frequency rhythm |
//! | `<= 0` | rhythmic / synchronized |
//!
//! ## Quick Start
//!
//! ```ignore
//! use nsi_state::{NsiConfig, analyze};
//! use nsi_wavelet::Signal;
//!
//! let signal = Signal::new(samples, 1e-3)?;
//! let analysis = analyze(&signal, &NsiConfig::default())?;
//! for state in analysis.index().validation().states() {
//!     println!("{:.3} s: {:+.3}", state.time, state.value);
//! }
//! ```

mod config;
mod envelope;
mod error;
mod index;
mod pipeline;
mod validate;

pub use config::{
    DEFAULT_ALPHA, DEFAULT_N_WAVELETS, DEFAULT_NEW_DT, DEFAULT_PERCENTILE_FOR_P0,
    DEFAULT_SMOOTHING, DEFAULT_T_SLIDING_MEAN, DEFAULT_T_STATE, EnvelopeConfig, IndexConfig,
    NsiConfig, ValidationTolerance, default_band_factor, default_root_freq,
};
pub use envelope::{PowerEnvelope, build_power_envelope};
pub use error::{NsiError, Stage};
pub use index::{RhythmicityFeatures, heaviside, network_state_index, rhythmicity};
pub use pipeline::{NetworkStateIndex, NsiAnalysis, analyze, compute_nsi, recompute_nsi};
pub use validate::{StateValidation, ValidatedState, validate_states};
