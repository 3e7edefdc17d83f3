//! Model bundle module
//!
//! Scaler and regressor abstractions, their serialized artifact forms, and
//! the lazily loaded process-wide bundle cache.

mod artifact;
mod bundle;
pub mod regressor;
pub mod scaler;

pub use artifact::{ArtifactLoader, JsonArtifactLoader};
pub use bundle::{ModelBundle, ModelCache};
pub use regressor::{Kernel, LinearRegressor, Regressor, RegressorArtifact, SvrRegressor};
pub use scaler::{FeatureScaler, MinMaxScaler, ScalerArtifact, StandardScaler};
