// =============================================================================
// Feature Extraction Module
// =============================================================================
//
// Turns a candle series into a fixed-shape `FeatureBundle`:
// - bundle:    the record itself plus aggregate helpers and flattening
// - extractor: the indicator pipeline that fills it

pub mod bundle;
pub mod extractor;

pub use bundle::{
    FeatureBundle, MacdFeatures, WindowFeatures, FEATURE_VECTOR_LEN, FEATURE_WINDOWS,
    LONG_WINDOWS, SHORT_WINDOWS,
};
pub use extractor::extract_features;
