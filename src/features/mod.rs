pub mod codec;
pub mod preprocessing;
pub mod scaler;

pub use codec::{FeatureCodec, FeatureVector, ScaledFeatureVector, FEATURE_COLUMNS, NUM_FEATURES, TARGET_COLUMN};
pub use preprocessing::{preprocess_options_data, OptionQuote, PreparedDataset};
pub use scaler::{MinMaxScaler, Scaler};
