// Shared helpers: constants, ids, storage and input validation

pub mod constants;
pub mod ids;
pub mod storage;
pub mod validation;

pub use constants::*;
pub use ids::{IdGenerator, UuidGenerator};
pub use storage::{load_json, save_json, KeyValueStore, MemoryStorage};
pub use validation::{mask_mobile, validate_mobile_no, validate_otp, validate_price};

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
