pub mod engine;
pub mod payload;
pub mod service;

pub use engine::{BarcodeEngine, RawBarcode, ScriptedEngine};
pub use payload::{DecodedPayload, PayloadKind, ScanCode};
pub use service::DecoderAdapter;
