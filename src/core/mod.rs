pub mod block;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod export;
pub mod format;
pub mod session;
pub mod timebase;
pub mod value;
