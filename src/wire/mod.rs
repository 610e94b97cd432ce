//! Wire shape of commands and their responses, and of the log entries the write path proposes.
mod codec;
mod convert;

pub use codec::decode_entry;
pub use codec::decode_response;
pub use codec::encode_entry;
pub use codec::encode_response;
pub use codec::WireError;
