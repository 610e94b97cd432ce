mod command;
mod executor;
mod lease;
mod pending_reads;
mod pending_writes;
mod request;
mod response;
mod time;

pub use command::Command;
pub use command::PendingResponse;
pub use command::SubmitError;
pub use pending_reads::ReadIndexToken;
pub use pending_reads::ReadSeqNo;
pub use request::CmdRequest;
pub use request::CorrelationId;
pub use request::Request;
pub use request::RequestHeader;
pub use response::CmdError;
pub use response::CmdResponse;
pub use response::Response;
pub use response::ResponseHeader;

pub(crate) use executor::CellExecutor;
pub(crate) use executor::ExecutorConfig;
pub(crate) use time::Clock;
pub(crate) use time::RealClock;
