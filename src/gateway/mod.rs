pub mod error;
pub mod gate;
pub mod guard;
pub mod range;
pub mod request;
pub mod serializer;
pub mod span;

pub use error::{GateError, GateResult};
pub use gate::RegisterGateway;
pub use request::{Outcome, Request, MAX_RANGE_WORDS};
pub use serializer::{AccessSerializer, SpanLock};
pub use span::AddrSpan;
