//! Primitives shared by the header-relay core and contract crates: fixed-width
//! byte newtypes, the tagged error type, and the traits standing in for the
//! native-service runtime (storage, witness checks, hashing, wrap/unwrap).

pub mod bytes;
pub mod error;
pub mod host;

pub use bytes::{Address16, Address20, Hash32};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use host::{HostEnv, Storage};
