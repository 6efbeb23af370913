//! Message buffer pool
//!
//! Every message lives in a pool slot from the moment it is sent until the
//! consuming task has finished with it. Producers allocate, the consumer
//! releases, exactly once per message.

pub mod buffer;

pub use buffer::{MessageHandle, MessagePool, PoolExhausted, PoolStats};

/// Number of message slots shared by all tasks
pub const MESSAGE_POOL_SIZE: usize = 16;
