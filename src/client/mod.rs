pub mod scope;
pub use scope::*;

pub mod rpc_client;
pub use rpc_client::*;

pub mod reconnect;
pub use reconnect::*;
