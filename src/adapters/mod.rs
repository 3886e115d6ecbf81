// Adapters layer: concrete implementations of the domain ports (http transport, storage).

pub mod http;
pub mod storage;

pub use http::ReqwestTransport;
pub use storage::LocalStorage;
