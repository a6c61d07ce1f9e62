// HTTP transport module.
// Request options, the response wrapper, and the client seam the fetcher talks to.

pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpClient, ReqwestClient};
pub use request::FetchOptions;
pub use response::{BodyStream, HttpResponse};
