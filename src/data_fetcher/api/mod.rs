pub mod client;
pub mod endpoints;
pub mod http_client;

// Re-export the upstream client and request key
pub use client::UpstreamClient;
pub use endpoints::EndpointRequest;
pub use http_client::create_http_client;
