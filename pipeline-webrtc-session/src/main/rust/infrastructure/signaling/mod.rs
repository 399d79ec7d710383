mod http_signaling_client;

pub use http_signaling_client::{resolve_resource_url, HttpSignalingClient, SDP_CONTENT_TYPE};
