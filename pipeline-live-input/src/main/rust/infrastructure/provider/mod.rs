mod http_stream_provider;

pub use http_stream_provider::HttpStreamProvider;
