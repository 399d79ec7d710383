mod tracing_element;

pub use tracing_element::TracingElement;
