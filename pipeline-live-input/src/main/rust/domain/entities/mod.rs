mod live_input;

pub use live_input::LiveInput;
