pub mod automation_value;
pub mod codec;
pub mod color;
pub mod device_state;
pub mod host;
pub mod settings;
