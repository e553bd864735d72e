use {
    crate::LinkError,
    tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits},
};

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub path: String,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyS0".to_string(),
            baud_rate: 115_200,
        }
    }
}

impl SerialConfig {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// Open the serial port as an async byte stream, 8N1 without flow control.
///
/// Must be called from within a tokio runtime.
pub fn open_serial(config: &SerialConfig) -> Result<SerialStream, LinkError> {
    let stream = tokio_serial::new(&config.path, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open_native_async()?;
    log::info!("link: opened {} at {} baud", config.path, config.baud_rate);
    Ok(stream)
}
