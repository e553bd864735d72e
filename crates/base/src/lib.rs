pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

mod rect;
pub use rect::*;

mod retry;
pub use retry::*;

mod shutdown;
pub use shutdown::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

// downstream crates can use base::log::* without a direct dependency
pub use log;
