use {
    bridge::BridgeConfig,
    link::SerialConfig,
    qr::{ChannelOrder, ModelConfig},
    std::{fmt, path::PathBuf, time::Duration},
    store::{StoreConfig, StoreError},
    video::{VideoInConfig, v4l2::V4l2Config},
};

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "smart_dorm_parcel";

// delay between startup and reconnect attempts
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum ConfigError {
    Invalid { name: String, value: String },
    Store(StoreError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { name, value } => write!(f, "invalid value for {name}: {value:?}"),
            ConfigError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<StoreError> for ConfigError {
    fn from(err: StoreError) -> Self {
        ConfigError::Store(err)
    }
}

/// Everything the station binary needs, read from the environment.
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub serial: SerialConfig,
    pub camera: V4l2Config,
    pub video: VideoInConfig,
    /// Second decoding strategy; classic decoding only when `None`.
    pub model: Option<ModelConfig>,
    pub bridge: BridgeConfig,
    pub store: StoreConfig,
    /// Log to date-named files here instead of stdout only.
    pub log_dir: Option<PathBuf>,
    pub retry_delay: Duration,
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_channel_order(name: &str, value: &str) -> Result<ChannelOrder, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "rgb" => Ok(ChannelOrder::Rgb),
        "bgr" => Ok(ChannelOrder::Bgr),
        _ => Err(ConfigError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// `/dev/videoN` for a bare index, the path itself otherwise.
fn camera_path(value: &str) -> PathBuf {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        PathBuf::from(format!("/dev/video{}", value))
    } else {
        PathBuf::from(value)
    }
}

impl StationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut serial = SerialConfig::default();
        if let Some(path) = var("STATION_SERIAL_PORT") {
            serial = serial.with_path(path.trim());
        }
        if let Some(baud_rate) = var("STATION_BAUD_RATE") {
            serial = serial.with_baud_rate(parse_number("STATION_BAUD_RATE", &baud_rate)?);
        }

        let mut camera = V4l2Config::default();
        if let Some(camera_var) = var("STATION_CAMERA") {
            camera = camera.with_path(camera_path(&camera_var));
        }

        let model = match var("STATION_MODEL_PATH") {
            Some(path) => {
                let mut model = ModelConfig::new(path.trim());
                if let Some(size) = var("STATION_MODEL_INPUT_SIZE") {
                    model = model.with_input_size(parse_number("STATION_MODEL_INPUT_SIZE", &size)?);
                }
                if let Some(conf) = var("STATION_MODEL_CONFIDENCE") {
                    model = model.with_conf_threshold(parse_number("STATION_MODEL_CONFIDENCE", &conf)?);
                }
                if let Some(iou) = var("STATION_MODEL_IOU") {
                    model = model.with_iou_threshold(parse_number("STATION_MODEL_IOU", &iou)?);
                }
                if let Some(order) = var("STATION_MODEL_CHANNELS") {
                    model = model
                        .with_channel_order(parse_channel_order("STATION_MODEL_CHANNELS", &order)?);
                }
                if let Some(padding) = var("STATION_MODEL_CROP_PADDING") {
                    model = model
                        .with_crop_padding(parse_number("STATION_MODEL_CROP_PADDING", &padding)?);
                }
                Some(model)
            }
            None => None,
        };

        let mut bridge = BridgeConfig::default();
        if let Some(path) = lookup("STATION_DEBUG_FRAME") {
            let path = path.trim();
            bridge = bridge.with_debug_frame_path(match path {
                "" | "off" | "none" => None,
                path => Some(PathBuf::from(path)),
            });
        }

        let mut store = match var("DATABASE_URL") {
            Some(url) => StoreConfig::from_url(url.trim())?,
            None => {
                let port = match var("DB_PORT") {
                    Some(port) => Some(parse_number("DB_PORT", &port)?),
                    None => None,
                };
                StoreConfig::from_parts(
                    var("DB_HOST").as_deref().unwrap_or(DEFAULT_DB_HOST),
                    port,
                    var("DB_USER").as_deref().unwrap_or(DEFAULT_DB_USER),
                    lookup("DB_PASSWORD").as_deref().unwrap_or(""),
                    var("DB_NAME").as_deref().unwrap_or(DEFAULT_DB_NAME),
                )
            }
        };
        if let Some(flag) = var("STATION_ENSURE_SCHEMA") {
            store = store.with_ensure_schema(parse_flag("STATION_ENSURE_SCHEMA", &flag)?);
        }

        Ok(Self {
            serial,
            camera,
            video: VideoInConfig::default(),
            model,
            bridge,
            store,
            log_dir: var("STATION_LOG_DIR").map(|dir| PathBuf::from(dir.trim())),
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }
}
