use {
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{self, File, OpenOptions},
        io::Write,
        path::{Path, PathBuf},
        sync::Mutex,
        time::{SystemTime, UNIX_EPOCH},
    },
};

/// Environment variable that overrides the default level filter.
pub const LOG_LEVEL_ENV: &str = "STATION_LOG";

/// Wall-clock time broken down in UTC, to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcTime {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl UtcTime {
    pub fn now() -> Self {
        // a clock before 1970 is treated as the epoch itself
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    pub fn from_unix(secs: u64) -> Self {
        let (year, month, day) = civil_from_days((secs / 86400) as i64);
        let time_of_day = (secs % 86400) as u32;
        Self {
            year,
            month,
            day,
            hour: time_of_day / 3600,
            minute: time_of_day % 3600 / 60,
            second: time_of_day % 60,
        }
    }

    /// `YYYY-MM-DD`, also the name of the day's log file.
    pub fn date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `YYYY-MM-DDTHH:MM:SS`
    pub fn timestamp(&self) -> String {
        format!(
            "{}T{:02}:{:02}:{:02}",
            self.date(),
            self.hour,
            self.minute,
            self.second
        )
    }
}

// Howard Hinnant's days-to-civil algorithm
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

fn format_line(now: &UtcTime, record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {}:{} - {}",
        now.timestamp(),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Logs every record to stdout.
pub struct StdoutLogger;

impl Log for StdoutLogger {
    // the global max level does the filtering
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_line(&UtcTime::now(), record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

/// Logs into one file per UTC day, `<dir>/YYYY-MM-DD.log`, and mirrors
/// every line to stdout.
pub struct FileLogger {
    day: Mutex<DayFile>,
}

struct DayFile {
    dir: PathBuf,
    date: String,
    file: File,
}

fn append_to(dir: &Path, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", date)))
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let date = UtcTime::now().date();
        let file = append_to(&dir, &date)?;
        Ok(Self {
            day: Mutex::new(DayFile { dir, date, file }),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let now = UtcTime::now();
        let line = format_line(&now, record);
        println!("{}", line);

        let mut day = self.day.lock().unwrap_or_else(|e| e.into_inner());
        let date = now.date();
        if date != day.date {
            // keep writing to the old file if the new one cannot be opened
            match append_to(&day.dir, &date) {
                Ok(file) => {
                    day.file = file;
                    day.date = date;
                }
                Err(error) => eprintln!("cannot open log file for {} in {:?}: {}", date, day.dir, error),
            }
        }
        if let Err(error) = writeln!(day.file, "{}", line) {
            eprintln!("cannot write log file: {}", error);
        }
    }

    fn flush(&self) {
        let mut day = self.day.lock().unwrap_or_else(|e| e.into_inner());
        day.file.flush().ok();
        std::io::stdout().flush().ok();
    }
}

/// Parse a level filter name ("error", "warn", "info", "debug", "trace", "off").
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Level filter for this process.
///
/// `STATION_LOG` wins when it holds a valid level name; otherwise debug
/// builds log at Debug and release builds at Info.
pub fn max_level() -> LevelFilter {
    if let Some(level) = std::env::var(LOG_LEVEL_ENV).ok().as_deref().and_then(parse_level) {
        return level;
    }
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install [`StdoutLogger`] as the global logger. Later calls are ignored.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level());
    }
}

/// Install a [`FileLogger`] writing into `dir` as the global logger.
///
/// Fails only if the directory or today's file cannot be created. Later
/// calls are ignored.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let logger = FileLogger::new(dir)?;
    // set_logger needs a &'static; the leak happens once per process
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(max_level());
    }
    Ok(())
}
