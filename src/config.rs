use anyhow::{anyhow, Result};
use clap::Parser;

use crate::dates::is_valid_date;
use crate::units::UnitPreference;

pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_LAUNCH_URL: &str =
    "https://ll.thespacedevs.com/2.2.0/launch/upcoming/?limit=1&hide_recent_previous=true";
pub const DEFAULT_ISS_PASS_URL: &str = "http://api.open-notify.org/iss-pass.json";
pub const DEFAULT_DONKI_URL: &str = "https://api.nasa.gov/DONKI";
pub const DEFAULT_CORS_PROXY: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_PREFS_PATH: &str = "./neowatch_prefs.toml";

// New York City, used when no home location is configured.
pub const DEFAULT_HOME_LAT: f64 = 40.7128;
pub const DEFAULT_HOME_LON: f64 = -74.006;

/// neowatch - Near-Earth Object watcher
///
/// Terminal panel for NASA's NeoWs feed with metric/imperial units, plus a
/// highlights timeline (launches, ISS, space weather) and the APOD caption.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "neowatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Near-Earth Object watcher", long_about = None)]
pub struct CliArgs {
    /// NASA API key (https://api.nasa.gov)
    #[arg(long, env = "NASA_API_KEY")]
    pub nasa_api_key: Option<String>,

    /// NeoWs feed endpoint
    #[arg(long, env = "NEO_FEED_URL")]
    pub neo_feed_url: Option<String>,

    /// APOD endpoint
    #[arg(long, env = "APOD_URL")]
    pub apod_url: Option<String>,

    /// Launch Library upcoming-launch endpoint (full URL including query)
    #[arg(long, env = "LAUNCH_URL")]
    pub launch_url: Option<String>,

    /// Open Notify ISS pass endpoint
    #[arg(long, env = "ISS_PASS_URL")]
    pub iss_pass_url: Option<String>,

    /// DONKI base URL (GST and CME are appended)
    #[arg(long, env = "DONKI_URL")]
    pub donki_url: Option<String>,

    /// CORS proxy of the `?url=` kind, used for the ISS endpoint
    #[arg(long, env = "CORS_PROXY_URL")]
    pub cors_proxy_url: Option<String>,

    /// Date to show on startup (yyyy-mm-dd, default today)
    #[arg(short, long, env = "NEO_DATE")]
    pub date: Option<String>,

    /// Unit system: metric or imperial (persisted)
    #[arg(short, long, env = "UNITS", value_parser = clap::value_parser!(UnitPreference))]
    pub units: Option<UnitPreference>,

    /// Path to the TOML file holding the unit preference
    #[arg(long, env = "PREFS_PATH")]
    pub prefs_path: Option<String>,

    /// Latitude used for ISS pass predictions (-90..90)
    #[arg(long, env = "HOME_LAT", allow_hyphen_values = true)]
    pub home_lat: Option<f64>,

    /// Longitude used for ISS pass predictions (-180..180)
    #[arg(long, env = "HOME_LON", allow_hyphen_values = true)]
    pub home_lon: Option<f64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Print the panel once as plain text and exit
    #[arg(long)]
    pub plain: bool,

    /// Skip the highlights timeline and APOD
    #[arg(long)]
    pub no_highlights: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub nasa_api_key: String,
    pub neo_feed_url: String,
    pub apod_url: String,
    pub launch_url: String,
    pub iss_pass_url: String,
    pub donki_url: String,
    pub cors_proxy_url: Option<String>,
    pub date: Option<String>,
    pub units: Option<UnitPreference>,
    pub prefs_path: String,
    pub home_lat: f64,
    pub home_lon: f64,
    pub render_fps: u32,
    pub plain: bool,
    pub highlights: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            nasa_api_key: DEFAULT_API_KEY.to_string(),
            neo_feed_url: crate::neo_api::DEFAULT_FEED_URL.to_string(),
            apod_url: DEFAULT_APOD_URL.to_string(),
            launch_url: DEFAULT_LAUNCH_URL.to_string(),
            iss_pass_url: DEFAULT_ISS_PASS_URL.to_string(),
            donki_url: DEFAULT_DONKI_URL.to_string(),
            cors_proxy_url: None,
            date: None,
            units: None,
            prefs_path: DEFAULT_PREFS_PATH.to_string(),
            home_lat: DEFAULT_HOME_LAT,
            home_lon: DEFAULT_HOME_LON,
            render_fps: 30,
            plain: false,
            highlights: true,
        }
    }
}

impl Config {
    /// Browser defaults: Open Notify is HTTP-only, so it goes through the
    /// CORS proxy to avoid mixed content.
    pub fn web_default() -> Self {
        Config {
            cors_proxy_url: Some(DEFAULT_CORS_PROXY.to_string()),
            ..Config::default()
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Resolve parsed arguments into a validated [`Config`].
pub fn from_args(args: CliArgs) -> Result<Config> {
    let defaults = Config::default();

    let nasa_api_key = args
        .nasa_api_key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or(defaults.nasa_api_key);

    let neo_feed_url = args.neo_feed_url.unwrap_or(defaults.neo_feed_url);
    validate_url(&neo_feed_url, "NEO_FEED_URL")?;

    let apod_url = args.apod_url.unwrap_or(defaults.apod_url);
    validate_url(&apod_url, "APOD_URL")?;

    let launch_url = args.launch_url.unwrap_or(defaults.launch_url);
    validate_url(&launch_url, "LAUNCH_URL")?;

    let iss_pass_url = args.iss_pass_url.unwrap_or(defaults.iss_pass_url);
    validate_url(&iss_pass_url, "ISS_PASS_URL")?;

    let donki_url = args.donki_url.unwrap_or(defaults.donki_url);
    validate_url(&donki_url, "DONKI_URL")?;

    // CORS proxy is optional; an empty value disables it
    let cors_proxy_url = args.cors_proxy_url.filter(|u| !u.is_empty());
    if let Some(ref url) = cors_proxy_url {
        validate_url(url, "CORS_PROXY_URL")?;
    }

    let date = args.date.filter(|d| !d.trim().is_empty());
    if let Some(ref d) = date {
        if !is_valid_date(d) {
            return Err(anyhow!("NEO_DATE must be a yyyy-mm-dd date, got '{d}'"));
        }
    }

    let home_lat = validate_in_range(
        args.home_lat.unwrap_or(defaults.home_lat),
        -90.0,
        90.0,
        "HOME_LAT",
    )?;
    let home_lon = validate_in_range(
        args.home_lon.unwrap_or(defaults.home_lon),
        -180.0,
        180.0,
        "HOME_LON",
    )?;

    let render_fps = validate_in_range(
        args.render_fps.unwrap_or(defaults.render_fps),
        1,
        120,
        "RENDER_FPS",
    )?;

    Ok(Config {
        nasa_api_key,
        neo_feed_url,
        apod_url,
        launch_url,
        iss_pass_url,
        donki_url,
        cors_proxy_url,
        date,
        units: args.units,
        prefs_path: args.prefs_path.unwrap_or(defaults.prefs_path),
        home_lat,
        home_lon,
        render_fps,
        plain: args.plain,
        highlights: !args.no_highlights,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Print current configuration (useful for debugging)
impl Config {
    pub fn print_summary(&self) {
        eprintln!("neowatch Configuration:");
        eprintln!("  NeoWs feed: {}", self.neo_feed_url);
        eprintln!(
            "  API key: {}",
            if self.nasa_api_key == DEFAULT_API_KEY { "DEMO_KEY (rate limited)" } else { "Configured" }
        );
        eprintln!("  Date: {}", self.date.as_deref().unwrap_or("today"));
        if let Some(units) = self.units {
            eprintln!("  Units: {units}");
        }
        eprintln!("  Prefs: {}", self.prefs_path);
        eprintln!("  Render FPS: {}", self.render_fps);
        if self.highlights {
            eprintln!("  Home: {:.4}, {:.4}", self.home_lat, self.home_lon);
            if let Some(ref proxy) = self.cors_proxy_url {
                eprintln!("  CORS proxy: {proxy}");
            }
        }
    }
}
