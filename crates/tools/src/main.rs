use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use foundation::math::{LatLon, LowPrecisionEphemeris};
use foundation::{ClockTime, MountClock, PlaceId};
use layers::SunProjector;
use remote::{HttpApi, SunApi};
use tools::TextSurface;
use tools::render::{detail_lines, dropdown_lines, nearby_lines};
use tracing::info;
use tracing_subscriber::EnvFilter;
use web::pages::{DetailPage, LocatePage, NearbyPage};
use web::{ClientConfig, FixedGeolocator, Geolocator, History, MemoryHistory, Navigation, Route};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find sunny terraces from the terminal")]
struct Args {
    /// Base API URL (default: TERRACE_API_URL or the local proxy)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search terraces and addresses at the same time
    Search {
        text: String,
    },

    /// Jump to the nearby view from a position
    Locate {
        /// Position reported by the device: lat,lon (unset: no geolocation)
        #[arg(long)]
        at: Option<String>,
    },

    /// Map and list of terraces around a point
    Nearby {
        #[arg(long)]
        lat: Option<String>,

        #[arg(long)]
        lon: Option<String>,

        /// Time of day, HH:MM (default: now)
        #[arg(long)]
        time: Option<String>,

        /// Pan the map to lat,lon after the first load
        #[arg(long)]
        pan: Option<String>,
    },

    /// Sunshine timeline of one terrace
    Detail {
        id: u64,

        /// YYYY-MM-DD (default: today on the service)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Index of the slot to inspect
        #[arg(long)]
        hover: Option<usize>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        cfg.api_url = url;
    }
    let mut http = HttpApi::new(cfg.api_url.clone());
    if let Some(radius) = cfg.nearby_radius_m {
        http = http.with_radius(radius);
    }
    let api: Arc<dyn SunApi> = Arc::new(http);
    info!(api = %cfg.api_url, "client configured");

    match args.command {
        Command::Search { text } => search(api, &cfg, &text).await,
        Command::Locate { at } => locate(api, &cfg, at.as_deref()).await,
        Command::Nearby {
            lat,
            lon,
            time,
            pan,
        } => nearby(api, &cfg, lat, lon, time.as_deref(), pan.as_deref()).await,
        Command::Detail { id, date, hover } => {
            detail(api, &cfg, PlaceId::new(id), date, hover).await
        }
    }
}

fn parse_lat_lon(raw: &str) -> Result<LatLon, Box<dyn Error>> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon: {raw:?}"))?;
    let point = LatLon::checked(lat.trim().parse()?, lon.trim().parse()?)
        .ok_or_else(|| format!("coordinates out of range: {raw:?}"))?;
    Ok(point)
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}

fn follow(history: &mut MemoryHistory, navigation: Vec<Navigation>) {
    for nav in navigation {
        history.apply(nav);
    }
    println!("-> {}", history.current().to_url());
}

async fn search(
    api: Arc<dyn SunApi>,
    cfg: &ClientConfig,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    let mut page = LocatePage::new(api, None, cfg);
    page.search_mut().input(text);
    page.settle().await;
    let lines = dropdown_lines(&page.search().dropdown());
    if lines.is_empty() {
        println!("Type at least {} characters", cfg.place_min_chars);
    }
    print_lines(lines);
    Ok(())
}

async fn locate(
    api: Arc<dyn SunApi>,
    cfg: &ClientConfig,
    at: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let geolocator: Option<Arc<dyn Geolocator>> = match at {
        Some(raw) => Some(Arc::new(FixedGeolocator(Ok(parse_lat_lon(raw)?)))),
        None => None,
    };
    let mut page = LocatePage::new(api, geolocator, cfg);
    page.use_my_location();
    page.settle().await;
    if let Some(message) = page.geo_message() {
        println!("{message}");
        return Ok(());
    }
    let mut history = MemoryHistory::new(Route::Home);
    follow(&mut history, page.drain_navigation());
    Ok(())
}

async fn nearby(
    api: Arc<dyn SunApi>,
    cfg: &ClientConfig,
    lat: Option<String>,
    lon: Option<String>,
    time: Option<&str>,
    pan: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let surface = TextSurface::new();
    let clock = MountClock::capture(cfg.tz);
    let mut history = MemoryHistory::new(Route::Nearby {
        lat: lat.clone(),
        lon: lon.clone(),
    });
    let mut page = NearbyPage::mount(
        api,
        surface.clone(),
        cfg,
        lat.as_deref(),
        lon.as_deref(),
        clock,
    );
    if let Some(raw) = time {
        let picked = page.set_slider(i64::from(ClockTime::parse(raw)?.minutes()));
        println!("Time {picked}");
    }
    page.settle().await;
    print_lines(surface.take_lines());
    print_lines(nearby_lines(page.weather_header().as_deref(), &page.list()));

    if let Some(raw) = pan {
        let to = parse_lat_lon(raw)?;
        let map = page.map_mut();
        map.pan_start();
        map.pan_to(to.lat, to.lon);
        map.pan_end();
        page.settle().await;
        print_lines(surface.take_lines());
        print_lines(nearby_lines(page.weather_header().as_deref(), &page.list()));
    }
    follow(&mut history, page.drain_navigation());
    drop(page);
    print_lines(surface.take_lines());
    Ok(())
}

async fn detail(
    api: Arc<dyn SunApi>,
    cfg: &ClientConfig,
    id: PlaceId,
    date: Option<NaiveDate>,
    hover: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let surface = TextSurface::new();
    let projector = SunProjector::new(Arc::new(LowPrecisionEphemeris), cfg.tz);
    let mut page = DetailPage::mount(
        api,
        surface.clone(),
        projector,
        cfg,
        id,
        date,
        MountClock::capture(cfg.tz),
    );
    page.settle().await;
    if let Some(index) = hover {
        page.hover_slot(index);
        if let Some(time) = page.selected_time() {
            println!("Selected {time}");
        }
    }
    print_lines(surface.take_lines());
    print_lines(detail_lines(&page.view()));
    drop(page);
    print_lines(surface.take_lines());
    Ok(())
}
