use clap::{App, Arg};
use rapport::{
    client::HttpApi,
    config::Config,
    geo::LatLon,
    layer::{BaseLayer, LayerId},
    open_map, snapshot,
    vis::{GeoJsonBuilder, MapBuilder, VisBuilder},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// opens the map against a running server, replays clicks and popups,
/// and writes what the map shows afterwards
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("map viewer")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .value_name("*.json")
                .help("json config file"),
        )
        .arg(
            Arg::with_name("server")
                .short("s")
                .long("server")
                .takes_value(true)
                .help("map server base url"),
        )
        .arg(
            Arg::with_name("variant")
                .long("variant")
                .takes_value(true)
                .possible_values(&["airports", "cities"]),
        )
        .arg(
            Arg::with_name("country scheme")
                .long("country-scheme")
                .takes_value(true)
                .possible_values(&["population", "coverage", "featureclass"]),
        )
        .arg(
            Arg::with_name("satellite")
                .long("satellite")
                .help("satellite tiles instead of the street map"),
        )
        .arg(
            Arg::with_name("click")
                .long("click")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("lat,lon")
                .help("click the map, in order"),
        )
        .arg(
            Arg::with_name("popup")
                .long("popup")
                .takes_value(true)
                .value_name("layer:lat,lon")
                .help("open a popup on a feature after the clicks"),
        )
        .arg(
            Arg::with_name("close popup")
                .long("close-popup")
                .help("close the popup again, clearing points and lines"),
        )
        .arg(
            Arg::with_name("hide")
                .long("hide")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("hide a layer"),
        )
        .arg(
            Arg::with_name("out file")
                .short("o")
                .help("output file")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("static image")
                .long("image")
                .short("i")
                .help("write a png instead of geojson"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("more logging"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let mut config = match matches.value_of("config") {
        Some(file) => Config::from_file(file)?,
        None => Config::default(),
    };
    if let Some(server) = matches.value_of("server") {
        config.server = server.to_string();
    }
    if let Some(variant) = matches.value_of("variant") {
        config.variant = variant.parse()?;
    }
    if let Some(scheme) = matches.value_of("country scheme") {
        config.country_scheme = scheme.parse()?;
    }
    if matches.is_present("satellite") {
        config.base = BaseLayer::Satellite;
    }
    let api = HttpApi::new(&config.server, config.timeout())?;
    let session = open_map(api, &config).await;
    info!(server = %config.server, "map opened");

    // press the placing button so replayed clicks count
    if !session.placing().accepts_clicks() {
        session.toggle_placing();
    }

    for click in matches.values_of("click").into_iter().flatten() {
        let at: LatLon = click.parse()?;
        let outcome = session.click(at).await;
        info!(?at, ?outcome, "click");
    }

    if let Some(popup) = matches.value_of("popup") {
        let (layer, at) = popup
            .split_once(':')
            .ok_or("popup must look like layer:lat,lon")?;
        let layer: LayerId = layer.parse()?;
        let at: LatLon = at.parse()?;
        let outcome = session.popup_open(layer, at).await;
        info!(%layer, ?at, ?outcome, "popup");
    }
    if matches.is_present("close popup") {
        session.popup_close().await;
    }

    for layer in matches.values_of("hide").into_iter().flatten() {
        session.set_visible(layer.parse()?, false).await;
    }

    let view = snapshot(session.view()).await;
    let out_file = matches.value_of("out file").unwrap();

    let mut map_builder;
    let mut geo_builder;
    let builder: &mut dyn VisBuilder = if matches.is_present("static image") {
        map_builder = MapBuilder::new(config.width, config.height, config.tiles(view.base))?;
        &mut map_builder
    } else {
        geo_builder = GeoJsonBuilder::new();
        &mut geo_builder
    };

    builder.view(&view)?;
    builder.save(out_file)?;
    info!(out_file, "written");

    Ok(())
}
