use clap::{Parser, ValueEnum};
use wasm_bindgen::prelude::*;

mod app;
mod canvas;
mod http;
mod listeners;
mod spawn;
mod tauri;

/// Where the engine answers from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Transport {
    /// Tauri IPC, with pushed board updates.
    Tauri,
    /// The engine's HTTP API, without push.
    Http,
}

pub(crate) const DEFAULT_API_BASE: &str = "http://127.0.0.1:9091";
pub(crate) const DEFAULT_ROOT_ID: &str = "game";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// How commands reach the engine
    #[arg(short, long, value_enum, default_value_t = Transport::Tauri)]
    transport: Transport,

    /// Base URL of the engine's HTTP API, only used with `--transport http`
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Id of the element the view is mounted into
    #[arg(long, default_value = DEFAULT_ROOT_ID)]
    root: String,
}

impl Args {
    /// Options are passed in the location hash, e.g. `#-vv&--transport=http`.
    fn from_location_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }
}

/// Best effort description of a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|json| json.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_location_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("transport: {:?}, api base: {}", args.transport, args.api_base);

    let root = document()
        .get_element_by_id(&args.root)
        .expect("Could not find root element");

    let props = app::BoardViewProps {
        transport: args.transport,
        api_base: args.api_base.into(),
    };

    log::debug!("App started");
    yew::Renderer::<app::BoardView>::with_root_and_props(root, props).render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = Args::from_location_hash("").unwrap();
        assert_eq!(args.transport, Transport::Tauri);
        assert_eq!(args.api_base, DEFAULT_API_BASE);
        assert_eq!(args.root, DEFAULT_ROOT_ID);
    }

    #[test]
    fn hash_options_are_split_on_ampersand() {
        let args =
            Args::from_location_hash("#-vv&--transport=http&--api-base=http://localhost:8080")
                .unwrap();
        assert_eq!(args.transport, Transport::Http);
        assert_eq!(args.api_base, "http://localhost:8080");
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn unknown_transport_is_rejected() {
        assert!(Args::from_location_hash("#--transport=carrier-pigeon").is_err());
    }
}
