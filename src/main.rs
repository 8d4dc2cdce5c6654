use web_sys::UrlSearchParams;
use yew::prelude::*;

use jigsaw_puzzle::{GridSpec, JigsawPuzzle, PuzzleError, DEFAULT_COLUMNS, DEFAULT_ROWS};

const DEMO_IMAGE_SRC: &str = "https://images.unsplash.com/photo-1595045051853-05ef47bdfdbe?3D&ixlib=rb-1.2.1&auto=format&fit=crop&w=1050&q=80";

#[derive(Clone, Debug, PartialEq)]
struct DemoConfig {
    image_src: String,
    rows: u32,
    columns: u32,
    seed: Option<u32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            image_src: DEMO_IMAGE_SRC.to_string(),
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            seed: None,
        }
    }
}

fn parse_optional_seed(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (value, radix) = if let Some(rest) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        (rest, 16)
    } else {
        (trimmed, 10)
    };
    u32::from_str_radix(value, radix).ok()
}

fn parse_dimension(raw: Option<String>, fallback: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(fallback)
}

fn demo_config_from_query(search: &str) -> DemoConfig {
    let defaults = DemoConfig::default();
    let Ok(params) = UrlSearchParams::new_with_str(search) else {
        return defaults;
    };
    let image_src = params
        .get("src")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or(defaults.image_src);
    DemoConfig {
        image_src,
        rows: parse_dimension(params.get("rows"), defaults.rows),
        columns: parse_dimension(params.get("cols"), defaults.columns),
        seed: params.get("seed").as_deref().and_then(parse_optional_seed),
    }
}

fn load_demo_config() -> DemoConfig {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .map(|search| demo_config_from_query(&search))
        .unwrap_or_default()
}

#[function_component(Demo)]
fn demo() -> Html {
    let config = use_state(load_demo_config);
    let solved = use_state(|| false);
    let load_error = use_state(|| None::<String>);

    let on_solved = {
        let solved = solved.clone();
        Callback::from(move |()| {
            gloo::console::log!("puzzle solved");
            solved.set(true);
        })
    };
    let on_load_error = {
        let load_error = load_error.clone();
        Callback::from(move |err: PuzzleError| {
            load_error.set(Some(err.to_string()));
        })
    };

    let grid_label = GridSpec::new(config.rows, config.columns)
        .map(|grid| grid.label())
        .unwrap_or_else(|err| err.to_string());
    let status = if let Some(message) = (*load_error).clone() {
        html! { <p class="demo-status demo-status--error">{ message }</p> }
    } else if *solved {
        html! { <p class="demo-status demo-status--solved">{ "Solved!" }</p> }
    } else {
        html! { <p class="demo-status">{ grid_label }</p> }
    };

    html! {
        <main class="demo">
            { status }
            <JigsawPuzzle
                image_src={config.image_src.clone()}
                rows={config.rows}
                columns={config.columns}
                seed={config.seed}
                on_solved={on_solved}
                on_load_error={on_load_error}
            />
        </main>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<Demo>::new().render();
}
