use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use reticle_cli::{
    Controller, HotkeyOptions, LoggingClicker, SimulatedKeys, commands, logging, readline,
};
use reticle_overlay::{HeadlessSurfaceProvider, SurfaceProvider};

const SCREEN_WIDTH: u32 = 1920;
const SCREEN_HEIGHT: u32 = 1080;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _guard = logging::init();

    let provider: Arc<dyn SurfaceProvider> =
        Arc::new(HeadlessSurfaceProvider::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let controller = Controller::new(provider, Arc::new(LoggingClicker));
    let keys = SimulatedKeys::new();
    controller
        .start_hotkeys(Arc::new(keys.clone()), HotkeyOptions::default())
        .await;

    loop {
        let Some(line) = readline()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &controller, &keys).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    controller.shutdown().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "crosshair overlay console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Toggle,
    Size {
        value: u32,
    },
    Thickness {
        value: u32,
    },
    Color {
        value: String,
    },
    Rgb {
        state: String,
    },
    Fade {
        state: String,
    },
    Clicker,
    Delay {
        seconds: f64,
    },
    Button {
        value: String,
    },
    Press {
        key: String,
        #[arg(default_value_t = 50)]
        hold_ms: u64,
    },
    Status,
    #[command(alias = "exit")]
    Quit,
}

async fn respond(line: &str, controller: &Controller, keys: &SimulatedKeys) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "reticle".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Toggle) => commands::toggle_crosshair(controller).await,
        Some(Commands::Size { value }) => commands::set_size(controller, *value).await,
        Some(Commands::Thickness { value }) => commands::set_thickness(controller, *value).await,
        Some(Commands::Color { value }) => commands::set_color(controller, value).await,
        Some(Commands::Rgb { state }) => commands::set_rgb_cycle(controller, state).await,
        Some(Commands::Fade { state }) => commands::set_fade(controller, state).await,
        Some(Commands::Clicker) => commands::toggle_clicker(controller).await,
        Some(Commands::Delay { seconds }) => commands::set_delay(controller, *seconds).await,
        Some(Commands::Button { value }) => commands::set_button(controller, value).await,
        Some(Commands::Press { key, hold_ms }) => commands::press(keys, key, *hold_ms),
        Some(Commands::Status) => commands::status(controller),
        Some(Commands::Quit) => {
            commands::quit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
