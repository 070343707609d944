//! Command-line surface: flags, help text, and the single run path.

use std::path::{Path, PathBuf};

use clap::Parser;

use rainbow_lib::RainbowError;
use rainbow_lib::backend::{BackendKind, open_backend};
use rainbow_lib::config::Config;
use rainbow_lib::dispatch;
use rainbow_lib::error::Result;

const WORDS_HELP: &str = "\
DEV_CONFIGURATION is one of:
  DEV COLOR STATUS | DEV STATUS COLOR | DEV STATUS | DEV COLOR
where:
  DEV: 'pwr' (power LED),
       'lan0', 'lan1', 'lan2', 'lan3', 'lan4' (one LAN port LED),
       'wan' (WAN port LED),
       'pci1', 'pci2', 'pci3' (one PCI LED),
       'usr1', 'usr2' (user LEDs),
       or the alias 'all' for every LED above,
                    'lan' for all LAN ports
  COLOR: a predefined colour (red, blue, green, white, black)
         or 3 bytes of RGB, so red is 'FF0000', green '00FF00',
         blue '0000FF' etc.
  STATUS: 'enable' (LED is lit), 'disable' (LED is off),
          'auto' (LED is driven by hardware, typically flashing)

'intensity' NUMBER:
  NUMBER from 0 to 100 (percent of maximum brightness).

'binmask' NUMBER:
  Use the binary representation of NUMBER as a mask to ENABLE/DISABLE
  LEDs. MSB is the PWR LED and LSB is USR2. Max value is 4095 or 0xFFF.

'get' VALUE:
  VALUE is 'intensity' (the only getter for now).

Examples:
  rainbow all blue auto      reset all LEDs to hardware control, colour blue
  rainbow all blue pwr red   all LEDs blue except the power LED
  rainbow all enable wan auto
                             all LEDs lit except WAN, which flashes with traffic

Exit status: 0 ok, 1 usage error, 2 setup failure, 3 hardware I/O failure.";

#[derive(Parser, Debug)]
#[command(
    name = "rainbow",
    version,
    about = "Set colour, status and brightness of Turris router LEDs",
    after_help = WORDS_HELP
)]
pub struct Args {
    /// Log every hardware write
    #[arg(short, long)]
    pub verbose: bool,

    /// Backend to drive (overrides the config file)
    #[arg(long, value_name = "KIND")]
    pub backend: Option<BackendKind>,

    /// Read configuration from PATH instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print what would be written instead of touching hardware
    #[arg(long)]
    pub dry_run: bool,

    /// Device configurations and directives
    #[arg(value_name = "DEV_CONFIGURATION", trailing_var_arg = true)]
    pub words: Vec<String>,
}

impl Args {
    /// `-h`/`--help` after the first word still asks for help.
    pub fn help_requested(&self) -> bool {
        self.words.iter().any(|w| w == "-h" || w == "--help")
    }

    /// Backend selected by flags, falling back to the config file.
    pub fn backend_kind(&self, config: &Config) -> BackendKind {
        if self.dry_run {
            BackendKind::DryRun
        } else {
            self.backend.unwrap_or(config.backend)
        }
    }
}

/// Load and validate configuration. Invalid values are a setup failure.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                log::warn!("config file {} not found, using defaults", path.display());
            }
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    };
    config.validate().map_err(RainbowError::Config)?;
    Ok(config)
}

/// Open the backend and run the words through the interpreter.
///
/// The backend handle lives for the duration of this call.
pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let kind = args.backend_kind(&config);

    let backend = open_backend(kind, &config).map_err(RainbowError::Setup)?;
    log::debug!("using {} backend", backend.name());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch::execute(backend.as_ref(), &args.words, &mut out)
}
