//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, each value next to its source
//! (`default`, `file` or `env`):
//!
//! ```json
//! {
//!   "seats": {
//!     "value": 6,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use std::io::Write;

use crate::config;
use crate::error::CliError;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    write_resolved(&resolved, out)
}

fn write_resolved(resolved: &config::ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "variant": {
            "value": config.variant,
            "source": sources.variant,
        },
        "seats": {
            "value": config.seats,
            "source": sources.seats,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "policy": {
            "value": config.policy,
            "source": sources.policy,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
