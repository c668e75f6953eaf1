use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "Renders database rows as auto-generated forms and tables")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "MYSTIQUE_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Template root; views live in its `containers/` directory
    #[arg(long, env = "MYSTIQUE_TEMPLATES", default_value = "templates")]
    pub templates: PathBuf,

    /// Watch templates and reload them on change
    #[arg(long, env = "MYSTIQUE_DEV", default_value_t = false)]
    pub dev: bool,
}
