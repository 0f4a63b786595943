use std::path::PathBuf;

use clap::Parser;
use tributary::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "tributary", about = "Resolve and probe the pools a client would spawn")]
pub struct Params {
    /// TOML client config; flags below override it.
    #[arg(long, env = "TRIBUTARY_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "TRIBUTARY_BROKERS", value_delimiter = ',')]
    pub brokers: Option<Vec<String>>,

    #[arg(long, env = "TRIBUTARY_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "TRIBUTARY_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    #[arg(long, env = "TRIBUTARY_GROUP_ID", default_value = "tributary-probe")]
    pub group_id: String,

    #[arg(long, default_value_t = false)]
    pub read_uncommitted: bool,

    /// Also open a connection for every handle.
    #[arg(long, default_value_t = false)]
    pub connect: bool,
}
